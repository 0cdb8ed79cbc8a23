use axum::{
    extract::{Path, Query, State},
    Json,
};
use bson::oid::ObjectId;
use chrono::Utc;

use crate::dtos::job_dtos::{
    CreateJobRequest, JobEnvelope, JobListQuery, JobListResponse, MessageResponse, UpdateJobRequest,
};
use crate::dtos::ValidatedJson;
use crate::errors::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::job::{Job, JobResponse, JobStatus};
use crate::state::AppState;

fn job_not_found() -> AppError {
    AppError::not_found("Job not found")
}

pub async fn list_jobs(
    State(state): State<AppState>,
    Query(query): Query<JobListQuery>,
) -> Result<Json<JobListResponse>> {
    let status = query
        .status
        .as_deref()
        .map(str::parse::<JobStatus>)
        .transpose()?;

    let jobs: Vec<JobResponse> = state
        .jobs
        .list(status)
        .await?
        .iter()
        .map(JobResponse::from)
        .collect();

    Ok(Json(JobListResponse {
        success: true,
        count: jobs.len(),
        jobs,
    }))
}

pub async fn get_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<JobEnvelope>> {
    let id = ObjectId::parse_str(&job_id)?;

    let job = state.jobs.find_by_id(&id).await?.ok_or_else(job_not_found)?;

    Ok(Json(JobEnvelope {
        success: true,
        job: (&job).into(),
    }))
}

pub async fn create_job(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateJobRequest>,
) -> Result<Json<JobEnvelope>> {
    let created_by = ObjectId::parse_str(&claims.id)?;
    let now = Utc::now();

    let job = state
        .jobs
        .insert(Job {
            id: ObjectId::new(),
            title: payload.title.trim().to_string(),
            description: payload.description,
            department: payload.department.trim().to_string(),
            location: payload.location.trim().to_string(),
            employment_type: payload.employment_type.trim().to_string(),
            status: payload.status,
            created_by,
            created_at: now,
            updated_at: now,
        })
        .await?;

    tracing::info!(job_id = %job.id, created_by = %claims.id, "Job posted");

    Ok(Json(JobEnvelope {
        success: true,
        job: (&job).into(),
    }))
}

pub async fn update_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateJobRequest>,
) -> Result<Json<JobEnvelope>> {
    let id = ObjectId::parse_str(&job_id)?;

    let job = state
        .jobs
        .update(&id, payload.into())
        .await?
        .ok_or_else(job_not_found)?;

    Ok(Json(JobEnvelope {
        success: true,
        job: (&job).into(),
    }))
}

pub async fn delete_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let id = ObjectId::parse_str(&job_id)?;

    if !state.jobs.delete(&id).await? {
        return Err(job_not_found());
    }

    tracing::info!(job_id = %id, "Job deleted");

    Ok(Json(MessageResponse {
        success: true,
        message: "Job deleted".to_string(),
    }))
}
