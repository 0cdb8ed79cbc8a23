use axum::{
    extract::{Path, State},
    Json,
};
use bson::oid::ObjectId;
use chrono::Utc;

use crate::dtos::cv_dtos::{CvEnvelope, SaveCvRequest};
use crate::dtos::ValidatedJson;
use crate::errors::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::cv::CvData;
use crate::state::AppState;

async fn load_cv(state: &AppState, candidate_id: &ObjectId) -> Result<Json<CvEnvelope>> {
    let cv = state
        .cvs
        .find_by_candidate(candidate_id)
        .await?
        .ok_or_else(|| AppError::not_found("CV not found"))?;

    Ok(Json(CvEnvelope {
        success: true,
        cv: (&cv).into(),
    }))
}

pub async fn get_own_cv(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<Json<CvEnvelope>> {
    let candidate_id = ObjectId::parse_str(&claims.id)?;
    load_cv(&state, &candidate_id).await
}

pub async fn save_own_cv(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    ValidatedJson(payload): ValidatedJson<SaveCvRequest>,
) -> Result<Json<CvEnvelope>> {
    let candidate_id = ObjectId::parse_str(&claims.id)?;

    let skills = payload
        .skills
        .into_iter()
        .map(|skill| skill.trim().to_string())
        .filter(|skill| !skill.is_empty())
        .collect();

    let cv = state
        .cvs
        .upsert(CvData {
            id: ObjectId::new(),
            candidate_id,
            headline: payload.headline,
            summary: payload.summary,
            phone: payload.phone,
            location: payload.location,
            skills,
            experience: payload.experience,
            education: payload.education,
            updated_at: Utc::now(),
        })
        .await?;

    tracing::info!(candidate_id = %candidate_id, "CV saved");

    Ok(Json(CvEnvelope {
        success: true,
        cv: (&cv).into(),
    }))
}

pub async fn get_candidate_cv(
    State(state): State<AppState>,
    Path(candidate_id): Path<String>,
) -> Result<Json<CvEnvelope>> {
    let candidate_id = ObjectId::parse_str(&candidate_id)?;
    load_cv(&state, &candidate_id).await
}
