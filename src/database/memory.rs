//! In-process repositories used by the test suite.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use bson::oid::ObjectId;
use chrono::Utc;

use super::{CandidateRepository, CvRepository, JobRepository, StaffUserRepository};
use crate::errors::{AppError, Result};
use crate::models::{
    candidate::Candidate,
    cv::CvData,
    job::{Job, JobChanges, JobStatus},
    user::StaffUser,
};

#[derive(Default)]
pub struct MemoryCandidateRepository {
    rows: Mutex<HashMap<ObjectId, Candidate>>,
}

#[async_trait]
impl CandidateRepository for MemoryCandidateRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Candidate>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.values().find(|c| c.email == email).cloned())
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Candidate>> {
        Ok(self.rows.lock().unwrap().get(id).cloned())
    }

    async fn insert(&self, candidate: Candidate) -> Result<Candidate> {
        // Check and insert under one lock, like a unique index would.
        let mut rows = self.rows.lock().unwrap();
        if rows.values().any(|c| c.email == candidate.email) {
            return Err(AppError::conflict("Candidate with this email already exists"));
        }
        rows.insert(candidate.id, candidate.clone());
        Ok(candidate)
    }

    async fn update_name(&self, id: &ObjectId, name: &str) -> Result<Option<Candidate>> {
        let mut rows = self.rows.lock().unwrap();
        Ok(rows.get_mut(id).map(|candidate| {
            candidate.name = name.to_string();
            candidate.updated_at = Utc::now();
            candidate.clone()
        }))
    }
}

#[derive(Default)]
pub struct MemoryStaffUserRepository {
    rows: Mutex<HashMap<ObjectId, StaffUser>>,
}

#[async_trait]
impl StaffUserRepository for MemoryStaffUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<StaffUser>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<StaffUser>> {
        Ok(self.rows.lock().unwrap().get(id).cloned())
    }

    async fn insert(&self, user: StaffUser) -> Result<StaffUser> {
        let mut rows = self.rows.lock().unwrap();
        if rows.values().any(|u| u.email == user.email) {
            return Err(AppError::conflict("User with this email already exists"));
        }
        rows.insert(user.id, user.clone());
        Ok(user)
    }
}

#[derive(Default)]
pub struct MemoryJobRepository {
    rows: Mutex<HashMap<ObjectId, Job>>,
}

#[async_trait]
impl JobRepository for MemoryJobRepository {
    async fn insert(&self, job: Job) -> Result<Job> {
        self.rows.lock().unwrap().insert(job.id, job.clone());
        Ok(job)
    }

    async fn list(&self, status: Option<JobStatus>) -> Result<Vec<Job>> {
        let rows = self.rows.lock().unwrap();
        let mut jobs: Vec<Job> = rows
            .values()
            .filter(|job| status.map_or(true, |s| job.status == s))
            .cloned()
            .collect();
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(jobs)
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Job>> {
        Ok(self.rows.lock().unwrap().get(id).cloned())
    }

    async fn update(&self, id: &ObjectId, changes: JobChanges) -> Result<Option<Job>> {
        let mut rows = self.rows.lock().unwrap();
        Ok(rows.get_mut(id).map(|job| {
            apply_changes(job, changes);
            job.clone()
        }))
    }

    async fn delete(&self, id: &ObjectId) -> Result<bool> {
        Ok(self.rows.lock().unwrap().remove(id).is_some())
    }
}

fn apply_changes(job: &mut Job, changes: JobChanges) {
    if let Some(title) = changes.title {
        job.title = title;
    }
    if let Some(description) = changes.description {
        job.description = description;
    }
    if let Some(department) = changes.department {
        job.department = department;
    }
    if let Some(location) = changes.location {
        job.location = location;
    }
    if let Some(employment_type) = changes.employment_type {
        job.employment_type = employment_type;
    }
    if let Some(status) = changes.status {
        job.status = status;
    }
    job.updated_at = Utc::now();
}

#[derive(Default)]
pub struct MemoryCvRepository {
    rows: Mutex<HashMap<ObjectId, CvData>>,
}

#[async_trait]
impl CvRepository for MemoryCvRepository {
    async fn find_by_candidate(&self, candidate_id: &ObjectId) -> Result<Option<CvData>> {
        Ok(self.rows.lock().unwrap().get(candidate_id).cloned())
    }

    async fn upsert(&self, mut cv: CvData) -> Result<CvData> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(existing) = rows.get(&cv.candidate_id) {
            cv.id = existing.id;
        }
        rows.insert(cv.candidate_id, cv.clone());
        Ok(cv)
    }
}
