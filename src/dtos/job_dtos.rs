use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::job::{JobChanges, JobResponse, JobStatus};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateJobRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "Department is required"))]
    pub department: String,

    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "Location is required"))]
    pub location: String,

    #[serde(default)]
    #[validate(length(min = 1, max = 50, message = "Employment type is required"))]
    pub employment_type: String,

    #[serde(default)]
    pub status: JobStatus,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateJobRequest {
    #[validate(length(min = 1, max = 200, message = "Title cannot be empty"))]
    pub title: Option<String>,

    #[validate(length(min = 1, message = "Description cannot be empty"))]
    pub description: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Department cannot be empty"))]
    pub department: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Location cannot be empty"))]
    pub location: Option<String>,

    #[validate(length(min = 1, max = 50, message = "Employment type cannot be empty"))]
    pub employment_type: Option<String>,

    pub status: Option<JobStatus>,
}

impl From<UpdateJobRequest> for JobChanges {
    fn from(req: UpdateJobRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            department: req.department,
            location: req.location,
            employment_type: req.employment_type,
            status: req.status,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct JobListQuery {
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct JobEnvelope {
    pub success: bool,
    pub job: JobResponse,
}

#[derive(Debug, Serialize)]
pub struct JobListResponse {
    pub success: bool,
    pub count: usize,
    pub jobs: Vec<JobResponse>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}
