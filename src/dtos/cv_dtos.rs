use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::cv::{CvResponse, Education, Experience};

#[derive(Debug, Deserialize, Validate)]
pub struct SaveCvRequest {
    #[validate(length(max = 200, message = "Headline is too long"))]
    pub headline: Option<String>,

    #[validate(length(max = 5000, message = "Summary is too long"))]
    pub summary: Option<String>,

    #[validate(length(max = 30, message = "Phone number is too long"))]
    pub phone: Option<String>,

    #[validate(length(max = 100, message = "Location is too long"))]
    pub location: Option<String>,

    #[serde(default)]
    #[validate(length(max = 100, message = "Too many skills"))]
    pub skills: Vec<String>,

    #[serde(default)]
    #[validate(nested)]
    pub experience: Vec<Experience>,

    #[serde(default)]
    #[validate(nested)]
    pub education: Vec<Education>,
}

#[derive(Debug, Serialize)]
pub struct CvEnvelope {
    pub success: bool,
    pub cv: CvResponse,
}
