use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct Experience {
    #[validate(length(min = 1, message = "company is required"))]
    pub company: String,
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct Education {
    #[validate(length(min = 1, message = "institution is required"))]
    pub institution: String,
    #[serde(default)]
    pub degree: Option<String>,
    #[serde(default)]
    pub field_of_study: Option<String>,
    #[serde(default)]
    pub graduation_year: Option<i32>,
}

/// One CV document per candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CvData {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub candidate_id: ObjectId,
    pub headline: Option<String>,
    pub summary: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub skills: Vec<String>,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,

    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct CvResponse {
    pub candidate_id: String,
    pub headline: Option<String>,
    pub summary: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub skills: Vec<String>,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    pub updated_at: DateTime<Utc>,
}

impl From<&CvData> for CvResponse {
    fn from(cv: &CvData) -> Self {
        Self {
            candidate_id: cv.candidate_id.to_hex(),
            headline: cv.headline.clone(),
            summary: cv.summary.clone(),
            phone: cv.phone.clone(),
            location: cv.location.clone(),
            skills: cv.skills.clone(),
            experience: cv.experience.clone(),
            education: cv.education.clone(),
            updated_at: cv.updated_at,
        }
    }
}
