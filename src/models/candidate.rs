use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub is_verified: bool,

    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,

    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Candidate {
    pub fn new(name: String, email: String, password_hash: String, is_verified: bool) -> Self {
        let now = Utc::now();
        Self {
            id: ObjectId::new(),
            name,
            email,
            password_hash,
            is_verified,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Public view of a candidate; never carries the password hash.
#[derive(Debug, Serialize)]
pub struct CandidateResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Candidate> for CandidateResponse {
    fn from(candidate: &Candidate) -> Self {
        Self {
            id: candidate.id.to_hex(),
            name: candidate.name.clone(),
            email: candidate.email.clone(),
            is_verified: candidate.is_verified,
            created_at: candidate.created_at,
            updated_at: candidate.updated_at,
        }
    }
}
