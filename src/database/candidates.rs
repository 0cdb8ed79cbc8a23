use async_trait::async_trait;
use chrono::Utc;
use mongodb::{
    bson::{doc, oid::ObjectId},
    options::ReturnDocument,
    Collection, Database,
};

use super::connection::{is_duplicate_key, CANDIDATES};
use crate::errors::{AppError, Result};
use crate::models::candidate::Candidate;

#[async_trait]
pub trait CandidateRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Candidate>>;

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Candidate>>;

    /// Fails with `AppError::Conflict` when the email is already taken.
    async fn insert(&self, candidate: Candidate) -> Result<Candidate>;

    async fn update_name(&self, id: &ObjectId, name: &str) -> Result<Option<Candidate>>;
}

pub struct MongoCandidateRepository {
    collection: Collection<Candidate>,
}

impl MongoCandidateRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(CANDIDATES),
        }
    }
}

#[async_trait]
impl CandidateRepository for MongoCandidateRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Candidate>> {
        Ok(self.collection.find_one(doc! { "email": email }).await?)
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Candidate>> {
        Ok(self.collection.find_one(doc! { "_id": *id }).await?)
    }

    async fn insert(&self, candidate: Candidate) -> Result<Candidate> {
        match self.collection.insert_one(&candidate).await {
            Ok(_) => Ok(candidate),
            Err(e) if is_duplicate_key(&e) => {
                Err(AppError::conflict("Candidate with this email already exists"))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn update_name(&self, id: &ObjectId, name: &str) -> Result<Option<Candidate>> {
        let update = doc! {
            "$set": {
                "name": name,
                "updated_at": bson::DateTime::from_chrono(Utc::now()),
            }
        };

        Ok(self
            .collection
            .find_one_and_update(doc! { "_id": *id }, update)
            .return_document(ReturnDocument::After)
            .await?)
    }
}
