use async_trait::async_trait;
use mongodb::{
    bson::{doc, oid::ObjectId, Document},
    options::ReturnDocument,
    Collection, Database,
};

use super::connection::{is_duplicate_key, CV_DATA};
use crate::errors::{AppError, Result};
use crate::models::cv::CvData;

#[async_trait]
pub trait CvRepository: Send + Sync {
    async fn find_by_candidate(&self, candidate_id: &ObjectId) -> Result<Option<CvData>>;

    /// Overwrites the candidate's CV, creating it on first save. An existing
    /// document keeps its id; `cv.id` is only used on insert.
    async fn upsert(&self, cv: CvData) -> Result<CvData>;
}

pub struct MongoCvRepository {
    collection: Collection<CvData>,
}

impl MongoCvRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(CV_DATA),
        }
    }
}

/// `_id` is immutable, so it only goes into `$setOnInsert`.
fn upsert_update(cv: &CvData) -> Result<Document> {
    let mut fields = bson::to_document(cv)?;
    fields.remove("_id");

    Ok(doc! {
        "$set": fields,
        "$setOnInsert": { "_id": cv.id },
    })
}

#[async_trait]
impl CvRepository for MongoCvRepository {
    async fn find_by_candidate(&self, candidate_id: &ObjectId) -> Result<Option<CvData>> {
        Ok(self
            .collection
            .find_one(doc! { "candidate_id": *candidate_id })
            .await?)
    }

    async fn upsert(&self, cv: CvData) -> Result<CvData> {
        let filter = doc! { "candidate_id": cv.candidate_id };
        let update = upsert_update(&cv)?;

        let saved = match self
            .collection
            .find_one_and_update(filter.clone(), update.clone())
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await
        {
            // A concurrent first save inserted the document; this pass updates it.
            Err(e) if is_duplicate_key(&e) => {
                self.collection
                    .find_one_and_update(filter, update)
                    .upsert(true)
                    .return_document(ReturnDocument::After)
                    .await?
            }
            other => other?,
        };

        saved.ok_or_else(|| AppError::internal("CV upsert returned no document"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_upsert_update_never_sets_id() {
        let cv = CvData {
            id: ObjectId::new(),
            candidate_id: ObjectId::new(),
            headline: Some("Rust developer".to_string()),
            summary: None,
            phone: None,
            location: None,
            skills: vec!["Rust".to_string()],
            experience: Vec::new(),
            education: Vec::new(),
            updated_at: Utc::now(),
        };

        let update = upsert_update(&cv).unwrap();
        let set = update.get_document("$set").unwrap();
        let on_insert = update.get_document("$setOnInsert").unwrap();

        assert!(!set.contains_key("_id"));
        assert_eq!(set.get_object_id("candidate_id").unwrap(), cv.candidate_id);
        assert_eq!(set.get_str("headline").unwrap(), "Rust developer");
        assert!(set.contains_key("updated_at"));
        assert_eq!(on_insert.get_object_id("_id").unwrap(), cv.id);
    }
}
