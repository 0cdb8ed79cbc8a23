use async_trait::async_trait;
use chrono::Utc;
use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Document},
    options::ReturnDocument,
    Collection, Database,
};

use super::connection::JOBS;
use crate::errors::Result;
use crate::models::job::{Job, JobChanges, JobStatus};

#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn insert(&self, job: Job) -> Result<Job>;

    /// Newest first, optionally restricted to one status.
    async fn list(&self, status: Option<JobStatus>) -> Result<Vec<Job>>;

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Job>>;

    async fn update(&self, id: &ObjectId, changes: JobChanges) -> Result<Option<Job>>;

    /// Returns false when no job had this id.
    async fn delete(&self, id: &ObjectId) -> Result<bool>;
}

pub struct MongoJobRepository {
    collection: Collection<Job>,
}

impl MongoJobRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(JOBS),
        }
    }
}

fn changes_to_set(changes: JobChanges) -> Document {
    let mut set = doc! { "updated_at": bson::DateTime::from_chrono(Utc::now()) };

    if let Some(title) = changes.title {
        set.insert("title", title);
    }
    if let Some(description) = changes.description {
        set.insert("description", description);
    }
    if let Some(department) = changes.department {
        set.insert("department", department);
    }
    if let Some(location) = changes.location {
        set.insert("location", location);
    }
    if let Some(employment_type) = changes.employment_type {
        set.insert("employment_type", employment_type);
    }
    if let Some(status) = changes.status {
        set.insert("status", status.as_str());
    }

    set
}

#[async_trait]
impl JobRepository for MongoJobRepository {
    async fn insert(&self, job: Job) -> Result<Job> {
        self.collection.insert_one(&job).await?;
        Ok(job)
    }

    async fn list(&self, status: Option<JobStatus>) -> Result<Vec<Job>> {
        let filter = match status {
            Some(status) => doc! { "status": status.as_str() },
            None => doc! {},
        };

        let cursor = self
            .collection
            .find(filter)
            .sort(doc! { "created_at": -1 })
            .await?;

        Ok(cursor.try_collect().await?)
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Job>> {
        Ok(self.collection.find_one(doc! { "_id": *id }).await?)
    }

    async fn update(&self, id: &ObjectId, changes: JobChanges) -> Result<Option<Job>> {
        let update = doc! { "$set": changes_to_set(changes) };

        Ok(self
            .collection
            .find_one_and_update(doc! { "_id": *id }, update)
            .return_document(ReturnDocument::After)
            .await?)
    }

    async fn delete(&self, id: &ObjectId) -> Result<bool> {
        let result = self.collection.delete_one(doc! { "_id": *id }).await?;
        Ok(result.deleted_count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_changes_to_set_only_touches_given_fields() {
        let set = changes_to_set(JobChanges {
            title: Some("Backend Engineer".to_string()),
            status: Some(JobStatus::Closed),
            ..Default::default()
        });

        assert_eq!(set.get_str("title").unwrap(), "Backend Engineer");
        assert_eq!(set.get_str("status").unwrap(), "closed");
        assert!(set.contains_key("updated_at"));
        assert!(!set.contains_key("description"));
        assert!(!set.contains_key("location"));
    }
}
