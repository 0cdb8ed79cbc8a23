use async_trait::async_trait;
use mongodb::{
    bson::{doc, oid::ObjectId},
    Collection, Database,
};

use super::connection::{is_duplicate_key, STAFF_USERS};
use crate::errors::{AppError, Result};
use crate::models::user::StaffUser;

#[async_trait]
pub trait StaffUserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<StaffUser>>;

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<StaffUser>>;

    async fn insert(&self, user: StaffUser) -> Result<StaffUser>;
}

pub struct MongoStaffUserRepository {
    collection: Collection<StaffUser>,
}

impl MongoStaffUserRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(STAFF_USERS),
        }
    }
}

#[async_trait]
impl StaffUserRepository for MongoStaffUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<StaffUser>> {
        Ok(self.collection.find_one(doc! { "email": email }).await?)
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<StaffUser>> {
        Ok(self.collection.find_one(doc! { "_id": *id }).await?)
    }

    async fn insert(&self, user: StaffUser) -> Result<StaffUser> {
        match self.collection.insert_one(&user).await {
            Ok(_) => Ok(user),
            Err(e) if is_duplicate_key(&e) => {
                Err(AppError::conflict("User with this email already exists"))
            }
            Err(e) => Err(e.into()),
        }
    }
}
