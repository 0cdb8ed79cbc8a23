use mongodb::{
    bson::doc,
    error::{ErrorKind, WriteFailure},
    options::IndexOptions,
    Client, Database, IndexModel,
};

use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::{candidate::Candidate, cv::CvData, job::Job, user::StaffUser};

pub const CANDIDATES: &str = "candidates";
pub const STAFF_USERS: &str = "staff_users";
pub const JOBS: &str = "jobs";
pub const CV_DATA: &str = "cv_data";

const DUPLICATE_KEY: i32 = 11000;

pub async fn get_db_client(config: &AppConfig) -> Result<Database> {
    let client = Client::with_uri_str(&config.database_url).await?;
    let db = client.database(&config.database_name);

    db.run_command(doc! { "ping": 1 }).await?;
    tracing::info!(database = %config.database_name, "Connected to MongoDB");

    ensure_indexes(&db).await?;

    Ok(db)
}

/// Unique indexes are what actually enforce one account per email and one CV
/// per candidate; the application-level checks only give earlier errors.
async fn ensure_indexes(db: &Database) -> Result<()> {
    let unique = || IndexOptions::builder().unique(true).build();

    db.collection::<Candidate>(CANDIDATES)
        .create_index(
            IndexModel::builder()
                .keys(doc! { "email": 1 })
                .options(unique())
                .build(),
        )
        .await?;

    db.collection::<StaffUser>(STAFF_USERS)
        .create_index(
            IndexModel::builder()
                .keys(doc! { "email": 1 })
                .options(unique())
                .build(),
        )
        .await?;

    db.collection::<CvData>(CV_DATA)
        .create_index(
            IndexModel::builder()
                .keys(doc! { "candidate_id": 1 })
                .options(unique())
                .build(),
        )
        .await?;

    db.collection::<Job>(JOBS)
        .create_index(IndexModel::builder().keys(doc! { "created_at": -1 }).build())
        .await?;

    tracing::debug!("Database indexes ensured");
    Ok(())
}

pub fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => write_error.code == DUPLICATE_KEY,
        ErrorKind::Command(command_error) => command_error.code == DUPLICATE_KEY,
        _ => false,
    }
}
