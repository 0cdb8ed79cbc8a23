use std::sync::Arc;

use mongodb::Database;

use crate::config::AppConfig;
use crate::database::{
    candidates::MongoCandidateRepository, cvs::MongoCvRepository, jobs::MongoJobRepository,
    staff_users::MongoStaffUserRepository, CandidateRepository, CvRepository, JobRepository,
    StaffUserRepository,
};
use crate::services::{
    email_service::OtpMailer, otp_service::OTPService, password::PasswordService,
    pending_store::PendingStore, token_service::TokenService,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    /// Kept for health pings; repositories hold their own collection handles.
    pub db: Option<Database>,
    pub candidates: Arc<dyn CandidateRepository>,
    pub staff_users: Arc<dyn StaffUserRepository>,
    pub jobs: Arc<dyn JobRepository>,
    pub cvs: Arc<dyn CvRepository>,
    pub otp_service: OTPService,
    pub mailer: Arc<dyn OtpMailer>,
    pub tokens: TokenService,
    pub passwords: PasswordService,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        db: Database,
        pending_store: Arc<dyn PendingStore>,
        mailer: Arc<dyn OtpMailer>,
    ) -> Self {
        AppState {
            candidates: Arc::new(MongoCandidateRepository::new(&db)),
            staff_users: Arc::new(MongoStaffUserRepository::new(&db)),
            jobs: Arc::new(MongoJobRepository::new(&db)),
            cvs: Arc::new(MongoCvRepository::new(&db)),
            db: Some(db),
            otp_service: OTPService::new(pending_store, config.otp_ttl, config.otp_retention),
            mailer,
            tokens: TokenService::new(&config.jwt_secret, config.jwt_ttl),
            passwords: PasswordService::new(config.bcrypt_cost),
            config: Arc::new(config),
        }
    }
}
