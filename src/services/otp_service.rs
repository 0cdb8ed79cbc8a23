use std::sync::Arc;

use chrono::{Duration, Utc};
use rand::Rng;

use crate::errors::{AppError, Result};
use crate::models::otp::{OtpRecord, PendingRegistration};
use crate::services::pending_store::PendingStore;

const OTP_KEY_PREFIX: &str = "recruva:otp:";
const PENDING_KEY_PREFIX: &str = "recruva:pending:";

fn otp_key(email: &str) -> String {
    format!("{}{}", OTP_KEY_PREFIX, email)
}

fn pending_key(email: &str) -> String {
    format!("{}{}", PENDING_KEY_PREFIX, email)
}

/// Holds registrations between "send OTP" and "verify OTP".
///
/// Records are kept for `ttl + retention` in the store so that a late
/// verification can still be told the code expired rather than that it never
/// existed.
#[derive(Clone)]
pub struct OTPService {
    store: Arc<dyn PendingStore>,
    ttl: Duration,
    retention: Duration,
}

impl OTPService {
    pub fn new(store: Arc<dyn PendingStore>, ttl: Duration, retention: Duration) -> Self {
        Self {
            store,
            ttl,
            retention,
        }
    }

    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    // Generate 6-digit OTP
    pub fn generate_otp() -> String {
        let mut rng = rand::thread_rng();
        rng.gen_range(100_000..=999_999u32).to_string()
    }

    /// Stores the pending registration and its code, replacing any earlier
    /// pair for the same email.
    pub async fn store_registration(
        &self,
        email: &str,
        pending: &PendingRegistration,
        code: &str,
    ) -> Result<OtpRecord> {
        let record = OtpRecord {
            code: code.to_string(),
            expires_at: Utc::now() + self.ttl,
        };
        let keep_for = self.ttl + self.retention;

        self.store
            .put(&pending_key(email), serde_json::to_string(pending)?, keep_for)
            .await?;

        if let Err(e) = self
            .store
            .put(&otp_key(email), serde_json::to_string(&record)?, keep_for)
            .await
        {
            self.store.delete(&pending_key(email)).await.ok();
            return Err(e);
        }

        Ok(record)
    }

    /// Checks `code` against the stored OTP and, on a match, consumes it and
    /// hands back the pending registration. The pending data itself stays in
    /// the store until [`OTPService::complete`] is called.
    pub async fn consume(&self, email: &str, code: &str) -> Result<PendingRegistration> {
        let record: OtpRecord = match self.store.get(&otp_key(email)).await? {
            Some(raw) => serde_json::from_str(&raw)?,
            None => return Err(AppError::OtpNotFound),
        };

        if record.is_expired_at(Utc::now()) {
            self.discard(email).await?;
            return Err(AppError::OtpExpired);
        }

        if record.code != code {
            return Err(AppError::InvalidOtp);
        }

        // Only the caller whose delete removed the record may go on.
        if !self.store.delete(&otp_key(email)).await? {
            return Err(AppError::OtpNotFound);
        }

        match self.store.get(&pending_key(email)).await? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Err(AppError::RegistrationDataNotFound),
        }
    }

    /// Drops the pending registration once the candidate has been created.
    pub async fn complete(&self, email: &str) -> Result<()> {
        self.store.delete(&pending_key(email)).await?;
        Ok(())
    }

    /// Drops both the OTP and the pending registration.
    pub async fn discard(&self, email: &str) -> Result<()> {
        self.store.delete(&otp_key(email)).await?;
        self.store.delete(&pending_key(email)).await?;
        Ok(())
    }
}
