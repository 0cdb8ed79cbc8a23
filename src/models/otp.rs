use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct OtpRecord {
    pub code: String,              // 6-digit OTP
    pub expires_at: DateTime<Utc>, // When OTP expires
}

impl OtpRecord {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Registration details held until the emailed code is confirmed.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PendingRegistration {
    pub name: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}
