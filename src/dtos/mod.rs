pub mod auth_dtos;
pub mod cv_dtos;
pub mod job_dtos;
pub mod validated_json;

pub use validated_json::ValidatedJson;

/// Emails are compared case-insensitively everywhere, so store them folded.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
