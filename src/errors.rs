// src/errors.rs
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("MongoDB error: {0}")]
    MongoDB(#[from] mongodb::error::Error),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("{0}")]
    ValidationError(String),

    #[error("{0}")]
    Conflict(String),

    #[error("No OTP found for this email")]
    OtpNotFound,

    #[error("OTP has expired")]
    OtpExpired,

    #[error("Invalid OTP")]
    InvalidOtp,

    #[error("Registration data not found")]
    RegistrationDataNotFound,

    #[error("{0}")]
    AuthError(String),

    #[error("Access denied")]
    Forbidden,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Integration(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::Conflict(_)
            | AppError::OtpNotFound
            | AppError::OtpExpired
            | AppError::InvalidOtp
            | AppError::RegistrationDataNotFound => StatusCode::BAD_REQUEST,
            AppError::AuthError(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::MongoDB(_)
            | AppError::Redis(_)
            | AppError::Integration(_)
            | AppError::ConfigurationError(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn category(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "Validation failed",
            AppError::Conflict(_) => "Conflict",
            AppError::OtpNotFound
            | AppError::OtpExpired
            | AppError::InvalidOtp
            | AppError::RegistrationDataNotFound => "OTP verification failed",
            AppError::AuthError(_) => "Authentication failed",
            AppError::Forbidden => "Forbidden",
            AppError::NotFound(_) => "Not found",
            AppError::Integration(_) => "Upstream service error",
            AppError::MongoDB(_) => "Database error",
            AppError::Redis(_) => "Cache error",
            AppError::ConfigurationError(_) => "Configuration error",
            AppError::Internal(_) => "Internal error",
        }
    }

    fn public_message(&self) -> String {
        match self {
            // Driver errors can carry hostnames and credentials.
            AppError::MongoDB(_) => "Database error".to_string(),
            AppError::Redis(_) => "Cache error".to_string(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = Json(json!({
            "error": self.category(),
            "message": self.public_message(),
            "success": false,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        }));

        (status, body).into_response()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::ValidationError(format!("Validation error: {}", errors))
    }
}

impl From<bson::oid::Error> for AppError {
    fn from(_: bson::oid::Error) -> Self {
        AppError::ValidationError("Invalid ID format".to_string())
    }
}

impl From<bson::ser::Error> for AppError {
    fn from(err: bson::ser::Error) -> Self {
        AppError::Internal(format!("Document encoding failed: {}", err))
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(err: bcrypt::BcryptError) -> Self {
        AppError::Internal(format!("Password hashing failed: {}", err))
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        AppError::Internal(format!("Token generation failed: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(format!("Serialization failed: {}", err))
    }
}

// Helper conversion functions
impl AppError {
    pub fn invalid_data(msg: impl Into<String>) -> Self {
        AppError::ValidationError(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        AppError::Conflict(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        AppError::AuthError(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }

    pub fn integration(msg: impl Into<String>) -> Self {
        AppError::Integration(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        AppError::ConfigurationError(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
