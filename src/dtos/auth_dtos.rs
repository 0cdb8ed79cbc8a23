use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::candidate::CandidateResponse;
use crate::models::user::{Role, StaffUserResponse};

#[derive(Debug, Deserialize, Validate)]
pub struct SendOtpRequest {
    #[serde(default)]
    #[validate(email(message = "A valid email is required"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,

    #[serde(default)]
    #[validate(length(min = 6, max = 128, message = "Password must be at least 6 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct VerifyOtpRequest {
    #[serde(default)]
    #[validate(email(message = "A valid email is required"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "OTP is required"))]
    pub otp: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,

    #[serde(default)]
    #[validate(email(message = "A valid email is required"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 6, max = 128, message = "Password must be at least 6 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateStaffUserRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,

    #[serde(default)]
    #[validate(email(message = "A valid email is required"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 6, max = 128, message = "Password must be at least 6 characters"))]
    pub password: String,

    pub role: Role,

    #[validate(length(min = 1, max = 100, message = "Department cannot be empty"))]
    pub department: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SendOtpResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub otp: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
    pub candidate: CandidateResponse,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub success: bool,
    pub candidate: CandidateResponse,
}

#[derive(Debug, Serialize)]
pub struct StaffAuthResponse {
    pub success: bool,
    pub token: String,
    pub user: StaffUserResponse,
}

#[derive(Debug, Serialize)]
pub struct StaffUserEnvelope {
    pub success: bool,
    pub user: StaffUserResponse,
}
