use axum::{extract::State, Json};
use chrono::Utc;

use crate::dtos::auth_dtos::{AuthResponse, SendOtpRequest, SendOtpResponse, VerifyOtpRequest};
use crate::dtos::{normalize_email, ValidatedJson};
use crate::errors::{AppError, Result};
use crate::models::candidate::Candidate;
use crate::models::otp::PendingRegistration;
use crate::models::user::Role;
use crate::services::otp_service::OTPService;
use crate::state::AppState;

// 1. Start registration: park the details and email a code
pub async fn send_otp(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<SendOtpRequest>,
) -> Result<Json<SendOtpResponse>> {
    let email = normalize_email(&req.email);

    if state.candidates.find_by_email(&email).await?.is_some() {
        return Err(AppError::conflict("Candidate with this email already exists"));
    }

    let pending = PendingRegistration {
        name: req.name.trim().to_string(),
        password_hash: state.passwords.hash(&req.password).await?,
        created_at: Utc::now(),
    };

    let otp_code = OTPService::generate_otp();
    let record = state
        .otp_service
        .store_registration(&email, &pending, &otp_code)
        .await?;

    if let Err(e) = state
        .mailer
        .send_otp(&email, &pending.name, &otp_code, state.otp_service.ttl())
        .await
    {
        tracing::error!("Failed to send OTP email: {}", e);
        if let Err(cleanup) = state.otp_service.discard(&email).await {
            tracing::warn!("Failed to roll back pending registration: {}", cleanup);
        }
        return Err(AppError::integration(format!("Failed to send OTP email: {}", e)));
    }

    tracing::info!(
        transport = state.mailer.transport(),
        expires_at = %record.expires_at,
        "Registration OTP issued"
    );

    Ok(Json(SendOtpResponse {
        success: true,
        message: "OTP sent to your email".to_string(),
        otp: state.config.expose_otp_in_response.then_some(otp_code),
    }))
}

// 2. Verify OTP and create the candidate
pub async fn verify_otp(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<VerifyOtpRequest>,
) -> Result<Json<AuthResponse>> {
    let email = normalize_email(&req.email);

    let pending = state.otp_service.consume(&email, &req.otp).await?;

    let inserted = state
        .candidates
        .insert(Candidate::new(
            pending.name,
            email.clone(),
            pending.password_hash,
            true,
        ))
        .await;

    // The code is spent, so the pending data is useless whether or not the
    // insert went through.
    if let Err(e) = state.otp_service.complete(&email).await {
        tracing::warn!("Failed to clear pending registration: {}", e);
    }

    let candidate = inserted?;
    let token = state.tokens.issue(
        &candidate.id.to_hex(),
        &candidate.email,
        &candidate.name,
        Role::Candidate,
    )?;

    tracing::info!(candidate_id = %candidate.id, "Candidate registered via OTP");

    Ok(Json(AuthResponse {
        success: true,
        message: "Email verified, registration complete".to_string(),
        token,
        candidate: (&candidate).into(),
    }))
}
