use axum::{extract::State, Json};
use bson::oid::ObjectId;

use crate::dtos::auth_dtos::{AuthResponse, LoginRequest, ProfileResponse, RegisterRequest, UpdateProfileRequest};
use crate::dtos::{normalize_email, ValidatedJson};
use crate::errors::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::candidate::Candidate;
use crate::models::user::Role;
use crate::state::AppState;

const INVALID_CREDENTIALS: &str = "Invalid credentials";

fn issue_token(state: &AppState, candidate: &Candidate) -> Result<String> {
    state.tokens.issue(
        &candidate.id.to_hex(),
        &candidate.email,
        &candidate.name,
        Role::Candidate,
    )
}

pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> Result<Json<AuthResponse>> {
    let email = normalize_email(&payload.email);

    if state.candidates.find_by_email(&email).await?.is_some() {
        return Err(AppError::conflict("Candidate with this email already exists"));
    }

    let password_hash = state.passwords.hash(&payload.password).await?;

    // The unique index still decides if two registrations race past the check.
    let candidate = state
        .candidates
        .insert(Candidate::new(
            payload.name.trim().to_string(),
            email,
            password_hash,
            false,
        ))
        .await?;

    let token = issue_token(&state, &candidate)?;
    tracing::info!(candidate_id = %candidate.id, "Candidate registered");

    Ok(Json(AuthResponse {
        success: true,
        message: "Registration successful".to_string(),
        token,
        candidate: (&candidate).into(),
    }))
}

pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let email = normalize_email(&payload.email);

    let candidate = state
        .candidates
        .find_by_email(&email)
        .await?
        .ok_or_else(|| AppError::unauthorized(INVALID_CREDENTIALS))?;

    if !state
        .passwords
        .verify(&payload.password, &candidate.password_hash)
        .await?
    {
        return Err(AppError::unauthorized(INVALID_CREDENTIALS));
    }

    let token = issue_token(&state, &candidate)?;

    Ok(Json(AuthResponse {
        success: true,
        message: "Login successful".to_string(),
        token,
        candidate: (&candidate).into(),
    }))
}

pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<Json<ProfileResponse>> {
    let id = ObjectId::parse_str(&claims.id)?;

    let candidate = state
        .candidates
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Candidate not found"))?;

    Ok(Json(ProfileResponse {
        success: true,
        candidate: (&candidate).into(),
    }))
}

pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    ValidatedJson(payload): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>> {
    let id = ObjectId::parse_str(&claims.id)?;

    let candidate = state
        .candidates
        .update_name(&id, payload.name.trim())
        .await?
        .ok_or_else(|| AppError::not_found("Candidate not found"))?;

    Ok(Json(ProfileResponse {
        success: true,
        candidate: (&candidate).into(),
    }))
}
