use axum::{extract::State, Json};
use bson::oid::ObjectId;

use crate::config::BootstrapHr;
use crate::dtos::auth_dtos::{CreateStaffUserRequest, LoginRequest, StaffAuthResponse, StaffUserEnvelope};
use crate::dtos::{normalize_email, ValidatedJson};
use crate::errors::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::user::{Role, StaffUser};
use crate::state::AppState;

pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> Result<Json<StaffAuthResponse>> {
    let email = normalize_email(&payload.email);

    let user = state
        .staff_users
        .find_by_email(&email)
        .await?
        .ok_or_else(|| AppError::unauthorized("Invalid credentials"))?;

    if !state
        .passwords
        .verify(&payload.password, &user.password_hash)
        .await?
    {
        return Err(AppError::unauthorized("Invalid credentials"));
    }

    let token = state
        .tokens
        .issue(&user.id.to_hex(), &user.email, &user.name, user.role)?;

    Ok(Json(StaffAuthResponse {
        success: true,
        token,
        user: (&user).into(),
    }))
}

pub async fn create_user(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateStaffUserRequest>,
) -> Result<Json<StaffUserEnvelope>> {
    if !payload.role.is_staff() {
        return Err(AppError::invalid_data(
            "Role must be hr or department; candidates register themselves",
        ));
    }

    let email = normalize_email(&payload.email);
    if state.staff_users.find_by_email(&email).await?.is_some() {
        return Err(AppError::conflict("User with this email already exists"));
    }

    let password_hash = state.passwords.hash(&payload.password).await?;
    let user = state
        .staff_users
        .insert(StaffUser::new(
            payload.name.trim().to_string(),
            email,
            password_hash,
            payload.role,
            payload.department,
        ))
        .await?;

    tracing::info!(
        created_by = %claims.id,
        user_id = %user.id,
        role = %user.role,
        "Staff user created"
    );

    Ok(Json(StaffUserEnvelope {
        success: true,
        user: (&user).into(),
    }))
}

pub async fn me(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<Json<StaffUserEnvelope>> {
    let id = ObjectId::parse_str(&claims.id)?;

    let user = state
        .staff_users
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(Json(StaffUserEnvelope {
        success: true,
        user: (&user).into(),
    }))
}

/// Creates the configured HR account on first start.
pub async fn bootstrap_hr(state: &AppState, bootstrap: &BootstrapHr) -> Result<()> {
    let email = normalize_email(&bootstrap.email);

    if state.staff_users.find_by_email(&email).await?.is_some() {
        tracing::debug!("Bootstrap HR account already present");
        return Ok(());
    }

    let password_hash = state.passwords.hash(&bootstrap.password).await?;
    let user = state
        .staff_users
        .insert(StaffUser::new(
            bootstrap.name.clone(),
            email,
            password_hash,
            Role::Hr,
            None,
        ))
        .await?;

    tracing::info!(user_id = %user.id, "Bootstrap HR account created");
    Ok(())
}
