use axum::{routing::post, Router};

use crate::{handlers::auth_otp, state::AppState};

pub fn auth_otp_routes() -> Router<AppState> {
    Router::new()
        // Request OTP for registration
        .route("/send-otp", post(auth_otp::send_otp))
        // Verify OTP and create the candidate
        .route("/verify-otp", post(auth_otp::verify_otp))
}
