use axum::{
    extract::Request,
    middleware::{self, Next},
    routing::{get, post},
    Router,
};

use crate::handlers::staff_auth;
use crate::middleware::auth::{auth_middleware, require_roles, HR_ONLY, STAFF};
use crate::state::AppState;

pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/login", post(staff_auth::login))
}

pub fn user_routes(state: AppState) -> Router<AppState> {
    let hr_only = Router::new()
        .route("/", post(staff_auth::create_user))
        .route_layer(middleware::from_fn(|req: Request, next: Next| {
            require_roles(HR_ONLY, req, next)
        }));

    let staff = Router::new()
        .route("/me", get(staff_auth::me))
        .route_layer(middleware::from_fn(|req: Request, next: Next| {
            require_roles(STAFF, req, next)
        }));

    hr_only
        .merge(staff)
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
