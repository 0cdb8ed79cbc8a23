use axum::{
    extract::Request,
    middleware::{self, Next},
    routing::{get, post},
    Router,
};

use crate::handlers::candidate_auth;
use crate::middleware::auth::{auth_middleware, require_roles, CANDIDATE_ONLY};
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route(
            "/profile",
            get(candidate_auth::get_profile).put(candidate_auth::update_profile),
        )
        .route_layer(middleware::from_fn(|req: Request, next: Next| {
            require_roles(CANDIDATE_ONLY, req, next)
        }))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/register", post(candidate_auth::register))
        .route("/login", post(candidate_auth::login))
        .merge(protected)
}
