use axum::{
    extract::Request,
    middleware::{self, Next},
    routing::get,
    Router,
};

use crate::handlers::cv;
use crate::middleware::auth::{auth_middleware, require_roles, CANDIDATE_ONLY, STAFF};
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let own = Router::new()
        .route("/", get(cv::get_own_cv).put(cv::save_own_cv))
        .route_layer(middleware::from_fn(|req: Request, next: Next| {
            require_roles(CANDIDATE_ONLY, req, next)
        }));

    let review = Router::new()
        .route("/:candidate_id", get(cv::get_candidate_cv))
        .route_layer(middleware::from_fn(|req: Request, next: Next| {
            require_roles(STAFF, req, next)
        }));

    own.merge(review)
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
