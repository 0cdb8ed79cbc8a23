use axum::{
    extract::Request,
    middleware::{self, Next},
    routing::{get, post, put},
    Router,
};

use crate::handlers::jobs;
use crate::middleware::auth::{auth_middleware, require_roles, HR_ONLY};
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let manage = Router::new()
        .route("/", post(jobs::create_job))
        .route("/:id", put(jobs::update_job).delete(jobs::delete_job))
        .route_layer(middleware::from_fn(|req: Request, next: Next| {
            require_roles(HR_ONLY, req, next)
        }))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/", get(jobs::list_jobs))
        .route("/:id", get(jobs::get_job))
        .merge(manage)
}
