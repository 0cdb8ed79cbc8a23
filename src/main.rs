use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{response::Json, routing::get, Router};
use serde_json::{json, Value};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, Any as AnyOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

mod config;
mod database;
mod dtos;
mod errors;
mod handlers;
mod middleware;
mod models;
mod routes;
mod services;
mod state;


use config::AppConfig;
use database::connection::get_db_client;
use services::email_service::build_mailer;
use services::pending_store::{MemoryPendingStore, PendingStore, RedisPendingStore};
use state::AppState;

const SWEEP_INTERVAL: std::time::Duration = std::time::Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let app_state = initialize_app_state(config).await?;

    let app = build_router(app_state);
    start_server(app, addr).await
}

async fn initialize_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    let db = get_db_client(&config).await?;

    let pending_store: Arc<dyn PendingStore> = match &config.redis_url {
        Some(url) => Arc::new(RedisPendingStore::connect(url).await?),
        None => {
            tracing::warn!(
                "REDIS_URL not set, pending registrations are kept in memory and are not shared between instances"
            );
            let store = Arc::new(MemoryPendingStore::new());
            store.spawn_sweeper(SWEEP_INTERVAL);
            store as Arc<dyn PendingStore>
        }
    };

    let mailer = build_mailer(&config.mail)?;

    if config.expose_otp_in_response {
        tracing::warn!("EXPOSE_OTP_IN_RESPONSE is on, OTP codes are returned to the client");
    }

    let bootstrap = config.bootstrap_hr.clone();
    let app_state = AppState::new(config, db, pending_store, mailer);

    if let Some(bootstrap) = bootstrap {
        handlers::staff_auth::bootstrap_hr(&app_state, &bootstrap).await?;
    }

    tracing::info!(
        pending_store = app_state.otp_service.backend(),
        mail_transport = app_state.mailer.transport(),
        "Services initialized"
    );

    Ok(app_state)
}

fn cors_layer(origin: &str) -> CorsLayer {
    let allow_origin = match origin {
        "*" => AllowOrigin::from(AnyOrigin),
        origin => match HeaderValue::from_str(origin) {
            Ok(value) => AllowOrigin::exact(value),
            Err(_) => {
                tracing::warn!("Invalid CORS_ORIGIN {:?}, allowing any origin", origin);
                AllowOrigin::from(AnyOrigin)
            }
        },
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(false)
}

fn build_router(app_state: AppState) -> Router {
    let cors = cors_layer(&app_state.config.cors_origin);

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_check))
        .route("/api/health", get(api_health_check))
        .nest("/api", routes::auth_otp_routes::auth_otp_routes())
        .nest("/api/candidate", routes::candidate::routes(app_state.clone()))
        .nest("/api/auth", routes::staff::auth_routes())
        .nest("/api/users", routes::staff::user_routes(app_state.clone()))
        .nest("/api/jobs", routes::jobs::routes(app_state.clone()))
        .nest("/api/cv", routes::cv::routes(app_state.clone()))
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(handle_panic))
        .with_state(app_state)
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!("Handler panicked: {}", detail);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "Internal error",
            "message": "Internal server error",
            "success": false,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        })),
    )
        .into_response()
}

async fn start_server(app: Router, addr: SocketAddr) -> anyhow::Result<()> {
    tracing::info!("🚀 Server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}

async fn root_handler() -> &'static str {
    "Recruva API"
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn api_health_check(State(state): State<AppState>) -> Json<Value> {
    use mongodb::bson::doc;

    let db_status = match &state.db {
        Some(db) => match db.run_command(doc! {"ping": 1}).await {
            Ok(_) => "connected",
            Err(_) => "disconnected",
        },
        None => "not configured",
    };

    Json(json!({
        "status": "healthy",
        "database": db_status,
        "pending_store": state.otp_service.backend(),
        "mail_transport": state.mailer.transport(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
