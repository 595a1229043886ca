//! solveai-api - HTTP API server for SolveAI
//!
//! Routes:
//! - `GET  /api/health`
//! - `POST /api/solve`, `POST /api/extract-text`
//! - `POST /api/compose/solve`, `POST /api/folders/:id/solve`
//! - `/api/folders`, `/api/folders/:id`, `/api/folders/:id/files`, `/api/files/:id`

pub mod config;
pub mod error;
pub mod handlers;
pub mod services;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method},
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use uuid::Uuid;

use solveai_db::Database;
use solveai_inference::SolverClient;

pub use config::ApiConfig;
pub use error::ApiError;

// =============================================================================
// REQUEST ID (UUIDv7)
// =============================================================================

/// Generates time-ordered UUIDv7 request correlation IDs.
#[derive(Clone, Default)]
pub struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

// =============================================================================
// APPLICATION STATE
// =============================================================================

/// Shared handles for every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub solver: SolverClient,
}

impl AppState {
    pub fn new(db: Database, solver: SolverClient) -> Self {
        Self { db, solver }
    }
}

/// Build the router with all routes and middleware.
pub fn app(state: AppState, config: &ApiConfig) -> Router {
    use handlers::{folders, health, solve};

    Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/solve", post(solve::solve))
        .route("/api/extract-text", post(solve::extract_text))
        .route("/api/compose/solve", post(solve::compose_solve))
        .route(
            "/api/folders",
            get(folders::list_folders).post(folders::create_folder),
        )
        .route(
            "/api/folders/:id",
            get(folders::get_folder)
                .patch(folders::update_folder)
                .delete(folders::delete_folder),
        )
        .route(
            "/api/folders/:id/files",
            get(folders::list_files).post(folders::add_file),
        )
        .route("/api/folders/:id/solve", post(solve::folder_solve))
        .route("/api/files/:id", delete(folders::delete_file))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(config.allowed_origins.clone()))
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
                .max_age(std::time::Duration::from_secs(3600)),
        )
        // Base64 images exceed axum's 2 MB default
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(config.max_body_bytes))
        .with_state(state)
}
