//! Router configuration for the HTTP API.
//!
//! Sets up the employee routes and middleware (CORS, compression, tracing).

use axum::{extract::DefaultBodyLimit, routing::get, Router};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Request bodies are single employees; 1 MiB is plenty.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - permissive for development, should be restricted in production
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let employees = Router::new()
        .route(
            "/employees",
            get(handlers::list_employees).post(handlers::create_employee),
        )
        .route(
            "/employees/{id}",
            get(handlers::get_employee)
                .put(handlers::update_employee)
                .delete(handlers::delete_employee),
        );

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api", employees)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
