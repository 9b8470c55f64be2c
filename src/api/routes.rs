//! API Routes
//!
//! Configures the Axum router with all cache server endpoints.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    contains_handler, delete_handler, flush_handler, get_handler, health_handler, set_handler,
    AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `PUT /set` - Store a key-value pair
/// - `GET /get/*key?max_age=N` - Retrieve a value by key
/// - `GET /contains/*key?max_age=N` - Check for a fresh entry
/// - `DELETE /del/*key` - Delete a key
/// - `POST /flush` - Remove all entries
/// - `GET /health` - Health check endpoint
///
/// Keys may contain `/`; the file backend stores them as nested paths.
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router with all endpoints
    Router::new()
        .route("/set", put(set_handler))
        .route("/get/*key", get(get_handler))
        .route("/contains/*key", get(contains_handler))
        .route("/del/*key", delete(delete_handler))
        .route("/flush", post(flush_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
