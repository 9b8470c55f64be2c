//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint.

use std::sync::Arc;
use tokio::sync::Mutex;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use tracing::debug;

use crate::cache::{open_cache, Cache};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    ContainsResponse, DeleteResponse, FlushResponse, GetResponse, HealthResponse, MaxAgeQuery,
    SetRequest, SetResponse,
};

/// Application state shared across all handlers.
///
/// Backends serve one operation at a time, so the cache sits behind an
/// async mutex.
#[derive(Clone)]
pub struct AppState {
    /// The backend selected at startup
    pub cache: Arc<Mutex<Box<dyn Cache>>>,
    /// Backend name, readable without taking the lock
    pub backend: &'static str,
}

impl AppState {
    /// Creates a new AppState around an already constructed backend.
    pub fn new(cache: Box<dyn Cache>) -> Self {
        let backend = cache.name();
        Self {
            cache: Arc::new(Mutex::new(cache)),
            backend,
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Fails if the backend cannot be constructed (e.g. memcached is down).
    pub async fn from_config(config: &Config) -> Result<Self> {
        let cache = open_cache(config.backend, config.backend_options()).await?;
        Ok(Self::new(cache))
    }
}

/// Handler for PUT /set
///
/// Stores a key-value pair in the cache.
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let mut cache = state.cache.lock().await;
    cache.put(&req.key, req.value.as_bytes()).await?;

    Ok(Json(SetResponse::new(req.key)))
}

/// Handler for GET /get/*key
///
/// Absent and stale entries both answer 404.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(query): Query<MaxAgeQuery>,
) -> Result<Json<GetResponse>> {
    let mut cache = state.cache.lock().await;
    match cache.get(&key, query.max_age).await? {
        Some(value) => Ok(Json(GetResponse::from_bytes(key, &value))),
        None => {
            debug!(%key, max_age = query.max_age, "miss");
            Err(CacheError::NotFound(key))
        }
    }
}

/// Handler for GET /contains/*key
pub async fn contains_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(query): Query<MaxAgeQuery>,
) -> Result<Json<ContainsResponse>> {
    let mut cache = state.cache.lock().await;
    let present = cache.contains(&key, query.max_age).await?;
    Ok(Json(ContainsResponse::new(key, present)))
}

/// Handler for DELETE /del/*key
///
/// Deleting an absent key succeeds.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    let mut cache = state.cache.lock().await;
    cache.delete(&key).await?;
    Ok(Json(DeleteResponse::new(key)))
}

/// Handler for POST /flush
///
/// Backends that cannot flush answer 501.
pub async fn flush_handler(State(state): State<AppState>) -> Result<Json<FlushResponse>> {
    let mut cache = state.cache.lock().await;
    cache.flush().await?;
    Ok(Json(FlushResponse::new(state.backend)))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.backend))
}
