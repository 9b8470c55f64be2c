//! kvstash - A pluggable key-value cache
//!
//! One `Cache` interface with file, memcached and in-memory backends,
//! an HTTP front end, and a handful of string formatting utilities.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod utils;

pub use api::AppState;
pub use cache::{open_cache, BackendKind, Cache, CacheConfig};
pub use config::Config;
pub use error::{CacheError, Result};
