//! API Module
//!
//! HTTP handlers and routing that expose one cache backend over REST.
//!
//! # Endpoints
//! - `PUT /set` - Store a key-value pair
//! - `GET /get/*key` - Retrieve a value by key
//! - `GET /contains/*key` - Check for a fresh entry
//! - `DELETE /del/*key` - Delete a key
//! - `POST /flush` - Remove all entries
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
