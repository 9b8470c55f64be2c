//! Cache Backend Trait
//!
//! The operations every storage backend provides. Callers hold a
//! `Box<dyn Cache>` and never depend on a concrete backend.

use async_trait::async_trait;

use crate::cache::CacheConfig;
use crate::error::Result;

// == Cache Trait ==
/// A key-value cache with lazy, caller-driven staleness.
///
/// `max_age` is in seconds. `0` accepts an entry of any age; otherwise an
/// entry is returned only while `now - stored_at < max_age`.
///
/// Methods take `&mut self`: a backend serves one operation at a time. Share
/// an instance across tasks behind a `tokio::sync::Mutex`.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Short backend name used in logs and health output.
    fn name(&self) -> &'static str;

    /// The effective configuration (defaults plus overrides).
    fn config(&self) -> &CacheConfig;

    /// Overlays `config` on the current configuration.
    ///
    /// Backends holding a connection reconnect here.
    async fn set_config(&mut self, config: CacheConfig) -> Result<()>;

    /// Stores `value` under `key`, replacing any existing entry.
    async fn put(&mut self, key: &str, value: &[u8]) -> Result<()>;

    /// Returns the value if present and fresh; absence is `Ok(None)`.
    async fn get(&mut self, key: &str, max_age: u64) -> Result<Option<Vec<u8>>>;

    /// Same staleness rule as [`Cache::get`] without returning the value.
    async fn contains(&mut self, key: &str, max_age: u64) -> Result<bool>;

    /// Removes the entry. Deleting an absent key succeeds.
    async fn delete(&mut self, key: &str) -> Result<()>;

    /// Removes every entry of this instance or namespace.
    async fn flush(&mut self) -> Result<()>;
}
