//! Volatile Cache Backend
//!
//! In-process `HashMap` storage that lives as long as the instance.

use std::collections::HashMap;

use async_trait::async_trait;
use tracing::debug;

use crate::cache::{Cache, CacheConfig, CacheEntry};
use crate::error::Result;

// == Volatile Cache ==
/// In-memory backend. Nothing survives the instance.
#[derive(Debug, Default)]
pub struct VolatileCache {
    /// Key -> (timestamp, value)
    entries: HashMap<String, CacheEntry>,
    /// Accepted for interface parity; no option is read
    config: CacheConfig,
}

impl VolatileCache {
    // == Constructor ==
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty cache carrying `config`.
    pub fn with_config(config: CacheConfig) -> Self {
        Self {
            entries: HashMap::new(),
            config,
        }
    }

    /// Stores a pre-built entry, keeping its timestamp.
    pub fn insert_entry(&mut self, key: impl Into<String>, entry: CacheEntry) {
        self.entries.insert(key.into(), entry);
    }

    // == Length ==
    /// Number of stored entries, fresh or stale.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn fresh_entry(&self, key: &str, max_age: u64) -> Option<&CacheEntry> {
        self.entries
            .get(key)
            .filter(|entry| entry.is_fresh(max_age))
    }
}

#[async_trait]
impl Cache for VolatileCache {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn config(&self) -> &CacheConfig {
        &self.config
    }

    async fn set_config(&mut self, config: CacheConfig) -> Result<()> {
        self.config.merge(&config);
        Ok(())
    }

    async fn put(&mut self, key: &str, value: &[u8]) -> Result<()> {
        self.entries
            .insert(key.to_string(), CacheEntry::new(value.to_vec()));
        Ok(())
    }

    async fn get(&mut self, key: &str, max_age: u64) -> Result<Option<Vec<u8>>> {
        let value = self.fresh_entry(key, max_age).map(|e| e.data.clone());
        debug!(key, hit = value.is_some(), "volatile get");
        Ok(value)
    }

    async fn contains(&mut self, key: &str, max_age: u64) -> Result<bool> {
        Ok(self.fresh_entry(key, max_age).is_some())
    }

    async fn delete(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }

    async fn flush(&mut self) -> Result<()> {
        self.entries.clear();
        Ok(())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::entry::current_timestamp;

    #[tokio::test]
    async fn test_put_and_get() {
        let mut cache = VolatileCache::new();

        cache.put("key1", b"value1").await.unwrap();

        assert_eq!(cache.get("key1", 0).await.unwrap(), Some(b"value1".to_vec()));
        assert!(cache.contains("key1", 0).await.unwrap());
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_get_nonexistent() {
        let mut cache = VolatileCache::new();

        assert_eq!(cache.get("nonexistent", 0).await.unwrap(), None);
        assert!(!cache.contains("nonexistent", 10).await.unwrap());
    }

    #[tokio::test]
    async fn test_overwrite() {
        let mut cache = VolatileCache::new();

        cache.insert_entry(
            "key1",
            CacheEntry::stored_at(b"value1".to_vec(), current_timestamp() - 100),
        );
        assert!(!cache.contains("key1", 50).await.unwrap());

        cache.put("key1", b"value2").await.unwrap();

        // Second write resets the staleness clock
        assert_eq!(cache.get("key1", 50).await.unwrap(), Some(b"value2".to_vec()));
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_stale_entry_is_absent_but_kept() {
        let mut cache = VolatileCache::new();
        cache.insert_entry(
            "old",
            CacheEntry::stored_at(b"v".to_vec(), current_timestamp() - 30),
        );

        assert_eq!(cache.get("old", 10).await.unwrap(), None);
        assert!(!cache.contains("old", 10).await.unwrap());
        assert!(cache.contains("old", 0).await.unwrap());
        assert!(cache.contains("old", 3600).await.unwrap());
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_age_boundary() {
        let mut cache = VolatileCache::new();
        let now = current_timestamp();
        cache.insert_entry("k", CacheEntry::stored_at(b"v".to_vec(), now - 3600));

        // Age is 3600 (or 3601 if the clock ticked): never fresh for 3600
        assert!(!cache.contains("k", 3600).await.unwrap());
        assert!(cache.contains("k", 3602).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let mut cache = VolatileCache::new();
        cache.put("key1", b"value1").await.unwrap();

        cache.delete("key1").await.unwrap();
        cache.delete("key1").await.unwrap();
        cache.delete("never-stored").await.unwrap();

        assert!(cache.is_empty());
        assert_eq!(cache.get("key1", 0).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_flush() {
        let mut cache = VolatileCache::new();
        cache.put("a", b"1").await.unwrap();
        cache.put("b", b"2").await.unwrap();

        cache.flush().await.unwrap();

        assert!(cache.is_empty());
        assert!(!cache.contains("a", 0).await.unwrap());
        assert!(!cache.contains("b", 0).await.unwrap());
    }

    #[tokio::test]
    async fn test_set_config_merges() {
        let mut cache = VolatileCache::with_config(CacheConfig::from_pairs([("a", "1")]));
        cache
            .set_config(CacheConfig::from_pairs([("B", "2")]))
            .await
            .unwrap();

        assert_eq!(cache.config().get_str("a"), Some("1"));
        assert_eq!(cache.config().get_str("b"), Some("2"));
    }
}
