//! Memcache Cache Backend
//!
//! Stores `(stored_at, data)` records in a memcached server. Memcached
//! cannot report an item's age, so the write time travels with the value.

mod client;

pub use client::{validate_key, MemcacheClient, MAX_KEY_LENGTH, MAX_VALUE_LENGTH};

use async_trait::async_trait;
use tracing::{debug, info};

use crate::cache::{Cache, CacheConfig, CacheEntry};
use crate::error::Result;

// == Public Constants ==
/// Option naming the server host
pub const HOST_OPTION: &str = "memcachehost";

/// Option naming the server port
pub const PORT_OPTION: &str = "memcacheport";

/// Host used when `memcachehost` is not configured
pub const DEFAULT_HOST: &str = "localhost";

/// Port used when `memcacheport` is not configured
pub const DEFAULT_PORT: u16 = 11211;

// == Memcache Cache ==
/// Networked backend over a single memcached connection.
#[derive(Debug)]
pub struct MemcacheCache {
    config: CacheConfig,
    client: MemcacheClient,
}

impl MemcacheCache {
    // == Constructor ==
    /// Connects to `localhost:11211`.
    pub async fn connect() -> Result<Self> {
        Self::with_config(CacheConfig::new()).await
    }

    /// Connects using `config` overlaid on the defaults.
    ///
    /// Fails with `CacheError::Connection` if the server is unreachable.
    pub async fn with_config(config: CacheConfig) -> Result<Self> {
        let config = Self::defaults().merged(&config);
        let client = Self::open(&config).await?;
        Ok(Self { config, client })
    }

    fn defaults() -> CacheConfig {
        CacheConfig::from_pairs([
            (HOST_OPTION, DEFAULT_HOST.to_string()),
            (PORT_OPTION, DEFAULT_PORT.to_string()),
        ])
    }

    async fn open(config: &CacheConfig) -> Result<MemcacheClient> {
        let host = config.get_str(HOST_OPTION).unwrap_or(DEFAULT_HOST);
        let port = config.get_parsed::<u16>(PORT_OPTION)?.unwrap_or(DEFAULT_PORT);
        MemcacheClient::connect(host, port).await
    }

    /// `host:port` of the current connection.
    pub fn addr(&self) -> &str {
        self.client.addr()
    }

    /// Reads and decodes the entry stored under `key`.
    async fn fetch(&mut self, key: &str) -> Result<Option<CacheEntry>> {
        match self.client.get(key).await? {
            Some(blob) => Ok(Some(bincode::deserialize(&blob)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl Cache for MemcacheCache {
    fn name(&self) -> &'static str {
        "memcache"
    }

    fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Reconnects with the merged configuration.
    ///
    /// The new settings replace the old ones only once the new connection is
    /// up; on failure the instance keeps its previous configuration and
    /// connection.
    async fn set_config(&mut self, config: CacheConfig) -> Result<()> {
        let merged = self.config.merged(&config);
        let client = Self::open(&merged).await?;
        info!(addr = client.addr(), "memcache cache reconfigured");
        self.config = merged;
        self.client = client;
        Ok(())
    }

    async fn put(&mut self, key: &str, value: &[u8]) -> Result<()> {
        let blob = bincode::serialize(&CacheEntry::new(value.to_vec()))?;
        self.client.set(key, &blob).await
    }

    async fn get(&mut self, key: &str, max_age: u64) -> Result<Option<Vec<u8>>> {
        // One round trip: the freshness test runs on the fetched entry
        let value = self
            .fetch(key)
            .await?
            .filter(|entry| entry.is_fresh(max_age))
            .map(|entry| entry.data);
        debug!(key, hit = value.is_some(), "memcache get");
        Ok(value)
    }

    async fn contains(&mut self, key: &str, max_age: u64) -> Result<bool> {
        Ok(match self.fetch(key).await? {
            None => false,
            Some(_) if max_age == 0 => true,
            Some(entry) => entry.is_fresh(max_age),
        })
    }

    async fn delete(&mut self, key: &str) -> Result<()> {
        let existed = self.client.delete(key).await?;
        debug!(key, existed, "memcache delete");
        Ok(())
    }

    async fn flush(&mut self) -> Result<()> {
        info!(addr = self.client.addr(), "flushing memcache server");
        self.client.flush_all().await
    }
}
