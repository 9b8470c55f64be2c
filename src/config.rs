//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;

use crate::cache::{file, memcache, BackendKind, CacheConfig};
use crate::error::{CacheError, Result};

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend the server fronts
    pub backend: BackendKind,
    /// HTTP server port
    pub server_port: u16,
    /// Root directory for the file backend
    pub cache_dir: Option<String>,
    /// Memcached host
    pub memcache_host: Option<String>,
    /// Memcached port
    pub memcache_port: Option<u16>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_BACKEND` - `file`, `memcache` or `memory` (default: memory)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CACHE_DIR` - File backend root (default: ./cache/)
    /// - `MEMCACHE_HOST` - Memcached host (default: localhost)
    /// - `MEMCACHE_PORT` - Memcached port (default: 11211)
    ///
    /// Unset or empty variables take their default; a set variable that does
    /// not parse is an `InvalidConfig` error.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a Config from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let backend = match var("CACHE_BACKEND") {
            Some(value) => value.trim().parse()?,
            None => BackendKind::Memory,
        };

        Ok(Self {
            backend,
            server_port: parse_var("SERVER_PORT", var("SERVER_PORT"))?.unwrap_or(3000),
            cache_dir: var("CACHE_DIR"),
            memcache_host: var("MEMCACHE_HOST"),
            memcache_port: parse_var("MEMCACHE_PORT", var("MEMCACHE_PORT"))?,
        })
    }

    /// Backend options for the configured values; unset ones fall back to
    /// the backend defaults.
    pub fn backend_options(&self) -> CacheConfig {
        let mut options = CacheConfig::new();
        if let Some(dir) = &self.cache_dir {
            options.set(file::CACHE_DIR_OPTION, dir.clone());
        }
        if let Some(host) = &self.memcache_host {
            options.set(memcache::HOST_OPTION, host.clone());
        }
        if let Some(port) = self.memcache_port {
            options.set(memcache::PORT_OPTION, port.to_string());
        }
        options
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, value: Option<String>) -> Result<Option<T>> {
    value
        .map(|raw| {
            raw.trim().parse().map_err(|_| {
                CacheError::InvalidConfig(format!("{} has invalid value '{}'", name, raw))
            })
        })
        .transpose()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendKind::Memory,
            server_port: 3000,
            cache_dir: None,
            memcache_host: None,
            memcache_port: None,
        }
    }
}
