//! Cache Module
//!
//! A single `Cache` interface with file, memcached and in-memory backends.

mod backend;
mod entry;
pub mod file;
pub mod memcache;
mod options;
mod volatile;


use std::fmt;
use std::str::FromStr;

use tracing::info;

// Re-export public types
pub use backend::Cache;
pub use entry::{current_timestamp, is_fresh, CacheEntry};
pub use file::FileCache;
pub use memcache::MemcacheCache;
pub use options::CacheConfig;
pub use volatile::VolatileCache;

use crate::error::{CacheError, Result};

// == Backend Kind ==
/// Which backend to construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Files under a root directory
    File,
    /// A memcached server
    Memcache,
    /// In-process map
    Memory,
}

impl FromStr for BackendKind {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "file" | "files" => Ok(BackendKind::File),
            "memcache" | "memcached" => Ok(BackendKind::Memcache),
            "memory" | "volatile" => Ok(BackendKind::Memory),
            other => Err(CacheError::InvalidConfig(format!(
                "unknown cache backend '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BackendKind::File => "file",
            BackendKind::Memcache => "memcache",
            BackendKind::Memory => "memory",
        };
        f.write_str(name)
    }
}

// == Open Cache ==
/// Builds the backend selected by `kind` with `config` over its defaults.
pub async fn open_cache(kind: BackendKind, config: CacheConfig) -> Result<Box<dyn Cache>> {
    let cache: Box<dyn Cache> = match kind {
        BackendKind::File => Box::new(FileCache::with_config(config)),
        BackendKind::Memcache => Box::new(MemcacheCache::with_config(config).await?),
        BackendKind::Memory => Box::new(VolatileCache::with_config(config)),
    };
    info!(backend = cache.name(), "cache backend ready");
    Ok(cache)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_kind_parse() {
        assert_eq!("FILE".parse::<BackendKind>().unwrap(), BackendKind::File);
        assert_eq!("memcached".parse::<BackendKind>().unwrap(), BackendKind::Memcache);
        assert_eq!(" volatile ".parse::<BackendKind>().unwrap(), BackendKind::Memory);
        assert!(matches!(
            "redis".parse::<BackendKind>(),
            Err(CacheError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_backend_kind_display_roundtrip() {
        for kind in [BackendKind::File, BackendKind::Memcache, BackendKind::Memory] {
            assert_eq!(kind.to_string().parse::<BackendKind>().unwrap(), kind);
        }
    }

    #[tokio::test]
    async fn test_open_cache_memory() {
        let mut cache = open_cache(BackendKind::Memory, CacheConfig::new())
            .await
            .unwrap();
        assert_eq!(cache.name(), "memory");

        cache.put("k", b"v").await.unwrap();
        assert_eq!(cache.get("k", 0).await.unwrap(), Some(b"v".to_vec()));
    }

    #[tokio::test]
    async fn test_open_cache_file_uses_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = CacheConfig::from_pairs([(
            "CacheDir",
            dir.path().to_string_lossy().into_owned(),
        )]);

        let mut cache = open_cache(BackendKind::File, config).await.unwrap();
        cache.put("nested/k", b"v").await.unwrap();

        assert!(dir.path().join("nested").join("k").is_file());
    }
}
