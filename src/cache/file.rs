//! File Cache Backend
//!
//! Stores each value as a file under a root directory. The file's
//! modification time is the entry's write time.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::fs;
use tracing::{debug, info, warn};

use crate::cache::entry::{current_timestamp, is_fresh};
use crate::cache::{Cache, CacheConfig};
use crate::error::{CacheError, Result};

// == Public Constants ==
/// Option naming the root directory
pub const CACHE_DIR_OPTION: &str = "cachedir";

/// Root directory used when `cachedir` is not configured
pub const DEFAULT_CACHE_DIR: &str = "./cache/";

// == File Cache ==
/// Filesystem backend.
///
/// Path separators inside a key become directories, so `"http/example.org"`
/// is stored as `<root>/http/example.org`. Concurrent writers to the same
/// key are not coordinated.
#[derive(Debug, Clone)]
pub struct FileCache {
    config: CacheConfig,
    root: PathBuf,
}

impl FileCache {
    // == Constructor ==
    /// Creates a file cache rooted at `./cache/`.
    ///
    /// The directory is not touched until the first `put`.
    pub fn new() -> Self {
        Self::from_config(Self::defaults())
    }

    /// Creates a file cache with `config` overlaid on the defaults.
    pub fn with_config(config: CacheConfig) -> Self {
        Self::from_config(Self::defaults().merged(&config))
    }

    /// Shorthand for a cache rooted at `root`.
    pub fn at(root: impl AsRef<Path>) -> Self {
        Self::with_config(CacheConfig::from_pairs([(
            CACHE_DIR_OPTION,
            root.as_ref().to_string_lossy().into_owned(),
        )]))
    }

    fn defaults() -> CacheConfig {
        CacheConfig::from_pairs([(CACHE_DIR_OPTION, DEFAULT_CACHE_DIR)])
    }

    fn from_config(config: CacheConfig) -> Self {
        let root = PathBuf::from(config.get_str(CACHE_DIR_OPTION).unwrap_or(DEFAULT_CACHE_DIR));
        info!(root = %root.display(), "file cache configured");
        Self { config, root }
    }

    /// Root directory entries are stored under.
    pub fn root(&self) -> &Path {
        &self.root
    }

    // == Key Mapping ==
    /// Maps a key to its file path under the root.
    ///
    /// Keys must be relative `/`-separated paths without empty, `.` or `..`
    /// segments: anything else could escape the root or alias another key.
    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() {
            return Err(CacheError::InvalidKey("key cannot be empty".to_string()));
        }

        let mut path = self.root.clone();
        for segment in key.split('/') {
            if segment.is_empty() || segment == "." || segment == ".." || segment.contains('\0')
            {
                warn!(key, "rejected file cache key");
                return Err(CacheError::InvalidKey(format!(
                    "'{}' is not a valid relative cache path",
                    key
                )));
            }
            path.push(segment);
        }
        Ok(path)
    }
}

impl Default for FileCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Cache for FileCache {
    fn name(&self) -> &'static str {
        "file"
    }

    fn config(&self) -> &CacheConfig {
        &self.config
    }

    async fn set_config(&mut self, config: CacheConfig) -> Result<()> {
        *self = Self::from_config(self.config.merged(&config));
        Ok(())
    }

    async fn put(&mut self, key: &str, value: &[u8]) -> Result<()> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, value).await?;
        debug!(key, bytes = value.len(), "file cache put");
        Ok(())
    }

    async fn get(&mut self, key: &str, max_age: u64) -> Result<Option<Vec<u8>>> {
        if !self.contains(key, max_age).await? {
            return Ok(None);
        }

        let path = self.path_for(key)?;
        match fs::read(&path).await {
            Ok(data) => Ok(Some(data)),
            // Removed between the check and the read
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn contains(&mut self, key: &str, max_age: u64) -> Result<bool> {
        let path = self.path_for(key)?;
        let metadata = match fs::metadata(&path).await {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(false),
            Err(err) => return Err(err.into()),
        };

        if !metadata.is_file() {
            return Ok(false);
        }
        if max_age == 0 {
            return Ok(true);
        }

        let modified = DateTime::<Utc>::from(metadata.modified()?).timestamp();
        let fresh = is_fresh(modified, current_timestamp(), max_age);
        debug!(key, modified, max_age, fresh, "file cache freshness check");
        Ok(fresh)
    }

    async fn delete(&mut self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    async fn flush(&mut self) -> Result<()> {
        warn!(root = %self.root.display(), "flush requested on file cache");
        Err(CacheError::Unsupported("flush is not implemented for the file cache"))
    }
}
