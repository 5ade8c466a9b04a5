//! Cache configuration
//!
//! The cache root is always an explicit value handed to `FileCache::open`.
//! `CacheConfig::new` resolves the platform cache directory for callers that
//! don't care where entries live.

use chrono::Duration;
use directories::ProjectDirs;
use std::path::PathBuf;

/// Default time-to-live for entries written with `FileCache::set`
pub const DEFAULT_TTL_MINUTES: i64 = 60;

/// Location and expiration policy of a cache
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Directory holding one JSON file per key
    pub cache_dir: PathBuf,
    /// TTL applied by `FileCache::set`
    pub default_ttl: Duration,
}

impl CacheConfig {
    /// Creates a config using the XDG-compliant cache directory
    ///
    /// Uses `~/.cache/jsoncache/` on Linux, or the equivalent path on other platforms.
    /// Returns `None` if the cache directory cannot be determined (e.g., no home directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "jsoncache")?;
        Some(Self::with_dir(project_dirs.cache_dir()))
    }

    /// Creates a config rooted at a specific directory
    pub fn with_dir(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            default_ttl: Duration::minutes(DEFAULT_TTL_MINUTES),
        }
    }

    /// Overrides the default TTL
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }
}
