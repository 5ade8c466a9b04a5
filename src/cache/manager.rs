//! File-backed cache with lazy expiration
//!
//! Provides a `FileCache` that stores serializable data as one JSON file per key,
//! each carrying the instant after which it is no longer served.

use chrono::{DateTime, Datelike, Duration, SubsecRound, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

use super::error::{CacheError, Result};
use super::key::file_name;
use crate::config::CacheConfig;

/// A cached value together with its expiration, exactly as stored on disk
///
/// Serialized as `{"expiration":"2022-08-17T01:52:52.973Z","data":...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    /// When the entry stops being served
    #[serde(with = "expiration_format")]
    pub expiration: DateTime<Utc>,
    /// The cached data
    pub data: T,
}

impl<T> CacheEntry<T> {
    /// Whether the entry is expired at the given instant
    ///
    /// An entry whose expiration equals `now` is already expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiration <= now
    }
}

/// Computes `now + ttl`, or `None` when the result overflows or falls outside
/// the four-digit years an RFC 3339 timestamp can carry.
fn expiration_after(now: DateTime<Utc>, ttl: Duration) -> Option<DateTime<Utc>> {
    let expiration = now.checked_add_signed(ttl)?.trunc_subsecs(3);
    (0..=9999).contains(&expiration.year()).then_some(expiration)
}

/// ISO-8601 with millisecond precision and a `Z` suffix.
mod expiration_format {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

/// Reads and writes cached values in a single directory
///
/// Each key maps to `<sha256(key)>.json` inside the cache directory. Freshness is
/// checked when an entry is read; expired entries are deleted at that point.
/// There is no locking: concurrent writers to the same key race and the last
/// write wins.
#[derive(Debug, Clone)]
pub struct FileCache {
    /// Directory where cache files are stored
    cache_dir: PathBuf,
    /// TTL used by `set`
    default_ttl: Duration,
}

impl FileCache {
    /// Opens a cache, creating its directory if missing
    ///
    /// This is the only operation that creates the cache directory.
    pub async fn open(config: CacheConfig) -> Result<Self> {
        fs::create_dir_all(&config.cache_dir)
            .await
            .map_err(|e| CacheError::io(&config.cache_dir, e))?;

        debug!(dir = %config.cache_dir.display(), "opened cache");

        Ok(Self {
            cache_dir: config.cache_dir,
            default_ttl: config.default_ttl,
        })
    }

    /// Directory where cache files are stored
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// TTL applied by `set`
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Returns the path of the file backing `key`
    pub fn entry_path(&self, key: &str) -> PathBuf {
        self.cache_dir.join(file_name(key))
    }

    /// Stores `data` under `key` with the default TTL
    ///
    /// Any previous entry for the key is replaced, not merged.
    pub async fn set<T: Serialize>(&self, key: &str, data: T) -> Result<CacheEntry<T>> {
        self.set_with_ttl(key, data, self.default_ttl).await
    }

    /// Stores `data` under `key`, expiring `ttl` from now
    ///
    /// # Returns
    /// * `Ok(CacheEntry)` - the entry as written to disk
    /// * `Err(CacheError::InvalidTtl)` if the expiration can't be represented
    /// * `Err` if serialization or writing the file fails
    pub async fn set_with_ttl<T: Serialize>(
        &self,
        key: &str,
        data: T,
        ttl: Duration,
    ) -> Result<CacheEntry<T>> {
        // Stored timestamps carry milliseconds; keep the returned entry identical.
        let expiration = expiration_after(Utc::now(), ttl).ok_or(CacheError::InvalidTtl {
            seconds: ttl.num_seconds(),
        })?;
        let entry = CacheEntry { expiration, data };

        let json = serde_json::to_vec(&entry)?;
        let path = self.entry_path(key);
        fs::write(&path, json)
            .await
            .map_err(|e| CacheError::io(&path, e))?;

        debug!(key, %expiration, "cache set");
        Ok(entry)
    }

    /// Reads the value stored under `key`
    ///
    /// # Returns
    /// * `Ok(Some(data))` if the entry exists and has not expired
    /// * `Ok(None)` if the entry is missing or expired (expired files are removed)
    /// * `Err(CacheError::Corrupt)` if the file is not a valid entry for `T`
    /// * `Err(CacheError::Io)` if the file exists but can't be read
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        self.get_at(key, Utc::now()).await
    }

    /// Reads the value stored under `key`, judging freshness as of `now`
    ///
    /// The file is only evicted when the entry is also expired in real time, so
    /// looking ahead with a future `now` never removes a fresh entry.
    pub async fn get_at<T: DeserializeOwned>(
        &self,
        key: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<T>> {
        let path = self.entry_path(key);
        let content = match fs::read(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(key, "cache miss");
                return Ok(None);
            }
            Err(e) => return Err(CacheError::io(path, e)),
        };

        let entry: CacheEntry<T> = match serde_json::from_slice(&content) {
            Ok(entry) => entry,
            Err(source) => {
                warn!(key, path = %path.display(), error = %source, "corrupt cache entry");
                return Err(CacheError::Corrupt { path, source });
            }
        };

        if entry.is_expired_at(now) {
            if entry.is_expired_at(Utc::now()) {
                debug!(key, expiration = %entry.expiration, "evicting expired cache entry");
                remove_entry_file(&path).await?;
            }
            return Ok(None);
        }

        Ok(Some(entry.data))
    }

    /// Removes the entry for `key`
    ///
    /// # Returns
    /// * `Ok(true)` if an entry was removed
    /// * `Ok(false)` if there was no entry for the key
    pub async fn clear(&self, key: &str) -> Result<bool> {
        let removed = remove_entry_file(&self.entry_path(key)).await?;
        debug!(key, removed, "cache clear");
        Ok(removed)
    }

    /// Removes every file in the cache directory
    ///
    /// The directory itself is kept, and recreated if something else deleted it.
    /// Subdirectories are left alone. Returns `Ok(true)` once every file is removed.
    pub async fn clear_all(&self) -> Result<bool> {
        let mut dir = match fs::read_dir(&self.cache_dir).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                fs::create_dir_all(&self.cache_dir)
                    .await
                    .map_err(|e| CacheError::io(&self.cache_dir, e))?;
                info!(dir = %self.cache_dir.display(), removed = 0, "cache cleared");
                return Ok(true);
            }
            Err(e) => return Err(CacheError::io(&self.cache_dir, e)),
        };

        let mut removed = 0usize;
        while let Some(item) = dir
            .next_entry()
            .await
            .map_err(|e| CacheError::io(&self.cache_dir, e))?
        {
            let path = item.path();
            let file_type = item
                .file_type()
                .await
                .map_err(|e| CacheError::io(&path, e))?;
            if !file_type.is_file() {
                continue;
            }
            if remove_entry_file(&path).await? {
                removed += 1;
            }
        }

        info!(dir = %self.cache_dir.display(), removed, "cache cleared");
        Ok(true)
    }
}

/// Deletes a cache file, treating an already-missing file as `false`
async fn remove_entry_file(path: &Path) -> Result<bool> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(CacheError::io(path, e)),
    }
}
