use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by cache operations.
///
/// A miss is never an error; `get` reports it as `Ok(None)`.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Reading or writing the cache directory failed
    #[error("Cache I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The value could not be encoded as JSON
    #[error("Failed to serialize cache entry: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A stored file is not a valid `{expiration, data}` entry
    #[error("Corrupt cache entry at {}: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The TTL puts the expiration outside years 0000-9999
    #[error("TTL of {seconds}s puts the expiration outside the storable range")]
    InvalidTtl { seconds: i64 },

    /// No default cache directory could be determined (e.g., no home directory)
    #[error("Could not determine a cache directory; pass one explicitly")]
    NoCacheDir,
}

impl CacheError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CacheError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias for cache operations
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_mentions_path() {
        let err = CacheError::io(
            "/tmp/cache/abc.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("/tmp/cache/abc.json"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn test_invalid_ttl_error_display() {
        let err = CacheError::InvalidTtl { seconds: 42 };
        assert!(err.to_string().contains("TTL of 42s"));
    }

    #[test]
    fn test_corrupt_error_display() {
        let source = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err = CacheError::Corrupt {
            path: PathBuf::from("entry.json"),
            source,
        };
        assert!(err.to_string().contains("Corrupt cache entry"));
        assert!(err.to_string().contains("entry.json"));
    }
}
