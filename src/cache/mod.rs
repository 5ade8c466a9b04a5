//! File-backed JSON cache
//!
//! This module provides a cache that persists values to the filesystem as one
//! JSON file per key, each with an expiration timestamp. Freshness is checked
//! lazily when an entry is read, and a miss is reported as `None` rather than
//! as an error.

mod error;
mod key;
mod manager;

pub use error::{CacheError, Result};
pub use key::file_name;
pub use manager::{CacheEntry, FileCache};
