//! jsoncache library
//!
//! A file-backed key/value cache with time-based expiration. The CLI module is
//! exposed for use in integration tests.

pub mod cache;
pub mod cli;
pub mod config;

pub use cache::{CacheEntry, CacheError, FileCache};
pub use config::CacheConfig;
