//! Command-line interface for jsoncache
//!
//! A thin wrapper that resolves a cache location from the arguments and calls
//! one cache operation per invocation.

use chrono::Duration;
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;

use crate::cache::{CacheError, FileCache, Result};
use crate::config::CacheConfig;

/// Longest accepted `--ttl`: 10,000 Julian years
pub const MAX_TTL_SECONDS: i64 = 10_000 * 31_557_600;

/// jsoncache - a file-backed JSON cache with expiration
#[derive(Parser, Debug)]
#[command(name = "jsoncache")]
#[command(about = "File-backed JSON key/value cache with expiration")]
#[command(version)]
pub struct Cli {
    /// Cache directory (defaults to the platform cache directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub dir: Option<PathBuf>,

    /// Time-to-live in seconds for entries written by `set`
    #[arg(long, global = true, value_name = "SECONDS", value_parser = clap::value_parser!(i64).range(1..=MAX_TTL_SECONDS))]
    pub ttl: Option<i64>,

    #[command(subcommand)]
    pub command: Command,
}

/// Cache operations exposed on the command line
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the value stored under KEY (exit status 1 on a miss)
    Get { key: String },
    /// Store DATA under KEY; DATA is parsed as JSON, or stored as a string
    Set { key: String, data: String },
    /// Remove the entry for KEY
    Clear { key: String },
    /// Remove every entry
    ClearAll,
}

impl Cli {
    /// Builds the cache configuration described by the arguments.
    ///
    /// # Returns
    /// * `Ok(CacheConfig)` rooted at `--dir`, or the platform cache directory
    /// * `Err(CacheError::NoCacheDir)` if no directory was given and none can be determined
    pub fn cache_config(&self) -> Result<CacheConfig> {
        let config = match &self.dir {
            Some(dir) => CacheConfig::with_dir(dir),
            None => CacheConfig::new().ok_or(CacheError::NoCacheDir)?,
        };

        Ok(match self.ttl {
            Some(seconds) => {
                let ttl = Duration::try_seconds(seconds).ok_or(CacheError::InvalidTtl { seconds })?;
                config.with_ttl(ttl)
            }
            None => config,
        })
    }
}

/// Interprets a `set` argument as JSON, falling back to a plain string.
pub fn parse_data(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Runs the requested command.
///
/// # Returns
/// * `Ok(Some(output))` - text to print on stdout
/// * `Ok(None)` - `get` found nothing
/// * `Err` if the cache couldn't be opened or the operation failed
pub async fn run(cli: &Cli) -> Result<Option<String>> {
    let cache = FileCache::open(cli.cache_config()?).await?;

    match &cli.command {
        Command::Get { key } => {
            let value: Option<Value> = cache.get(key).await?;
            Ok(value.map(|v| v.to_string()))
        }
        Command::Set { key, data } => {
            let entry = cache.set(key, parse_data(data)).await?;
            Ok(Some(serde_json::to_string(&entry)?))
        }
        Command::Clear { key } => Ok(Some(cache.clear(key).await?.to_string())),
        Command::ClearAll => Ok(Some(cache.clear_all().await?.to_string())),
    }
}
