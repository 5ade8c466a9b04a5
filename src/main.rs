//! jsoncache - command-line access to a file-backed JSON cache
//!
//! Values are printed to stdout as JSON. Logs go to stderr, filtered by `RUST_LOG`.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use jsoncache::cli::{self, Cli};

/// Exit status when `get` finds no value
const EXIT_MISS: u8 = 1;

/// Exit status when an operation fails
const EXIT_ERROR: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli::run(&cli).await {
        Ok(Some(output)) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Ok(None) => ExitCode::from(EXIT_MISS),
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}
