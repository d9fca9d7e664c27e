//! Music Gaps - finds what a local music collection is missing.
//!
//! Reconciles a local inventory against the Last.fm catalog to surface
//! missing album tracks, singles and recent releases, and recommends
//! similar artists. The report is printed to stdout as JSON.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod library;
pub mod matcher;
pub mod recommend;
pub mod reconcile;
pub mod report;
#[cfg(test)]
pub mod test_utils;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> ExitCode {
    let args = cli::Cli::parse();

    // Initialize logging; stdout is reserved for the report
    let default_level = if args.verbose {
        "music_gaps=debug"
    } else {
        "music_gaps=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli::run_command(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => match fatal_error_json(&e) {
            Some(json) => {
                println!("{}", json);
                ExitCode::from(1)
            }
            None => {
                tracing::error!("{:#}", e);
                ExitCode::FAILURE
            }
        },
    }
}

/// The `{"error": ...}` body for configuration and input failures.
///
/// Other failures return `None` and are only logged.
fn fatal_error_json(e: &anyhow::Error) -> Option<String> {
    let err = e.downcast_ref::<error::Error>()?;
    err.is_fatal_config()
        .then(|| serde_json::json!({ "error": err.to_string() }).to_string())
}
