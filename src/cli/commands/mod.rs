//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule:
//! - `compare`: Full reconciliation report, and the recommendations-only variant
//! - `config`: Show or initialize the configuration file

mod compare;
mod config;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tokio::runtime::Runtime;

use crate::config::Config;
use crate::error::Error;
use crate::report::Policy;

pub use compare::{cmd_compare, cmd_recommend};
pub use config::cmd_config;

/// Music Gaps CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Load settings from this file instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Compare a local inventory against Last.fm and report what's missing
    Compare {
        /// Inventory JSON: an array of {artist, album, track} objects
        input: Option<PathBuf>,
        /// Last.fm API key (or set LASTFM_API_KEY env var)
        #[arg(short, long, env = "LASTFM_API_KEY")]
        api_key: Option<String>,
        /// Section policy (overrides the config file)
        #[arg(long, value_enum)]
        policy: Option<Policy>,
    },
    /// Only compute artist recommendations
    Recommend {
        /// Inventory JSON: an array of {artist, album, track} objects
        input: Option<PathBuf>,
        /// Last.fm API key (or set LASTFM_API_KEY env var)
        #[arg(short, long, env = "LASTFM_API_KEY")]
        api_key: Option<String>,
    },
    /// Show the effective configuration
    Config {
        /// Write a default config file if none exists
        #[arg(long)]
        init: bool,
    },
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Compare {
            input,
            api_key,
            policy,
        } => {
            let rt = Runtime::new()?;
            let mut config = resolve_config(cli.config.as_deref())?;
            if let Some(policy) = policy {
                config.report.policy = *policy;
            }
            cmd_compare(&rt, &config, input.as_deref(), api_key.as_deref())
        }
        Commands::Recommend { input, api_key } => {
            let rt = Runtime::new()?;
            let config = resolve_config(cli.config.as_deref())?;
            cmd_recommend(&rt, &config, input.as_deref(), api_key.as_deref())
        }
        Commands::Config { init } => cmd_config(cli.config.as_deref(), *init),
    }
}

/// Load settings: an explicit file must parse, the default location never fails.
fn resolve_config(path: Option<&Path>) -> Result<Config, Error> {
    let config = match path {
        Some(path) => crate::config::load_from(path)?,
        None => crate::config::load(),
    };
    config.validate()?;
    Ok(config)
}

/// The API key from the flag or environment, else from the config file.
fn resolve_api_key(flag: Option<&str>, config: &Config) -> Result<String, Error> {
    flag.map(str::trim)
        .filter(|k| !k.is_empty())
        .or_else(|| config.api_key())
        .map(str::to_string)
        .ok_or(Error::MissingCredential)
}
