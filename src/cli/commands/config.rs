//! Configuration inspection command.

use std::path::Path;

use crate::config::{self, Config, ConfigError};

/// Print the config path and effective settings, optionally writing defaults first
pub fn cmd_config(explicit: Option<&Path>, init: bool) -> anyhow::Result<()> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => config::config_path().ok_or(ConfigError::NoConfigDir)?,
    };

    if init {
        if path.exists() {
            println!("Config file already exists: {}", path.display());
        } else {
            config::save(&Config::default(), &path)?;
            println!("Wrote default config to {}", path.display());
        }
    }

    let config = if path.exists() {
        config::load_from(&path)?
    } else {
        println!("No config file at {} (using defaults)", path.display());
        Config::default()
    };

    println!("Config file: {}", path.display());
    println!();
    print!("{}", render(&config)?);
    Ok(())
}

/// Effective settings as TOML, with the API key masked
fn render(config: &Config) -> Result<String, ConfigError> {
    let mut shown = config.clone();
    if let Some(key) = shown.credentials.lastfm_api_key.as_mut() {
        *key = redact(key);
    }
    toml::to_string_pretty(&shown).map_err(ConfigError::Serialize)
}

fn redact(key: &str) -> String {
    let tail: String = key.chars().rev().take(4).collect::<Vec<_>>().into_iter().rev().collect();
    if key.chars().count() <= 4 {
        "****".to_string()
    } else {
        format!("****{}", tail)
    }
}
