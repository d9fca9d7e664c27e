//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\music-gaps\config.toml
//! - macOS: ~/Library/Application Support/music-gaps/config.toml
//! - Linux: ~/.config/music-gaps/config.toml
//!
//! Every section and field has a default, so a partial file (or no file at
//! all) is always usable. Command-line flags override values from the file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::catalog::lastfm::DEFAULT_BASE_URL;
use crate::report::Policy;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API credentials
    pub credentials: Credentials,

    /// Catalog client settings
    pub catalog: CatalogConfig,

    /// Reconciliation pass settings
    pub reconcile: ReconcileConfig,

    /// Report classification settings
    pub report: ReportConfig,

    /// Recommendation settings
    pub recommend: RecommendConfig,
}

/// API credentials
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    /// Last.fm API key
    pub lastfm_api_key: Option<String>,
}

/// Catalog client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// API endpoint
    pub base_url: String,

    /// How many top albums to request per artist
    pub top_albums_limit: usize,

    /// How many top tracks to request per artist
    pub top_tracks_limit: usize,

    /// How many recent tracks to request per artist
    pub recent_tracks_limit: usize,

    /// Trailing window for the recent-tracks request
    pub recent_window_days: u32,

    /// Per-request timeout
    pub timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            top_albums_limit: 50,
            top_tracks_limit: 50,
            recent_tracks_limit: 20,
            recent_window_days: 30,
            timeout_secs: 10,
        }
    }
}

/// Reconciliation pass settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
    /// Title similarity threshold (0.0 - 1.0)
    pub similarity_threshold: f64,

    /// Minimum album play count for the album pass
    pub album_floor: u64,

    /// Minimum track play count for the top-singles pass
    pub track_floor: u64,

    /// Pause between artists
    pub artist_delay_ms: u64,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: crate::matcher::DEFAULT_THRESHOLD,
            album_floor: 2_000,
            track_floor: 100,
            artist_delay_ms: 100,
        }
    }
}

/// Report classification settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Which classification policy to apply
    pub policy: Policy,

    /// Popularity policy: minimum album play count
    pub album_threshold: u64,

    /// Popularity policy: minimum single play count
    pub single_threshold: u64,

    /// Recency policy: release window for albums
    pub recent_window_months: u32,

    /// Recency policy: minimum play count for singles not found by the recent pass
    pub old_single_threshold: u64,

    /// Maximum entries in the album and song sections
    pub max_section_len: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            policy: Policy::Popularity,
            album_threshold: 10_000,
            single_threshold: 5_000,
            recent_window_months: 6,
            old_single_threshold: 50_000,
            max_section_len: 100,
        }
    }
}

/// Recommendation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendConfig {
    /// Whether to compute recommendations at all
    pub enabled: bool,

    /// Number of local artists used as seeds
    pub seed_count: usize,

    /// Similar artists requested per seed
    pub per_seed_limit: usize,

    /// Candidates must be strictly above this similarity
    pub min_similarity: f64,

    /// Candidates must have strictly more listeners than this
    pub min_listeners: u64,

    /// Number of recommendations kept
    pub top_k: usize,

    /// Pause between seeds
    pub seed_delay_ms: u64,
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            seed_count: 5,
            per_seed_limit: 10,
            min_similarity: 0.1,
            min_listeners: 1_000,
            top_k: 15,
            seed_delay_ms: 200,
        }
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("music-gaps"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from the default location
///
/// Returns default config if file doesn't exist or can't be parsed.
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Config::default();
    };

    if !path.exists() {
        tracing::debug!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match load_from(&path) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            tracing::warn!("Using default configuration");
            Config::default()
        }
    }
}

/// Load configuration from an explicit path
///
/// Unlike [`load`], a file the user pointed at must exist and parse.
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let contents =
        std::fs::read_to_string(path).map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
    let config = toml::from_str(&contents).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
    tracing::info!("Loaded config from {:?}", path);
    Ok(config)
}

/// Save configuration to disk
///
/// Creates the config directory if it doesn't exist.
pub fn save(config: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::CreateDir(dir.to_path_buf(), e))?;
    }

    // Serialize to pretty TOML
    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    // Write atomically (write to temp, then rename)
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, path)
        .map_err(|e| ConfigError::Rename(temp_path, path.to_path_buf(), e))?;

    tracing::info!("Saved config to {:?}", path);
    Ok(())
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read config file {0}: {1}")]
    Read(PathBuf, std::io::Error),

    #[error("Failed to parse config file {0}: {1}")]
    Parse(PathBuf, toml::de::Error),

    #[error("Failed to create config directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Failed to write config to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),

    #[error("Invalid setting {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl Config {
    /// Check values that would make the engines misbehave
    pub fn validate(&self) -> Result<(), ConfigError> {
        let threshold = self.reconcile.similarity_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigError::Invalid {
                field: "reconcile.similarity_threshold",
                reason: format!("{} is outside 0.0-1.0", threshold),
            });
        }
        if self.catalog.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "catalog.timeout_secs",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// The API key, if one is configured and non-blank
    pub fn api_key(&self) -> Option<&str> {
        self.credentials
            .lastfm_api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

// ============================================================================
// Tests
// ============================================================================
