//! Application-wide error types.
//!
//! Library modules use specific error types via `thiserror`, while
//! CLI/main uses `anyhow` for convenient error propagation.
//!
//! # Design
//!
//! - [`Error`]: Top-level application error enum
//! - Module-specific errors (e.g., [`CatalogError`](crate::catalog::CatalogError),
//!   [`ConfigError`](crate::config::ConfigError)) for detailed handling
//! - Catalog errors never reach this type during a run; they are absorbed at the
//!   lookup boundary. Only configuration and input problems are fatal.

use std::path::PathBuf;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Report serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// No inventory file was given
    #[error("No inventory file provided")]
    MissingInventory,

    /// The inventory file is missing, unreadable or malformed
    #[error("Inventory {path}: {message}")]
    Inventory { path: PathBuf, message: String },

    /// No catalog API key was supplied
    #[error("Missing Last.fm API key (use --api-key, LASTFM_API_KEY or the config file)")]
    MissingCredential,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Catalog client could not be constructed
    #[error("Catalog error: {0}")]
    Catalog(#[from] crate::catalog::CatalogError),
}

impl Error {
    /// Create an inventory error.
    pub fn inventory(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Inventory {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Whether this is a configuration problem that gets a structured
    /// `{"error": ...}` response rather than a bare failure.
    pub fn is_fatal_config(&self) -> bool {
        matches!(
            self,
            Self::MissingInventory
                | Self::Inventory { .. }
                | Self::MissingCredential
                | Self::Config(_)
        )
    }
}
