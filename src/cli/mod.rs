//! Command-line interface for music-gaps.
//!
//! This module provides the `compare`, `recommend` and `config` commands.
//! The JSON report goes to stdout; diagnostics go to stderr.

mod commands;

pub use commands::{Cli, Commands, run_command};
