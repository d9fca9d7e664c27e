//! Last.fm API integration
//!
//! Provides artist, album, track and similar-artist facts from the Last.fm
//! catalog. Every method needs an API key.
//!
//! API docs: https://www.last.fm/api

pub mod dto;
mod adapter;
mod client;

pub use adapter::parse_published;
pub use client::{DEFAULT_BASE_URL, LastFmClient, period_for_window};
