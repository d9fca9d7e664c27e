//! Local inventory loading and grouping.
//!
//! The inventory is produced by an external scanner as a JSON array of
//! `{artist, album, track}` objects. Extra fields (such as `file`) are ignored.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One locally held track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalTrackRecord {
    pub artist: String,
    /// May be empty for unknown albums and loose files
    #[serde(default)]
    pub album: String,
    pub track: String,
}

impl LocalTrackRecord {
    pub fn new(artist: &str, album: &str, track: &str) -> Self {
        Self {
            artist: artist.to_string(),
            album: album.to_string(),
            track: track.to_string(),
        }
    }
}

/// Everything held locally for one artist
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArtistHoldings {
    pub artist: String,
    /// Distinct non-empty album names, in first-seen order
    pub albums: Vec<String>,
    /// Distinct track names, in first-seen order
    pub tracks: Vec<String>,
    /// Number of inventory rows for this artist (duplicates included)
    pub record_count: usize,
}

impl ArtistHoldings {
    pub fn album_names(&self) -> impl Iterator<Item = &str> {
        self.albums.iter().map(String::as_str)
    }

    pub fn track_names(&self) -> impl Iterator<Item = &str> {
        self.tracks.iter().map(String::as_str)
    }
}

/// A loaded inventory
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inventory {
    /// Rows that name an artist
    pub records: Vec<LocalTrackRecord>,
    /// Every row in the file, including dropped ones
    pub row_count: usize,
}

/// Read an inventory file.
///
/// Artist names are trimmed; rows with an empty artist cannot be reconciled
/// and are dropped with a warning. They still count towards `row_count`.
pub fn load_inventory(path: &Path) -> Result<Inventory> {
    if !path.exists() {
        return Err(Error::inventory(path, "file not found"));
    }

    let contents = std::fs::read_to_string(path)
        .map_err(|e| Error::inventory(path, format!("unreadable: {}", e)))?;
    let rows: Vec<LocalTrackRecord> = serde_json::from_str(&contents)
        .map_err(|e| Error::inventory(path, format!("invalid JSON: {}", e)))?;

    let row_count = rows.len();
    let records: Vec<_> = rows
        .into_iter()
        .map(|mut r| {
            r.artist = r.artist.trim().to_string();
            r
        })
        .filter(|r| !r.artist.is_empty())
        .collect();

    if records.len() < row_count {
        tracing::warn!(
            "Dropped {} inventory rows without an artist",
            row_count - records.len()
        );
    }
    tracing::info!("Loaded {} local tracks from {:?}", row_count, path);
    Ok(Inventory { records, row_count })
}

/// Group records by exact artist name, preserving first-appearance order.
pub fn group_by_artist(records: &[LocalTrackRecord]) -> Vec<ArtistHoldings> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<ArtistHoldings> = Vec::new();

    for record in records {
        let slot = *index.entry(record.artist.as_str()).or_insert_with(|| {
            groups.push(ArtistHoldings {
                artist: record.artist.clone(),
                ..Default::default()
            });
            groups.len() - 1
        });

        let group = &mut groups[slot];
        group.record_count += 1;
        if !record.album.is_empty() && !group.albums.contains(&record.album) {
            group.albums.push(record.album.clone());
        }
        if !group.tracks.contains(&record.track) {
            group.tracks.push(record.track.clone());
        }
    }

    groups
}
