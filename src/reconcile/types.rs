//! Absent-item records produced by reconciliation.

use chrono::NaiveDate;
use serde::Serialize;

use crate::matcher::Matcher;

/// How an absent track was discovered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AbsentKind {
    /// Listed on one of the artist's catalog albums
    AlbumTrack,
    /// Popular track not found on any catalog album
    Single,
    /// Recently popular track not found on any catalog album
    RecentSingle,
}

impl AbsentKind {
    /// Singles of either pass
    pub fn is_single(self) -> bool {
        matches!(self, Self::Single | Self::RecentSingle)
    }
}

/// Album label for singles found by the top-tracks pass
pub const SINGLE_LABEL: &str = "Popular Track";
/// Album label for singles found by the recent-tracks pass
pub const RECENT_SINGLE_LABEL: &str = "Recent Release";

/// A catalog track the user does not hold
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AbsentItemRecord {
    pub artist: String,
    /// Catalog album, or a placeholder label for singles
    pub album: String,
    pub track: String,
    pub release_year: Option<i32>,
    pub release_date: Option<NaiveDate>,
    /// Album play count for album tracks, track play count for singles
    pub play_count: u64,
    pub kind: AbsentKind,
}

/// Absent items found so far for one artist.
///
/// Dedup is a pairwise fuzzy scan over everything accumulated, never an
/// exact-key lookup.
#[derive(Debug, Default)]
pub struct ArtistAccumulator {
    records: Vec<AbsentItemRecord>,
}

impl ArtistAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a fuzzy-equivalent track is already recorded
    pub fn contains_similar(&self, matcher: &Matcher, track: &str) -> bool {
        matcher.matches_any(track, self.records.iter().map(|r| r.track.as_str()))
    }

    pub fn push(&mut self, record: AbsentItemRecord) {
        self.records.push(record);
    }

    pub fn into_records(self) -> Vec<AbsentItemRecord> {
        self.records
    }
}
