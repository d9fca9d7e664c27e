//! Internal domain models for catalog facts.
//!
//! These types are OUR types - they don't change when the Last.fm API changes.
//! All external API responses get converted into these types via adapters.

use chrono::NaiveDate;
use smallvec::SmallVec;

/// A resolved catalog identity for a free-text artist name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogArtist {
    /// Canonical artist name as the catalog spells it
    pub name: String,
    /// Top tags, most popular first (at most three kept)
    pub tags: SmallVec<[String; 3]>,
    /// Unique listeners
    pub listener_count: u64,
    /// Total scrobbles
    pub play_count: u64,
    /// Largest available artist image
    pub image_url: Option<String>,
}

/// Summary entry from an artist's top-albums list
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogAlbum {
    pub name: String,
    pub play_count: u64,
}

/// Full album detail, fetched lazily for albums under consideration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogAlbumDetail {
    /// Track titles in listing order
    pub track_names: Vec<String>,
    /// Publication date, when the catalog's free-text field parsed
    pub release_date: Option<NaiveDate>,
    /// Release year (derived from `release_date`)
    pub release_year: Option<i32>,
    pub play_count: u64,
}

/// Summary entry from a top-tracks or recent-tracks list
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogTrack {
    pub name: String,
    pub play_count: u64,
}

/// Release facts for a single track
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogTrackDetail {
    pub release_year: Option<i32>,
    /// Album the catalog files this track under, if any
    pub album_name: Option<String>,
}

/// One entry from a similar-artists lookup
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarArtist {
    pub name: String,
    /// Catalog similarity score (0.0 to 1.0)
    pub similarity: f64,
    pub image_url: Option<String>,
}

/// Raw track-level metadata as returned by a track lookup, before the
/// release-year fallback chain is applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackInfo {
    pub album_name: Option<String>,
    /// Publication date from the track wiki, when it parsed
    pub release_date: Option<NaiveDate>,
    /// Tag names, most popular first
    pub tags: Vec<String>,
}

/// Errors that can occur during a catalog lookup
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Rate limited - try again later")]
    RateLimited,

    #[error("API error {code}: {message}")]
    Api { code: u32, message: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Not found in catalog")]
    NotFound,
}

impl CatalogError {
    /// Map a transport error, keeping timeouts distinct
    pub fn from_transport(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl CatalogAlbumDetail {
    /// Build a detail, deriving the year from the release date
    pub fn new(track_names: Vec<String>, release_date: Option<NaiveDate>, play_count: u64) -> Self {
        use chrono::Datelike;

        Self {
            release_year: release_date.map(|d| d.year()),
            track_names,
            release_date,
            play_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_album_detail_derives_year() {
        let date = NaiveDate::from_ymd_opt(2018, 11, 9);
        let detail = CatalogAlbumDetail::new(vec!["Pressure".to_string()], date, 42);
        assert_eq!(detail.release_year, Some(2018));

        let undated = CatalogAlbumDetail::new(vec![], None, 0);
        assert_eq!(undated.release_year, None);
    }

    #[test]
    fn test_error_display() {
        let err = CatalogError::Api {
            code: 6,
            message: "Artist not found".to_string(),
        };
        assert_eq!(err.to_string(), "API error 6: Artist not found");
    }
}
