//! Last.fm API Data Transfer Objects
//!
//! These types match EXACTLY what the Last.fm API returns.
//! DO NOT add fields that aren't in the API response.
//! DO NOT use these types outside the lastfm module - convert to domain types.
//!
//! API Reference: https://www.last.fm/api
//!
//! Last.fm JSON has a few quirks handled here rather than in the adapter:
//! - Counts arrive as strings in most methods but as numbers in `artist.getTopAlbums`
//! - A list with a single element is sometimes collapsed into a bare object
//! - Missing lists are sometimes an empty string instead of being absent

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

/// Error body returned with `{"error": <code>, "message": "..."}`
#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    pub error: u32,
    pub message: String,
}

/// Image entry (`{"#text": "https://...", "size": "large"}`)
#[derive(Debug, Clone, Deserialize)]
pub struct Image {
    #[serde(rename = "#text", default)]
    pub url: String,
    #[serde(default)]
    pub size: String,
}

/// Tag entry
#[derive(Debug, Clone, Deserialize)]
pub struct Tag {
    pub name: String,
}

/// Tag wrapper (`{"tag": [...]}`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Tags {
    #[serde(default, deserialize_with = "one_or_many")]
    pub tag: Vec<Tag>,
}

/// Wiki block; we only read the publication field
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Wiki {
    pub published: Option<String>,
}

// ============================================================================
// artist.search
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct ArtistSearchResponse {
    pub results: ArtistSearchResults,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtistSearchResults {
    #[serde(rename = "artistmatches", default)]
    pub artist_matches: ArtistMatches,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArtistMatches {
    #[serde(default, deserialize_with = "one_or_many")]
    pub artist: Vec<ArtistMatch>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtistMatch {
    pub name: String,
    #[serde(default, deserialize_with = "count")]
    pub listeners: u64,
    #[serde(default, deserialize_with = "one_or_many")]
    pub image: Vec<Image>,
}

// ============================================================================
// artist.getInfo
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct ArtistInfoResponse {
    pub artist: ArtistInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtistInfo {
    pub name: String,
    #[serde(default, deserialize_with = "one_or_many")]
    pub image: Vec<Image>,
    #[serde(default)]
    pub stats: ArtistStats,
    #[serde(default, deserialize_with = "object_or_empty")]
    pub tags: Tags,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArtistStats {
    #[serde(default, deserialize_with = "count")]
    pub listeners: u64,
    #[serde(default, deserialize_with = "count")]
    pub playcount: u64,
}

// ============================================================================
// artist.getTopAlbums
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct TopAlbumsResponse {
    #[serde(rename = "topalbums")]
    pub top_albums: TopAlbums,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TopAlbums {
    #[serde(default, deserialize_with = "one_or_many")]
    pub album: Vec<TopAlbum>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TopAlbum {
    pub name: String,
    #[serde(default, deserialize_with = "count")]
    pub playcount: u64,
}

// ============================================================================
// artist.getTopTracks
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct TopTracksResponse {
    #[serde(rename = "toptracks")]
    pub top_tracks: TopTracks,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TopTracks {
    #[serde(default, deserialize_with = "one_or_many")]
    pub track: Vec<TopTrack>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TopTrack {
    pub name: String,
    #[serde(default, deserialize_with = "count")]
    pub playcount: u64,
}

// ============================================================================
// album.getInfo
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct AlbumInfoResponse {
    pub album: AlbumInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlbumInfo {
    pub name: String,
    #[serde(default, deserialize_with = "count")]
    pub playcount: u64,
    #[serde(default, deserialize_with = "object_or_empty")]
    pub tracks: AlbumTracks,
    pub wiki: Option<Wiki>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlbumTracks {
    #[serde(default, deserialize_with = "one_or_many")]
    pub track: Vec<AlbumTrack>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlbumTrack {
    pub name: String,
}

// ============================================================================
// track.getInfo
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct TrackInfoResponse {
    pub track: TrackInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackInfo {
    pub name: String,
    pub album: Option<TrackAlbum>,
    #[serde(rename = "toptags", default, deserialize_with = "object_or_empty")]
    pub top_tags: Tags,
    pub wiki: Option<Wiki>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackAlbum {
    pub title: String,
}

// ============================================================================
// artist.getSimilar
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct SimilarArtistsResponse {
    #[serde(rename = "similarartists")]
    pub similar_artists: SimilarArtists,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SimilarArtists {
    #[serde(default, deserialize_with = "one_or_many")]
    pub artist: Vec<SimilarArtist>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimilarArtist {
    pub name: String,
    #[serde(rename = "match", default, deserialize_with = "score")]
    pub similarity: f64,
    #[serde(default, deserialize_with = "one_or_many")]
    pub image: Vec<Image>,
}

// ============================================================================
// Quirk handling
// ============================================================================

/// A count that may be a JSON number or a numeric string
fn count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Number(n) => n,
        Raw::Text(s) => s.trim().parse().unwrap_or(0),
    })
}

/// A score that may be a JSON number or a numeric string
fn score<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Number(n) => n,
        Raw::Text(s) => s.trim().parse().unwrap_or(0.0),
    })
}

/// A list that Last.fm collapses into a bare object when it has one element
fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw<T> {
        Many(Vec<T>),
        One(T),
    }

    Ok(match Raw::<T>::deserialize(deserializer)? {
        Raw::Many(items) => items,
        Raw::One(item) => vec![item],
    })
}

/// A wrapper object that is sometimes an empty string when there is no data
fn object_or_empty<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw<T> {
        Object(T),
        Other(IgnoredAny),
    }

    Ok(match Raw::<T>::deserialize(deserializer)? {
        Raw::Object(value) => value,
        Raw::Other(_) => T::default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_artist_search() {
        let json = r##"{
            "results": {
                "opensearch:totalResults": "2",
                "artistmatches": {
                    "artist": [
                        {
                            "name": "Muse",
                            "listeners": "3901217",
                            "mbid": "fd857293-5ab8-40de-b29e-55a69d4e4d0f",
                            "image": [
                                {"#text": "https://img/s.png", "size": "small"},
                                {"#text": "https://img/xl.png", "size": "extralarge"}
                            ]
                        },
                        {"name": "Muse Tribute", "listeners": "120"}
                    ]
                }
            }
        }"##;

        let response: ArtistSearchResponse =
            serde_json::from_str(json).expect("Should parse artist search");
        let artists = response.results.artist_matches.artist;
        assert_eq!(artists.len(), 2);
        assert_eq!(artists[0].name, "Muse");
        assert_eq!(artists[0].listeners, 3_901_217);
        assert_eq!(artists[0].image[1].size, "extralarge");
        assert!(artists[1].image.is_empty());
    }

    #[test]
    fn test_parse_top_albums_numeric_playcount() {
        let json = r#"{
            "topalbums": {
                "album": [
                    {"name": "Simulation Theory", "playcount": 50000},
                    {"name": "Drones", "playcount": "1200"}
                ],
                "@attr": {"artist": "Muse", "page": "1"}
            }
        }"#;

        let response: TopAlbumsResponse =
            serde_json::from_str(json).expect("Should parse top albums");
        let albums = response.top_albums.album;
        assert_eq!(albums[0].playcount, 50_000);
        assert_eq!(albums[1].playcount, 1_200);
    }

    #[test]
    fn test_parse_album_with_single_track_object() {
        let json = r#"{
            "album": {
                "name": "Zombie",
                "artist": "Bad Wolves",
                "playcount": "991",
                "tracks": {"track": {"name": "Zombie", "duration": 254}},
                "wiki": {"published": "12 Jan 2018, 00:00", "summary": "..."}
            }
        }"#;

        let response: AlbumInfoResponse =
            serde_json::from_str(json).expect("Should parse single-track album");
        assert_eq!(response.album.tracks.track.len(), 1);
        assert_eq!(response.album.tracks.track[0].name, "Zombie");
        assert_eq!(
            response.album.wiki.and_then(|w| w.published).as_deref(),
            Some("12 Jan 2018, 00:00")
        );
    }

    #[test]
    fn test_parse_album_without_tracks() {
        let json = r#"{"album": {"name": "Live EP", "playcount": "10", "tracks": ""}}"#;

        let response: AlbumInfoResponse =
            serde_json::from_str(json).expect("Should tolerate empty tracks field");
        assert!(response.album.tracks.track.is_empty());
        assert!(response.album.wiki.is_none());
    }

    #[test]
    fn test_parse_track_info() {
        let json = r#"{
            "track": {
                "name": "Believer",
                "album": {"artist": "Imagine Dragons", "title": "Evolve"},
                "toptags": {"tag": [{"name": "rock", "url": "x"}, {"name": "2017", "url": "y"}]}
            }
        }"#;

        let response: TrackInfoResponse =
            serde_json::from_str(json).expect("Should parse track info");
        assert_eq!(response.track.album.map(|a| a.title).as_deref(), Some("Evolve"));
        assert_eq!(response.track.top_tags.tag.len(), 2);
    }

    #[test]
    fn test_parse_similar_artists_string_match() {
        let json = r#"{
            "similarartists": {
                "artist": [
                    {"name": "Placebo", "match": "0.85", "image": []},
                    {"name": "Radiohead", "match": 0.5}
                ]
            }
        }"#;

        let response: SimilarArtistsResponse =
            serde_json::from_str(json).expect("Should parse similar artists");
        let artists = response.similar_artists.artist;
        assert!((artists[0].similarity - 0.85).abs() < 1e-9);
        assert!((artists[1].similarity - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_parse_error_response() {
        let json = r#"{"error": 6, "message": "The artist you supplied could not be found", "links": []}"#;

        let error: ApiError = serde_json::from_str(json).expect("Should parse error");
        assert_eq!(error.error, 6);
        assert!(error.message.contains("could not be found"));
    }
}
