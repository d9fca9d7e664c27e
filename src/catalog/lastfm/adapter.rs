//! Adapter layer: Convert Last.fm DTOs to domain models
//!
//! This is the ONLY place where DTO types are converted to domain types.
//! This isolates API changes - if Last.fm changes their response format,
//! only this file and dto.rs need to change.

use chrono::{NaiveDate, NaiveDateTime};

use super::dto;
use crate::catalog::domain::{
    CatalogAlbum, CatalogAlbumDetail, CatalogArtist, CatalogTrack, SimilarArtist, TrackInfo,
};

/// Image sizes in ascending order of preference
const IMAGE_SIZES: [&str; 5] = ["small", "medium", "large", "extralarge", "mega"];

/// Pick the best match for `name` from an artist search.
///
/// Prefers an exact case-insensitive name match, otherwise the top-ranked result.
pub fn to_resolved_artist(name: &str, response: dto::ArtistSearchResponse) -> Option<CatalogArtist> {
    let mut matches = response.results.artist_matches.artist;
    if matches.is_empty() {
        return None;
    }

    let wanted = name.to_lowercase();
    let index = matches
        .iter()
        .position(|a| a.name.to_lowercase() == wanted)
        .unwrap_or(0);
    let best = matches.swap_remove(index);

    Some(CatalogArtist {
        image_url: best_image(&best.image),
        name: best.name,
        tags: Default::default(),
        listener_count: best.listeners,
        play_count: 0,
    })
}

/// Convert full artist info, keeping the top three tags
pub fn to_artist(response: dto::ArtistInfoResponse) -> CatalogArtist {
    let info = response.artist;

    CatalogArtist {
        image_url: best_image(&info.image),
        tags: info.tags.tag.into_iter().take(3).map(|t| t.name).collect(),
        name: info.name,
        listener_count: info.stats.listeners,
        play_count: info.stats.playcount,
    }
}

pub fn to_albums(response: dto::TopAlbumsResponse) -> Vec<CatalogAlbum> {
    response
        .top_albums
        .album
        .into_iter()
        .filter(|a| !a.name.trim().is_empty())
        .map(|a| CatalogAlbum {
            name: a.name,
            play_count: a.playcount,
        })
        .collect()
}

pub fn to_tracks(response: dto::TopTracksResponse) -> Vec<CatalogTrack> {
    response
        .top_tracks
        .track
        .into_iter()
        .filter(|t| !t.name.trim().is_empty())
        .map(|t| CatalogTrack {
            name: t.name,
            play_count: t.playcount,
        })
        .collect()
}

pub fn to_album_detail(response: dto::AlbumInfoResponse) -> CatalogAlbumDetail {
    let album = response.album;
    let release_date = album
        .wiki
        .and_then(|w| w.published)
        .as_deref()
        .and_then(parse_published);

    CatalogAlbumDetail::new(
        album.tracks.track.into_iter().map(|t| t.name).collect(),
        release_date,
        album.playcount,
    )
}

pub fn to_track_info(response: dto::TrackInfoResponse) -> TrackInfo {
    let track = response.track;

    TrackInfo {
        album_name: track
            .album
            .map(|a| a.title)
            .filter(|title| !title.trim().is_empty()),
        release_date: track
            .wiki
            .and_then(|w| w.published)
            .as_deref()
            .and_then(parse_published),
        tags: track.top_tags.tag.into_iter().map(|t| t.name).collect(),
    }
}

pub fn to_similar_artists(response: dto::SimilarArtistsResponse) -> Vec<SimilarArtist> {
    response
        .similar_artists
        .artist
        .into_iter()
        .map(|a| SimilarArtist {
            image_url: best_image(&a.image),
            name: a.name,
            similarity: a.similarity.clamp(0.0, 1.0),
        })
        .collect()
}

/// Parse the free-text `published` field of a Last.fm wiki block.
///
/// Last.fm writes `"12 Mar 2021, 00:00"`; some entries carry ISO dates instead.
pub fn parse_published(text: &str) -> Option<NaiveDate> {
    let text = text.trim();

    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%d %b %Y, %H:%M") {
        return Some(dt.date());
    }

    ["%d %b %Y", "%Y-%m-%d", "%d %B %Y"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
}

/// Largest non-empty image URL
fn best_image(images: &[dto::Image]) -> Option<String> {
    images
        .iter()
        .filter(|img| !img.url.is_empty())
        .max_by_key(|img| IMAGE_SIZES.iter().position(|s| *s == img.size))
        .map(|img| img.url.clone())
}
