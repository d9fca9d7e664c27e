//! Catalog service - the memoizing, non-failing face of the catalog API
//!
//! Wraps any [`CatalogApi`] with a [`CatalogCache`]. Every method returns a
//! typed value or an empty sentinel (`None`, an empty list, a default detail);
//! no error crosses this boundary. Failures are logged once, when the network
//! lookup happens, and the sentinel is memoized so the failing request is not
//! repeated for the rest of the run.

use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;

use chrono::{Datelike, Utc};

use super::cache::{CacheStats, CatalogCache, Memo};
use super::domain::{
    CatalogAlbum, CatalogAlbumDetail, CatalogArtist, CatalogError, CatalogTrack,
    CatalogTrackDetail, SimilarArtist,
};
use super::traits::CatalogApi;
use crate::config::CatalogConfig;

/// Earliest year the tag heuristic accepts
const MIN_TAG_YEAR: i32 = 1900;

/// Memoizing catalog client
pub struct Catalog<A> {
    api: A,
    cache: CatalogCache,
    config: CatalogConfig,
}

impl<A: CatalogApi> Catalog<A> {
    pub fn new(api: A, config: CatalogConfig) -> Self {
        Self {
            api,
            cache: CatalogCache::new(),
            config,
        }
    }

    /// Access the wrapped API (tests inspect mock call logs through this)
    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Resolve a free-text artist name to a catalog identity
    pub async fn resolve_artist(&self, name: &str) -> Option<CatalogArtist> {
        self.memoized(&self.cache.artists, name.to_string(), "artist.search", || {
            self.api.search_artist(name)
        })
        .await
    }

    /// Full artist facts, used to hydrate recommendations
    pub async fn artist_info(&self, name: &str) -> Option<CatalogArtist> {
        self.memoized(&self.cache.artist_info, name.to_string(), "artist.getinfo", || async {
            self.api.artist_info(name).await.map(Some)
        })
        .await
    }

    pub async fn top_albums(&self, artist: &str) -> Vec<CatalogAlbum> {
        let limit = self.config.top_albums_limit;
        self.memoized(&self.cache.top_albums, artist.to_string(), "artist.gettopalbums", || {
            self.api.top_albums(artist, limit)
        })
        .await
    }

    pub async fn top_tracks(&self, artist: &str) -> Vec<CatalogTrack> {
        let limit = self.config.top_tracks_limit;
        self.memoized(&self.cache.top_tracks, artist.to_string(), "artist.gettoptracks", || {
            self.api.top_tracks(artist, limit)
        })
        .await
    }

    /// Top tracks over the trailing `window_days`
    pub async fn recent_tracks(&self, artist: &str, window_days: u32) -> Vec<CatalogTrack> {
        let limit = self.config.recent_tracks_limit;
        self.memoized(
            &self.cache.recent_tracks,
            (artist.to_string(), window_days),
            "artist.gettoptracks(period)",
            || self.api.recent_tracks(artist, window_days, limit),
        )
        .await
    }

    pub async fn album_detail(&self, artist: &str, album: &str) -> CatalogAlbumDetail {
        self.memoized(
            &self.cache.album_details,
            (artist.to_string(), album.to_string()),
            "album.getinfo",
            || self.api.album_info(artist, album),
        )
        .await
    }

    /// Resolve a track's release year.
    ///
    /// Tries, in order: the year of the album the catalog files the track under,
    /// the track's own publication date, then a four-digit year among its tags.
    pub async fn track_detail(&self, artist: &str, track: &str) -> CatalogTrackDetail {
        let key = (artist.to_string(), track.to_string());
        if let Some(detail) = self.cache.track_details.get(&key) {
            self.cache.record_hit();
            return detail;
        }

        let info = self
            .fetch("track.getinfo", &key, || self.api.track_info(artist, track))
            .await
            .unwrap_or_default();

        let mut release_year = None;
        if let Some(album) = &info.album_name {
            release_year = self.album_detail(artist, album).await.release_year;
        }
        let release_year = release_year
            .or_else(|| info.release_date.map(|d| d.year()))
            .or_else(|| year_from_tags(&info.tags, Utc::now().year() + 1));

        let detail = CatalogTrackDetail {
            release_year,
            album_name: info.album_name,
        };
        self.cache.track_details.insert(key, detail.clone());
        detail
    }

    pub async fn similar_artists(&self, artist: &str, limit: usize) -> Vec<SimilarArtist> {
        self.memoized(
            &self.cache.similar,
            (artist.to_string(), limit),
            "artist.getsimilar",
            || self.api.similar_artists(artist, limit),
        )
        .await
    }

    /// Answer from `memo`, or fetch, memoize and return (the sentinel on failure)
    async fn memoized<K, V, F, Fut>(&self, memo: &Memo<K, V>, key: K, op: &str, fetch: F) -> V
    where
        K: Eq + Hash + Debug,
        V: Clone + Default,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, CatalogError>>,
    {
        if let Some(value) = memo.get(&key) {
            self.cache.record_hit();
            return value;
        }

        let value = self.fetch(op, &key, fetch).await.unwrap_or_default();
        memo.insert(key, value.clone());
        value
    }

    /// Perform one network lookup, logging and absorbing any failure
    async fn fetch<K, V, F, Fut>(&self, op: &str, key: &K, fetch: F) -> Option<V>
    where
        K: Debug,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, CatalogError>>,
    {
        self.cache.record_miss();
        match fetch().await {
            Ok(value) => Some(value),
            Err(CatalogError::NotFound) => {
                tracing::debug!(op, ?key, "Not found in catalog");
                None
            }
            Err(e) => {
                self.cache.record_failure();
                tracing::warn!(op, ?key, "Catalog lookup failed: {}", e);
                None
            }
        }
    }
}

/// First tag that is a plausible four-digit release year
pub fn year_from_tags(tags: &[String], max_year: i32) -> Option<i32> {
    tags.iter()
        .map(|t| t.trim())
        .filter(|t| t.len() == 4 && t.chars().all(|c| c.is_ascii_digit()))
        .filter_map(|t| t.parse::<i32>().ok())
        .find(|year| (MIN_TAG_YEAR..=max_year).contains(year))
}
