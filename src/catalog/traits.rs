//! Trait definition for the remote catalog API.
//!
//! This trait enables dependency injection and mocking for tests.
//! Production code uses [`LastFmClient`](super::lastfm::LastFmClient), while
//! tests substitute [`mocks::MockCatalog`].
//!
//! Every method is a raw, fallible lookup: it returns the catalog's answer or a
//! [`CatalogError`] describing why there is none. Converting failures into empty
//! results happens one layer up, in [`Catalog`](super::service::Catalog).

use async_trait::async_trait;

use super::domain::{
    CatalogAlbum, CatalogAlbumDetail, CatalogArtist, CatalogError, CatalogTrack, SimilarArtist,
    TrackInfo,
};

/// Trait for catalog metadata lookups.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Fuzzy artist search, returning the best candidate for `name`.
    async fn search_artist(&self, name: &str) -> Result<Option<CatalogArtist>, CatalogError>;

    /// Full artist facts (listeners, play count, tags, image).
    async fn artist_info(&self, name: &str) -> Result<CatalogArtist, CatalogError>;

    async fn top_albums(&self, artist: &str, limit: usize)
    -> Result<Vec<CatalogAlbum>, CatalogError>;

    async fn top_tracks(&self, artist: &str, limit: usize)
    -> Result<Vec<CatalogTrack>, CatalogError>;

    /// Top tracks restricted to a trailing window of `window_days`.
    async fn recent_tracks(
        &self,
        artist: &str,
        window_days: u32,
        limit: usize,
    ) -> Result<Vec<CatalogTrack>, CatalogError>;

    async fn album_info(&self, artist: &str, album: &str)
    -> Result<CatalogAlbumDetail, CatalogError>;

    async fn track_info(&self, artist: &str, track: &str) -> Result<TrackInfo, CatalogError>;

    async fn similar_artists(
        &self,
        artist: &str,
        limit: usize,
    ) -> Result<Vec<SimilarArtist>, CatalogError>;
}

#[async_trait]
impl CatalogApi for super::lastfm::LastFmClient {
    async fn search_artist(&self, name: &str) -> Result<Option<CatalogArtist>, CatalogError> {
        self.search_artist(name).await
    }

    async fn artist_info(&self, name: &str) -> Result<CatalogArtist, CatalogError> {
        self.artist_info(name).await
    }

    async fn top_albums(
        &self,
        artist: &str,
        limit: usize,
    ) -> Result<Vec<CatalogAlbum>, CatalogError> {
        self.top_albums(artist, limit).await
    }

    async fn top_tracks(
        &self,
        artist: &str,
        limit: usize,
    ) -> Result<Vec<CatalogTrack>, CatalogError> {
        self.top_tracks(artist, limit).await
    }

    async fn recent_tracks(
        &self,
        artist: &str,
        window_days: u32,
        limit: usize,
    ) -> Result<Vec<CatalogTrack>, CatalogError> {
        self.recent_tracks(artist, window_days, limit).await
    }

    async fn album_info(
        &self,
        artist: &str,
        album: &str,
    ) -> Result<CatalogAlbumDetail, CatalogError> {
        self.album_info(artist, album).await
    }

    async fn track_info(&self, artist: &str, track: &str) -> Result<TrackInfo, CatalogError> {
        self.track_info(artist, track).await
    }

    async fn similar_artists(
        &self,
        artist: &str,
        limit: usize,
    ) -> Result<Vec<SimilarArtist>, CatalogError> {
        self.similar_artists(artist, limit).await
    }
}

/// Mock catalog for testing.
///
/// Returns configurable responses and records every call so tests can assert
/// on caching behaviour.
#[cfg(test)]
pub mod mocks {
    use std::collections::{HashMap, HashSet};

    use chrono::NaiveDate;
    use parking_lot::Mutex;

    use super::*;

    /// Mock catalog backed by in-memory tables.
    ///
    /// Anything not configured answers [`CatalogError::NotFound`], the same as
    /// Last.fm does for unknown entities.
    #[derive(Default)]
    pub struct MockCatalog {
        pub artists: HashMap<String, CatalogArtist>,
        pub top_albums: HashMap<String, Vec<CatalogAlbum>>,
        pub top_tracks: HashMap<String, Vec<CatalogTrack>>,
        pub recent_tracks: HashMap<String, Vec<CatalogTrack>>,
        pub albums: HashMap<(String, String), CatalogAlbumDetail>,
        pub tracks: HashMap<(String, String), TrackInfo>,
        pub similar: HashMap<String, Vec<SimilarArtist>>,
        /// Methods that fail with a network error
        pub failing: HashSet<&'static str>,
        /// Every call as `"method:arg1:arg2"`
        calls: Mutex<Vec<String>>,
    }

    impl MockCatalog {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_artist(mut self, name: &str, listeners: u64, plays: u64, tags: &[&str]) -> Self {
            self.artists.insert(
                name.to_string(),
                CatalogArtist {
                    name: name.to_string(),
                    tags: tags.iter().take(3).map(|t| t.to_string()).collect(),
                    listener_count: listeners,
                    play_count: plays,
                    image_url: None,
                },
            );
            self
        }

        pub fn with_top_albums(mut self, artist: &str, albums: &[(&str, u64)]) -> Self {
            self.top_albums.insert(
                artist.to_string(),
                albums
                    .iter()
                    .map(|(name, plays)| CatalogAlbum {
                        name: name.to_string(),
                        play_count: *plays,
                    })
                    .collect(),
            );
            self
        }

        pub fn with_top_tracks(mut self, artist: &str, tracks: &[(&str, u64)]) -> Self {
            self.top_tracks.insert(artist.to_string(), to_tracks(tracks));
            self
        }

        pub fn with_recent_tracks(mut self, artist: &str, tracks: &[(&str, u64)]) -> Self {
            self.recent_tracks.insert(artist.to_string(), to_tracks(tracks));
            self
        }

        pub fn with_album(
            mut self,
            artist: &str,
            album: &str,
            tracks: &[&str],
            released: Option<NaiveDate>,
        ) -> Self {
            self.albums.insert(
                (artist.to_string(), album.to_string()),
                CatalogAlbumDetail::new(tracks.iter().map(|t| t.to_string()).collect(), released, 0),
            );
            self
        }

        pub fn with_track_info(mut self, artist: &str, track: &str, info: TrackInfo) -> Self {
            self.tracks
                .insert((artist.to_string(), track.to_string()), info);
            self
        }

        pub fn with_similar(mut self, artist: &str, similar: &[(&str, f64)]) -> Self {
            self.similar.insert(
                artist.to_string(),
                similar
                    .iter()
                    .map(|(name, similarity)| SimilarArtist {
                        name: name.to_string(),
                        similarity: *similarity,
                        image_url: None,
                    })
                    .collect(),
            );
            self
        }

        pub fn failing_on(mut self, method: &'static str) -> Self {
            self.failing.insert(method);
            self
        }

        /// Number of calls whose log line starts with `prefix`
        pub fn call_count(&self, prefix: &str) -> usize {
            self.calls
                .lock()
                .iter()
                .filter(|c| c.starts_with(prefix))
                .count()
        }

        pub fn total_calls(&self) -> usize {
            self.calls.lock().len()
        }

        fn record(&self, method: &'static str, args: &[&str]) -> Result<(), CatalogError> {
            let mut line = method.to_string();
            for arg in args {
                line.push(':');
                line.push_str(arg);
            }
            self.calls.lock().push(line);

            if self.failing.contains(method) {
                return Err(CatalogError::Network("connection reset".to_string()));
            }
            Ok(())
        }
    }

    fn to_tracks(tracks: &[(&str, u64)]) -> Vec<CatalogTrack> {
        tracks
            .iter()
            .map(|(name, plays)| CatalogTrack {
                name: name.to_string(),
                play_count: *plays,
            })
            .collect()
    }

    fn lookup<K, V>(map: &HashMap<K, V>, key: &K) -> Result<V, CatalogError>
    where
        K: std::hash::Hash + Eq,
        V: Clone,
    {
        map.get(key).cloned().ok_or(CatalogError::NotFound)
    }

    #[async_trait]
    impl CatalogApi for MockCatalog {
        async fn search_artist(&self, name: &str) -> Result<Option<CatalogArtist>, CatalogError> {
            self.record("search_artist", &[name])?;
            let wanted = name.to_lowercase();
            Ok(self
                .artists
                .values()
                .find(|a| a.name.to_lowercase() == wanted)
                .cloned())
        }

        async fn artist_info(&self, name: &str) -> Result<CatalogArtist, CatalogError> {
            self.record("artist_info", &[name])?;
            lookup(&self.artists, &name.to_string())
        }

        async fn top_albums(
            &self,
            artist: &str,
            _limit: usize,
        ) -> Result<Vec<CatalogAlbum>, CatalogError> {
            self.record("top_albums", &[artist])?;
            lookup(&self.top_albums, &artist.to_string())
        }

        async fn top_tracks(
            &self,
            artist: &str,
            _limit: usize,
        ) -> Result<Vec<CatalogTrack>, CatalogError> {
            self.record("top_tracks", &[artist])?;
            lookup(&self.top_tracks, &artist.to_string())
        }

        async fn recent_tracks(
            &self,
            artist: &str,
            _window_days: u32,
            _limit: usize,
        ) -> Result<Vec<CatalogTrack>, CatalogError> {
            self.record("recent_tracks", &[artist])?;
            lookup(&self.recent_tracks, &artist.to_string())
        }

        async fn album_info(
            &self,
            artist: &str,
            album: &str,
        ) -> Result<CatalogAlbumDetail, CatalogError> {
            self.record("album_info", &[artist, album])?;
            lookup(&self.albums, &(artist.to_string(), album.to_string()))
        }

        async fn track_info(&self, artist: &str, track: &str) -> Result<TrackInfo, CatalogError> {
            self.record("track_info", &[artist, track])?;
            lookup(&self.tracks, &(artist.to_string(), track.to_string()))
        }

        async fn similar_artists(
            &self,
            artist: &str,
            _limit: usize,
        ) -> Result<Vec<SimilarArtist>, CatalogError> {
            self.record("similar_artists", &[artist])?;
            lookup(&self.similar, &artist.to_string())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_mock_unknown_entities_are_not_found() {
            let mock = MockCatalog::new();
            let result = mock.top_albums("Nobody", 50).await;
            assert_eq!(result.unwrap_err(), CatalogError::NotFound);
        }

        #[tokio::test]
        async fn test_mock_records_calls() {
            let mock = MockCatalog::new().with_top_tracks("Muse", &[("Uprising", 10)]);
            mock.top_tracks("Muse", 50).await.unwrap();
            mock.top_tracks("Muse", 50).await.unwrap();
            assert_eq!(mock.call_count("top_tracks:Muse"), 2);
            assert_eq!(mock.total_calls(), 2);
        }

        #[tokio::test]
        async fn test_mock_failure_injection() {
            let mock = MockCatalog::new()
                .with_top_tracks("Muse", &[("Uprising", 10)])
                .failing_on("top_tracks");
            let result = mock.top_tracks("Muse", 50).await;
            assert!(matches!(result, Err(CatalogError::Network(_))));
        }
    }
}
