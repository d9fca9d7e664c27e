//! Per-run lookup cache.
//!
//! Every catalog answer, including the empty answer recorded after a failed
//! lookup, is memoized for the lifetime of the owning [`Catalog`](super::Catalog).
//! Keys are the exact strings the caller passed in; two spellings of the same
//! artist are two entries and two network requests.
//!
//! Locks are only held for the duration of a map access and never across an
//! await point.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use super::domain::{
    CatalogAlbum, CatalogAlbumDetail, CatalogArtist, CatalogTrack, CatalogTrackDetail,
    SimilarArtist,
};

/// A memo table for one lookup kind.
pub struct Memo<K, V> {
    entries: Mutex<HashMap<K, V>>,
}

impl<K: Eq + Hash, V: Clone> Memo<K, V> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.entries.lock().get(key).cloned()
    }

    pub fn insert(&self, key: K, value: V) {
        self.entries.lock().insert(key, value);
    }
}

impl<K: Eq + Hash, V: Clone> Default for Memo<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of cache activity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the cache
    pub hits: u64,
    /// Lookups that went to the network
    pub misses: u64,
    /// Network lookups that failed and were memoized as empty
    pub failures: u64,
}

/// All memo tables used by the catalog service.
#[derive(Default)]
pub struct CatalogCache {
    pub artists: Memo<String, Option<CatalogArtist>>,
    pub artist_info: Memo<String, Option<CatalogArtist>>,
    pub top_albums: Memo<String, Vec<CatalogAlbum>>,
    pub top_tracks: Memo<String, Vec<CatalogTrack>>,
    pub recent_tracks: Memo<(String, u32), Vec<CatalogTrack>>,
    pub album_details: Memo<(String, String), CatalogAlbumDetail>,
    pub track_details: Memo<(String, String), CatalogTrackDetail>,
    pub similar: Memo<(String, usize), Vec<SimilarArtist>>,
    hits: AtomicU64,
    misses: AtomicU64,
    failures: AtomicU64,
}

impl CatalogCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }
}
