//! Test utilities and fixtures for music-gaps tests.
//!
//! This module provides catalog and config factories so engine tests don't
//! repeat the same setup, and so no test ever sleeps between artists.
//!
//! # Example
//!
//! ```ignore
//! use music_gaps::test_utils::{catalog_with, no_delay_reconcile_config};
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let catalog = catalog_with(MockCatalog::new().with_top_tracks("Muse", &[("Uprising", 500)]));
//!     let reconciler = Reconciler::new(&catalog, no_delay_reconcile_config());
//!     // ... test logic
//! }
//! ```

use crate::catalog::Catalog;
use crate::catalog::traits::mocks::MockCatalog;
use crate::config::{CatalogConfig, RecommendConfig, ReconcileConfig};
use crate::library::{ArtistHoldings, Inventory, LocalTrackRecord, group_by_artist};

/// Wraps a mock in a [`Catalog`] with default limits.
pub fn catalog_with(mock: MockCatalog) -> Catalog<MockCatalog> {
    Catalog::new(mock, CatalogConfig::default())
}

/// Default reconcile settings without the pause between artists.
pub fn no_delay_reconcile_config() -> ReconcileConfig {
    ReconcileConfig {
        artist_delay_ms: 0,
        ..Default::default()
    }
}

/// Default recommendation settings without the pause between seeds.
pub fn no_delay_recommend_config() -> RecommendConfig {
    RecommendConfig {
        seed_delay_ms: 0,
        ..Default::default()
    }
}

/// One holdings entry per artist, each with a single placeholder track.
///
/// Use when only the artist list matters (recommendation seeds, ordering).
pub fn holdings_for(artists: &[&str]) -> Vec<ArtistHoldings> {
    let records: Vec<LocalTrackRecord> = artists
        .iter()
        .map(|artist| LocalTrackRecord::new(artist, "", "Placeholder Track"))
        .collect();
    group_by_artist(&records)
}

/// A small inventory covering two artists, one with an album.
///
/// ```ignore
/// let inventory = sample_inventory();
/// assert_eq!(group_by_artist(&inventory.records).len(), 2);
/// ```
pub fn sample_inventory() -> Inventory {
    let records = vec![
        LocalTrackRecord::new("Imagine Dragons", "Evolve", "Believer"),
        LocalTrackRecord::new("Imagine Dragons", "Evolve", "Thunder"),
        LocalTrackRecord::new("Muse", "Absolution", "Hysteria"),
    ];
    Inventory {
        row_count: records.len(),
        records,
    }
}
