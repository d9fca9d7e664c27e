//! Catalog module - fetches and memoizes artist, album and track facts.
//!
//! # Architecture
//!
//! This module follows a clean separation between:
//! - **Domain models** (`domain.rs`) - Internal types that represent catalog facts
//! - **API DTOs** (`lastfm/dto.rs`) - Exact API response shapes
//! - **Adapters** - Convert DTOs to domain models
//! - **Clients** - HTTP client for the Last.fm API
//! - **Traits** (`traits.rs`) - The `CatalogApi` seam, with mocks for tests
//! - **Service** (`service.rs`) - Memoization and error absorption
//!
//! The engines only ever talk to [`Catalog`], which never fails: a lookup that
//! goes wrong is logged and answered with an empty value.
//!
//! # Usage
//!
//! ```ignore
//! use music_gaps::catalog::{Catalog, LastFmClient};
//!
//! let client = LastFmClient::new(api_key, DEFAULT_BASE_URL, Duration::from_secs(10))?;
//! let catalog = Catalog::new(client, config.catalog.clone());
//!
//! for album in catalog.top_albums("Muse").await {
//!     println!("{} ({} plays)", album.name, album.play_count);
//! }
//! ```

pub mod cache;
pub mod domain;
pub mod lastfm;
pub mod service;
pub mod traits;

pub use cache::CacheStats;
pub use domain::{
    CatalogAlbum, CatalogAlbumDetail, CatalogArtist, CatalogError, CatalogTrack,
    CatalogTrackDetail, SimilarArtist, TrackInfo,
};
pub use lastfm::LastFmClient;
pub use service::Catalog;
pub use traits::CatalogApi;
