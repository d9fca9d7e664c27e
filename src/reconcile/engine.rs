//! Reconciliation engine - finds catalog tracks missing from the local inventory.
//!
//! Each artist runs through three passes in order:
//! 1. **Album pass** - every track of popular catalog albums the user lacks
//! 2. **Top-singles pass** - popular tracks, filed under an album when one lists them
//! 3. **Recent-singles pass** - tracks popular over the recent window, no popularity floor
//!
//! Passes share one per-artist accumulator so a track is reported once even
//! when several passes discover it. Album and track details are fetched only
//! for candidates that need them; the catalog cache makes repeated lookups free.

use std::collections::VecDeque;
use std::time::Duration;

use super::types::{
    AbsentItemRecord, AbsentKind, ArtistAccumulator, RECENT_SINGLE_LABEL, SINGLE_LABEL,
};
use crate::catalog::{Catalog, CatalogAlbum, CatalogAlbumDetail, CatalogApi, CatalogTrack};
use crate::config::ReconcileConfig;
use crate::library::ArtistHoldings;
use crate::matcher::Matcher;

/// Which singles pass a candidate came from
#[derive(Debug, Clone, Copy)]
enum SinglesPass {
    Top,
    Recent,
}

impl SinglesPass {
    fn kind(self) -> AbsentKind {
        match self {
            Self::Top => AbsentKind::Single,
            Self::Recent => AbsentKind::RecentSingle,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Top => SINGLE_LABEL,
            Self::Recent => RECENT_SINGLE_LABEL,
        }
    }
}

/// One queued unit of work
struct ArtistTask<'h> {
    position: usize,
    holdings: &'h ArtistHoldings,
}

/// Drives the catalog and matcher over a grouped inventory
pub struct Reconciler<'c, A> {
    catalog: &'c Catalog<A>,
    matcher: Matcher,
    config: ReconcileConfig,
}

impl<'c, A: CatalogApi> Reconciler<'c, A> {
    pub fn new(catalog: &'c Catalog<A>, config: ReconcileConfig) -> Self {
        Self {
            catalog,
            matcher: Matcher::new(config.similarity_threshold),
            config,
        }
    }

    /// Reconcile every artist, in inventory order, one at a time.
    pub async fn reconcile_library(&self, library: &[ArtistHoldings]) -> Vec<AbsentItemRecord> {
        let total = library.len();
        let mut queue: VecDeque<ArtistTask<'_>> = library
            .iter()
            .enumerate()
            .map(|(i, holdings)| ArtistTask {
                position: i + 1,
                holdings,
            })
            .collect();

        let mut records = Vec::new();
        while let Some(task) = queue.pop_front() {
            tracing::info!(
                "Processing artist {}/{}: {} ({} local tracks)",
                task.position,
                total,
                task.holdings.artist,
                task.holdings.record_count
            );

            let found = self.reconcile_artist(task.holdings).await;
            tracing::info!(
                "  -> Found {} missing tracks for {}",
                found.len(),
                task.holdings.artist
            );
            records.extend(found);

            if !queue.is_empty() && self.config.artist_delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.config.artist_delay_ms)).await;
            }
        }

        records
    }

    /// Run the three passes for one artist.
    pub async fn reconcile_artist(&self, holdings: &ArtistHoldings) -> Vec<AbsentItemRecord> {
        let artist = holdings.artist.as_str();

        // Unresolved artists still go through every pass with whatever data turns up
        match self.catalog.resolve_artist(artist).await {
            Some(resolved) => {
                tracing::debug!(artist, resolved = %resolved.name, "Resolved artist")
            }
            None => tracing::warn!(
                "Could not find artist: {}, continuing with limited data",
                artist
            ),
        }

        let albums = self.catalog.top_albums(artist).await;
        let mut acc = ArtistAccumulator::new();

        self.album_pass(holdings, &albums, &mut acc).await;

        let top = self.catalog.top_tracks(artist).await;
        let popular = top.iter().filter(|t| t.play_count >= self.config.track_floor);
        self.singles_pass(holdings, &albums, popular, SinglesPass::Top, &mut acc)
            .await;

        let window = self.catalog.config().recent_window_days;
        let recent = self.catalog.recent_tracks(artist, window).await;
        self.singles_pass(holdings, &albums, recent.iter(), SinglesPass::Recent, &mut acc)
            .await;

        acc.into_records()
    }

    /// Emit every track of popular albums the user doesn't hold
    async fn album_pass(
        &self,
        holdings: &ArtistHoldings,
        albums: &[CatalogAlbum],
        acc: &mut ArtistAccumulator,
    ) {
        let artist = holdings.artist.as_str();

        for album in albums {
            if album.play_count < self.config.album_floor {
                continue;
            }
            if self.matcher.matches_any(&album.name, holdings.album_names()) {
                continue;
            }

            let detail = self.catalog.album_detail(artist, &album.name).await;
            for track in &detail.track_names {
                if self.is_held_or_recorded(holdings, acc, track) {
                    continue;
                }
                acc.push(album_track(artist, album, &detail, track));
            }
        }
    }

    /// Emit popular or recent tracks the user doesn't hold
    async fn singles_pass<'t, I>(
        &self,
        holdings: &ArtistHoldings,
        albums: &[CatalogAlbum],
        candidates: I,
        pass: SinglesPass,
        acc: &mut ArtistAccumulator,
    ) where
        I: Iterator<Item = &'t CatalogTrack>,
    {
        let artist = holdings.artist.as_str();

        for candidate in candidates {
            if self.is_held_or_recorded(holdings, acc, &candidate.name) {
                continue;
            }

            let record = match self.find_album(artist, albums, &candidate.name).await {
                Some((album, detail)) => album_track(artist, album, &detail, &candidate.name),
                None => {
                    let detail = self.catalog.track_detail(artist, &candidate.name).await;
                    AbsentItemRecord {
                        artist: artist.to_string(),
                        album: pass.label().to_string(),
                        track: candidate.name.clone(),
                        release_year: detail.release_year,
                        release_date: None,
                        play_count: candidate.play_count,
                        kind: pass.kind(),
                    }
                }
            };
            acc.push(record);
        }
    }

    /// Scan catalog albums in order for one listing `track`
    async fn find_album<'a>(
        &self,
        artist: &str,
        albums: &'a [CatalogAlbum],
        track: &str,
    ) -> Option<(&'a CatalogAlbum, CatalogAlbumDetail)> {
        for album in albums {
            let detail = self.catalog.album_detail(artist, &album.name).await;
            if self
                .matcher
                .matches_any(track, detail.track_names.iter().map(String::as_str))
            {
                return Some((album, detail));
            }
        }
        None
    }

    fn is_held_or_recorded(
        &self,
        holdings: &ArtistHoldings,
        acc: &ArtistAccumulator,
        track: &str,
    ) -> bool {
        self.matcher.matches_any(track, holdings.track_names()) || acc.contains_similar(&self.matcher, track)
    }
}

fn album_track(
    artist: &str,
    album: &CatalogAlbum,
    detail: &CatalogAlbumDetail,
    track: &str,
) -> AbsentItemRecord {
    AbsentItemRecord {
        artist: artist.to_string(),
        album: album.name.clone(),
        track: track.to_string(),
        release_year: detail.release_year,
        release_date: detail.release_date,
        play_count: album.play_count,
        kind: AbsentKind::AlbumTrack,
    }
}
