//! Report assembly - classifies absent items into output sections.
//!
//! Classification is a pure function of the absent-item records, the report
//! settings and the reference date. Every section is sorted with a full
//! tie-break (artist, then title), so the same inputs always give the same
//! output regardless of the order the records arrived in.

use std::collections::{HashMap, HashSet};

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::config::ReportConfig;
use crate::reconcile::{AbsentItemRecord, AbsentKind};
use crate::recommend::RecommendationRecord;

/// Section policy
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Policy {
    /// Rank by catalog play counts
    #[default]
    Popularity,
    /// Favour recent releases and recently trending singles
    Recency,
}

/// One entry of the flat `missing_tracks` list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissingTrack {
    pub artist: String,
    pub album: String,
    pub track: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
}

/// An album the user is missing tracks from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlbumEntry {
    pub artist: String,
    pub album: String,
    pub playcount: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<NaiveDate>,
    /// Number of absent tracks from this album
    pub track_count: usize,
}

/// A standalone single the user is missing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SongEntry {
    pub artist: String,
    pub track: String,
    pub playcount: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    /// Which pass found it
    pub source: AbsentKind,
}

/// Album and song sections, named after the policy that built them
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Sections {
    Popularity {
        popular_albums: Vec<AlbumEntry>,
        popular_songs: Vec<SongEntry>,
    },
    Recency {
        new_albums: Vec<AlbumEntry>,
        new_songs: Vec<SongEntry>,
    },
}

impl Sections {
    /// Empty sections for `policy`
    pub fn empty(policy: Policy) -> Self {
        match policy {
            Policy::Popularity => Self::Popularity {
                popular_albums: Vec::new(),
                popular_songs: Vec::new(),
            },
            Policy::Recency => Self::Recency {
                new_albums: Vec::new(),
                new_songs: Vec::new(),
            },
        }
    }

    pub fn policy(&self) -> Policy {
        match self {
            Self::Popularity { .. } => Policy::Popularity,
            Self::Recency { .. } => Policy::Recency,
        }
    }

    pub fn albums(&self) -> &[AlbumEntry] {
        match self {
            Self::Popularity { popular_albums, .. } => popular_albums,
            Self::Recency { new_albums, .. } => new_albums,
        }
    }

    pub fn songs(&self) -> &[SongEntry] {
        match self {
            Self::Popularity { popular_songs, .. } => popular_songs,
            Self::Recency { new_songs, .. } => new_songs,
        }
    }
}

/// The complete run output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub missing_tracks: Vec<MissingTrack>,
    #[serde(flatten)]
    pub sections: Sections,
    pub recommendations: Vec<RecommendationRecord>,
    pub total_local_tracks: usize,
    pub total_artists: usize,
}

impl Report {
    pub fn new(
        records: &[AbsentItemRecord],
        sections: Sections,
        recommendations: Vec<RecommendationRecord>,
        total_local_tracks: usize,
        total_artists: usize,
    ) -> Self {
        Self {
            missing_tracks: missing_tracks(records),
            sections,
            recommendations,
            total_local_tracks,
            total_artists,
        }
    }

    /// Missing tracks that also appear in the songs section
    pub fn overlap(&self) -> usize {
        let songs: HashSet<(&str, &str)> = self
            .sections
            .songs()
            .iter()
            .map(|s| (s.artist.as_str(), s.track.as_str()))
            .collect();
        self.missing_tracks
            .iter()
            .filter(|t| songs.contains(&(t.artist.as_str(), t.track.as_str())))
            .count()
    }
}

/// Flatten records for the `missing_tracks` list, stably ordered by artist
pub fn missing_tracks(records: &[AbsentItemRecord]) -> Vec<MissingTrack> {
    let mut tracks: Vec<MissingTrack> = records
        .iter()
        .map(|r| MissingTrack {
            artist: r.artist.clone(),
            album: r.album.clone(),
            track: r.track.clone(),
            year: r.release_year,
        })
        .collect();
    tracks.sort_by(|a, b| a.artist.cmp(&b.artist));
    tracks
}

/// Build the album and song sections under the configured policy.
pub fn classify(records: &[AbsentItemRecord], config: &ReportConfig, today: NaiveDate) -> Sections {
    let groups = group_albums(records);
    let singles = records.iter().filter(|r| r.kind.is_single());

    match config.policy {
        Policy::Popularity => {
            let mut albums: Vec<AlbumEntry> = groups
                .into_iter()
                .filter(|a| a.playcount >= config.album_threshold)
                .collect();
            albums.sort_by(|a, b| {
                b.playcount
                    .cmp(&a.playcount)
                    .then_with(|| a.artist.cmp(&b.artist))
                    .then_with(|| a.album.cmp(&b.album))
            });
            albums.truncate(config.max_section_len);

            let mut songs: Vec<SongEntry> = singles
                .filter(|r| r.play_count >= config.single_threshold)
                .map(song_entry)
                .collect();
            songs.sort_by(|a, b| {
                b.playcount
                    .cmp(&a.playcount)
                    .then_with(|| a.artist.cmp(&b.artist))
                    .then_with(|| a.track.cmp(&b.track))
            });
            songs.truncate(config.max_section_len);

            Sections::Popularity {
                popular_albums: albums,
                popular_songs: songs,
            }
        }
        Policy::Recency => {
            let cutoff = today
                .checked_sub_months(Months::new(config.recent_window_months))
                .unwrap_or(NaiveDate::MIN);

            let mut albums: Vec<AlbumEntry> = groups
                .into_iter()
                .filter(|a| a.release_date.is_some_and(|d| d >= cutoff))
                .collect();
            albums.sort_by(|a, b| {
                b.playcount
                    .cmp(&a.playcount)
                    .then_with(|| a.artist.cmp(&b.artist))
                    .then_with(|| a.album.cmp(&b.album))
            });
            albums.truncate(config.max_section_len);

            let mut songs: Vec<SongEntry> = singles
                .filter(|r| {
                    r.kind == AbsentKind::RecentSingle
                        || r.play_count >= config.old_single_threshold
                })
                .map(song_entry)
                .collect();
            // Recent-pass singles lead
            songs.sort_by(|a, b| {
                let a_old = a.source != AbsentKind::RecentSingle;
                let b_old = b.source != AbsentKind::RecentSingle;
                a_old
                    .cmp(&b_old)
                    .then_with(|| b.playcount.cmp(&a.playcount))
                    .then_with(|| a.artist.cmp(&b.artist))
                    .then_with(|| a.track.cmp(&b.track))
            });
            songs.truncate(config.max_section_len);

            Sections::Recency {
                new_albums: albums,
                new_songs: songs,
            }
        }
    }
}

/// Group album-track records by `(artist, album)`
fn group_albums(records: &[AbsentItemRecord]) -> Vec<AlbumEntry> {
    let mut index: HashMap<(&str, &str), usize> = HashMap::new();
    let mut groups: Vec<AlbumEntry> = Vec::new();

    for record in records.iter().filter(|r| r.kind == AbsentKind::AlbumTrack) {
        let key = (record.artist.as_str(), record.album.as_str());
        let slot = *index.entry(key).or_insert_with(|| {
            groups.push(AlbumEntry {
                artist: record.artist.clone(),
                album: record.album.clone(),
                playcount: 0,
                year: None,
                release_date: None,
                track_count: 0,
            });
            groups.len() - 1
        });

        let group = &mut groups[slot];
        group.playcount = group.playcount.max(record.play_count);
        group.year = group.year.or(record.release_year);
        group.release_date = group.release_date.or(record.release_date);
        group.track_count += 1;
    }

    groups
}

fn song_entry(record: &AbsentItemRecord) -> SongEntry {
    SongEntry {
        artist: record.artist.clone(),
        track: record.track.clone(),
        playcount: record.play_count,
        year: record.release_year,
        source: record.kind,
    }
}
