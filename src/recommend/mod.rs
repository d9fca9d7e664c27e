//! Artist recommendations from similar-artist signals.
//!
//! The first few local artists act as seeds. Each seed's similar artists are
//! merged into one candidate table: each repeat suggestion averages its
//! similarity with the value already held. Candidates the user
//! already holds (case-insensitively or by fuzzy match) never enter the table.
//!
//! Ranking blends similarity with relative popularity:
//! `similarity * 0.7 + listeners / max_listeners * 0.3`.

use std::collections::HashMap;
use std::time::Duration;

use serde::Serialize;
use smallvec::SmallVec;

use crate::catalog::{Catalog, CatalogApi, SimilarArtist};
use crate::config::RecommendConfig;
use crate::library::ArtistHoldings;
use crate::matcher::Matcher;

const SIMILARITY_WEIGHT: f64 = 0.7;
const POPULARITY_WEIGHT: f64 = 0.3;

/// A recommended artist
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationRecord {
    pub artist: String,
    /// Running pairwise average of the similarities seeds gave this artist
    pub similarity: f64,
    #[serde(rename = "listeners")]
    pub listener_count: u64,
    #[serde(rename = "playcount")]
    pub play_count: u64,
    pub tags: SmallVec<[String; 3]>,
    #[serde(rename = "image", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Number of seeds that suggested this artist
    pub source_count: u32,
}

impl RecommendationRecord {
    /// Fold in another seed's suggestion: average the held and new similarity
    pub fn merge(&mut self, similarity: f64) {
        self.similarity = (self.similarity + similarity) / 2.0;
        self.source_count += 1;
    }
}

/// Builds recommendations through the shared catalog
pub struct Recommender<'c, A> {
    catalog: &'c Catalog<A>,
    matcher: Matcher,
    config: RecommendConfig,
}

impl<'c, A: CatalogApi> Recommender<'c, A> {
    pub fn new(catalog: &'c Catalog<A>, matcher: Matcher, config: RecommendConfig) -> Self {
        Self {
            catalog,
            matcher,
            config,
        }
    }

    /// Collect, filter and rank recommendations for `library`.
    pub async fn recommend(&self, library: &[ArtistHoldings]) -> Vec<RecommendationRecord> {
        let local: Vec<&str> = library.iter().map(|h| h.artist.as_str()).collect();
        let local_lower: Vec<String> = local.iter().map(|a| a.to_lowercase()).collect();

        let seeds: Vec<&str> = local.iter().copied().take(self.config.seed_count).collect();
        tracing::info!("Getting recommendations from {} seed artists", seeds.len());

        let mut records: Vec<RecommendationRecord> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for (i, seed) in seeds.iter().enumerate() {
            let similar = self
                .catalog
                .similar_artists(seed, self.config.per_seed_limit)
                .await;
            tracing::debug!(seed, count = similar.len(), "Similar artists");

            for candidate in similar {
                let key = candidate.name.to_lowercase();
                if local_lower.contains(&key)
                    || self.matcher.matches_any(&candidate.name, local.iter().copied())
                {
                    continue;
                }

                match index.get(&key) {
                    Some(&slot) => records[slot].merge(candidate.similarity),
                    None => {
                        let record = self.hydrate(candidate).await;
                        index.insert(key, records.len());
                        records.push(record);
                    }
                }
            }

            if i + 1 < seeds.len() && self.config.seed_delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.config.seed_delay_ms)).await;
            }
        }

        let ranked = rank(records, &self.config);
        tracing::info!("Found {} recommendations", ranked.len());
        ranked
    }

    /// Fill in listener, play and tag facts for a first-time candidate
    async fn hydrate(&self, candidate: SimilarArtist) -> RecommendationRecord {
        let info = self.catalog.artist_info(&candidate.name).await;
        let info = info.unwrap_or_default();

        RecommendationRecord {
            artist: candidate.name,
            similarity: candidate.similarity,
            listener_count: info.listener_count,
            play_count: info.play_count,
            tags: info.tags,
            image_url: info.image_url.or(candidate.image_url),
            source_count: 1,
        }
    }
}

/// Apply the similarity and listener floors, score, sort and truncate.
pub fn rank(records: Vec<RecommendationRecord>, config: &RecommendConfig) -> Vec<RecommendationRecord> {
    let kept: Vec<RecommendationRecord> = records
        .into_iter()
        .filter(|r| r.similarity > config.min_similarity && r.listener_count > config.min_listeners)
        .collect();

    let max_listeners = kept.iter().map(|r| r.listener_count).max().unwrap_or(0);
    let score = |r: &RecommendationRecord| {
        let popularity = if max_listeners == 0 {
            0.0
        } else {
            r.listener_count as f64 / max_listeners as f64
        };
        r.similarity * SIMILARITY_WEIGHT + popularity * POPULARITY_WEIGHT
    };

    let mut scored: Vec<(f64, RecommendationRecord)> =
        kept.into_iter().map(|r| (score(&r), r)).collect();
    scored.sort_by(|(sa, a), (sb, b)| sb.total_cmp(sa).then_with(|| a.artist.cmp(&b.artist)));
    scored.truncate(config.top_k);

    scored.into_iter().map(|(_, r)| r).collect()
}
