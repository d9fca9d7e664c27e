//! Reconciliation report commands.

use std::path::Path;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use tokio::runtime::Runtime;

use super::resolve_api_key;
use crate::catalog::{Catalog, CatalogApi, LastFmClient};
use crate::config::Config;
use crate::error::Error;
use crate::library::{self, Inventory};
use crate::matcher::Matcher;
use crate::recommend::Recommender;
use crate::reconcile::Reconciler;
use crate::report::{self, Report, Sections};

/// Compare an inventory file against the catalog and print the report
pub fn cmd_compare(
    rt: &Runtime,
    config: &Config,
    input: Option<&Path>,
    api_key: Option<&str>,
) -> anyhow::Result<()> {
    let inventory = load(input)?;
    let api_key = resolve_api_key(api_key, config)?;
    let catalog = connect(&api_key, config)?;

    let today = Local::now().date_naive();
    let report = rt.block_on(build_report(&catalog, &inventory, config, today));

    tracing::info!(
        "Final results ({:?} policy): {} missing tracks, {} albums, {} songs, {} recommendations",
        report.sections.policy(),
        report.missing_tracks.len(),
        report.sections.albums().len(),
        report.sections.songs().len(),
        report.recommendations.len()
    );
    tracing::info!(
        "Overlap between missing tracks and songs: {} tracks",
        report.overlap()
    );
    log_cache_stats(&catalog);

    print_report(&report)
}

/// Print recommendations only, in the same report framing
pub fn cmd_recommend(
    rt: &Runtime,
    config: &Config,
    input: Option<&Path>,
    api_key: Option<&str>,
) -> anyhow::Result<()> {
    let inventory = load(input)?;
    let api_key = resolve_api_key(api_key, config)?;
    let catalog = connect(&api_key, config)?;

    let library = library::group_by_artist(&inventory.records);
    let matcher = Matcher::new(config.reconcile.similarity_threshold);
    let recommender = Recommender::new(&catalog, matcher, config.recommend.clone());
    let recommendations = rt.block_on(recommender.recommend(&library));

    let report = Report::new(
        &[],
        Sections::empty(config.report.policy),
        recommendations,
        inventory.row_count,
        library.len(),
    );
    log_cache_stats(&catalog);

    print_report(&report)
}

/// Run reconciliation, classification and recommendations over `inventory`.
pub async fn build_report<A: CatalogApi>(
    catalog: &Catalog<A>,
    inventory: &Inventory,
    config: &Config,
    today: NaiveDate,
) -> Report {
    let library = library::group_by_artist(&inventory.records);
    tracing::info!(
        "Processing {} artists from {} local tracks",
        library.len(),
        inventory.row_count
    );

    let reconciler = Reconciler::new(catalog, config.reconcile.clone());
    let absent = reconciler.reconcile_library(&library).await;

    let sections = report::classify(&absent, &config.report, today);

    let recommendations = if config.recommend.enabled {
        let matcher = Matcher::new(config.reconcile.similarity_threshold);
        Recommender::new(catalog, matcher, config.recommend.clone())
            .recommend(&library)
            .await
    } else {
        Vec::new()
    };

    Report::new(
        &absent,
        sections,
        recommendations,
        inventory.row_count,
        library.len(),
    )
}

/// Load the inventory named on the command line; none given is fatal.
fn load(input: Option<&Path>) -> Result<Inventory, Error> {
    let input = input.ok_or(Error::MissingInventory)?;
    library::load_inventory(input)
}

fn connect(api_key: &str, config: &Config) -> anyhow::Result<Catalog<LastFmClient>> {
    let client = LastFmClient::new(
        api_key,
        &config.catalog.base_url,
        Duration::from_secs(config.catalog.timeout_secs),
    )
    .map_err(Error::from)?;
    Ok(Catalog::new(client, config.catalog.clone()))
}

fn log_cache_stats<A: CatalogApi>(catalog: &Catalog<A>) {
    let stats = catalog.stats();
    tracing::info!(
        "Catalog lookups: {} ({} cached, {} requests, {} failed)",
        stats.hits + stats.misses,
        stats.hits,
        stats.misses,
        stats.failures
    );
}

fn print_report(report: &Report) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report).map_err(Error::from)?;
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::traits::mocks::MockCatalog;
    use crate::report::Policy;
    use crate::test_utils::{catalog_with, sample_inventory};

    fn quiet_config() -> Config {
        let mut config = Config::default();
        config.reconcile.artist_delay_ms = 0;
        config.recommend.seed_delay_ms = 0;
        config
    }

    fn mock() -> MockCatalog {
        MockCatalog::new()
            .with_artist("Imagine Dragons", 5_000_000, 900_000_000, &["pop rock"])
            .with_artist("Muse", 4_000_000, 800_000_000, &["alternative"])
            .with_top_tracks("Imagine Dragons", &[("Believer", 2_000_000), ("Demons", 1_500_000)])
            .with_top_albums("Muse", &[("Simulation Theory", 50_000)])
            .with_album(
                "Muse",
                "Simulation Theory",
                &["Dig Down", "Pressure", "Propaganda"],
                NaiveDate::from_ymd_opt(2018, 11, 9),
            )
            .with_similar("Muse", &[("Royal Blood", 0.6), ("Imagine Dragons", 0.3)])
            .with_similar("Imagine Dragons", &[("Royal Blood", 0.8)])
            .with_artist("Royal Blood", 900_000, 20_000_000, &["rock"])
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[tokio::test]
    async fn test_build_report_end_to_end() {
        let catalog = catalog_with(mock());
        let inventory = sample_inventory();

        let report = build_report(&catalog, &inventory, &quiet_config(), today()).await;

        assert_eq!(report.total_local_tracks, 3);
        assert_eq!(report.total_artists, 2);

        let missing: Vec<_> = report.missing_tracks.iter().map(|t| t.track.as_str()).collect();
        assert_eq!(missing, vec!["Demons", "Dig Down", "Pressure", "Propaganda"]);

        assert_eq!(report.sections.policy(), Policy::Popularity);
        assert_eq!(report.sections.albums().len(), 1);
        assert_eq!(report.sections.songs()[0].track, "Demons");
        assert_eq!(report.overlap(), 1);

        assert_eq!(report.recommendations.len(), 1);
        assert_eq!(report.recommendations[0].artist, "Royal Blood");
        assert_eq!(report.recommendations[0].source_count, 2);
    }

    #[tokio::test]
    async fn test_build_report_without_recommendations() {
        let catalog = catalog_with(mock());
        let mut config = quiet_config();
        config.recommend.enabled = false;
        config.report.policy = Policy::Recency;

        let report = build_report(&catalog, &sample_inventory(), &config, today()).await;

        assert!(report.recommendations.is_empty());
        assert_eq!(catalog.api().call_count("similar_artists"), 0);
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("new_albums").is_some());
    }

    #[tokio::test]
    async fn test_total_local_tracks_counts_every_row() {
        let catalog = catalog_with(MockCatalog::new());
        let mut inventory = sample_inventory();
        // Two rows without an artist were dropped while loading
        inventory.row_count += 2;

        let report = build_report(&catalog, &inventory, &quiet_config(), today()).await;
        assert_eq!(report.total_local_tracks, 5);
        assert_eq!(report.total_artists, 2);
    }

    #[test]
    fn test_missing_input_is_fatal_config() {
        let err = load(None).unwrap_err();
        assert!(matches!(err, Error::MissingInventory));
        assert!(err.is_fatal_config());
    }

    #[test]
    fn test_compare_without_input_fails_before_network() {
        let rt = Runtime::new().unwrap();
        let err = cmd_compare(&rt, &quiet_config(), None, Some("key")).unwrap_err();
        let err = err.downcast_ref::<Error>().unwrap();
        assert!(matches!(err, Error::MissingInventory));
    }
}
