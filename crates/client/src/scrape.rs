//! Scrape orchestration.
//!
//! A scrape of one competition fetches the ladder page and every round
//! page, then writes the four artifacts (ladder, fixtures, upcoming,
//! results) to the competition store. Ladder and fixtures are independent:
//! either can fail without sinking the other, and the outcome is reported
//! rather than raised.
//!
//! Scrapes of the same competition are serialized; different competitions
//! never wait on each other.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use ladderboard_core::model::validate_competition_id;
use ladderboard_core::{AppConfig, Artifact, ArtifactKind, CompetitionConfig, CompetitionStore, Error, LadderEntry};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::aggregate::{RoundAggregator, classify};
use crate::fetch::{FetchClient, FetchConfig, PageSource, SourceUrls};
use crate::parse::parse_ladder;

const FAILURE_MESSAGE: &str =
    "Scrape failed: no data could be retrieved. Check the competition id and that the results site is reachable.";

/// Outcome of scraping one competition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ScrapeReport {
    pub competition_id: String,
    /// At least one artifact was written.
    pub success: bool,
    /// Some, but not all, artifacts were written.
    pub partial: bool,
    pub ladder: bool,
    pub fixtures: bool,
    pub upcoming: bool,
    pub results: bool,
    pub ladder_count: usize,
    pub fixture_count: usize,
    pub message: String,
}

impl ScrapeReport {
    fn failed(competition_id: &str, message: impl Into<String>) -> Self {
        Self {
            competition_id: competition_id.to_string(),
            success: false,
            partial: false,
            ladder: false,
            fixtures: false,
            upcoming: false,
            results: false,
            ladder_count: 0,
            fixture_count: 0,
            message: message.into(),
        }
    }

    fn finish(mut self) -> Self {
        let flags = [self.ladder, self.fixtures, self.upcoming, self.results];
        self.success = flags.iter().any(|ok| *ok);
        self.partial = self.success && !flags.iter().all(|ok| *ok);

        self.message = if !self.success {
            FAILURE_MESSAGE.to_string()
        } else if self.partial {
            let failed: Vec<&str> = ArtifactKind::ALL
                .iter()
                .zip(flags)
                .filter(|(_, ok)| !ok)
                .map(|(kind, _)| kind.as_str())
                .collect();
            format!(
                "Partial scrape: {} ladder rows, {} fixtures; failed: {}",
                self.ladder_count,
                self.fixture_count,
                failed.join(", ")
            )
        } else {
            format!("Scraped {} ladder rows and {} fixtures", self.ladder_count, self.fixture_count)
        };
        self
    }
}

/// Fetches, parses and persists competition data.
pub struct Scraper {
    source: Arc<dyn PageSource>,
    urls: SourceUrls,
    aggregator: RoundAggregator,
    store: CompetitionStore,
    locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl Scraper {
    /// Build a scraper that fetches over HTTP using the configuration.
    pub fn new(config: &AppConfig, store: CompetitionStore) -> Result<Self, Error> {
        let source: Arc<dyn PageSource> = Arc::new(FetchClient::new(FetchConfig::from(config))?);
        let urls = SourceUrls::from_config(config)?;
        Ok(Self::with_source(source, urls, config, store))
    }

    /// Build a scraper over any page source.
    pub fn with_source(
        source: Arc<dyn PageSource>, urls: SourceUrls, config: &AppConfig, store: CompetitionStore,
    ) -> Self {
        let aggregator = RoundAggregator::from_config(source.clone(), urls.clone(), config);
        Self { source, urls, aggregator, store, locks: Mutex::new(HashMap::new()) }
    }

    pub fn store(&self) -> &CompetitionStore {
        &self.store
    }

    fn lock_for(&self, competition_id: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        locks.entry(competition_id.to_string()).or_default().clone()
    }

    /// Forget the lock for `competition_id` once no other scrape holds or awaits it.
    fn release_lock(&self, competition_id: &str, lock: &Arc<tokio::sync::Mutex<()>>) {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        let ours = locks.get(competition_id).is_some_and(|held| Arc::ptr_eq(held, lock));
        // one reference in the map, one in `lock`
        if ours && Arc::strong_count(lock) == 2 {
            locks.remove(competition_id);
        }
    }

    /// Fetch and parse the ladder page. Fetch failures yield an empty ladder.
    pub async fn scrape_ladder(&self, competition_id: &str) -> Result<Vec<LadderEntry>, Error> {
        let url = self.urls.ladder_url(competition_id)?;
        match self.source.fetch_page(&url).await {
            Ok(html) => Ok(parse_ladder(&html)),
            Err(e) => {
                tracing::warn!(competition = competition_id, "ladder fetch failed: {}", e);
                Ok(Vec::new())
            }
        }
    }

    /// Scrape one competition and persist whatever could be captured.
    pub async fn scrape_competition(&self, competition_id: &str, max_rounds: u32) -> ScrapeReport {
        if let Err(e) = validate_competition_id(competition_id) {
            return ScrapeReport::failed(competition_id, e.to_string());
        }

        let lock = self.lock_for(competition_id);
        let report = {
            let _guard = lock.lock().await;
            self.scrape_locked(competition_id, max_rounds).await
        };
        self.release_lock(competition_id, &lock);
        report
    }

    async fn scrape_locked(&self, competition_id: &str, max_rounds: u32) -> ScrapeReport {
        tracing::info!(competition = competition_id, max_rounds, "starting scrape");

        let mut report = ScrapeReport::failed(competition_id, String::new());

        match self.scrape_ladder(competition_id).await {
            Ok(entries) if !entries.is_empty() => {
                report.ladder_count = entries.len();
                report.ladder = self.persist(competition_id, ArtifactKind::Ladder, Artifact::Ladder(entries)).await;
            }
            Ok(_) => tracing::warn!(competition = competition_id, "ladder page produced no entries"),
            Err(e) => tracing::warn!(competition = competition_id, "ladder scrape failed: {}", e),
        }

        match self.aggregator.fetch_all_rounds(competition_id, max_rounds).await {
            Ok(fixtures) => {
                let classified = classify(&fixtures, Utc::now());
                report.fixture_count = fixtures.len();
                report.fixtures =
                    self.persist(competition_id, ArtifactKind::Fixtures, Artifact::Fixtures(fixtures)).await;
                report.upcoming = self
                    .persist(competition_id, ArtifactKind::Upcoming, Artifact::Fixtures(classified.upcoming))
                    .await;
                report.results = self
                    .persist(competition_id, ArtifactKind::Results, Artifact::Fixtures(classified.results))
                    .await;
            }
            Err(e) => tracing::warn!(competition = competition_id, "fixture scrape failed: {}", e),
        }

        let report = report.finish();
        tracing::info!(
            competition = competition_id,
            success = report.success,
            partial = report.partial,
            "{}",
            report.message
        );
        report
    }

    /// Scrape each competition in turn.
    ///
    /// Round counts come from `rounds_override` when given, otherwise from
    /// the competition's own setting, otherwise `default_rounds`.
    pub async fn scrape_all(
        &self, competitions: &[CompetitionConfig], default_rounds: u32, rounds_override: Option<u32>,
    ) -> Vec<ScrapeReport> {
        let mut reports = Vec::with_capacity(competitions.len());
        for competition in competitions {
            let rounds = rounds_override.or(competition.max_rounds).unwrap_or(default_rounds);
            reports.push(self.scrape_competition(&competition.id, rounds).await);
        }
        reports
    }

    async fn persist(&self, competition_id: &str, kind: ArtifactKind, payload: Artifact) -> bool {
        match self.store.write(competition_id, kind, &payload).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(competition = competition_id, artifact = %kind, "failed to persist: {}", e);
                false
            }
        }
    }
}
