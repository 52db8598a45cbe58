//! Round-by-round fixture aggregation and classification.
//!
//! ### Pacing
//! - Rounds are fetched strictly one at a time, 1..=max_rounds
//! - A fixed delay separates consecutive round requests (default 500ms)
//! - The delay is a politeness rate limit, not a backoff: it never adapts
//!
//! ### Failure Policy
//! - A round that fails to fetch or parses to nothing is skipped
//! - The run fails only when every round came back empty

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use ladderboard_core::{AppConfig, Error, Fixture};

use crate::datetime::parse_source_datetime;
use crate::fetch::{PageSource, SourceUrls};
use crate::parse::parse_round;

/// Maximum number of entries kept in the results partition.
pub const RESULTS_LIMIT: usize = 10;

/// Drives the fixture parser across a competition's rounds.
pub struct RoundAggregator {
    source: Arc<dyn PageSource>,
    urls: SourceUrls,
    pacing: Duration,
}

impl RoundAggregator {
    pub fn new(source: Arc<dyn PageSource>, urls: SourceUrls, pacing: Duration) -> Self {
        Self { source, urls, pacing }
    }

    /// Build with the configured round pacing.
    pub fn from_config(source: Arc<dyn PageSource>, urls: SourceUrls, config: &AppConfig) -> Self {
        Self::new(source, urls, config.round_pacing())
    }

    pub fn pacing(&self) -> Duration {
        self.pacing
    }

    /// Fetch and merge every round from 1 to `max_rounds` inclusive.
    ///
    /// Exact repeats of (round, home team, away team) are dropped, keeping
    /// the first occurrence.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidInput`/`Error::InvalidUrl` if a round URL cannot be built
    /// - `Error::NoFixtures` if no round produced a single fixture
    pub async fn fetch_all_rounds(&self, competition_id: &str, max_rounds: u32) -> Result<Vec<Fixture>, Error> {
        let mut all = Vec::new();
        let mut empty_rounds = 0u32;

        for round in 1..=max_rounds {
            if round > 1 && !self.pacing.is_zero() {
                tokio::time::sleep(self.pacing).await;
            }

            let url = self.urls.round_url(competition_id, round)?;
            let html = match self.source.fetch_page(&url).await {
                Ok(html) => html,
                Err(e) => {
                    tracing::warn!(competition = competition_id, round, "skipping round: {}", e);
                    empty_rounds += 1;
                    continue;
                }
            };

            let fixtures = parse_round(&html, round);
            if fixtures.is_empty() {
                tracing::debug!(competition = competition_id, round, "round produced no fixtures");
                empty_rounds += 1;
                continue;
            }

            tracing::debug!(competition = competition_id, round, count = fixtures.len(), "parsed round");
            all.extend(fixtures);
        }

        if all.is_empty() {
            return Err(Error::NoFixtures(format!(
                "{competition_id}: none of {max_rounds} rounds returned fixtures"
            )));
        }

        let all = dedupe(all);
        tracing::info!(
            competition = competition_id,
            fixtures = all.len(),
            empty_rounds,
            "aggregated {} rounds",
            max_rounds
        );

        Ok(all)
    }
}

fn dedupe(fixtures: Vec<Fixture>) -> Vec<Fixture> {
    let before = fixtures.len();
    let mut seen = HashSet::new();
    let unique: Vec<Fixture> = fixtures
        .into_iter()
        .filter(|f| {
            let (round, home, away) = f.identity();
            seen.insert((round, home.to_string(), away.to_string()))
        })
        .collect();

    if unique.len() < before {
        tracing::debug!("dropped {} duplicate fixtures", before - unique.len());
    }
    unique
}

/// Upcoming and recent-result partitions of a fixture set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    /// Not completed and not yet started (or undated), ascending by round.
    pub upcoming: Vec<Fixture>,
    /// Completed, descending by round, at most [`RESULTS_LIMIT`].
    pub results: Vec<Fixture>,
}

/// Split fixtures into upcoming and recent results as of `now`.
///
/// Unparseable dates count as upcoming. The partitions are not exhaustive:
/// past fixtures without a score land in neither.
pub fn classify(fixtures: &[Fixture], now: DateTime<Utc>) -> Classification {
    let mut upcoming: Vec<Fixture> = fixtures
        .iter()
        .filter(|f| !f.completed)
        .filter(|f| parse_source_datetime(&f.date, f.time.as_deref()).is_none_or(|kickoff| kickoff >= now))
        .cloned()
        .collect();
    upcoming.sort_by_key(|f| f.round);

    let mut results: Vec<Fixture> = fixtures.iter().filter(|f| f.completed).cloned().collect();
    results.sort_by(|a, b| b.round.cmp(&a.round));
    results.truncate(RESULTS_LIMIT);

    Classification { upcoming, results }
}
