//! Periodic re-scrape of every configured competition.
//!
//! Each tick scrapes the competitions one after another, then drops memory
//! entries for those that succeeded so readers pick up the new files. The
//! first tick fires one full interval after startup.

use std::sync::Arc;
use std::time::Duration;

use ladderboard_client::Scraper;
use ladderboard_core::CompetitionConfig;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Start the refresh loop on the current runtime.
pub fn spawn(
    scraper: Arc<Scraper>, competitions: Vec<CompetitionConfig>, default_rounds: u32, period: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            refresh(&scraper, &competitions, default_rounds).await;
        }
    })
}

/// Scrape every competition once, clearing cached reads for the successes.
pub async fn refresh(scraper: &Scraper, competitions: &[CompetitionConfig], default_rounds: u32) {
    tracing::info!(competitions = competitions.len(), "scheduled refresh starting");

    let reports = scraper.scrape_all(competitions, default_rounds, None).await;
    let mut succeeded = 0usize;
    for report in reports.iter().filter(|r| r.success) {
        scraper.store().clear(&report.competition_id);
        succeeded += 1;
    }

    tracing::info!(succeeded, failed = reports.len() - succeeded, "scheduled refresh finished");
}
