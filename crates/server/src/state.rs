//! Shared server state.

use std::sync::Arc;

use ladderboard_client::{DateTimeNormalizer, Scraper};
use ladderboard_core::{AppConfig, CompetitionStore, Error};

/// Everything the tools and the scheduler share.
pub struct AppState {
    pub config: AppConfig,
    pub store: CompetitionStore,
    pub scraper: Arc<Scraper>,
    pub normalizer: DateTimeNormalizer,
}

impl AppState {
    /// Build the store and an HTTP-backed scraper from configuration.
    pub fn new(config: AppConfig) -> Result<Self, Error> {
        let store = CompetitionStore::new(&config);
        let scraper = Scraper::new(&config, store.clone())?;
        Self::with_scraper(config, scraper)
    }

    /// Wrap an existing scraper; its store becomes the shared store.
    pub fn with_scraper(config: AppConfig, scraper: Scraper) -> Result<Self, Error> {
        let normalizer = DateTimeNormalizer::from_config(&config)?;
        let store = scraper.store().clone();
        Ok(Self { config, store, scraper: Arc::new(scraper), normalizer })
    }

    /// Round count for `competition_id`: an explicit request wins, then the
    /// competition's configured override, then the global default.
    pub fn rounds_for(&self, competition_id: &str, requested: Option<u32>) -> u32 {
        requested.unwrap_or_else(|| self.config.rounds_for(competition_id))
    }
}
