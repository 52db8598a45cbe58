//! scrape_competition tool implementation.
//!
//! Runs an on-demand scrape of one competition, or of every configured
//! competition when no id is given. Newly written artifacts only become
//! visible to readers once the memory entries for that competition are
//! dropped, so a successful scrape clears them unless asked not to.

use ladderboard_client::ScrapeReport;
use ladderboard_core::Error;
use ladderboard_core::config::MAX_ROUNDS_LIMIT;
use ladderboard_core::model::validate_competition_id;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::json_result;
use crate::state::AppState;

/// Parameters for the scrape_competition tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ScrapeParams {
    /// Competition to scrape. Omit to scrape every configured competition.
    #[serde(default)]
    pub competition_id: Option<String>,

    /// Rounds to fetch (1-60). Defaults to the configured round count.
    #[serde(default)]
    pub max_rounds: Option<u32>,

    /// Drop cached reads for the competition after a successful scrape.
    #[serde(default = "default_true")]
    pub clear_cache: bool,
}

fn default_true() -> bool {
    true
}

/// Output from the scrape_competition tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ScrapeOutput {
    pub reports: Vec<ScrapeReport>,
}

/// Implementation of the scrape_competition tool.
pub async fn scrape_impl(state: &AppState, params: ScrapeParams) -> Result<CallToolResult, McpError> {
    if let Some(rounds) = params.max_rounds
        && (rounds == 0 || rounds > MAX_ROUNDS_LIMIT)
    {
        return Err(Error::InvalidInput(format!("max_rounds must be between 1 and {MAX_ROUNDS_LIMIT}")).into());
    }

    let reports = match &params.competition_id {
        Some(id) => {
            validate_competition_id(id)?;
            let rounds = state.rounds_for(id, params.max_rounds);
            vec![state.scraper.scrape_competition(id, rounds).await]
        }
        None => {
            if state.config.competitions.is_empty() {
                return Err(Error::InvalidInput(
                    "competition_id is required when no competitions are configured".into(),
                )
                .into());
            }
            state
                .scraper
                .scrape_all(&state.config.competitions, state.config.max_rounds, params.max_rounds)
                .await
        }
    };

    if params.clear_cache {
        for report in reports.iter().filter(|r| r.success) {
            state.store.clear(&report.competition_id);
        }
    }

    json_result(&ScrapeOutput { reports })
}
