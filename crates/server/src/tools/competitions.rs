//! list_competitions tool implementation.

use ladderboard_core::ArtifactKind;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::json_result;
use crate::state::AppState;

/// A configured competition and what the store holds for it.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CompetitionSummary {
    pub id: String,
    pub name: String,
    /// Rounds scraped for this competition.
    pub max_rounds: u32,
    /// Artifact types with a durable file on disk.
    pub available: Vec<String>,
}

/// Output from the list_competitions tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ListCompetitionsOutput {
    pub competitions: Vec<CompetitionSummary>,
}

/// Implementation of the list_competitions tool.
pub async fn list_impl(state: &AppState) -> Result<CallToolResult, McpError> {
    let mut competitions = Vec::with_capacity(state.config.competitions.len());

    for competition in &state.config.competitions {
        let mut available = Vec::new();
        for kind in ArtifactKind::ALL {
            let path = state.store.files().path(kind, &competition.id);
            if tokio::fs::try_exists(&path).await.unwrap_or(false) {
                available.push(kind.to_string());
            }
        }

        competitions.push(CompetitionSummary {
            id: competition.id.clone(),
            name: competition.name.clone(),
            max_rounds: state.config.rounds_for(&competition.id),
            available,
        });
    }

    json_result(&ListCompetitionsOutput { competitions })
}
