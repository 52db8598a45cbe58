//! cache_clear tool implementation.
//!
//! Drops in-memory entries for one competition or for all of them. Durable
//! artifact files are never deleted; the next read reloads them from disk.

use ladderboard_core::model::validate_competition_id;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::json_result;
use crate::state::AppState;

/// Parameters for the cache_clear tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheClearParams {
    /// Competition to clear. Omit to clear every competition.
    #[serde(default)]
    pub competition_id: Option<String>,
}

/// Output from the cache_clear tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheClearOutput {
    /// The competition cleared, or "all".
    pub scope: String,
    /// Number of memory entries removed.
    pub cleared: usize,
}

/// Implementation of the cache_clear tool.
pub fn clear_impl(state: &AppState, params: CacheClearParams) -> Result<CallToolResult, McpError> {
    let output = match params.competition_id {
        Some(id) => {
            validate_competition_id(&id)?;
            let cleared = state.store.clear(&id);
            CacheClearOutput { scope: id, cleared }
        }
        None => CacheClearOutput { scope: "all".into(), cleared: state.store.clear_all() },
    };

    json_result(&output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::{self, full_source, output};
    use std::sync::Arc;

    async fn state_with(dir: &std::path::Path, ids: &[&str]) -> AppState {
        let config = testing::config();
        let mut source = testing::CannedSource::default();
        for id in ids {
            source.pages.extend(full_source(id, 1).pages);
        }
        let scraper = testing::scraper(Arc::new(source), &config, testing::store(dir));
        let state = AppState::with_scraper(config, scraper).unwrap();
        for id in ids {
            state.scraper.scrape_competition(id, 1).await;
            state.store.read_ladder(id).await.unwrap();
            state.store.read_results(id, None).await.unwrap();
        }
        state
    }

    #[tokio::test]
    async fn test_clear_one_competition() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with(dir.path(), &["u14", "open"]).await;

        let params = CacheClearParams { competition_id: Some("u14".into()) };
        let out: CacheClearOutput = output(&clear_impl(&state, params).unwrap());
        assert_eq!(out.scope, "u14");
        assert_eq!(out.cleared, 2);

        let params = CacheClearParams { competition_id: Some("u14".into()) };
        let out: CacheClearOutput = output(&clear_impl(&state, params).unwrap());
        assert_eq!(out.cleared, 0);

        // files survive, so the cleared competition still reads
        assert!(state.store.read_ladder("u14").await.is_some());
    }

    #[tokio::test]
    async fn test_clear_all() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with(dir.path(), &["u14", "open"]).await;

        let out: CacheClearOutput = output(&clear_impl(&state, CacheClearParams { competition_id: None }).unwrap());
        assert_eq!(out.scope, "all");
        assert_eq!(out.cleared, 4);
    }

    #[tokio::test]
    async fn test_clear_rejects_bad_id() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with(dir.path(), &[]).await;

        let params = CacheClearParams { competition_id: Some("a b".into()) };
        assert!(clear_impl(&state, params).is_err());
    }
}
