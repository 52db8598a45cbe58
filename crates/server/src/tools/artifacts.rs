//! Read tools: get_ladder, get_fixtures, get_upcoming, get_results.
//!
//! Reads never trigger a scrape. A competition with nothing in memory or on
//! disk yields `ARTIFACT_UNAVAILABLE`.

use ladderboard_client::DateTimeNormalizer;
use ladderboard_core::model::{validate_competition_id, validate_date_format};
use ladderboard_core::{ArtifactKind, Error, Fixture, LadderEntry};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::json_result;
use crate::state::AppState;

/// Parameters for the get_ladder tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LadderParams {
    /// Competition identifier.
    pub competition_id: String,
}

/// Parameters for the fixture read tools.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FixturesParams {
    /// Competition identifier.
    pub competition_id: String,

    /// Return at most this many fixtures.
    #[serde(default)]
    pub limit: Option<usize>,

    /// strftime-style format for the `kickoff` field.
    /// Defaults to the configured date format.
    #[serde(default)]
    pub format: Option<String>,
}

/// Output from the get_ladder tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LadderOutput {
    pub competition_id: String,
    pub count: usize,
    pub ladder: Vec<LadderEntry>,
}

/// A fixture with its kickoff rendered in the display timezone.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FixtureView {
    #[serde(flatten)]
    pub fixture: Fixture,
    /// Kickoff in the display timezone, or the published text if it could
    /// not be parsed.
    pub kickoff: String,
}

/// Output from the fixture read tools.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FixturesOutput {
    pub competition_id: String,
    /// Which artifact was read: fixtures, upcoming or results.
    pub kind: String,
    pub timezone: String,
    pub count: usize,
    pub fixtures: Vec<FixtureView>,
}

fn unavailable(kind: ArtifactKind, competition_id: &str) -> McpError {
    Error::Unavailable(format!("no {kind} data for {competition_id}; run scrape_competition first")).into()
}

/// Implementation of the get_ladder tool.
pub async fn ladder_impl(state: &AppState, params: LadderParams) -> Result<CallToolResult, McpError> {
    validate_competition_id(&params.competition_id)?;

    let ladder = state
        .store
        .read_ladder(&params.competition_id)
        .await
        .ok_or_else(|| unavailable(ArtifactKind::Ladder, &params.competition_id))?;

    json_result(&LadderOutput { competition_id: params.competition_id, count: ladder.len(), ladder })
}

/// Implementation of get_fixtures, get_upcoming and get_results.
pub async fn fixtures_impl(
    state: &AppState, kind: ArtifactKind, params: FixturesParams,
) -> Result<CallToolResult, McpError> {
    validate_competition_id(&params.competition_id)?;
    if params.limit == Some(0) {
        return Err(Error::InvalidInput("limit must be at least 1".into()).into());
    }
    if let Some(format) = &params.format {
        validate_date_format(format)?;
    }

    let id = &params.competition_id;
    let fixtures = match kind {
        ArtifactKind::Fixtures => state.store.read_fixtures(id, params.limit).await,
        ArtifactKind::Upcoming => state.store.read_upcoming(id, params.limit).await,
        ArtifactKind::Results => state.store.read_results(id, params.limit).await,
        ArtifactKind::Ladder => {
            return Err(Error::InvalidInput("ladder is not a fixture artifact".into()).into());
        }
    }
    .ok_or_else(|| unavailable(kind, id))?;

    let format = params.format.as_deref().unwrap_or(&state.config.date_format);
    let views = render(&state.normalizer, fixtures, format);

    json_result(&FixturesOutput {
        competition_id: params.competition_id.clone(),
        kind: kind.to_string(),
        timezone: state.normalizer.display_timezone().name().to_string(),
        count: views.len(),
        fixtures: views,
    })
}

fn render(normalizer: &DateTimeNormalizer, fixtures: Vec<Fixture>, format: &str) -> Vec<FixtureView> {
    fixtures
        .into_iter()
        .map(|fixture| {
            let kickoff = normalizer.format(&fixture.date, fixture.time.as_deref(), format);
            FixtureView { fixture, kickoff }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::{self, full_source, output};
    use std::sync::Arc;

    async fn scraped_state(dir: &std::path::Path) -> AppState {
        let config = testing::config();
        let scraper = testing::scraper(Arc::new(full_source("u14", 3)), &config, testing::store(dir));
        let state = AppState::with_scraper(config, scraper).unwrap();
        assert!(state.scraper.scrape_competition("u14", 3).await.success);
        state
    }

    fn fixtures_params(limit: Option<usize>, format: Option<&str>) -> FixturesParams {
        FixturesParams { competition_id: "u14".into(), limit, format: format.map(String::from) }
    }

    #[tokio::test]
    async fn test_get_ladder() {
        let dir = tempfile::tempdir().unwrap();
        let state = scraped_state(dir.path()).await;

        let result = ladder_impl(&state, LadderParams { competition_id: "u14".into() }).await.unwrap();
        let out: LadderOutput = output(&result);

        assert_eq!(out.count, 3);
        assert_eq!(out.ladder[0].team, "Hawks");
        assert_eq!(out.ladder[2].points, 0);
    }

    #[tokio::test]
    async fn test_missing_artifact_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let state = scraped_state(dir.path()).await;

        let err = ladder_impl(&state, LadderParams { competition_id: "u16".into() }).await.unwrap_err();
        assert_eq!(err.code.0, -32001);

        let params = FixturesParams { competition_id: "u16".into(), limit: None, format: None };
        let err = fixtures_impl(&state, ArtifactKind::Results, params).await.unwrap_err();
        assert_eq!(err.code.0, -32001);
    }

    #[tokio::test]
    async fn test_invalid_id_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let state = scraped_state(dir.path()).await;

        let err = ladder_impl(&state, LadderParams { competition_id: "../u14".into() }).await.unwrap_err();
        assert_eq!(err.code.0, -32602);
    }

    #[tokio::test]
    async fn test_get_fixtures_renders_kickoff() {
        let dir = tempfile::tempdir().unwrap();
        let state = scraped_state(dir.path()).await;

        let result = fixtures_impl(&state, ArtifactKind::Fixtures, fixtures_params(None, None)).await.unwrap();
        let out: FixturesOutput = output(&result);

        assert_eq!(out.kind, "fixtures");
        assert_eq!(out.timezone, "UTC");
        assert_eq!(out.count, 6);
        // 10:00 on 1 March in Melbourne (UTC+11) is 23:00 UTC the day before
        assert_eq!(out.fixtures[0].kickoff, "2025-02-28 23:00");
        assert_eq!(out.fixtures[0].fixture.home_team, "Hawks");
        assert_eq!(out.fixtures[1].kickoff, "TBC");
    }

    #[tokio::test]
    async fn test_caller_format_and_limit() {
        let dir = tempfile::tempdir().unwrap();
        let state = scraped_state(dir.path()).await;

        let result = fixtures_impl(&state, ArtifactKind::Results, fixtures_params(Some(2), Some("%d/%m")))
            .await
            .unwrap();
        let out: FixturesOutput = output(&result);

        assert_eq!(out.count, 2);
        let rounds: Vec<u32> = out.fixtures.iter().map(|f| f.fixture.round).collect();
        assert_eq!(rounds, vec![3, 2]);
        assert_eq!(out.fixtures[0].kickoff, "28/02");
        assert_eq!(out.fixtures[0].fixture.away_score, Some(3));
    }

    #[tokio::test]
    async fn test_get_upcoming() {
        let dir = tempfile::tempdir().unwrap();
        let state = scraped_state(dir.path()).await;

        let result = fixtures_impl(&state, ArtifactKind::Upcoming, fixtures_params(None, None)).await.unwrap();
        let out: FixturesOutput = output(&result);

        assert_eq!(out.count, 3);
        assert!(out.fixtures.iter().all(|f| !f.fixture.completed));
    }

    #[tokio::test]
    async fn test_zero_limit_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let state = scraped_state(dir.path()).await;

        let err = fixtures_impl(&state, ArtifactKind::Fixtures, fixtures_params(Some(0), None)).await.unwrap_err();
        assert_eq!(err.code.0, -32602);
    }

    #[tokio::test]
    async fn test_unknown_format_specifier_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let state = scraped_state(dir.path()).await;

        let err = fixtures_impl(&state, ArtifactKind::Fixtures, fixtures_params(None, Some("%Q %H:%M")))
            .await
            .unwrap_err();
        assert_eq!(err.code.0, -32602);
    }

    #[test]
    fn test_fixture_view_flattens() {
        let view = FixtureView {
            fixture: Fixture {
                round: 1,
                date: "TBC".into(),
                time: None,
                home_team: "Hawks".into(),
                away_team: "Lions".into(),
                venue: None,
                completed: false,
                home_score: None,
                away_score: None,
            },
            kickoff: "TBC".into(),
        };
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["home_team"], "Hawks");
        assert_eq!(json["kickoff"], "TBC");
        assert!(json.get("fixture").is_none());
    }
}
