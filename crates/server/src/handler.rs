//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use std::sync::Arc;

use crate::state::AppState;
use crate::tools::{
    CacheClearParams, FixturesParams, LadderParams, ScrapeParams, artifacts, cache, competitions, scrape,
};

use ladderboard_core::ArtifactKind;
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

/// The main MCP server handler for ladderboard.
#[derive(Clone)]
pub struct LadderboardServer {
    state: Arc<AppState>,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl LadderboardServer {
    /// Create a new server handler over shared state.
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state, tool_router: Self::tool_router() }
    }

    #[tool(description = "List configured competitions with their round counts and which artifacts are stored.")]
    async fn list_competitions(&self) -> Result<CallToolResult, McpError> {
        competitions::list_impl(&self.state).await
    }

    /// Scrape one competition (or all configured ones) from the results site.
    ///
    /// Fetches the ladder and every round page, persists ladder, fixtures,
    /// upcoming and results, and reports which of them succeeded.
    #[tool(
        description = "Scrape a competition's ladder and fixtures from the results site and store them. Omit competition_id to scrape every configured competition."
    )]
    async fn scrape_competition(&self, params: Parameters<ScrapeParams>) -> Result<CallToolResult, McpError> {
        scrape::scrape_impl(&self.state, params.0).await
    }

    #[tool(description = "Get the stored ladder (standings) for a competition.")]
    async fn get_ladder(&self, params: Parameters<LadderParams>) -> Result<CallToolResult, McpError> {
        artifacts::ladder_impl(&self.state, params.0).await
    }

    #[tool(description = "Get every stored fixture for a competition, with kickoff times in the display timezone.")]
    async fn get_fixtures(&self, params: Parameters<FixturesParams>) -> Result<CallToolResult, McpError> {
        artifacts::fixtures_impl(&self.state, ArtifactKind::Fixtures, params.0).await
    }

    #[tool(description = "Get upcoming (unplayed) fixtures for a competition, earliest round first.")]
    async fn get_upcoming(&self, params: Parameters<FixturesParams>) -> Result<CallToolResult, McpError> {
        artifacts::fixtures_impl(&self.state, ArtifactKind::Upcoming, params.0).await
    }

    #[tool(description = "Get the most recent results (up to 10) for a competition, latest round first.")]
    async fn get_results(&self, params: Parameters<FixturesParams>) -> Result<CallToolResult, McpError> {
        artifacts::fixtures_impl(&self.state, ArtifactKind::Results, params.0).await
    }

    #[tool(
        description = "Clear cached reads for one competition, or all competitions when competition_id is omitted. Stored files are kept."
    )]
    async fn cache_clear(&self, params: Parameters<CacheClearParams>) -> Result<CallToolResult, McpError> {
        cache::clear_impl(&self.state, params.0)
    }
}

impl ServerHandler for LadderboardServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "ladderboard".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(
                "Sports league ladders and fixtures. Read tools serve stored data; run scrape_competition to refresh it."
                    .into(),
            ),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
