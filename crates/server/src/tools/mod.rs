//! MCP tool implementations.
//!
//! This module contains all tools exposed by the ladderboard server.

pub mod artifacts;
pub mod cache;
pub mod competitions;
pub mod scrape;

pub use artifacts::{FixturesParams, LadderParams};
pub use cache::CacheClearParams;
pub use scrape::ScrapeParams;

use ladderboard_core::Error;
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use serde::Serialize;

/// Serialize a tool output as pretty JSON text content.
pub(crate) fn json_result<T: Serialize>(output: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}
