//! ladderboard server entry point.
//!
//! This is the main binary that boots the MCP server on stdio transport.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::{Context, Result};
use ladderboard_core::AppConfig;
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;

mod handler;
mod scheduler;
mod state;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load().context("loading configuration")?;
    tracing::info!(
        data_dir = %config.data_dir.display(),
        competitions = config.competitions.len(),
        "Starting ladderboard server on stdio transport"
    );

    let state = Arc::new(state::AppState::new(config).context("building scraper")?);

    let refresh = state.config.refresh_interval().map(|period| {
        tracing::info!(interval_secs = period.as_secs(), "scheduled refresh enabled");
        scheduler::spawn(
            state.scraper.clone(),
            state.config.competitions.clone(),
            state.config.max_rounds,
            period,
        )
    });

    let handler = handler::LadderboardServer::new(state);
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    if let Some(task) = refresh {
        task.abort();
    }

    Ok(())
}
