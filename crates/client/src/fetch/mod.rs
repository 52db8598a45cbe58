//! HTTP page fetching.
//!
//! ### Contract
//! - One GET per call with a fixed timeout (default 30s)
//! - Browser-like User-Agent on every request
//! - Any non-200 status or transport error is a failure
//! - No retries or backoff; pacing belongs to the caller
//!
//! ### Source URLs
//! - Ladder and round pages are built from configured templates
//!   (see [`SourceUrls`]).

pub mod url;

use reqwest::{Client, StatusCode, header};
use std::time::{Duration, Instant};

pub use self::url::{SourceUrls, UrlError};

use ::url::Url;
use ladderboard_core::{AppConfig, Error};

/// Configuration for the fetch client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string (default: desktop Chrome)
    pub user_agent: String,

    /// Request timeout (default: 30s)
    pub timeout: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        let app = AppConfig::default();
        Self { user_agent: app.user_agent.clone(), timeout: app.timeout() }
    }
}

impl From<&AppConfig> for FetchConfig {
    fn from(config: &AppConfig) -> Self {
        Self { user_agent: config.user_agent.clone(), timeout: config.timeout() }
    }
}

/// Response from a fetch operation.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// The URL requested
    pub url: Url,
    /// HTTP status code
    pub status: StatusCode,
    /// Content-Type header
    pub content_type: Option<String>,
    /// Decoded response body
    pub body: String,
    /// Time taken to fetch in milliseconds
    pub fetch_ms: u64,
}

/// Anything that can turn a URL into page markup.
///
/// The aggregator and scraper depend on this rather than on `FetchClient`
/// so a canned source can stand in for the network.
#[async_trait::async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch the markup at `url`.
    async fn fetch_page(&self, url: &Url) -> Result<String, Error>;
}

/// HTTP fetch client.
pub struct FetchClient {
    http: Client,
    config: FetchConfig,
}

impl FetchClient {
    /// Create a new fetch client with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        if config.user_agent.trim().is_empty() {
            return Err(Error::InvalidInput("user agent cannot be empty".into()));
        }

        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::HttpError(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    /// Fetch a URL, returning the decoded body and metadata.
    pub async fn fetch(&self, url: &Url) -> Result<FetchResponse, Error> {
        let start = Instant::now();

        let response = self
            .http
            .get(url.as_str())
            .header(header::ACCEPT, "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
            .header(header::ACCEPT_LANGUAGE, "en-AU,en;q=0.9")
            .send()
            .await
            .map_err(|e| transport_error(url, e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(Error::HttpError(format!("{} returned status {}", url, status.as_u16())));
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let body = response.text().await.map_err(|e| transport_error(url, e))?;

        let fetch_ms = start.elapsed().as_millis() as u64;

        tracing::debug!("fetched {} in {}ms ({} bytes)", url, fetch_ms, body.len());

        Ok(FetchResponse { url: url.clone(), status, content_type, body, fetch_ms })
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }
}

#[async_trait::async_trait]
impl PageSource for FetchClient {
    async fn fetch_page(&self, url: &Url) -> Result<String, Error> {
        self.fetch(url).await.map(|response| response.body)
    }
}

fn transport_error(url: &Url, err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::FetchTimeout(format!("{}: {}", url, err))
    } else {
        Error::HttpError(format!("network error for {}: {}", url, err))
    }
}
