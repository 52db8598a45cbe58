//! Unified error types for ladderboard.

use rmcp::model::{ErrorCode, ErrorData as McpError};

/// Unified error types for the ladderboard crates.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., malformed competition id).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Invalid URL or URL template.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// HTTP error response or transport failure.
    #[error("HTTP_ERROR: {0}")]
    HttpError(String),

    /// Fetch timeout.
    #[error("FETCH_TIMEOUT: {0}")]
    FetchTimeout(String),

    /// Every requested round came back empty.
    #[error("NO_FIXTURES: {0}")]
    NoFixtures(String),

    /// No cached or persisted artifact exists yet.
    #[error("ARTIFACT_UNAVAILABLE: {0}")]
    Unavailable(String),

    /// Reading or writing a durable artifact file failed.
    #[error("STORE_IO: {0}")]
    StoreIo(String),

    /// A durable artifact file could not be encoded or decoded.
    #[error("STORE_DECODE: {0}")]
    StoreDecode(String),

    /// Configuration could not be loaded or is invalid.
    #[error("CONFIG_ERROR: {0}")]
    Config(String),
}

impl From<crate::config::ConfigError> for Error {
    fn from(err: crate::config::ConfigError) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let (code, message) = match &err {
            Error::InvalidInput(msg) => (-32602, msg.clone()),
            Error::InvalidUrl(msg) => (-32003, msg.clone()),
            Error::HttpError(msg) => (-32008, msg.clone()),
            Error::FetchTimeout(msg) => (-32006, msg.clone()),
            Error::NoFixtures(msg) => (-32013, msg.clone()),
            Error::Unavailable(msg) => (-32001, msg.clone()),
            Error::StoreIo(msg) => (-32002, msg.clone()),
            Error::StoreDecode(msg) => (-32002, msg.clone()),
            Error::Config(msg) => (-32014, msg.clone()),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Unavailable("ladder for u12-girls".to_string());
        assert!(err.to_string().contains("ARTIFACT_UNAVAILABLE"));
        assert!(err.to_string().contains("u12-girls"));
    }

    #[test]
    fn test_error_to_mcp_error() {
        let err = Error::Unavailable("ladder".to_string());
        let mcp_err: McpError = err.into();
        assert_eq!(mcp_err.code.0, -32001);

        let err = Error::InvalidInput("bad id".to_string());
        let mcp_err: McpError = err.into();
        assert_eq!(mcp_err.code.0, -32602);
    }

    #[test]
    fn test_config_error_conversion() {
        let err: Error = crate::config::ConfigError::LoadFailed("boom".into()).into();
        assert!(matches!(err, Error::Config(msg) if msg.contains("boom")));
    }
}
