//! Source page URLs built from configured templates.

use ladderboard_core::model::validate_competition_id;
use ladderboard_core::{AppConfig, Error};

/// Error type for URL construction failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UrlError {
    #[error("template {template:?} is missing {placeholder}")]
    MissingPlaceholder { template: String, placeholder: &'static str },

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

impl From<UrlError> for Error {
    fn from(err: UrlError) -> Self {
        Error::InvalidUrl(err.to_string())
    }
}

/// Ladder and round page URL templates.
///
/// `{competition}` is replaced with the competition id and `{round}` with
/// the 1-based round number.
#[derive(Debug, Clone)]
pub struct SourceUrls {
    ladder_template: String,
    round_template: String,
}

impl SourceUrls {
    /// Create from explicit templates, checking placeholders up front.
    pub fn new(ladder_template: impl Into<String>, round_template: impl Into<String>) -> Result<Self, UrlError> {
        let ladder_template = ladder_template.into();
        let round_template = round_template.into();

        require_placeholder(&ladder_template, "{competition}")?;
        require_placeholder(&round_template, "{competition}")?;
        require_placeholder(&round_template, "{round}")?;

        Ok(Self { ladder_template, round_template })
    }

    /// Create from the application configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self, UrlError> {
        Self::new(config.ladder_url_template.clone(), config.round_url_template.clone())
    }

    /// Ladder page for a competition.
    pub fn ladder_url(&self, competition_id: &str) -> Result<url::Url, Error> {
        validate_competition_id(competition_id)?;
        Ok(build(&self.ladder_template.replace("{competition}", competition_id))?)
    }

    /// Fixture page for one round of a competition.
    pub fn round_url(&self, competition_id: &str, round: u32) -> Result<url::Url, Error> {
        validate_competition_id(competition_id)?;
        let raw = self
            .round_template
            .replace("{competition}", competition_id)
            .replace("{round}", &round.to_string());
        Ok(build(&raw)?)
    }
}

fn require_placeholder(template: &str, placeholder: &'static str) -> Result<(), UrlError> {
    if template.contains(placeholder) {
        Ok(())
    } else {
        Err(UrlError::MissingPlaceholder { template: template.to_string(), placeholder })
    }
}

fn build(raw: &str) -> Result<url::Url, UrlError> {
    let parsed = url::Url::parse(raw.trim()).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(UrlError::UnsupportedScheme(scheme.to_string())),
    }
}
