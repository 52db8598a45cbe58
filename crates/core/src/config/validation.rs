//! Configuration validation rules.
//!
//! This module provides sanitizing and validation logic for `AppConfig`
//! values after they have been loaded from environment, files, or defaults.

use std::collections::HashSet;

use crate::config::AppConfig;
use crate::model::{validate_competition_id, validate_date_format};
use thiserror::Error;

/// Smallest accepted memory cache TTL.
pub const MIN_CACHE_DURATION_SECS: u64 = 60;

/// Smallest accepted scheduler interval.
pub const MIN_REFRESH_INTERVAL_SECS: u64 = 300;

/// Upper bound on rounds per competition.
pub const MAX_ROUNDS_LIMIT: u32 = 60;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

impl AppConfig {
    /// Raise out-of-range values that are corrected rather than rejected.
    ///
    /// `cache_duration_secs` below 60 becomes 60.
    pub fn sanitize(&mut self) {
        if self.cache_duration_secs < MIN_CACHE_DURATION_SECS {
            tracing::warn!(
                configured = self.cache_duration_secs,
                applied = MIN_CACHE_DURATION_SECS,
                "cache_duration_secs below floor; raising"
            );
            self.cache_duration_secs = MIN_CACHE_DURATION_SECS;
        }

        if let Some(secs) = self.refresh_interval_secs
            && secs < MIN_REFRESH_INTERVAL_SECS
        {
            tracing::warn!(
                configured = secs,
                applied = MIN_REFRESH_INTERVAL_SECS,
                "refresh_interval_secs below floor; raising"
            );
            self.refresh_interval_secs = Some(MIN_REFRESH_INTERVAL_SECS);
        }
    }

    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `user_agent` is empty
    /// - `max_rounds` is 0 or above 60
    /// - a URL template is not http(s) or lacks a placeholder
    /// - `display_timezone` is not a known IANA zone
    /// - a competition id is malformed or duplicated
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        if self.max_rounds == 0 || self.max_rounds > MAX_ROUNDS_LIMIT {
            return Err(ConfigError::Invalid {
                field: "max_rounds".into(),
                reason: format!("must be between 1 and {MAX_ROUNDS_LIMIT}"),
            });
        }

        validate_template("ladder_url_template", &self.ladder_url_template, &["{competition}"])?;
        validate_template("round_url_template", &self.round_url_template, &["{competition}", "{round}"])?;

        if self.display_timezone.parse::<chrono_tz::Tz>().is_err() {
            return Err(ConfigError::Invalid {
                field: "display_timezone".into(),
                reason: format!("unknown timezone {:?}", self.display_timezone),
            });
        }

        validate_date_format(&self.date_format)
            .map_err(|e| ConfigError::Invalid { field: "date_format".into(), reason: e.to_string() })?;

        let mut seen = HashSet::new();
        for competition in &self.competitions {
            validate_competition_id(&competition.id).map_err(|e| ConfigError::Invalid {
                field: "competitions".into(),
                reason: e.to_string(),
            })?;
            if !seen.insert(competition.id.as_str()) {
                return Err(ConfigError::Invalid {
                    field: "competitions".into(),
                    reason: format!("duplicate competition id {:?}", competition.id),
                });
            }
            if let Some(rounds) = competition.max_rounds
                && (rounds == 0 || rounds > MAX_ROUNDS_LIMIT)
            {
                return Err(ConfigError::Invalid {
                    field: "competitions".into(),
                    reason: format!("{}: max_rounds must be between 1 and {MAX_ROUNDS_LIMIT}", competition.id),
                });
            }
        }

        if self.refresh_interval_secs.is_some() && self.competitions.is_empty() {
            tracing::warn!("refresh_interval_secs is set but no competitions are configured");
        }

        Ok(())
    }
}

fn validate_template(field: &str, template: &str, placeholders: &[&str]) -> Result<(), ConfigError> {
    if !(template.starts_with("http://") || template.starts_with("https://")) {
        return Err(ConfigError::Invalid { field: field.into(), reason: "must be an http(s) URL".into() });
    }
    for placeholder in placeholders {
        if !template.contains(placeholder) {
            return Err(ConfigError::Invalid { field: field.into(), reason: format!("must contain {placeholder}") });
        }
    }
    Ok(())
}
