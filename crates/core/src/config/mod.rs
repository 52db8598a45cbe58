//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (LADDERBOARD_*)
//! 2. TOML config file (if LADDERBOARD_CONFIG_FILE set)
//! 3. Built-in defaults
//!
//! The loaded `AppConfig` is passed explicitly into the store, fetcher and
//! aggregator; nothing in the core reads process-wide settings on its own.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::{ConfigError, MAX_ROUNDS_LIMIT, MIN_CACHE_DURATION_SECS, MIN_REFRESH_INTERVAL_SECS};

/// A competition the administrator has asked to track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct CompetitionConfig {
    /// Opaque upstream competition identifier.
    pub id: String,

    /// Friendly display name.
    pub name: String,

    /// Round count to scrape; falls back to `AppConfig::max_rounds`.
    #[serde(default)]
    pub max_rounds: Option<u32>,
}

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (LADDERBOARD_*)
/// 2. TOML config file (if LADDERBOARD_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory holding the durable `{type}-{id}.json` artifact files.
    ///
    /// Set via LADDERBOARD_DATA_DIR environment variable.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via LADDERBOARD_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via LADDERBOARD_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Memory cache time-to-live in seconds, shared by every artifact.
    ///
    /// Set via LADDERBOARD_CACHE_DURATION_SECS environment variable.
    /// Values below 60 are raised to 60.
    #[serde(default = "default_cache_duration_secs")]
    pub cache_duration_secs: u64,

    /// Delay between consecutive round fetches in milliseconds.
    ///
    /// Set via LADDERBOARD_ROUND_PACING_MS environment variable.
    #[serde(default = "default_round_pacing_ms")]
    pub round_pacing_ms: u64,

    /// Default number of rounds to scrape per competition.
    ///
    /// Set via LADDERBOARD_MAX_ROUNDS environment variable.
    #[serde(default = "default_max_rounds")]
    pub max_rounds: u32,

    /// Ladder page URL with a `{competition}` placeholder.
    #[serde(default = "default_ladder_url_template")]
    pub ladder_url_template: String,

    /// Round fixture page URL with `{competition}` and `{round}` placeholders.
    #[serde(default = "default_round_url_template")]
    pub round_url_template: String,

    /// IANA timezone used when rendering fixture times.
    ///
    /// Set via LADDERBOARD_DISPLAY_TIMEZONE environment variable.
    #[serde(default = "default_display_timezone")]
    pub display_timezone: String,

    /// Default strftime-style format for rendered kickoff times.
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Competitions to scrape on schedule and list to clients.
    #[serde(default)]
    pub competitions: Vec<CompetitionConfig>,

    /// Re-scrape interval for the built-in scheduler; disabled when unset.
    ///
    /// Set via LADDERBOARD_REFRESH_INTERVAL_SECS environment variable.
    #[serde(default)]
    pub refresh_interval_secs: Option<u64>,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./ladderboard-data")
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36"
        .into()
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_cache_duration_secs() -> u64 {
    3600
}

fn default_round_pacing_ms() -> u64 {
    500
}

fn default_max_rounds() -> u32 {
    18
}

fn default_ladder_url_template() -> String {
    "https://www.example-results.com.au/competitions/{competition}/ladder".into()
}

fn default_round_url_template() -> String {
    "https://www.example-results.com.au/competitions/{competition}/fixture?round={round}".into()
}

fn default_display_timezone() -> String {
    "Australia/Melbourne".into()
}

fn default_date_format() -> String {
    "%a %-d %b %Y, %-I:%M %p".into()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            cache_duration_secs: default_cache_duration_secs(),
            round_pacing_ms: default_round_pacing_ms(),
            max_rounds: default_max_rounds(),
            ladder_url_template: default_ladder_url_template(),
            round_url_template: default_round_url_template(),
            display_timezone: default_display_timezone(),
            date_format: default_date_format(),
            competitions: Vec::new(),
            refresh_interval_secs: None,
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Memory cache TTL, never below the 60 second floor.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_duration_secs.max(MIN_CACHE_DURATION_SECS))
    }

    /// Pacing delay between round fetches.
    pub fn round_pacing(&self) -> Duration {
        Duration::from_millis(self.round_pacing_ms)
    }

    /// Scheduler interval, if the scheduler is enabled.
    pub fn refresh_interval(&self) -> Option<Duration> {
        self.refresh_interval_secs
            .map(|secs| Duration::from_secs(secs.max(MIN_REFRESH_INTERVAL_SECS)))
    }

    /// Look up a configured competition by id.
    pub fn competition(&self, id: &str) -> Option<&CompetitionConfig> {
        self.competitions.iter().find(|c| c.id == id)
    }

    /// Round count for a competition, honoring its override.
    pub fn rounds_for(&self, id: &str) -> u32 {
        self.competition(id)
            .and_then(|c| c.max_rounds)
            .unwrap_or(self.max_rounds)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `LADDERBOARD_`
    /// 2. TOML file from `LADDERBOARD_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("LADDERBOARD_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("LADDERBOARD_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let mut config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.sanitize();
        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("./ladderboard-data"));
        assert!(config.user_agent.starts_with("Mozilla/5.0"));
        assert_eq!(config.timeout_ms, 30_000);
        assert_eq!(config.cache_duration_secs, 3600);
        assert_eq!(config.round_pacing_ms, 500);
        assert_eq!(config.max_rounds, 18);
        assert_eq!(config.display_timezone, "Australia/Melbourne");
        assert!(config.competitions.is_empty());
        assert!(config.refresh_interval_secs.is_none());
    }

    #[test]
    fn test_durations() {
        let config = AppConfig::default();
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.cache_ttl(), Duration::from_secs(3600));
        assert_eq!(config.round_pacing(), Duration::from_millis(500));
        assert!(config.refresh_interval().is_none());
    }

    #[test]
    fn test_cache_ttl_floor() {
        let config = AppConfig { cache_duration_secs: 30, ..Default::default() };
        assert_eq!(config.cache_ttl(), Duration::from_secs(60));
    }

    #[test]
    fn test_refresh_interval_floor() {
        let config = AppConfig { refresh_interval_secs: Some(10), ..Default::default() };
        assert_eq!(config.refresh_interval(), Some(Duration::from_secs(MIN_REFRESH_INTERVAL_SECS)));
    }

    #[test]
    fn test_rounds_for_override() {
        let config = AppConfig {
            competitions: vec![
                CompetitionConfig { id: "u12".into(), name: "Under 12".into(), max_rounds: Some(10) },
                CompetitionConfig { id: "open".into(), name: "Open".into(), max_rounds: None },
            ],
            ..Default::default()
        };
        assert_eq!(config.rounds_for("u12"), 10);
        assert_eq!(config.rounds_for("open"), 18);
        assert_eq!(config.rounds_for("unknown"), 18);
    }

    #[test]
    fn test_competition_from_toml() {
        let toml = r#"
            cache_duration_secs = 30

            [[competitions]]
            id = "u16-boys"
            name = "Under 16 Boys"
            max_rounds = 14
        "#;
        let mut config: AppConfig = Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::string(toml))
            .extract()
            .unwrap();
        config.sanitize();

        assert_eq!(config.cache_duration_secs, 60);
        assert_eq!(config.competitions.len(), 1);
        assert_eq!(config.competitions[0].max_rounds, Some(14));
        assert!(config.validate().is_ok());
    }
}
