//! Fixture date/time normalization.
//!
//! Upstream publishes dates and kickoff times as local Melbourne text in a
//! handful of layouts. This module interprets them in that zone, converts to
//! the configured display zone and renders with a caller-supplied format.
//! Anything unparseable is passed through untouched.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use chrono_tz::Tz;
use ladderboard_core::{AppConfig, Error};
use std::fmt::Write;

/// Timezone all upstream dates are published in.
pub const SOURCE_TIMEZONE: Tz = chrono_tz::Australia::Melbourne;

/// Date-and-time layouts, tried in order after normalization.
///
/// Two-digit years come first: `%Y` would happily read "25" as year 25.
const DATETIME_FORMATS: &[&str] = &[
    "%d/%m/%y %H:%M",
    "%d/%m/%y %I:%M %p",
    "%d/%m/%Y %H:%M",
    "%d/%m/%Y %I:%M %p",
    "%d/%m/%Y %I:%M%p",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %I:%M %p",
    "%a %d %b %Y %I:%M %p",
    "%a %d %b %Y %I:%M%p",
    "%a %d %b %Y %H:%M",
    "%d %b %Y %I:%M %p",
    "%d %b %Y %I:%M%p",
    "%d %b %Y %H:%M",
];

/// Date-only layouts; the time defaults to midnight.
const DATE_FORMATS: &[&str] = &["%d/%m/%y", "%d/%m/%Y", "%Y-%m-%d", "%a %d %b %Y", "%d %b %Y"];

/// Interpret upstream date and optional time text as a Melbourne instant.
///
/// When the combined text does not parse, the date alone is tried so that a
/// placeholder time such as "TBC" still yields a day.
pub fn parse_source_datetime(date: &str, time: Option<&str>) -> Option<DateTime<Tz>> {
    let date = normalize(date);
    let time = time.map(normalize).filter(|t| !t.is_empty());

    let naive = match &time {
        Some(time) => parse_naive(&format!("{date} {time}")).or_else(|| parse_naive(&date)),
        None => parse_naive(&date),
    }?;

    SOURCE_TIMEZONE.from_local_datetime(&naive).earliest()
}

fn parse_naive(text: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

/// Drop commas, ordinal suffixes and extra whitespace.
fn normalize(text: &str) -> String {
    text.replace(',', " ")
        .split_whitespace()
        .map(strip_ordinal)
        .collect::<Vec<_>>()
        .join(" ")
}

fn strip_ordinal(word: &str) -> &str {
    for suffix in ["st", "nd", "rd", "th"] {
        if let Some(digits) = word.strip_suffix(suffix)
            && !digits.is_empty()
            && digits.chars().all(|c| c.is_ascii_digit())
        {
            return digits;
        }
    }
    word
}

/// Renders upstream date/time text in the display timezone.
#[derive(Debug, Clone, Copy)]
pub struct DateTimeNormalizer {
    display: Tz,
}

impl DateTimeNormalizer {
    pub fn new(display: Tz) -> Self {
        Self { display }
    }

    /// Build from the configured `display_timezone`.
    pub fn from_config(config: &AppConfig) -> Result<Self, Error> {
        let display = config
            .display_timezone
            .parse::<Tz>()
            .map_err(|e| Error::Config(format!("display_timezone: {e}")))?;
        Ok(Self::new(display))
    }

    pub fn display_timezone(&self) -> Tz {
        self.display
    }

    /// Render `date` + `time` with `format` in the display timezone.
    ///
    /// Never fails: when the text cannot be parsed, or `format` holds a
    /// specifier chrono cannot render, the original text (date and time
    /// joined by a space) is returned and the failure is logged.
    pub fn format(&self, date: &str, time: Option<&str>, format: &str) -> String {
        let original = match time.map(str::trim).filter(|t| !t.is_empty()) {
            Some(time) => format!("{} {}", date.trim(), time),
            None => date.trim().to_string(),
        };

        let Some(parsed) = parse_combined(date, time) else {
            tracing::warn!("could not parse fixture date/time {:?}; showing as published", original);
            return original;
        };

        let mut rendered = String::new();
        if write!(rendered, "{}", parsed.with_timezone(&self.display).format(format)).is_err() {
            tracing::warn!("invalid date format {:?}; showing {:?} as published", format, original);
            return original;
        }
        rendered
    }
}

/// Strict variant for rendering: a bad time must not silently become midnight.
fn parse_combined(date: &str, time: Option<&str>) -> Option<DateTime<Tz>> {
    let date = normalize(date);
    let text = match time.map(normalize).filter(|t| !t.is_empty()) {
        Some(time) => format!("{date} {time}"),
        None => date,
    };
    SOURCE_TIMEZONE.from_local_datetime(&parse_naive(&text)?).earliest()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn utc() -> DateTimeNormalizer {
        DateTimeNormalizer::new(chrono_tz::UTC)
    }

    #[test]
    fn test_format_converts_to_display_zone() {
        // 12 April 2025 is after daylight saving ends, so Melbourne is UTC+10
        assert_eq!(utc().format("Sat 12 Apr 2025", Some("2:10 PM"), "%Y-%m-%d %H:%M"), "2025-04-12 04:10");

        let perth = DateTimeNormalizer::new(chrono_tz::Australia::Perth);
        assert_eq!(perth.format("Sat 12 Apr 2025", Some("2:10 PM"), "%Y-%m-%d %H:%M"), "2025-04-12 12:10");
    }

    #[test]
    fn test_format_daylight_saving() {
        // January is AEDT, UTC+11
        assert_eq!(utc().format("15/01/2025", Some("19:30"), "%d/%m %H:%M"), "15/01 08:30");
    }

    #[test]
    fn test_format_same_zone() {
        let melbourne = DateTimeNormalizer::new(SOURCE_TIMEZONE);
        assert_eq!(
            melbourne.format("Saturday, 12th April 2025", Some("2:10pm"), "%a %-d %b %-I:%M %p"),
            "Sat 12 Apr 2:10 PM"
        );
    }

    #[test]
    fn test_format_date_only() {
        let melbourne = DateTimeNormalizer::new(SOURCE_TIMEZONE);
        assert_eq!(melbourne.format("2025-04-12", None, "%d/%m/%Y"), "12/04/2025");
    }

    #[test]
    fn test_format_passthrough_on_failure() {
        assert_eq!(utc().format("TBC", Some("TBA"), "%H:%M"), "TBC TBA");
        assert_eq!(utc().format("Round 4 - date to be confirmed", None, "%H:%M"), "Round 4 - date to be confirmed");
        assert_eq!(utc().format("Sat 12 Apr 2025", Some("TBC"), "%H:%M"), "Sat 12 Apr 2025 TBC");
    }

    #[test]
    fn test_format_unknown_specifier_passes_through() {
        assert_eq!(utc().format("Sat 12 Apr 2025", Some("2:10 PM"), "%Q %H:%M"), "Sat 12 Apr 2025 2:10 PM");
        assert_eq!(utc().format("2025-04-12", None, "%"), "2025-04-12");
    }

    #[test]
    fn test_parse_source_datetime_falls_back_to_date() {
        let parsed = parse_source_datetime("Sat 12 Apr 2025", Some("TBC")).unwrap();
        assert_eq!(parsed.with_timezone(&Utc).to_rfc3339(), "2025-04-11T14:00:00+00:00");
    }

    #[test]
    fn test_parse_source_datetime_unparsable() {
        assert!(parse_source_datetime("TBC", None).is_none());
        assert!(parse_source_datetime("", Some("")).is_none());
    }

    #[test]
    fn test_strip_ordinal() {
        assert_eq!(normalize("Sunday,  1st   June"), "Sunday 1 June");
        assert_eq!(strip_ordinal("August"), "August");
        assert_eq!(strip_ordinal("th"), "th");
    }

    #[test]
    fn test_from_config() {
        let config = AppConfig { display_timezone: "Australia/Brisbane".into(), ..Default::default() };
        let normalizer = DateTimeNormalizer::from_config(&config).unwrap();
        assert_eq!(normalizer.display_timezone(), chrono_tz::Australia::Brisbane);

        let config = AppConfig { display_timezone: "Nowhere/Atlantis".into(), ..Default::default() };
        assert!(matches!(DateTimeNormalizer::from_config(&config), Err(Error::Config(_))));
    }
}
