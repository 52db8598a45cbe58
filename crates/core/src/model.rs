//! Ladder and fixture records and the artifact vocabulary.
//!
//! Field names here are the on-disk JSON keys of the durable artifact files,
//! so renaming a field is a file-format change.

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// One row of a ladder (standings) snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct LadderEntry {
    pub position: u32,
    pub team: String,
    pub played: u32,
    pub won: u32,
    pub lost: u32,
    pub drawn: u32,
    #[serde(rename = "for")]
    pub points_for: u32,
    pub against: u32,
    /// Upstream-formatted, not guaranteed numeric (e.g. "142.50%").
    pub percentage: String,
    pub points: i32,
}

/// A single scheduled or completed match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct Fixture {
    pub round: u32,
    /// Date text as published, in the source timezone.
    pub date: String,
    pub time: Option<String>,
    pub home_team: String,
    pub away_team: String,
    pub venue: Option<String>,
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_score: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub away_score: Option<u32>,
}

impl Fixture {
    /// Identity used for duplicate detection across round pages.
    pub fn identity(&self) -> (u32, &str, &str) {
        (self.round, self.home_team.as_str(), self.away_team.as_str())
    }
}

/// The four independently persisted data products of a competition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Ladder,
    Fixtures,
    Upcoming,
    Results,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 4] =
        [ArtifactKind::Ladder, ArtifactKind::Fixtures, ArtifactKind::Upcoming, ArtifactKind::Results];

    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::Ladder => "ladder",
            ArtifactKind::Fixtures => "fixtures",
            ArtifactKind::Upcoming => "upcoming",
            ArtifactKind::Results => "results",
        }
    }

    /// Durable file name, `{type}-{competition_id}.json`.
    pub fn file_name(&self, competition_id: &str) -> String {
        format!("{}-{}.json", self.as_str(), competition_id)
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArtifactKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ladder" => Ok(ArtifactKind::Ladder),
            "fixtures" => Ok(ArtifactKind::Fixtures),
            "upcoming" => Ok(ArtifactKind::Upcoming),
            "results" => Ok(ArtifactKind::Results),
            other => Err(Error::InvalidInput(format!("unknown artifact type: {other}"))),
        }
    }
}

/// An artifact payload as held by the memory cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Artifact {
    Ladder(Vec<LadderEntry>),
    Fixtures(Vec<Fixture>),
}

impl Artifact {
    pub fn len(&self) -> usize {
        match self {
            Artifact::Ladder(entries) => entries.len(),
            Artifact::Fixtures(fixtures) => fixtures.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Check that a competition id is safe to use as a file name and URL segment.
pub fn validate_competition_id(id: &str) -> Result<(), Error> {
    if id.is_empty() {
        return Err(Error::InvalidInput("competition id cannot be empty".into()));
    }
    if !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
        return Err(Error::InvalidInput(format!(
            "competition id {id:?} may only contain ASCII letters, digits, '-' and '_'"
        )));
    }
    Ok(())
}

/// Check that a strftime-style date format only uses specifiers chrono knows.
///
/// Rendering with an unknown specifier fails at display time, so formats are
/// checked before they reach the normalizer.
pub fn validate_date_format(format: &str) -> Result<(), Error> {
    if format.trim().is_empty() {
        return Err(Error::InvalidInput("date format cannot be empty".into()));
    }
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(Error::InvalidInput(format!("unsupported date format {format:?}")));
    }
    Ok(())
}
