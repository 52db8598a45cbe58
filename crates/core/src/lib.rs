//! Core types and shared functionality for ladderboard.
//!
//! This crate provides:
//! - Ladder and fixture records plus the artifact vocabulary
//! - Two-tier competition store (TTL memory cache over durable JSON files)
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod model;

pub use cache::{CompetitionStore, MemoryCache, TtlCache};
pub use config::{AppConfig, CompetitionConfig, ConfigError};
pub use error::Error;
pub use model::{Artifact, ArtifactKind, Fixture, LadderEntry, validate_date_format};
