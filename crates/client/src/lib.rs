//! Client code for ladderboard.
//!
//! This crate provides the ingestion pipeline: page fetching, ladder and
//! fixture table parsing, round aggregation, date/time normalization and
//! scrape orchestration into the competition store.

pub mod aggregate;
pub mod datetime;
pub mod fetch;
pub mod parse;
pub mod scrape;

pub use aggregate::{Classification, RESULTS_LIMIT, RoundAggregator, classify};
pub use datetime::{DateTimeNormalizer, SOURCE_TIMEZONE, parse_source_datetime};
pub use fetch::{FetchClient, FetchConfig, FetchResponse, PageSource, SourceUrls};
pub use parse::{parse_ladder, parse_round};
pub use scrape::{ScrapeReport, Scraper};
