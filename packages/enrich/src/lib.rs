#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Row-enrichment pipeline.
//!
//! The [`processor::StreamProcessor`] parses an uploaded itinerary CSV
//! row-by-row, launches one [`enricher::RowEnricher`] task per row, and
//! resolves with the full collection once every task has settled
//! (join-all). The enricher resolves origin and destination temperatures
//! concurrently through the shared [`weather_report_cache::TemperatureCache`]
//! and the [`weather_report_lookup::WeatherLookup`] client.
//!
//! A single row's lookup failure never fails the request — the field is
//! left absent. Only a broken input stream is fatal.

pub mod enricher;
pub mod processor;

#[cfg(test)]
mod support;

use thiserror::Error;

/// Errors fatal to an entire upload: the input could not be read or
/// parsed, or an enrichment task was lost. No partial result is produced.
#[derive(Debug, Error)]
pub enum StreamError {
    /// CSV parsing failed (malformed record, bad encoding).
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Reading the input stream failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The input had no usable header row.
    #[error("Parse error: {0}")]
    Parse(String),

    /// An enrichment task panicked or was cancelled.
    #[error("Enrichment task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
