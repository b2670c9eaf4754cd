//! Tabular stream processing: CSV in, enriched rows out.
//!
//! Parses the upload incrementally and launches one enrichment task per
//! row without waiting for earlier rows to finish. When the input ends,
//! waits for every outstanding task (join-all) and resolves with the
//! accumulated rows in completion order.

use std::sync::Arc;

use futures::future;
use futures::stream::{self, StreamExt as _};
use weather_report_models::{EnrichedRow, ItineraryRow};

use crate::StreamError;
use crate::enricher::RowEnricher;

/// Drives the upload-to-enriched-rows pipeline.
///
/// By default every parsed row's enrichment is in flight at once — a large
/// upload opens up to two outbound lookups per row simultaneously. That
/// matches the upstream contract; [`Self::with_max_in_flight`] is the
/// opt-in admission bound for callers that want one.
pub struct StreamProcessor {
    enricher: Arc<RowEnricher>,
    max_in_flight: Option<usize>,
}

impl StreamProcessor {
    /// Creates a processor with unbounded row fan-out.
    #[must_use]
    pub fn new(enricher: Arc<RowEnricher>) -> Self {
        Self {
            enricher,
            max_in_flight: None,
        }
    }

    /// Caps concurrent in-flight row enrichments at `limit` (must be at
    /// least 1).
    #[must_use]
    pub fn with_max_in_flight(mut self, limit: usize) -> Self {
        self.max_in_flight = Some(limit);
        self
    }

    /// Parses `input` as headed CSV and enriches every row.
    ///
    /// Resolves only after every enrichment task has settled; row order in
    /// the result is completion order, not input order. Individual lookup
    /// failures do not fail the operation — only an unreadable or
    /// malformed input stream does, in which case no partial result is
    /// produced.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError`] if the input cannot be parsed as CSV, has
    /// no header row, or an enrichment task is lost.
    pub async fn process<R: std::io::Read>(
        &self,
        input: R,
    ) -> Result<Vec<EnrichedRow>, StreamError> {
        match self.max_in_flight {
            None => self.process_unbounded(input).await,
            Some(limit) => self.process_bounded(input, limit).await,
        }
    }

    /// Spawns one task per row as soon as it parses, then joins all.
    async fn process_unbounded<R: std::io::Read>(
        &self,
        input: R,
    ) -> Result<Vec<EnrichedRow>, StreamError> {
        let mut reader = csv_reader(input);
        let headers = read_headers(&mut reader)?;

        let mut handles = Vec::new();
        for result in reader.records() {
            let record = result?;
            let row = row_from_record(&headers, &record);
            let enricher = Arc::clone(&self.enricher);
            handles.push(tokio::spawn(async move { enricher.enrich(row).await }));
        }

        log::debug!("Parsed {} rows, awaiting enrichment...", handles.len());

        let mut rows = Vec::with_capacity(handles.len());
        for outcome in future::join_all(handles).await {
            rows.push(outcome?);
        }

        log::info!("Enriched {} rows", rows.len());
        Ok(rows)
    }

    /// Parses the full input, then drives enrichments through a buffered
    /// stream so at most `limit` rows are in flight.
    async fn process_bounded<R: std::io::Read>(
        &self,
        input: R,
        limit: usize,
    ) -> Result<Vec<EnrichedRow>, StreamError> {
        let mut reader = csv_reader(input);
        let headers = read_headers(&mut reader)?;

        let mut parsed = Vec::new();
        for result in reader.records() {
            let record = result?;
            parsed.push(row_from_record(&headers, &record));
        }

        log::debug!(
            "Parsed {} rows, enriching with concurrency={limit}...",
            parsed.len()
        );

        let rows: Vec<EnrichedRow> = stream::iter(parsed.into_iter().map(|row| {
            let enricher = Arc::clone(&self.enricher);
            async move { enricher.enrich(row).await }
        }))
        .buffer_unordered(limit)
        .collect()
        .await;

        log::info!("Enriched {} rows", rows.len());
        Ok(rows)
    }
}

fn csv_reader<R: std::io::Read>(input: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new().flexible(true).from_reader(input)
}

fn read_headers<R: std::io::Read>(reader: &mut csv::Reader<R>) -> Result<Vec<String>, StreamError> {
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_owned())
        .collect();

    if headers.is_empty() {
        return Err(StreamError::Parse(
            "CSV input contains no header row".to_owned(),
        ));
    }

    Ok(headers)
}

/// Maps one CSV record to an [`ItineraryRow`] keyed by the header names.
///
/// Short records leave trailing columns empty; extra columns beyond the
/// header are dropped.
fn row_from_record(headers: &[String], record: &csv::StringRecord) -> ItineraryRow {
    let mut fields = serde_json::Map::new();
    for (i, header) in headers.iter().enumerate() {
        let value = record.get(i).unwrap_or("").trim().to_owned();
        fields.insert(header.clone(), serde_json::Value::String(value));
    }
    ItineraryRow::new(fields)
}
