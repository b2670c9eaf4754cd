//! Shared test doubles for the enrichment pipeline.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use weather_report_lookup::{WeatherError, WeatherLookup};
use weather_report_models::ItineraryRow;

/// In-memory [`WeatherLookup`] with a fixed temperature table, optional
/// per-coordinate failures, an optional artificial delay, and a call
/// counter.
pub struct StubLookup {
    temperatures: BTreeMap<(String, String), f64>,
    failures: BTreeSet<(String, String)>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl StubLookup {
    pub fn new() -> Self {
        Self {
            temperatures: BTreeMap::new(),
            failures: BTreeSet::new(),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_temperature(mut self, lat: &str, lon: &str, celsius: f64) -> Self {
        self.temperatures
            .insert((lat.to_owned(), lon.to_owned()), celsius);
        self
    }

    pub fn failing_for(mut self, lat: &str, lon: &str) -> Self {
        self.failures.insert((lat.to_owned(), lon.to_owned()));
        self
    }

    /// Delays every lookup, keeping first-time fetches in flight long
    /// enough for concurrent callers to overlap.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WeatherLookup for StubLookup {
    async fn current_temperature(
        &self,
        latitude: &str,
        longitude: &str,
    ) -> Result<f64, WeatherError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let key = (latitude.to_owned(), longitude.to_owned());
        if self.failures.contains(&key) {
            return Err(WeatherError::Parse {
                message: format!("stubbed failure for ({latitude}, {longitude})"),
            });
        }

        self.temperatures
            .get(&key)
            .copied()
            .ok_or_else(|| WeatherError::Parse {
                message: format!("no stubbed temperature for ({latitude}, {longitude})"),
            })
    }
}

/// Builds a row with the four coordinate columns plus some flight metadata.
pub fn itinerary_row(
    origin_lat: &str,
    origin_lon: &str,
    dest_lat: &str,
    dest_lon: &str,
) -> ItineraryRow {
    let mut fields = serde_json::Map::new();
    for (column, value) in [
        ("airline", "AA"),
        ("flight_num", "100"),
        ("origin_latitude", origin_lat),
        ("origin_longitude", origin_lon),
        ("destination_latitude", dest_lat),
        ("destination_longitude", dest_lon),
    ] {
        fields.insert(
            column.to_owned(),
            serde_json::Value::String(value.to_owned()),
        );
    }
    ItineraryRow::new(fields)
}
