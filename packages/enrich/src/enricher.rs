//! Per-row weather resolution.
//!
//! Resolves the origin and destination temperatures for one itinerary row,
//! consulting the shared cache before going to the network. The two sides
//! are independent and run concurrently.

use std::sync::Arc;

use weather_report_cache::TemperatureCache;
use weather_report_lookup::WeatherLookup;
use weather_report_models::{CoordinatePair, EnrichedRow, ItineraryRow};

/// Resolves temperatures for itinerary rows.
///
/// Cloneable by `Arc` into per-row tasks. Never fails: a lookup error is
/// logged and leaves that side's temperature absent, so the row is always
/// kept.
pub struct RowEnricher {
    lookup: Arc<dyn WeatherLookup>,
    cache: Arc<TemperatureCache>,
}

impl RowEnricher {
    /// Creates an enricher over the given lookup client and shared cache.
    #[must_use]
    pub fn new(lookup: Arc<dyn WeatherLookup>, cache: Arc<TemperatureCache>) -> Self {
        Self { lookup, cache }
    }

    /// Attaches resolved temperatures to `row`.
    ///
    /// Origin and destination lookups run concurrently. A row without
    /// coordinates for a side simply skips that side.
    pub async fn enrich(&self, row: ItineraryRow) -> EnrichedRow {
        let (origin_weather, destination_weather) = tokio::join!(
            self.resolve(row.origin(), "origin"),
            self.resolve(row.destination(), "destination"),
        );

        EnrichedRow {
            row,
            origin_weather,
            destination_weather,
        }
    }

    /// Resolves one side's temperature via cache or network.
    ///
    /// The cache only answers for *completed* fetches: two rows racing on
    /// the same cold key will both go to the network, and the later
    /// completion overwrites the earlier one.
    async fn resolve(&self, pair: Option<CoordinatePair>, side: &str) -> Option<f64> {
        let pair = pair?;
        let key = pair.cache_key();

        if let Some(cached) = self.cache.get(&key) {
            log::debug!("Cache hit for {side} '{key}': {cached}°C");
            return Some(cached);
        }

        match self
            .lookup
            .current_temperature(&pair.latitude, &pair.longitude)
            .await
        {
            Ok(temperature) => {
                self.cache.set(key, temperature);
                Some(temperature)
            }
            Err(e) => {
                log::warn!("Weather lookup failed for {side} '{key}': {e}");
                None
            }
        }
    }
}
