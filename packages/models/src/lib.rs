#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Core data types for the weather report pipeline.
//!
//! An uploaded itinerary CSV is parsed into [`ItineraryRow`]s — loose maps
//! of column name to cell text, so unknown columns survive the round trip
//! untouched. Enrichment attaches resolved temperatures, producing
//! [`EnrichedRow`]s. Cache addressing uses [`CoordinateKey`]s derived from
//! the verbatim latitude/longitude cell text.

use std::fmt;

use serde::Serialize;

/// Well-known column names from the itinerary CSV format.
///
/// Uploads are not validated against this list — any column is carried
/// through to the output — but the enrichment pipeline needs these four to
/// resolve weather.
pub mod columns {
    /// Origin airport latitude (decimal degrees, verbatim cell text).
    pub const ORIGIN_LATITUDE: &str = "origin_latitude";
    /// Origin airport longitude.
    pub const ORIGIN_LONGITUDE: &str = "origin_longitude";
    /// Destination airport latitude.
    pub const DESTINATION_LATITUDE: &str = "destination_latitude";
    /// Destination airport longitude.
    pub const DESTINATION_LONGITUDE: &str = "destination_longitude";
}

/// A latitude/longitude pair carried as the verbatim cell text from the
/// upload.
///
/// Coordinates are deliberately **not** parsed or normalized: the external
/// weather API accepts them as query-string text, and the cache key must
/// treat textually distinct representations (`40.7` vs `40.70`) as distinct
/// locations, matching the upstream contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinatePair {
    /// Latitude cell text.
    pub latitude: String,
    /// Longitude cell text.
    pub longitude: String,
}

impl CoordinatePair {
    /// Derives the cache key for this pair.
    #[must_use]
    pub fn cache_key(&self) -> CoordinateKey {
        CoordinateKey(format!("{}-{}", self.latitude, self.longitude))
    }
}

/// Cache address for a weather lookup: `"{lat}-{lon}"` from the verbatim
/// cell text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CoordinateKey(String);

impl CoordinateKey {
    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CoordinateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One parsed itinerary record: every CSV column keyed by its trimmed
/// header name, cell values as strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItineraryRow {
    /// Column name -> cell text, in header order.
    #[serde(flatten)]
    fields: serde_json::Map<String, serde_json::Value>,
}

impl ItineraryRow {
    /// Wraps an already-built column map.
    #[must_use]
    pub fn new(fields: serde_json::Map<String, serde_json::Value>) -> Self {
        Self { fields }
    }

    /// Returns the cell text for `column`, if present and non-empty.
    #[must_use]
    pub fn field(&self, column: &str) -> Option<&str> {
        self.fields
            .get(column)
            .and_then(serde_json::Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Origin coordinates, if both columns are present and non-empty.
    #[must_use]
    pub fn origin(&self) -> Option<CoordinatePair> {
        self.coordinate_pair(columns::ORIGIN_LATITUDE, columns::ORIGIN_LONGITUDE)
    }

    /// Destination coordinates, if both columns are present and non-empty.
    #[must_use]
    pub fn destination(&self) -> Option<CoordinatePair> {
        self.coordinate_pair(columns::DESTINATION_LATITUDE, columns::DESTINATION_LONGITUDE)
    }

    fn coordinate_pair(&self, lat_column: &str, lon_column: &str) -> Option<CoordinatePair> {
        Some(CoordinatePair {
            latitude: self.field(lat_column)?.to_owned(),
            longitude: self.field(lon_column)?.to_owned(),
        })
    }

    /// Consumes the row, returning the underlying column map.
    #[must_use]
    pub fn into_fields(self) -> serde_json::Map<String, serde_json::Value> {
        self.fields
    }

    /// Borrows the underlying column map.
    #[must_use]
    pub const fn fields(&self) -> &serde_json::Map<String, serde_json::Value> {
        &self.fields
    }
}

/// An itinerary row with its resolved temperatures attached.
///
/// A `None` temperature means the lookup for that side failed (or the row
/// had no coordinates for that side); the row itself is always kept.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedRow {
    /// The original row, untouched.
    pub row: ItineraryRow,
    /// Current temperature at the origin, degrees Celsius.
    pub origin_weather: Option<f64>,
    /// Current temperature at the destination, degrees Celsius.
    pub destination_weather: Option<f64>,
}
