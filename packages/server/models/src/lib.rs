#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API response types for the weather report server.
//!
//! These types are serialized to JSON for the REST API. The report
//! assembler lives here: it merges each enriched row's original columns
//! verbatim with the two resolved weather fields into the response shape
//! the browser table consumes.

use serde::Serialize;
use thiserror::Error;
use weather_report_models::EnrichedRow;

/// Column names reserved for the enrichment output; an upload carrying
/// them would produce ambiguous JSON.
const RESERVED_COLUMNS: [&str; 2] = ["originWeather", "destinationWeather"];

/// Assembly-time shape mismatch. Should not occur for well-formed
/// uploads; fatal to the request if it does.
#[derive(Debug, Error)]
pub enum AssembleError {
    /// The upload already contains a column the enrichment output would
    /// overwrite.
    #[error("Upload column '{column}' collides with an enrichment field")]
    ReservedColumn {
        /// The colliding column name.
        column: String,
    },
}

/// One itinerary leg in the API response: every uploaded column verbatim
/// plus the resolved temperatures.
#[derive(Debug, Clone, Serialize)]
pub struct ApiTicket {
    /// Original columns, untouched.
    #[serde(flatten)]
    fields: serde_json::Map<String, serde_json::Value>,
    /// Current temperature at the origin (°C); omitted when the lookup
    /// failed.
    #[serde(rename = "originWeather", skip_serializing_if = "Option::is_none")]
    pub origin_weather: Option<f64>,
    /// Current temperature at the destination (°C); omitted when the
    /// lookup failed.
    #[serde(
        rename = "destinationWeather",
        skip_serializing_if = "Option::is_none"
    )]
    pub destination_weather: Option<f64>,
}

impl TryFrom<EnrichedRow> for ApiTicket {
    type Error = AssembleError;

    fn try_from(enriched: EnrichedRow) -> Result<Self, Self::Error> {
        let fields = enriched.row.into_fields();

        for column in RESERVED_COLUMNS {
            if fields.contains_key(column) {
                return Err(AssembleError::ReservedColumn {
                    column: column.to_owned(),
                });
            }
        }

        Ok(Self {
            fields,
            origin_weather: enriched.origin_weather,
            destination_weather: enriched.destination_weather,
        })
    }
}

/// Response body for `POST /weather-report`.
#[derive(Debug, Clone, Serialize)]
pub struct WeatherReport {
    /// Enriched itinerary legs, in enrichment-completion order.
    pub report: Vec<ApiTicket>,
}

impl WeatherReport {
    /// Shapes the enriched rows into the API response.
    ///
    /// # Errors
    ///
    /// Returns [`AssembleError`] if any row's columns collide with the
    /// enrichment output fields.
    pub fn assemble(rows: Vec<EnrichedRow>) -> Result<Self, AssembleError> {
        let report = rows
            .into_iter()
            .map(ApiTicket::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { report })
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

#[cfg(test)]
mod tests {
    use weather_report_models::ItineraryRow;

    use super::*;

    fn enriched(
        pairs: &[(&str, &str)],
        origin: Option<f64>,
        destination: Option<f64>,
    ) -> EnrichedRow {
        let mut map = serde_json::Map::new();
        for (k, v) in pairs {
            map.insert((*k).to_owned(), serde_json::Value::String((*v).to_owned()));
        }
        EnrichedRow {
            row: ItineraryRow::new(map),
            origin_weather: origin,
            destination_weather: destination,
        }
    }

    #[test]
    fn merges_columns_with_weather_fields() {
        let report = WeatherReport::assemble(vec![enriched(
            &[
                ("airline", "AA"),
                ("flight_num", "100"),
                ("origin_latitude", "40.7"),
            ],
            Some(15.0),
            Some(22.0),
        )])
        .unwrap();

        let value = serde_json::to_value(&report).unwrap();
        let ticket = &value["report"][0];
        assert_eq!(ticket["airline"], "AA");
        assert_eq!(ticket["flight_num"], "100");
        assert_eq!(ticket["origin_latitude"], "40.7");
        assert_eq!(ticket["originWeather"], 15.0);
        assert_eq!(ticket["destinationWeather"], 22.0);
    }

    #[test]
    fn absent_weather_fields_are_omitted() {
        let report =
            WeatherReport::assemble(vec![enriched(&[("airline", "AA")], None, Some(22.0))])
                .unwrap();

        let value = serde_json::to_value(&report).unwrap();
        let ticket = &value["report"][0];
        assert!(ticket.get("originWeather").is_none());
        assert_eq!(ticket["destinationWeather"], 22.0);
    }

    #[test]
    fn reserved_column_is_a_shape_mismatch() {
        let result =
            WeatherReport::assemble(vec![enriched(&[("originWeather", "9.9")], Some(1.0), None)]);

        assert!(matches!(
            result,
            Err(AssembleError::ReservedColumn { column }) if column == "originWeather"
        ));
    }
}
