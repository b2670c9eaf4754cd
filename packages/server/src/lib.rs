#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the travel weather report.
//!
//! Exposes one upload endpoint (`POST /weather-report`) that accepts a
//! multipart itinerary CSV, enriches every row with current origin and
//! destination temperatures, and returns the enriched collection as JSON
//! for the browser table. The temperature cache is created once here and
//! shared by reference across requests.

mod handlers;

use std::sync::Arc;
use std::time::Duration;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use weather_report_cache::{DEFAULT_TTL, TemperatureCache};
use weather_report_enrich::enricher::RowEnricher;
use weather_report_enrich::processor::StreamProcessor;
use weather_report_lookup::{OpenWeatherClient, WeatherConfig};

/// Shared application state.
pub struct AppState {
    /// Upload pipeline over the process-wide cache and lookup client.
    pub processor: StreamProcessor,
}

/// Starts the weather report API server.
///
/// Reads the OpenWeatherMap credential and tuning knobs from the
/// environment, builds the process-wide temperature cache and lookup
/// client, and starts the Actix-Web HTTP server. This is a regular async
/// function — the caller is responsible for providing the async runtime
/// (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
///
/// # Panics
///
/// Panics if `WEATHER_API_KEY` is unset or empty — every lookup would
/// fail, so the server refuses to start.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let weather_config = WeatherConfig::from_env().expect("Missing OpenWeatherMap API key");

    let ttl = std::env::var("WEATHER_CACHE_TTL_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .map_or(DEFAULT_TTL, Duration::from_secs);

    let max_in_flight: Option<usize> = std::env::var("MAX_IN_FLIGHT_ROWS")
        .ok()
        .and_then(|v| v.parse().ok())
        .filter(|&n| n > 0);

    let cache = Arc::new(TemperatureCache::new(ttl));
    let lookup = Arc::new(OpenWeatherClient::new(weather_config));
    let enricher = Arc::new(RowEnricher::new(lookup, cache));

    let state = web::Data::new(AppState {
        processor: max_in_flight.map_or_else(
            || StreamProcessor::new(Arc::clone(&enricher)),
            |limit| StreamProcessor::new(Arc::clone(&enricher)).with_max_in_flight(limit),
        ),
    });

    if let Some(limit) = max_in_flight {
        log::info!("Row enrichment bounded at {limit} concurrent rows");
    }

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(5000);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .route(
                "/weather-report",
                web::post().to(handlers::weather_report),
            )
            .service(web::scope("/api").route("/health", web::get().to(handlers::health)))
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
