//! HTTP handler functions for the weather report API.

use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};
use futures::TryStreamExt as _;
use weather_report_server_models::{ApiHealth, WeatherReport};

use crate::AppState;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `POST /weather-report`
///
/// Accepts a multipart upload with the itinerary CSV in the `file` field,
/// enriches every row with origin and destination temperatures, and
/// returns `{ "report": [...] }`. A missing file is a 400; a broken
/// stream is a 500 with no partial result. Individual lookup failures
/// only blank that row's weather field.
pub async fn weather_report(state: web::Data<AppState>, payload: Multipart) -> HttpResponse {
    let upload = match read_upload(payload).await {
        Ok(Some(bytes)) => bytes,
        Ok(None) => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "error": "No file uploaded"
            }));
        }
        Err(e) => {
            log::error!("Error reading upload: {e}");
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Error processing file"
            }));
        }
    };

    let rows = match state.processor.process(upload.as_slice()).await {
        Ok(rows) => rows,
        Err(e) => {
            log::error!("Error processing file: {e}");
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Error processing file"
            }));
        }
    };

    match WeatherReport::assemble(rows) {
        Ok(report) => HttpResponse::Ok().json(report),
        Err(e) => {
            log::error!("Error assembling report: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Error processing file"
            }))
        }
    }
}

/// Buffers the `file` field of the multipart upload.
///
/// Returns `Ok(None)` when the payload carries no `file` field. The
/// buffer lives for this request only and is dropped with the response.
async fn read_upload(mut payload: Multipart) -> Result<Option<Vec<u8>>, actix_multipart::MultipartError> {
    while let Some(mut field) = payload.try_next().await? {
        if field.name() != Some("file") {
            continue;
        }

        let mut bytes = Vec::new();
        while let Some(chunk) = field.try_next().await? {
            bytes.extend_from_slice(&chunk);
        }
        return Ok(Some(bytes));
    }

    Ok(None)
}
