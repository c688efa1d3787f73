use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use super::state::AppState;

// ─── Error response ──────────────────────────────────────────────

#[derive(Serialize)]
struct ApiErrorBody {
    detail: String,
}

pub(super) struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody { detail: self.1 };
        (self.0, Json(body)).into_response()
    }
}

fn api_error(status: StatusCode, msg: impl Into<String>) -> ApiError {
    ApiError(status, msg.into())
}

// ─── GET / ───────────────────────────────────────────────────────

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

// ─── POST /convert ───────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ConvertRequest {
    #[serde(default)]
    pub source_city: String,
    #[serde(default)]
    pub dest_city: String,
    #[serde(default)]
    pub date_time_str: String,
}

#[derive(Serialize)]
pub struct ConvertResponse {
    pub result: String,
}

pub async fn convert(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ConvertRequest>,
) -> Result<Json<ConvertResponse>, ApiError> {
    let start = Instant::now();

    match state
        .converter
        .convert(&req.source_city, &req.dest_city, &req.date_time_str)
    {
        Ok(result) => {
            let elapsed = start.elapsed();
            eprintln!(
                "[{}] POST /convert '{}' -> '{}' at '{}' = {} ({:.1}ms)",
                Utc::now().format("%H:%M:%S"),
                req.source_city,
                req.dest_city,
                req.date_time_str,
                result,
                elapsed.as_secs_f64() * 1000.0,
            );
            Ok(Json(ConvertResponse { result }))
        }
        Err(e) => {
            let elapsed = start.elapsed();
            eprintln!(
                "[{}] POST /convert '{}' -> '{}' at '{}' failed: {} ({:.1}ms)",
                Utc::now().format("%H:%M:%S"),
                req.source_city,
                req.dest_city,
                req.date_time_str,
                e,
                elapsed.as_secs_f64() * 1000.0,
            );
            Err(api_error(StatusCode::BAD_REQUEST, e.to_string()))
        }
    }
}
