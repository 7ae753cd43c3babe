//! # OCR Service API
//!
//! Thin JSON HTTP layer over the parsing core. The recognition engine runs
//! elsewhere; callers POST the recognized text (or pre-classified entities)
//! and get the structured receipt back. All the actual work happens in
//! [`crate::parser`] and [`crate::entities`].

use std::sync::Arc;
use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use crate::entities::{reduce_entities, RecognizedEntity};
use crate::errors::error_logging;
use crate::observability;
use crate::parser::{ParseOutcome, ReceiptParser};
use crate::receipt::Receipt;

/// One OCR structuring request.
///
/// `text` carries the recognized blocks/lines in reading order; `entities`
/// carries pre-classified fields when a structured extractor ran upstream.
/// At least one of the two must be non-empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OcrRequest {
    #[serde(default)]
    pub text: Vec<String>,
    #[serde(default)]
    pub entities: Vec<RecognizedEntity>,
    /// Free-text processing hints; only the "shop receipt" phrase is
    /// interpreted.
    #[serde(default)]
    pub instructions: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OcrResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub text: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt: Option<Receipt>,
    /// Diagnostic trace, included only when the service runs in debug mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OcrResponse {
    fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            text: vec![],
            receipt: None,
            trace: None,
            error: Some(message.into()),
        }
    }
}

/// Shared state for the API handlers.
pub struct AppState {
    pub parser: ReceiptParser,
    /// Expose the diagnostic trace in responses.
    pub debug: bool,
}

/// Build the API router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/ocr", post(handle_ocr))
        .route("/health", get(handle_health))
        .with_state(state)
}

async fn handle_health() -> Json<serde_json::Value> {
    Json(json!({ "status": true }))
}

async fn handle_ocr(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<OcrRequest>, JsonRejection>,
) -> (StatusCode, Json<OcrResponse>) {
    let started = Instant::now();

    let Json(request) = match payload {
        Ok(json) => json,
        Err(rejection) => {
            error_logging::log_request_error(&rejection, "decode_request", None, None);
            observability::record_request_metrics("POST", 400, started.elapsed());
            return (
                StatusCode::BAD_REQUEST,
                Json(OcrResponse::error("Invalid request format")),
            );
        }
    };

    if request.text.is_empty() && request.entities.is_empty() {
        warn!("request carried neither recognized text nor entities");
        observability::record_request_metrics("POST", 400, started.elapsed());
        return (
            StatusCode::BAD_REQUEST,
            Json(OcrResponse::error("No recognized text or entities provided")),
        );
    }

    let mode = if request.entities.is_empty() {
        "heuristic"
    } else {
        "entity"
    };
    let span = observability::parse_span(mode);
    let _guard = span.enter();

    let parse_started = Instant::now();
    let ParseOutcome { receipt, trace } = if request.entities.is_empty() {
        state.parser.parse(&request.text)
    } else {
        reduce_entities(
            &state.parser,
            &request.entities,
            &request.text,
            request.instructions.as_deref(),
        )
    };
    observability::record_parse_metrics(
        mode,
        parse_started.elapsed(),
        receipt.items.len(),
        receipt.total_amount > 0.0,
    );

    info!(
        mode = mode,
        blocks = request.text.len(),
        entities = request.entities.len(),
        items = receipt.items.len(),
        total_found = receipt.total_amount > 0.0,
        "receipt structured"
    );

    let response = OcrResponse {
        success: true,
        text: request.text,
        receipt: Some(receipt),
        trace: state.debug.then(|| trace.into_events()),
        error: None,
    };
    observability::record_request_metrics("POST", 200, started.elapsed());
    (StatusCode::OK, Json(response))
}
