//! `POST /api/read-pdf`: authenticated pass-through to the PDF extraction engine.
//!
//! Both the request document and the engine's answer travel as raw JSON text, so key order and
//! number precision are untouched. The request content type is not inspected.

use super::{ApiError, AppState};
use crate::client::ServiceError;
use crate::metrics::Route;
use axum::{
    Json,
    body::Bytes,
    extract::{State, rejection::BytesRejection},
};
use serde_json::value::RawValue;

pub(super) async fn read_pdf(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Box<RawValue>>, ApiError> {
    let result = extract(&state, body).await;
    state.metrics.record(Route::Extraction, result.is_ok());
    result.map(Json)
}

async fn extract(
    state: &AppState,
    body: Result<Bytes, BytesRejection>,
) -> Result<Box<RawValue>, ApiError> {
    let bytes = body.map_err(|rejection| {
        tracing::warn!(error = %rejection.body_text(), "Failed to read extraction request body");
        ApiError::Upstream("Invalid request body: expected JSON".to_string())
    })?;
    let document: Box<RawValue> = serde_json::from_slice(&bytes).map_err(|error| {
        tracing::warn!(error = %error, "Rejected extraction request body");
        ApiError::Upstream("Invalid request body: expected JSON".to_string())
    })?;

    state.extractor.extract(document).await.map_err(engine_error)
}

// The engine body stays in the logs; callers only see the status line.
fn engine_error(error: ServiceError) -> ApiError {
    tracing::error!(error = %error, "PDF extraction failed");
    match error.status() {
        Some(status) => ApiError::Upstream(format!("PDF extraction failed with status {status}")),
        None => ApiError::Upstream("PDF extraction failed".to_string()),
    }
}
