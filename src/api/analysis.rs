//! `POST /api/ai`: knowledge-base proxy.

use super::AppState;
use crate::envelope::AnalysisResponse;
use crate::metrics::Route;
use axum::{
    Json,
    body::Bytes,
    extract::{State, rejection::BytesRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

/// Message returned for every analysis failure; causes are only logged.
pub const ANALYSIS_FAILURE_MESSAGE: &str = "Error processing your request";

/// Request body for `POST /api/ai`.
#[derive(Debug, Deserialize)]
pub struct AnalysisRequest {
    /// Free text or document text to run against the knowledge base.
    pub query: String,
}

// The body is parsed here rather than through `Json` so a missing content type is not an error.
pub(super) async fn analyze(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> AnalysisResponse {
    let response = match parse_request(body) {
        Some(request) => match state.knowledge_base.query(&request.query).await {
            Ok(answer) => AnalysisResponse::analysis(answer),
            Err(error) => {
                tracing::error!(error = %error, "Knowledge-base query failed");
                AnalysisResponse::failure(ANALYSIS_FAILURE_MESSAGE)
            }
        },
        None => AnalysisResponse::failure(ANALYSIS_FAILURE_MESSAGE),
    };
    state.metrics.record(Route::Analysis, !response.is_error());
    response
}

fn parse_request(body: Result<Bytes, BytesRejection>) -> Option<AnalysisRequest> {
    let bytes = body
        .map_err(|rejection| {
            tracing::warn!(error = %rejection.body_text(), "Failed to read analysis request body");
        })
        .ok()?;
    serde_json::from_slice(&bytes)
        .map_err(|error| {
            tracing::warn!(error = %error, "Rejected analysis request body");
        })
        .ok()
}

impl IntoResponse for AnalysisResponse {
    fn into_response(self) -> Response {
        let status = if self.is_error() {
            StatusCode::INTERNAL_SERVER_ERROR
        } else {
            StatusCode::OK
        };
        (status, Json(self)).into_response()
    }
}
