//! `GET /api/code-checks/:id`: single-record lookup.

use super::{ApiError, AppState};
use crate::backends::StoreError;
use crate::metrics::Route;
use axum::{
    Json,
    extract::{Path, State, rejection::PathRejection},
};
use serde_json::value::RawValue;

/// Message returned when a lookup fails outside the store's own answer.
pub const LOOKUP_FAILURE_MESSAGE: &str = "Failed to fetch record";

pub(super) async fn get_code_check(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<Box<RawValue>>, ApiError> {
    let result = lookup(&state, id).await;
    state.metrics.record(Route::Lookup, result.is_ok());
    result.map(Json)
}

async fn lookup(
    state: &AppState,
    id: Result<Path<String>, PathRejection>,
) -> Result<Box<RawValue>, ApiError> {
    let Path(id) = id.map_err(|rejection| {
        tracing::warn!(error = %rejection.body_text(), "Rejected record lookup path");
        ApiError::Internal(LOOKUP_FAILURE_MESSAGE.to_string())
    })?;

    state.records.fetch_record(&id).await.map_err(|error| {
        let mapped = match &error {
            StoreError::NotFound { message } => ApiError::NotFound(message.clone()),
            StoreError::Rejected { message, .. } => ApiError::Internal(message.clone()),
            StoreError::Http(_) | StoreError::Decode(_) => {
                ApiError::Internal(LOOKUP_FAILURE_MESSAGE.to_string())
            }
        };
        match mapped {
            ApiError::NotFound(_) => tracing::info!(id = %id, "Record not found"),
            _ => tracing::error!(id = %id, error = %error, "Record lookup failed"),
        }
        mapped
    })
}
