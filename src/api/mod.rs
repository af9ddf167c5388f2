//! HTTP surface for the gateway.
//!
//! - `POST /api/ai` – Run a query against the bound knowledge base; answers `{analysis}` or
//!   `{error}`.
//! - `POST /api/read-pdf` – Forward a JSON document description to the PDF extraction engine.
//! - `GET /api/code-checks/:id` – Fetch one stored code-check record.
//! - `GET /health` – Liveness check.
//! - `GET /metrics` – Per-route request and failure counters.
//! - `GET /commands` – Machine-readable command catalog.
//!
//! Every handler answers with JSON, including failures and unmatched paths.

mod analysis;
mod extraction;
mod records;

pub use analysis::{ANALYSIS_FAILURE_MESSAGE, AnalysisRequest};
pub use records::LOOKUP_FAILURE_MESSAGE;

use crate::backends::{
    DocumentExtractor, KnowledgeBase, KnowledgeBaseClient, PdfExtractionClient, RecordStore,
    RestRecordStore,
};
use crate::client::ServiceError;
use crate::config::Config;
use crate::envelope::ErrorBody;
use crate::metrics::{MetricsSnapshot, RouteMetrics};
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

/// Shared, read-only handles used by every route.
#[derive(Clone)]
pub struct AppState {
    /// Knowledge-base engine behind `POST /api/ai`.
    pub knowledge_base: Arc<dyn KnowledgeBase>,
    /// Extraction engine behind `POST /api/read-pdf`.
    pub extractor: Arc<dyn DocumentExtractor>,
    /// Persistent store behind `GET /api/code-checks/:id`.
    pub records: Arc<dyn RecordStore>,
    /// Route counters.
    pub metrics: Arc<RouteMetrics>,
}

impl AppState {
    /// Build the HTTP-backed adapters described by `config`.
    pub fn from_config(config: &Config) -> Result<Self, ServiceError> {
        Ok(Self {
            knowledge_base: Arc::new(KnowledgeBaseClient::new(config)?),
            extractor: Arc::new(PdfExtractionClient::new(config)?),
            records: Arc::new(RestRecordStore::new(config)?),
            metrics: Arc::new(RouteMetrics::new()),
        })
    }
}

/// Build the HTTP router exposing the gateway routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/ai", post(analysis::analyze))
        .route("/api/read-pdf", post(extraction::read_pdf))
        .route("/api/code-checks/:id", get(records::get_code_check))
        .route("/health", get(health))
        .route("/metrics", get(get_metrics))
        .route("/commands", get(get_commands))
        .fallback(not_found)
        .with_state(state)
}

/// Caller-facing failure, classified by where it originated.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed input or a downstream engine failure.
    #[error("{0}")]
    Upstream(String),
    /// The requested record does not exist.
    #[error("{0}")]
    NotFound(String),
    /// Any other failure.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status reported for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Upstream(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn get_metrics(State(state): State<AppState>) -> Json<MetricsSnapshot> {
    Json(state.metrics.snapshot())
}

async fn not_found() -> ApiError {
    ApiError::NotFound("Not found".to_string())
}

/// Descriptor for a single command in the discovery catalog.
#[derive(Serialize)]
struct CommandDescriptor {
    name: &'static str,
    method: &'static str,
    path: &'static str,
    description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_example: Option<serde_json::Value>,
}

/// Response body for `GET /commands`.
#[derive(Serialize)]
struct CommandsResponse {
    commands: Vec<CommandDescriptor>,
}

async fn get_commands() -> Json<CommandsResponse> {
    Json(CommandsResponse {
        commands: vec![
            CommandDescriptor {
                name: "analyze",
                method: "POST",
                path: "/api/ai",
                description: "Query the configured knowledge base. Responds with { \"analysis\": ... } or { \"error\": string }.",
                request_example: Some(json!({
                    "query": "What is the zoning code for parcel 12-345?"
                })),
            },
            CommandDescriptor {
                name: "read_pdf",
                method: "POST",
                path: "/api/read-pdf",
                description: "Forward a document description to the PDF extraction engine and return its JSON answer.",
                request_example: Some(json!({
                    "url": "https://files.example.org/permit.pdf"
                })),
            },
            CommandDescriptor {
                name: "get_code_check",
                method: "GET",
                path: "/api/code-checks/{id}",
                description: "Fetch a stored code-check record by identifier.",
                request_example: None,
            },
            CommandDescriptor {
                name: "metrics",
                method: "GET",
                path: "/metrics",
                description: "Return per-route request and failure counters.",
                request_example: None,
            },
        ],
    })
}
