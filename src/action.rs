//! Caller-side entry point for document analysis.
//!
//! [`AnalysisAction`] calls the deployment's own `POST /api/ai` route and never fails: any
//! transport, status, or decoding problem collapses into a fixed failure envelope.

use crate::client::{Endpoint, ServiceClient, ServiceError, join_url, parse_http_url};
use crate::config::ActionConfig;
use crate::envelope::AnalysisResponse;
use serde_json::json;
use thiserror::Error;

/// Message returned whenever the analysis route cannot be used.
pub const ANALYZE_FAILURE_MESSAGE: &str = "Failed to analyze document. Please try again.";

const ANALYSIS_PATH: &str = "api/ai";

/// Errors raised while talking to the analysis route.
#[derive(Debug, Error)]
pub enum ActionError {
    /// Transport failure, non-success status, or non-JSON body.
    #[error(transparent)]
    Service(#[from] ServiceError),
    /// Route answered with JSON that is neither `{analysis}` nor `{error}`.
    #[error("Unrecognized analysis response: {0}")]
    Envelope(#[source] serde_json::Error),
}

/// Client for the deployment's analysis route.
#[derive(Debug, Clone)]
pub struct AnalysisAction {
    service: ServiceClient,
}

impl AnalysisAction {
    /// Build the action against `<site_url>/api/ai`.
    pub fn new(config: &ActionConfig) -> Result<Self, ServiceError> {
        let base = parse_http_url(&config.site_url)?;
        let url = join_url(&base, ANALYSIS_PATH)?;
        let endpoint = Endpoint::json(url.as_str())?;
        Ok(Self {
            service: ServiceClient::new(endpoint, config.timeout)?,
        })
    }

    /// Analyze `text`, passing the route's envelope through unchanged on success.
    pub async fn analyze_document(&self, text: &str) -> AnalysisResponse {
        match self.try_analyze(text).await {
            Ok(response) => response,
            Err(error) => {
                tracing::error!(
                    url = %self.service.endpoint().url(),
                    error = %error,
                    "Analysis request failed"
                );
                AnalysisResponse::failure(ANALYZE_FAILURE_MESSAGE)
            }
        }
    }

    async fn try_analyze(&self, text: &str) -> Result<AnalysisResponse, ActionError> {
        let body = self.service.post_json(&json!({ "query": text })).await?;
        serde_json::from_str(body.get()).map_err(ActionError::Envelope)
    }
}
