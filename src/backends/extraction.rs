//! PDF extraction engine adapter.

use crate::client::{Endpoint, ServiceClient, ServiceError};
use crate::config::Config;
use async_trait::async_trait;
use serde_json::value::RawValue;

/// Interface implemented by document text-extraction backends.
#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    /// Forward `document` unmodified and return the engine's JSON answer as received.
    async fn extract(&self, document: Box<RawValue>) -> Result<Box<RawValue>, ServiceError>;
}

/// Authenticated HTTP client for the PDF extraction engine.
pub struct PdfExtractionClient {
    service: ServiceClient,
}

impl PdfExtractionClient {
    /// Build the client from the engine URL and bearer credential in `config`.
    pub fn new(config: &Config) -> Result<Self, ServiceError> {
        let endpoint = Endpoint::json(&config.pdf_service_url)?
            .with_bearer(Some(config.pdf_service_api_key.clone()));
        tracing::debug!(url = %endpoint.url(), "Initialized PDF extraction client");
        Ok(Self {
            service: ServiceClient::new(endpoint, config.upstream_timeout)?,
        })
    }
}

#[async_trait]
impl DocumentExtractor for PdfExtractionClient {
    async fn extract(&self, document: Box<RawValue>) -> Result<Box<RawValue>, ServiceError> {
        self.service.post_json(&document).await
    }
}
