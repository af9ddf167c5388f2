//! Knowledge-base engine adapter.

use crate::client::{Endpoint, ServiceClient, ServiceError};
use crate::config::Config;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::value::RawValue;

/// Interface implemented by knowledge-base query backends.
#[async_trait]
pub trait KnowledgeBase: Send + Sync {
    /// Run `query` against the bound knowledge base and return the engine's raw answer.
    async fn query(&self, query: &str) -> Result<Box<RawValue>, ServiceError>;
}

/// Body sent to the knowledge-base engine.
#[derive(Debug, Serialize)]
pub struct KnowledgeBaseQuery<'a> {
    /// Caller-supplied query text.
    pub query: &'a str,
    /// Knowledge base the query is evaluated against.
    pub knowledge_base_id: &'a str,
}

/// HTTP client for the knowledge-base engine, bound to one knowledge base.
pub struct KnowledgeBaseClient {
    service: ServiceClient,
    knowledge_base_id: String,
}

impl KnowledgeBaseClient {
    /// Build the client from the engine URL, credential, and binding in `config`.
    pub fn new(config: &Config) -> Result<Self, ServiceError> {
        let endpoint = Endpoint::json(&config.knowledge_base_url)?
            .with_bearer(config.knowledge_base_api_key.clone());
        tracing::debug!(
            url = %endpoint.url(),
            knowledge_base_id = %config.knowledge_base_id,
            has_api_key = endpoint.has_bearer(),
            "Initialized knowledge-base client"
        );
        Ok(Self {
            service: ServiceClient::new(endpoint, config.upstream_timeout)?,
            knowledge_base_id: config.knowledge_base_id.clone(),
        })
    }
}

#[async_trait]
impl KnowledgeBase for KnowledgeBaseClient {
    async fn query(&self, query: &str) -> Result<Box<RawValue>, ServiceError> {
        let body = KnowledgeBaseQuery {
            query,
            knowledge_base_id: &self.knowledge_base_id,
        };
        self.service.post_json(&body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;
    use httpmock::{Method::POST, MockServer};
    use serde_json::json;

    #[tokio::test]
    async fn query_attaches_configured_knowledge_base() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/query").json_body(json!({
                    "query": "What is the zoning code for parcel 12-345?",
                    "knowledge_base_id": "kb-zoning"
                }));
                then.status(200).json_body(json!({ "answer": "R-1 residential" }));
            })
            .await;

        let config = Config {
            knowledge_base_url: server.url("/v1/query"),
            knowledge_base_id: "kb-zoning".into(),
            ..test_config()
        };
        let client = KnowledgeBaseClient::new(&config).expect("client");
        let answer = client
            .query("What is the zoning code for parcel 12-345?")
            .await
            .expect("answer");

        mock.assert_async().await;
        assert_eq!(
            serde_json::to_value(&answer).expect("json"),
            json!({ "answer": "R-1 residential" })
        );
    }

    #[test]
    fn invalid_engine_url_is_rejected() {
        let config = Config {
            knowledge_base_url: "not a url".into(),
            ..test_config()
        };
        assert!(matches!(
            KnowledgeBaseClient::new(&config),
            Err(ServiceError::InvalidUrl(_))
        ));
    }
}
