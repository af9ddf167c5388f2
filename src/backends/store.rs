//! Read-only adapter for the persistent code-check store.
//!
//! The store speaks the PostgREST dialect: a single-row request is a filtered `GET` with the
//! `application/vnd.pgrst.object+json` accept header, and a miss comes back as a structured
//! error carrying code `PGRST116`.

use crate::client::{ServiceError, build_http_client, join_url, parse_http_url, read_error_body};
use crate::config::Config;
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url, header::ACCEPT};
use serde::Deserialize;
use serde_json::value::RawValue;
use thiserror::Error;

/// Store error code reported when a single-object request matched no rows.
pub const NOT_FOUND_CODE: &str = "PGRST116";

const SINGLE_OBJECT_ACCEPT: &str = "application/vnd.pgrst.object+json";

/// Errors returned by [`RecordStore`] implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No row matched the identifier.
    #[error("{message}")]
    NotFound {
        /// Message reported by the store.
        message: String,
    },
    /// Store answered with a structured error other than a miss.
    #[error("{message}")]
    Rejected {
        /// HTTP status of the store's answer.
        status: StatusCode,
        /// Store-specific error code, when provided.
        code: Option<String>,
        /// Message reported by the store.
        message: String,
    },
    /// HTTP layer failed before receiving a response.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Store answered successfully with a body that was not JSON.
    #[error("Failed to decode store response: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Interface implemented by persistent record backends.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch the single record whose identifier equals `id`, exactly as the store returned it.
    async fn fetch_record(&self, id: &str) -> Result<Box<RawValue>, StoreError>;
}

/// Error body produced by the store's REST interface.
#[derive(Debug, Default, Deserialize)]
struct StoreFailure {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    details: Option<String>,
}

/// REST client for the code-check table.
pub struct RestRecordStore {
    http: Client,
    table_url: Url,
    api_key: String,
}

impl RestRecordStore {
    /// Build the client from the store URL, key, and table in `config`.
    pub fn new(config: &Config) -> Result<Self, ServiceError> {
        let base_url = parse_http_url(&config.store_url)?;
        let table_url = join_url(&base_url, &format!("rest/v1/{}", config.store_table))?;
        tracing::debug!(url = %table_url, "Initialized record store client");
        Ok(Self {
            http: build_http_client(config.upstream_timeout)?,
            table_url,
            api_key: config.store_api_key.clone(),
        })
    }
}

#[async_trait]
impl RecordStore for RestRecordStore {
    async fn fetch_record(&self, id: &str) -> Result<Box<RawValue>, StoreError> {
        let response = self
            .http
            .get(self.table_url.clone())
            .query(&[("select", "*".to_string()), ("id", format!("eq.{id}"))])
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header(ACCEPT, SINGLE_OBJECT_ACCEPT)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let bytes = response.bytes().await?;
            return serde_json::from_slice(&bytes).map_err(StoreError::Decode);
        }

        let body = read_error_body(response).await;
        let error = classify_failure(status, &body);
        tracing::debug!(id, %status, body = %body, "Store lookup failed");
        Err(error)
    }
}

fn classify_failure(status: StatusCode, body: &str) -> StoreError {
    let failure: StoreFailure = serde_json::from_str(body).unwrap_or_default();
    let message = failure
        .message
        .filter(|message| !message.trim().is_empty())
        .or(failure.details.filter(|details| !details.trim().is_empty()));

    if failure.code.as_deref() == Some(NOT_FOUND_CODE) {
        return StoreError::NotFound {
            message: message.unwrap_or_else(|| "Record not found".to_string()),
        };
    }

    StoreError::Rejected {
        status,
        code: failure.code,
        message: message.unwrap_or_else(|| format!("Store request failed with status {status}")),
    }
}
