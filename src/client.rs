//! Single-endpoint JSON client used for every outbound engine call.
//!
//! A [`ServiceClient`] is bound to one [`Endpoint`] at construction and issues exactly one POST
//! per call. There is no retry or backoff; a request timeout applies only when configured.
//! Response bodies are handed back as [`RawValue`] so callers can relay them byte-for-byte.

use reqwest::{
    Client, Response, StatusCode, Url,
    header::{ACCEPT, CONTENT_TYPE},
};
use serde::Serialize;
use serde_json::value::RawValue;
use std::time::Duration;
use thiserror::Error;

/// Content type used for every JSON engine call.
pub const JSON_CONTENT_TYPE: &str = "application/json";

const USER_AGENT: &str = "codecheck-gateway/0.1";

/// Errors returned by [`ServiceClient`].
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Endpoint URL failed to parse or does not use HTTP(S).
    #[error("Invalid endpoint URL: {0}")]
    InvalidUrl(String),
    /// Payload could not be serialized to JSON.
    #[error("Failed to encode request payload: {0}")]
    Encode(#[source] serde_json::Error),
    /// HTTP layer failed before receiving a response.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Endpoint responded with a non-success status code.
    #[error("Unexpected response ({status}): {body}")]
    UnexpectedStatus {
        /// HTTP status returned by the endpoint.
        status: StatusCode,
        /// Raw body text associated with the failing response.
        body: String,
    },
    /// Response body was not valid JSON.
    #[error("Failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),
}

impl ServiceError {
    /// Status code returned by the endpoint, when the failure came from a response.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::UnexpectedStatus { status, .. } => Some(*status),
            Self::Http(error) => error.status(),
            _ => None,
        }
    }
}

/// Target of a [`ServiceClient`]: URL, content type, and optional bearer credential.
#[derive(Clone)]
pub struct Endpoint {
    url: Url,
    content_type: String,
    bearer: Option<String>,
}

impl Endpoint {
    /// Build an endpoint from an absolute HTTP(S) URL.
    pub fn new(url: &str, content_type: impl Into<String>) -> Result<Self, ServiceError> {
        Ok(Self {
            url: parse_http_url(url)?,
            content_type: content_type.into(),
            bearer: None,
        })
    }

    /// Build a JSON endpoint from an absolute HTTP(S) URL.
    pub fn json(url: &str) -> Result<Self, ServiceError> {
        Self::new(url, JSON_CONTENT_TYPE)
    }

    /// Attach a bearer credential sent as `Authorization: Bearer <token>`.
    ///
    /// Blank tokens are ignored.
    pub fn with_bearer(mut self, token: Option<impl Into<String>>) -> Self {
        let token: Option<String> = token.map(|value| value.into());
        self.bearer = token.filter(|value| !value.trim().is_empty());
        self
    }

    /// Target URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Whether a bearer credential is attached.
    pub fn has_bearer(&self) -> bool {
        self.bearer.is_some()
    }
}

impl std::fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Endpoint")
            .field("url", &self.url.as_str())
            .field("content_type", &self.content_type)
            .field("has_bearer", &self.bearer.is_some())
            .finish()
    }
}

/// HTTP client bound to one configured endpoint.
#[derive(Debug, Clone)]
pub struct ServiceClient {
    http: Client,
    endpoint: Endpoint,
}

impl ServiceClient {
    /// Construct a client for `endpoint`, applying `timeout` to every request when set.
    pub fn new(endpoint: Endpoint, timeout: Option<Duration>) -> Result<Self, ServiceError> {
        Ok(Self {
            http: build_http_client(timeout)?,
            endpoint,
        })
    }

    /// Endpoint this client is bound to.
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// POST `payload` to the endpoint and return the JSON body exactly as received.
    ///
    /// Non-2xx statuses and transport failures are both errors; the call is attempted once.
    /// A [`RawValue`] payload is sent verbatim.
    pub async fn post_json<P>(&self, payload: &P) -> Result<Box<RawValue>, ServiceError>
    where
        P: Serialize + ?Sized,
    {
        let body = serde_json::to_vec(payload).map_err(ServiceError::Encode)?;

        let mut request = self
            .http
            .post(self.endpoint.url.clone())
            .header(CONTENT_TYPE, &self.endpoint.content_type)
            .header(ACCEPT, JSON_CONTENT_TYPE)
            .body(body);
        if let Some(token) = &self.endpoint.bearer {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = read_error_body(response).await;
            let error = ServiceError::UnexpectedStatus { status, body };
            tracing::warn!(url = %self.endpoint.url, error = %error, "Service call failed");
            return Err(error);
        }

        let bytes = response.bytes().await?;
        let value = serde_json::from_slice(&bytes).map_err(ServiceError::Decode)?;
        tracing::debug!(url = %self.endpoint.url, %status, "Service call succeeded");
        Ok(value)
    }
}

/// Read the body of a failed response, falling back to an empty string.
pub(crate) async fn read_error_body(response: Response) -> String {
    let url = response.url().clone();
    match response.text().await {
        Ok(body) => body,
        Err(error) => {
            tracing::debug!(%url, error = %error, "Failed to read error response body");
            String::new()
        }
    }
}

/// Build the shared `reqwest` client used by the gateway's outbound adapters.
pub(crate) fn build_http_client(timeout: Option<Duration>) -> Result<Client, ServiceError> {
    let mut builder = Client::builder().user_agent(USER_AGENT);
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}

/// Parse an absolute HTTP(S) URL; the path is kept exactly as configured.
pub(crate) fn parse_http_url(url: &str) -> Result<Url, ServiceError> {
    let parsed =
        Url::parse(url.trim()).map_err(|err| ServiceError::InvalidUrl(format!("{url}: {err}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ServiceError::InvalidUrl(format!(
            "{url}: scheme must be http or https"
        )));
    }
    Ok(parsed)
}

/// Join `path` onto `base`, keeping exactly one slash between them.
pub(crate) fn join_url(base: &Url, path: &str) -> Result<Url, ServiceError> {
    let joined = format!(
        "{}/{}",
        base.as_str().trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    parse_http_url(&joined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::{Method::POST, MockServer};
    use serde_json::json;

    #[tokio::test]
    async fn post_json_sends_payload_and_parses_response() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/query")
                    .header("content-type", "application/json")
                    .json_body(json!({ "query": "setbacks", "knowledge_base_id": "kb-1" }));
                then.status(200).json_body(json!({ "answer": "10 feet" }));
            })
            .await;

        let endpoint = Endpoint::json(&server.url("/query")).expect("endpoint");
        let client = ServiceClient::new(endpoint, None).expect("client");
        let value = client
            .post_json(&json!({ "query": "setbacks", "knowledge_base_id": "kb-1" }))
            .await
            .expect("response");

        mock.assert_async().await;
        assert_eq!(
            serde_json::to_value(&value).expect("json"),
            json!({ "answer": "10 feet" })
        );
    }

    #[tokio::test]
    async fn raw_payloads_and_answers_are_relayed_verbatim() {
        let request_text = r#"{"z":1,"a":12345678901234567890123}"#;
        let answer_text = r#"{"z":2,"big":98765432109876543210987}"#;
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/extract").body(request_text);
                then.status(200).body(answer_text);
            })
            .await;

        let client =
            ServiceClient::new(Endpoint::json(&server.url("/extract")).expect("endpoint"), None)
                .expect("client");
        let payload = RawValue::from_string(request_text.to_string()).expect("raw payload");
        let answer = client.post_json(&payload).await.expect("response");

        mock.assert_async().await;
        assert_eq!(answer.get(), answer_text);
    }

    #[tokio::test]
    async fn configured_trailing_slash_is_kept() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/extract/");
                then.status(200).body("{}");
            })
            .await;

        let endpoint = Endpoint::json(&server.url("/extract/")).expect("endpoint");
        assert!(endpoint.url().as_str().ends_with("/extract/"));
        let client = ServiceClient::new(endpoint, None).expect("client");
        client.post_json(&json!({})).await.expect("response");

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn post_json_attaches_bearer_and_content_type() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/extract")
                    .header("authorization", "Bearer secret-token")
                    .header("content-type", "application/vnd.custom+json");
                then.status(200).json_body(json!({ "text": "" }));
            })
            .await;

        let endpoint = Endpoint::new(&server.url("/extract"), "application/vnd.custom+json")
            .expect("endpoint")
            .with_bearer(Some("secret-token"));
        let client = ServiceClient::new(endpoint, None).expect("client");
        client.post_json(&json!({})).await.expect("response");

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_success_status_is_an_error_with_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/query");
                then.status(502).body("upstream exploded");
            })
            .await;

        let client =
            ServiceClient::new(Endpoint::json(&server.url("/query")).expect("endpoint"), None)
                .expect("client");
        let error = client.post_json(&json!({})).await.expect_err("502 fails");

        assert_eq!(error.status(), Some(StatusCode::BAD_GATEWAY));
        match error {
            ServiceError::UnexpectedStatus { body, .. } => assert_eq!(body, "upstream exploded"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_json_body_is_a_decode_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/query");
                then.status(200).body("<html>not json</html>");
            })
            .await;

        let client =
            ServiceClient::new(Endpoint::json(&server.url("/query")).expect("endpoint"), None)
                .expect("client");
        let error = client.post_json(&json!({})).await.expect_err("decode fails");

        assert!(matches!(error, ServiceError::Decode(_)));
    }

    #[test]
    fn endpoint_rejects_relative_and_non_http_urls() {
        assert!(matches!(
            Endpoint::json("/api/ai"),
            Err(ServiceError::InvalidUrl(_))
        ));
        assert!(matches!(
            Endpoint::json("ftp://example.org/file"),
            Err(ServiceError::InvalidUrl(_))
        ));
    }

    #[test]
    fn blank_bearer_is_ignored() {
        let endpoint = Endpoint::json("https://example.org/extract")
            .expect("endpoint")
            .with_bearer(Some("   "));
        assert!(!endpoint.has_bearer());
    }

    #[test]
    fn join_url_normalizes_slashes() {
        let base = parse_http_url("https://example.org/site/").expect("base");
        let joined = join_url(&base, "/api/ai").expect("joined");
        assert_eq!(joined.as_str(), "https://example.org/site/api/ai");
    }
}
