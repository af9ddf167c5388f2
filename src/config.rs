use std::env;
use std::time::Duration;
use thiserror::Error;

/// Table queried by the record lookup route when `STORE_TABLE` is unset.
pub const DEFAULT_STORE_TABLE: &str = "code_checks";

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable was not provided.
    #[error("Missing environment variable: {0}")]
    MissingVariable(String),
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the gateway server.
///
/// Loaded once at startup and handed to each backend adapter on construction; nothing on the
/// request path reads the environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Query endpoint of the knowledge-base engine.
    pub knowledge_base_url: String,
    /// Knowledge base every analysis request is bound to.
    pub knowledge_base_id: String,
    /// Optional bearer credential for the knowledge-base engine.
    pub knowledge_base_api_key: Option<String>,
    /// Endpoint of the PDF extraction engine.
    pub pdf_service_url: String,
    /// Bearer credential sent on every extraction call.
    pub pdf_service_api_key: String,
    /// Base URL of the persistent store's REST interface.
    pub store_url: String,
    /// API key for the persistent store.
    pub store_api_key: String,
    /// Table holding stored code-check records.
    pub store_table: String,
    /// Optional timeout applied to every outbound request.
    pub upstream_timeout: Option<Duration>,
    /// Optional override for the HTTP server port.
    pub server_port: Option<u16>,
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            knowledge_base_url: load_env("KNOWLEDGE_BASE_URL")?,
            knowledge_base_id: load_env("KNOWLEDGE_BASE_ID")?,
            knowledge_base_api_key: load_env_optional("KNOWLEDGE_BASE_API_KEY"),
            pdf_service_url: load_env("PDF_SERVICE_URL")?,
            pdf_service_api_key: load_env("PDF_SERVICE_API_KEY")?,
            store_url: load_env("STORE_URL")?,
            store_api_key: load_env("STORE_API_KEY")?,
            store_table: load_env_optional("STORE_TABLE")
                .unwrap_or_else(|| DEFAULT_STORE_TABLE.to_string()),
            upstream_timeout: load_timeout()?,
            server_port: load_env_optional("SERVER_PORT")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("SERVER_PORT".into()))
                })
                .transpose()?,
        })
    }
}

/// Settings for the client-side analysis action.
#[derive(Debug, Clone)]
pub struct ActionConfig {
    /// Base URL of the deployment hosting the analysis route.
    pub site_url: String,
    /// Optional timeout applied to the call.
    pub timeout: Option<Duration>,
}

impl ActionConfig {
    /// Load the action settings from `SITE_URL` and `UPSTREAM_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            site_url: load_env("SITE_URL")?,
            timeout: load_timeout()?,
        })
    }
}

/// Read `.env` (if present) and load the server configuration.
pub fn load_config() -> Result<Config, ConfigError> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    tracing::debug!(
        knowledge_base_url = %config.knowledge_base_url,
        knowledge_base_id = %config.knowledge_base_id,
        pdf_service_url = %config.pdf_service_url,
        store_url = %config.store_url,
        store_table = %config.store_table,
        upstream_timeout = ?config.upstream_timeout,
        server_port = ?config.server_port,
        "Loaded configuration"
    );
    Ok(config)
}

fn load_env(key: &str) -> Result<String, ConfigError> {
    load_env_optional(key).ok_or_else(|| ConfigError::MissingVariable(key.to_string()))
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn load_timeout() -> Result<Option<Duration>, ConfigError> {
    load_env_optional("UPSTREAM_TIMEOUT_SECS")
        .map(|value| {
            value
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or_else(|| ConfigError::InvalidValue("UPSTREAM_TIMEOUT_SECS".into()))
        })
        .transpose()
}

#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config {
        knowledge_base_url: "http://127.0.0.1:9/query".into(),
        knowledge_base_id: "kb-test".into(),
        knowledge_base_api_key: None,
        pdf_service_url: "http://127.0.0.1:9/extract".into(),
        pdf_service_api_key: "pdf-secret".into(),
        store_url: "http://127.0.0.1:9".into(),
        store_api_key: "store-key".into(),
        store_table: DEFAULT_STORE_TABLE.into(),
        upstream_timeout: None,
        server_port: None,
    }
}
