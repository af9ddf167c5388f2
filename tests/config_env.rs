use std::time::Duration;

use codecheck::config::{ActionConfig, Config, ConfigError, DEFAULT_STORE_TABLE};

fn set_env(key: &str, value: &str) {
    // SAFETY: this binary holds a single test, so nothing reads the environment concurrently.
    unsafe { std::env::set_var(key, value) }
}

fn remove_env(key: &str) {
    // SAFETY: see `set_env`.
    unsafe { std::env::remove_var(key) }
}

#[test]
fn loads_and_validates_environment() {
    for key in [
        "KNOWLEDGE_BASE_API_KEY",
        "STORE_TABLE",
        "UPSTREAM_TIMEOUT_SECS",
        "SERVER_PORT",
        "SITE_URL",
    ] {
        remove_env(key);
    }
    set_env("KNOWLEDGE_BASE_URL", "https://kb.example.org/query");
    set_env("KNOWLEDGE_BASE_ID", "kb-42");
    set_env("PDF_SERVICE_URL", "https://pdf.example.org/extract");
    set_env("STORE_URL", "https://store.example.org");
    set_env("STORE_API_KEY", "anon");
    remove_env("PDF_SERVICE_API_KEY");

    match Config::from_env() {
        Err(ConfigError::MissingVariable(name)) => assert_eq!(name, "PDF_SERVICE_API_KEY"),
        other => panic!("expected missing PDF_SERVICE_API_KEY, got {other:?}"),
    }

    set_env("PDF_SERVICE_API_KEY", "secret");
    let config = Config::from_env().expect("config");
    assert_eq!(config.knowledge_base_id, "kb-42");
    assert_eq!(config.store_table, DEFAULT_STORE_TABLE);
    assert_eq!(config.knowledge_base_api_key, None);
    assert_eq!(config.upstream_timeout, None);

    set_env("UPSTREAM_TIMEOUT_SECS", "15");
    set_env("SERVER_PORT", "8080");
    let config = Config::from_env().expect("config");
    assert_eq!(config.upstream_timeout, Some(Duration::from_secs(15)));
    assert_eq!(config.server_port, Some(8080));

    set_env("SERVER_PORT", "eighty");
    assert!(matches!(
        Config::from_env(),
        Err(ConfigError::InvalidValue(name)) if name == "SERVER_PORT"
    ));

    assert!(matches!(
        ActionConfig::from_env(),
        Err(ConfigError::MissingVariable(name)) if name == "SITE_URL"
    ));
    set_env("SITE_URL", "https://codecheck.example.org");
    let action = ActionConfig::from_env().expect("action config");
    assert_eq!(action.site_url, "https://codecheck.example.org");
    assert_eq!(action.timeout, Some(Duration::from_secs(15)));
}
