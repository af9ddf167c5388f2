//! Log setup for the gateway server and the analysis CLI.
//!
//! `codecheck-gateway` writes request and upstream-failure events both to the console and to
//! `logs/codecheck.log`, or to `CODECHECK_LOG_FILE` when that variable names a path. Upstream
//! credentials never appear in these events. `codecheck-analyze` prints its envelope on stdout,
//! so its diagnostics are limited to stderr at `warn`.
use std::sync::OnceLock;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Install the gateway subscriber: console output plus the log file when it can be opened.
///
/// `RUST_LOG` overrides the default `info` filter. The file writer's guard lives in a static so
/// buffered lines are flushed until the process exits.
pub fn init_tracing() {
    let stdout_layer = fmt::layer().with_target(false).compact();

    let registry = tracing_subscriber::registry()
        .with(env_filter("info"))
        .with(stdout_layer);

    if let Some(writer) = configure_file_writer() {
        let file_layer = fmt::layer()
            .with_writer(writer)
            .with_target(true)
            .with_ansi(false)
            .compact();

        registry.with(file_layer).init();
    } else {
        registry.init();
    }
}

/// Install the CLI subscriber, which only writes to stderr.
pub fn init_cli_tracing() {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter("warn"))
        .with(stderr_layer)
        .init();
}

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Open the gateway log file; `None` leaves the server with console output only.
fn configure_file_writer() -> Option<NonBlocking> {
    if let Ok(path) = std::env::var("CODECHECK_LOG_FILE") {
        match std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
        {
            Ok(file) => {
                let (non_blocking, guard) = tracing_appender::non_blocking(file);
                let _ = LOG_GUARD.set(guard);
                Some(non_blocking)
            }
            Err(err) => {
                eprintln!("Failed to open log file {path}: {err}");
                None
            }
        }
    } else {
        if let Err(err) = std::fs::create_dir_all("logs") {
            eprintln!("Failed to create logs directory: {err}");
            return None;
        }
        let file_appender = tracing_appender::rolling::never("logs", "codecheck.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        let _ = LOG_GUARD.set(guard);
        Some(non_blocking)
    }
}
