#![deny(missing_docs)]

//! Request gateway for the code-check product: knowledge-base analysis, PDF extraction, and
//! stored record lookup behind one JSON HTTP surface.

/// Caller-side analysis action.
pub mod action;
/// HTTP routing and handlers.
pub mod api;
/// Adapters for the knowledge-base engine, extraction engine, and record store.
pub mod backends;
/// Single-endpoint JSON client for outbound calls.
pub mod client;
/// Environment-driven configuration management.
pub mod config;
/// Response envelopes shared by the routes and the action.
pub mod envelope;
/// Structured logging and tracing setup.
pub mod logging;
/// Per-route request counters.
pub mod metrics;
