//! API request handlers.

/// Liveness and loaded-tool report.
pub mod health;
/// The orchestration endpoint.
pub mod orchestrate;
