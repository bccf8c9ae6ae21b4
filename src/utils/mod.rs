//! Configuration utilities.

/// `relay.toml` loading, defaults and validation.
pub mod toml_config;
