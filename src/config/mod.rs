//! Configuration loading and layering.
//!
//! Handles `.fleetctl.toml` loading, environment variable resolution,
//! and the global token store used by `login` / `logout`.

pub mod loader;

pub use loader::{ApiConfig, Config, ConfigError, OutputConfig};
