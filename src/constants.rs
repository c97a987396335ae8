//! App-wide constants.
//!
//! Centralises the tool name, config paths, environment variable names,
//! and API defaults so a rename only requires changing this file.

/// Display name of the tool (lowercase).
pub const APP_NAME: &str = "fleetctl";

/// Crate version, as reported by `fleetctl version`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Compilation target triple, exported by `build.rs`.
pub const TARGET: &str = env!("TARGET");

/// `User-Agent` header sent with every API request.
pub const USER_AGENT: &str = concat!("fleetctl/", env!("CARGO_PKG_VERSION"));

/// Local config filename (e.g. `.fleetctl.toml` in the working directory).
pub const CONFIG_FILENAME: &str = ".fleetctl.toml";

/// Directory name under `~/.config/` for global config.
pub const CONFIG_DIR: &str = "fleetctl";

/// API root used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/";

/// Request timeout in seconds used when nothing else is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ── Environment variable names ──────────────────────────────────────

pub const ENV_API_URL: &str = "FLEETCTL_API_URL";
pub const ENV_TOKEN: &str = "FLEETCTL_TOKEN";
pub const ENV_TIMEOUT: &str = "FLEETCTL_TIMEOUT";
pub const ENV_FORMAT: &str = "FLEETCTL_FORMAT";
pub const ENV_LOG: &str = "FLEETCTL_LOG";
