//! Config struct and loading logic.
//!
//! Priority (highest to lowest):
//! 1. CLI flags (applied by the binary)
//! 2. Environment variables
//! 3. `.fleetctl.toml` in the working directory
//! 4. `~/.config/fleetctl/config.toml` (global defaults, token store)
//! 5. Built-in defaults

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use crate::constants::{
    CONFIG_DIR, CONFIG_FILENAME, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, ENV_API_URL, ENV_FORMAT,
    ENV_TIMEOUT, ENV_TOKEN,
};
use crate::env::Env;
use crate::output::OutputFormat;

/// Errors during config loading and saving.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ParseFile {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("failed to write config file {path}: {source}")]
    WriteFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("config file {path} has a non-table [api] entry")]
    InvalidApiSection { path: PathBuf },
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub output: OutputConfig,
}

/// How to reach the API.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// API root that resource paths such as `users/me` are resolved against.
    pub base_url: String,
    /// DRF auth token. Requests go out unauthenticated without one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// How fetched data is printed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

impl Config {
    /// Load configuration with proper layering.
    ///
    /// Reads the global config, then `.fleetctl.toml` in `work_dir`, then
    /// applies environment variable overrides.
    pub fn load(work_dir: Option<&Path>, env: &Env) -> Result<Self, ConfigError> {
        Self::load_from(Self::global_config_path().as_deref(), work_dir, env)
    }

    /// [`Config::load`] with an explicit global config path.
    pub fn load_from(
        global_path: Option<&Path>,
        work_dir: Option<&Path>,
        env: &Env,
    ) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        // Layer 4: global config
        if let Some(global_path) = global_path {
            if global_path.exists() {
                debug!(path = %global_path.display(), "loading global config");
                let global = Self::load_file(global_path)?;
                config.merge(global);
            }
        }

        // Layer 3: local config
        if let Some(dir) = work_dir {
            let local_path = dir.join(CONFIG_FILENAME);
            if local_path.exists() {
                debug!(path = %local_path.display(), "loading local config");
                let local = Self::load_file(&local_path)?;
                config.merge(local);
            }
        }

        // Layer 2: environment variables
        config.apply_env_vars(env);

        Ok(config)
    }

    /// Load a config from a specific file.
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseFile {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Path of the global config file, if a config directory exists.
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(CONFIG_DIR).join("config.toml"))
    }

    /// A copy safe to print: the token is replaced by a marker.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.api.token.is_some() {
            copy.api.token = Some("[REDACTED]".to_string());
        }
        copy
    }

    /// Store `token` as `[api] token` in the config file at `path`.
    ///
    /// Other keys in the file are preserved; the file and its parent
    /// directory are created if needed.
    pub fn save_token(path: &Path, token: &str) -> Result<(), ConfigError> {
        let mut table = read_table(path)?;
        let api = table
            .entry("api")
            .or_insert(toml::Value::Table(toml::Table::new()));
        let Some(api) = api.as_table_mut() else {
            return Err(ConfigError::InvalidApiSection {
                path: path.to_path_buf(),
            });
        };
        api.insert("token".to_string(), toml::Value::String(token.to_string()));
        write_table(path, &table)
    }

    /// Remove `[api] token` from the config file at `path`.
    ///
    /// Returns whether a token was present. A missing file is not an error.
    pub fn clear_token(path: &Path) -> Result<bool, ConfigError> {
        if !path.exists() {
            return Ok(false);
        }
        let mut table = read_table(path)?;
        let removed = match table.get_mut("api").and_then(toml::Value::as_table_mut) {
            Some(api) => api.remove("token").is_some(),
            None => false,
        };
        if removed {
            write_table(path, &table)?;
        }
        Ok(removed)
    }

    /// Merge another config into this one (other takes precedence for non-default values).
    fn merge(&mut self, other: Config) {
        let default_api = ApiConfig::default();
        if other.api.base_url != default_api.base_url {
            self.api.base_url = other.api.base_url;
        }
        if other.api.token.is_some() {
            self.api.token = other.api.token;
        }
        if other.api.timeout_secs == 0 {
            warn!("ignoring [api] timeout_secs = 0");
        } else if other.api.timeout_secs != default_api.timeout_secs {
            self.api.timeout_secs = other.api.timeout_secs;
        }

        if other.output.format != OutputFormat::default() {
            self.output.format = other.output.format;
        }
    }

    /// Apply environment variable overrides.
    fn apply_env_vars(&mut self, env: &Env) {
        if let Some(val) = env.var(ENV_API_URL) {
            self.api.base_url = val;
        }
        if let Some(val) = env.var(ENV_TOKEN) {
            self.api.token = Some(val);
        }
        if let Some(val) = env.var(ENV_TIMEOUT) {
            match val.parse::<u64>() {
                Ok(secs) if secs > 0 => self.api.timeout_secs = secs,
                _ => warn!("ignoring invalid {ENV_TIMEOUT} value: {val}"),
            }
        }
        if let Some(val) = env.var(ENV_FORMAT) {
            match val.parse::<OutputFormat>() {
                Ok(format) => self.output.format = format,
                Err(_) => warn!("ignoring invalid {ENV_FORMAT} value: {val}"),
            }
        }
    }
}

fn read_table(path: &Path) -> Result<toml::Table, ConfigError> {
    if !path.exists() {
        return Ok(toml::Table::new());
    }
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;
    content.parse::<toml::Table>().map_err(|e| ConfigError::ParseFile {
        path: path.to_path_buf(),
        source: e,
    })
}

fn write_table(path: &Path, table: &toml::Table) -> Result<(), ConfigError> {
    let content = toml::to_string_pretty(table)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::WriteFile {
            path: path.to_path_buf(),
            source: e,
        })?;
    }
    std::fs::write(path, content).map_err(|e| ConfigError::WriteFile {
        path: path.to_path_buf(),
        source: e,
    })
}
