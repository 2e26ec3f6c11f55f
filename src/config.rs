//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::ClientConfig;
use crate::dashboard::{DashboardOptions, DEFAULT_HISTORY_CAPACITY};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub dashboard: DashboardConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Sensor server connection
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Unset means requests wait indefinitely
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_ms: None,
        }
    }
}

impl ServerConfig {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.base_url.clone(),
            request_timeout_ms: self.request_timeout_ms,
        }
    }
}

/// Polling, history and display settings
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_ms: u64,

    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,

    #[serde(default = "default_time_format")]
    pub time_format: String,

    #[serde(default = "default_override_message")]
    pub override_message_ms: u64,

    #[serde(default = "default_save_message")]
    pub save_message_ms: u64,

    /// Fixed terminal width; unset follows `COLUMNS`
    #[serde(default)]
    pub width: Option<usize>,

    #[serde(default = "default_color")]
    pub color: bool,
}

fn default_refresh_interval() -> u64 {
    5000 // 5 seconds
}

fn default_history_capacity() -> usize {
    DEFAULT_HISTORY_CAPACITY
}

fn default_time_format() -> String {
    "%H:%M:%S".to_string()
}

fn default_override_message() -> u64 {
    5000
}

fn default_save_message() -> u64 {
    3000
}

fn default_color() -> bool {
    true
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            refresh_interval_ms: default_refresh_interval(),
            history_capacity: default_history_capacity(),
            time_format: default_time_format(),
            override_message_ms: default_override_message(),
            save_message_ms: default_save_message(),
            width: None,
            color: default_color(),
        }
    }
}

impl DashboardConfig {
    pub fn options(&self) -> DashboardOptions {
        DashboardOptions {
            refresh_interval: Duration::from_millis(self.refresh_interval_ms.max(1)),
            history_capacity: self.history_capacity,
            time_format: self.time_format.clone(),
            override_message_duration: Duration::from_millis(self.override_message_ms),
            save_message_duration: Duration::from_millis(self.save_message_ms),
            ..DashboardOptions::default()
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,

    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment.
    ///
    /// Nothing is logged here since the subscriber is configured from the
    /// result; call [`Discovery::log`] once logging is up.
    pub fn discover() -> Discovery {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("aethernet").join("config.toml")),
            Some(PathBuf::from("/etc/aethernet/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        Self::discover_in(config_paths.into_iter().flatten())
    }

    fn discover_in(paths: impl IntoIterator<Item = PathBuf>) -> Discovery {
        let mut rejected = Vec::new();

        for path in paths {
            if !path.exists() {
                continue;
            }
            match Self::load_with_env(&path) {
                Ok(config) => {
                    return Discovery {
                        config,
                        loaded_from: Some(path),
                        rejected,
                    }
                }
                Err(e) => rejected.push((path, e)),
            }
        }

        Discovery {
            config: Self::from_env(),
            loaded_from: None,
            rejected,
        }
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key lookup (the process environment in practice)
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // Server overrides; AETHERNET_BASE_URL wins over the plain BASE_URL
        if let Some(url) = lookup("AETHERNET_BASE_URL").or_else(|| lookup("BASE_URL")) {
            self.server.base_url = url;
        }
        if let Some(timeout) = lookup("AETHERNET_REQUEST_TIMEOUT_MS") {
            if let Ok(ms) = timeout.parse() {
                self.server.request_timeout_ms = Some(ms);
            }
        }

        // Dashboard overrides
        if let Some(interval) = lookup("AETHERNET_REFRESH_INTERVAL_MS") {
            if let Ok(ms) = interval.parse() {
                self.dashboard.refresh_interval_ms = ms;
            }
        }
        if let Some(capacity) = lookup("AETHERNET_HISTORY_CAPACITY") {
            if let Ok(n) = capacity.parse() {
                self.dashboard.history_capacity = n;
            }
        }

        // Logging overrides
        if let Some(level) = lookup("AETHERNET_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("AETHERNET_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Outcome of searching the default config locations
#[derive(Debug)]
pub struct Discovery {
    pub config: Config,
    pub loaded_from: Option<PathBuf>,
    /// Files that exist but could not be loaded, in search order
    pub rejected: Vec<(PathBuf, ConfigError)>,
}

impl Discovery {
    /// Report where the config came from
    pub fn log(&self) {
        for (path, e) in &self.rejected {
            tracing::warn!("Failed to load config from {:?}: {}", path, e);
        }
        match &self.loaded_from {
            Some(path) => tracing::info!("Loaded config from {:?}", path),
            None => tracing::info!("Using default config with environment overrides"),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Failed to initialize logging: {0}")]
    Logging(String),
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Aethernet Dashboard Configuration
#
# Environment variables override these settings:
# - AETHERNET_BASE_URL (or BASE_URL)
# - AETHERNET_REQUEST_TIMEOUT_MS
# - AETHERNET_REFRESH_INTERVAL_MS
# - AETHERNET_HISTORY_CAPACITY
# - AETHERNET_LOG_LEVEL
# - AETHERNET_LOG_FORMAT

[server]
# Sensor server base URL
base_url = "http://localhost:5000"

# Per-request timeout in milliseconds (unset = wait indefinitely)
# request_timeout_ms = 10000

[dashboard]
# How often to poll /api/sensor-data (ms)
refresh_interval_ms = 5000

# Points kept per chart; older points are dropped
history_capacity = 120

# Chart timestamp label format (chrono strftime)
time_format = "%H:%M:%S"

# How long confirmations stay visible (ms)
override_message_ms = 5000
save_message_ms = 3000

# Fixed terminal width (unset = follow $COLUMNS)
# width = 100

# Colour the charts
color = true

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"

# Optional log file path (default: stderr)
# file = "/var/log/aethernet/dashboard.log"
"#
    .to_string()
}
