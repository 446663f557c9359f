use serde::Deserialize;

use crate::utils::constants::DEFAULT_HTTP_TIMEOUT_MS;

/// ================================
/// Global service-wide settings
/// ================================
#[derive(Debug, Deserialize, Clone, Default)]
pub struct SettingsConfig {
    pub logging: Option<LoggingConfig>,
    #[serde(default)]
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    /// applies to every request: secret store, identity, probe and exchange
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_ms: default_timeout_ms() }
    }
}

/// ================================
/// Logging
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String, // allowed: trace, debug, info, warn, error
    #[serde(default)]
    pub format: LogFormat,
}

impl LoggingConfig {
    pub fn new(level: String, format: LogFormat) -> Self {
        Self { level, format }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::new(default_log_level(), LogFormat::default())
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Compact,
}

fn default_timeout_ms() -> u64 {
    DEFAULT_HTTP_TIMEOUT_MS
}

fn default_log_level() -> String {
    "info".to_string()
}
