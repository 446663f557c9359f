use clap::ValueEnum;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::{fmt, EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use anyhow::Result;

use crate::config::refresher::ServiceConfig;
use crate::config::settings::{LogFormat, LoggingConfig};


#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    TRACE,
    DEBUG,
    INFO,
    WARN,
    ERROR,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match *self {
            LogLevel::TRACE => "trace",
            LogLevel::DEBUG => "debug",
            LogLevel::INFO => "info",
            LogLevel::WARN => "warn",
            LogLevel::ERROR => "error",
        }
    }
}

/// CLI / env level wins over the config file, config file wins over "info".
pub fn resolve_logging_config(service_config: &ServiceConfig, arg_log_level: Option<LogLevel>) -> LoggingConfig {
    let config = service_config.settings.logging.clone().unwrap_or_default();
    match arg_log_level {
        Some(level) => LoggingConfig::new(level.as_str().to_owned(), config.format),
        None => config,
    }
}

pub async fn run(service_config: &ServiceConfig, arg_log_level: Option<LogLevel>) -> Result<()> {
    let logging_config = resolve_logging_config(service_config, arg_log_level);
    init_logging(&logging_config);
    Ok(())
}


/// Initialize tracing with the desired config.
pub fn init_logging(cfg: &LoggingConfig) {
    let env_filter = EnvFilter::try_new(&cfg.level)
        .unwrap_or_else(|_| EnvFilter::new("info"));

    // Base layer: filter + writer
    let registry = tracing_subscriber::registry().with(env_filter);

    // Choose format layer
    match cfg.format {
        LogFormat::Json => {
            let layer = fmt::layer()
                .json()
                .with_timer(UtcTime::rfc_3339())
                .flatten_event(true) // flattens fields for CRI log parsers
                .with_ansi(false);

            let _ = registry.with(layer).try_init();
        }
        LogFormat::Compact => {
            let layer = fmt::layer()
                .compact()
                .with_timer(UtcTime::rfc_3339())
                .with_ansi(true);

            let _ = registry.with(layer).try_init();
        }
    };
}
