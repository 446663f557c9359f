use std::{fs, path::Path};

use anyhow::{anyhow, Context, Result};
use regex::Regex;
use tracing::{debug, error};

use crate::config::proc_validator;
use crate::config::refresher::ServiceConfig;
use crate::config::settings::LoggingConfig;

/// Load and validate config from YAML file
pub async fn file_to_config(path: &Path) -> Result<ServiceConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("cannot read config file '{}'", path.display()))?;

    let expanded = expand_env_vars(&content)?;
    parse_config(expanded).await
}

pub async fn parse_config(content: String) -> Result<ServiceConfig> {
    let mut service_config: ServiceConfig = serde_yaml::from_str(&content)
        .inspect_err(|e| error!("parse config error: {}", e))?;

    // Apply defaults
    if service_config.settings.logging.is_none() {
        service_config.settings.logging = Some(LoggingConfig::default());
    }
    service_config.api.root = service_config.api.root.trim_end_matches('/').to_owned();
    service_config.secret_store.base_url = service_config
        .secret_store
        .base_url
        .trim_end_matches('/')
        .to_owned();

    debug!("validation config ...");
    proc_validator::validate_service_config(&service_config)
        .map_err(|errors| anyhow!("config validation failed:\n  - {}", errors.join("\n  - ")))?;

    Ok(service_config)
}

/// Replaces `${VAR}` and `${VAR:default}` with the environment value.
/// Unset variables without a default expand to an empty string.
pub fn expand_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{(\w+)(?::([^\}]*))?\}")?;
    let expanded = re.replace_all(input, |caps: &regex::Captures| {
        let var = &caps[1];
        let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        std::env::var(var).unwrap_or_else(|_| default.to_string())
    });
    Ok(expanded.into_owned())
}
