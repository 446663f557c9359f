//! Configuration validation with aggregated errors.
//! - Aggregates all issues into Vec<String>
//! - secret names must be present and distinct, the token secret must never
//!   alias a credential secret
//! - API root must be an absolute http(s) URL, paths must start with '/'
//! - logging level and http timeout sanity

use std::collections::HashSet;

use reqwest::Url;
use tracing::{error, info};

use crate::config::refresher::{ApiConfig, IdentityConfig, SecretStoreConfig, SecretValue, ServiceConfig};
use crate::config::settings::SettingsConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Public entrypoint: returns Ok(()) or Err(Vec<String>) containing all issues.
pub fn validate_service_config(cfg: &ServiceConfig) -> Result<(), Vec<String>> {
    let mut errors: Vec<String> = Vec::new();

    validate_settings(&cfg.settings, &mut errors);
    validate_secret_store(&cfg.secret_store, &mut errors);
    validate_api(&cfg.api, &mut errors);

    if errors.is_empty() {
        info!("config validation passed");
        Ok(())
    } else {
        for e in &errors {
            error!("config: {}", e);
        }
        Err(errors)
    }
}

fn validate_settings(settings: &SettingsConfig, errors: &mut Vec<String>) {
    if let Some(logging) = &settings.logging {
        if !LOG_LEVELS.contains(&logging.level.to_lowercase().as_str()) {
            errors.push(format!(
                "settings.logging.level '{}' is not one of {:?}",
                logging.level, LOG_LEVELS
            ));
        }
    }
    if settings.http.timeout_ms == 0 {
        errors.push("settings.http.timeout_ms must be > 0".to_string());
    }
}

fn validate_secret_store(store: &SecretStoreConfig, errors: &mut Vec<String>) {
    if store.project.trim().is_empty() {
        errors.push("secret_store.project must not be empty".to_string());
    }
    validate_url("secret_store.base_url", &store.base_url, errors);

    let names = [
        ("client_id", &store.secrets.client_id),
        ("client_secret", &store.secrets.client_secret),
        ("token", &store.secrets.token),
    ];
    let mut seen = HashSet::new();
    for (field, name) in names {
        if name.trim().is_empty() {
            errors.push(format!("secret_store.secrets.{} must not be empty", field));
        } else if !seen.insert(name.as_str()) {
            errors.push(format!(
                "secret_store.secrets.{} '{}' is already used by another secret",
                field, name
            ));
        }
    }

    match &store.identity {
        IdentityConfig::Metadata { url } => {
            validate_url("secret_store.identity.url", url, errors);
        }
        IdentityConfig::Static { token } => match token {
            SecretValue::Literal { value } if value.is_empty() => {
                errors.push("secret_store.identity.token.value must not be empty".to_string());
            }
            SecretValue::FromEnv { from_env } if from_env.is_empty() => {
                errors.push("secret_store.identity.token.from_env must name a variable".to_string());
            }
            SecretValue::FromFile { path } if path.is_empty() => {
                errors.push("secret_store.identity.token.path must not be empty".to_string());
            }
            _ => {}
        },
    }
}

fn validate_api(api: &ApiConfig, errors: &mut Vec<String>) {
    validate_url("api.root", &api.root, errors);
    for (field, path) in [("probe_path", &api.probe_path), ("token_path", &api.token_path)] {
        if !path.starts_with('/') {
            errors.push(format!("api.{} '{}' must start with '/'", field, path));
        }
    }
}

fn validate_url(field: &str, value: &str, errors: &mut Vec<String>) {
    match Url::parse(value) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(format!(
            "{} '{}' has unsupported scheme '{}'",
            field,
            value,
            url.scheme()
        )),
        Err(e) => errors.push(format!("{} '{}' is not a valid URL: {}", field, value, e)),
    }
}
