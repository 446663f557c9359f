use std::{env, fs};

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::cache::identity_cache::IdentityCache;
use crate::cache::identity_token::IdentityToken;
use crate::config::refresher::{IdentityConfig, SecretValue};
use crate::error::{RefreshError, Stage};
use crate::utils::constants::IDENTITY_SAFETY_MARGIN_SECS;

const METADATA_FLAVOR_HEADER: &str = "Metadata-Flavor";
const METADATA_FLAVOR_VALUE: &str = "Google";

#[derive(Debug, Deserialize)]
struct MetadataTokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: u64,
}

/// Supplies the bearer token used to call the secret store.
#[derive(Debug, Clone)]
pub struct Identity {
    config: IdentityConfig,
    client: Client,
    cache: IdentityCache,
}

impl Identity {
    pub fn new(config: IdentityConfig, client: Client) -> Self {
        Self { config, client, cache: IdentityCache::new() }
    }

    pub async fn access_token(&self) -> Result<String, RefreshError> {
        match &self.config {
            IdentityConfig::Static { token } => resolve_secret_value(token),
            IdentityConfig::Metadata { url } => {
                if let Some(token) = self.cache.get().await {
                    debug!("reusing cached identity token");
                    return Ok(token);
                }
                let token = self.fetch_metadata_token(url).await?;
                let value = token.value.to_owned();
                self.cache.set(token).await;
                Ok(value)
            }
        }
    }

    /// Forget the cached token, e.g. after the store answered 401.
    pub async fn invalidate(&self) {
        self.cache.clear().await;
    }

    async fn fetch_metadata_token(&self, url: &str) -> Result<IdentityToken, RefreshError> {
        let response = self
            .client
            .get(url)
            .header(METADATA_FLAVOR_HEADER, METADATA_FLAVOR_VALUE)
            .send()
            .await
            .map_err(RefreshError::transport(Stage::Identity))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RefreshError::UpstreamRejection { stage: Stage::Identity, status });
        }

        let body = response.text().await.map_err(RefreshError::transport(Stage::Identity))?;
        let parsed: MetadataTokenResponse =
            serde_json::from_str(&body).map_err(|e| RefreshError::decode(Stage::Identity, e))?;

        info!(expires_in = parsed.expires_in, "fetched identity token from metadata server");
        Ok(IdentityToken::expiring_in(
            parsed.access_token,
            parsed.expires_in,
            IDENTITY_SAFETY_MARGIN_SECS,
        ))
    }
}

pub fn resolve_secret_value(value: &SecretValue) -> Result<String, RefreshError> {
    match value {
        SecretValue::Literal { value } => Ok(value.to_owned()),
        SecretValue::FromEnv { from_env } => env::var(from_env)
            .map_err(|e| RefreshError::Identity(format!("env var '{}': {}", from_env, e))),
        SecretValue::FromFile { path } => fs::read_to_string(path)
            .map(|content| content.trim().to_string())
            .map_err(|e| RefreshError::Identity(format!("file '{}': {}", path, e))),
    }
}
