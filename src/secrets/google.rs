//! Google Secret Manager over its REST API.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use http::StatusCode;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{RefreshError, Stage};
use crate::secrets::identity::Identity;
use crate::secrets::{SecretRef, SecretStore};

#[derive(Debug, Serialize, Deserialize)]
pub struct SecretPayload {
    pub data: String, // base64
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PayloadEnvelope {
    pub payload: SecretPayload,
}

impl PayloadEnvelope {
    pub fn encode(value: &str) -> Self {
        Self { payload: SecretPayload { data: STANDARD.encode(value.as_bytes()) } }
    }

    pub fn decode(&self) -> Result<String, RefreshError> {
        let bytes = STANDARD
            .decode(self.payload.data.as_bytes())
            .map_err(|e| RefreshError::decode(Stage::SecretRead, e))?;
        String::from_utf8(bytes).map_err(|e| RefreshError::decode(Stage::SecretRead, e))
    }
}

#[derive(Debug, Clone)]
pub struct GoogleSecretManager {
    client: Client,
    base_url: String,
    identity: Identity,
}

impl GoogleSecretManager {
    pub fn new(client: Client, base_url: &str, identity: Identity) -> Self {
        Self { client, base_url: base_url.trim_end_matches('/').to_owned(), identity }
    }

    fn access_url(&self, secret: &SecretRef) -> String {
        format!(
            "{}/v1/projects/{}/secrets/{}/versions/latest:access",
            self.base_url, secret.project, secret.name
        )
    }

    fn add_version_url(&self, secret: &SecretRef) -> String {
        format!(
            "{}/v1/projects/{}/secrets/{}:addVersion",
            self.base_url, secret.project, secret.name
        )
    }

    async fn check_status(&self, stage: Stage, status: StatusCode) -> Result<(), RefreshError> {
        if status.is_success() {
            return Ok(());
        }
        if status == StatusCode::UNAUTHORIZED {
            warn!("secret store rejected identity token, dropping it");
            self.identity.invalidate().await;
        }
        Err(RefreshError::UpstreamRejection { stage, status })
    }
}

impl SecretStore for GoogleSecretManager {
    async fn get(&self, secret: &SecretRef) -> Result<String, RefreshError> {
        let bearer = self.identity.access_token().await?;
        debug!(secret = %secret, "reading latest secret version");

        let response = self
            .client
            .get(self.access_url(secret))
            .bearer_auth(bearer)
            .send()
            .await
            .map_err(RefreshError::transport(Stage::SecretRead))?;
        self.check_status(Stage::SecretRead, response.status()).await?;

        let body = response.text().await.map_err(RefreshError::transport(Stage::SecretRead))?;
        let envelope: PayloadEnvelope =
            serde_json::from_str(&body).map_err(|e| RefreshError::decode(Stage::SecretRead, e))?;
        envelope.decode()
    }

    async fn set(&self, secret: &SecretRef, value: &str) -> Result<(), RefreshError> {
        let bearer = self.identity.access_token().await?;

        let response = self
            .client
            .post(self.add_version_url(secret))
            .bearer_auth(bearer)
            .json(&PayloadEnvelope::encode(value))
            .send()
            .await
            .map_err(RefreshError::transport(Stage::SecretWrite))?;
        self.check_status(Stage::SecretWrite, response.status()).await?;

        info!(secret = %secret, "added new secret version");
        Ok(())
    }
}
