use http::StatusCode;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::api::{Credentials, ProbeOutcome, RemoteApi};
use crate::config::refresher::ApiConfig;
use crate::error::{RefreshError, Stage};
use crate::utils::constants::{ACCESS_TOKEN_FIELD, GRANT_TYPE_CLIENT_CREDENTIALS};

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct HttpRemoteApi {
    client: Client,
    probe_url: String,
    token_url: String,
}

impl HttpRemoteApi {
    pub fn new(client: Client, cfg: &ApiConfig) -> Self {
        let root = cfg.root.trim_end_matches('/');
        Self {
            client,
            probe_url: format!("{}{}", root, cfg.probe_path),
            token_url: format!("{}{}", root, cfg.token_path),
        }
    }
}

impl RemoteApi for HttpRemoteApi {
    async fn probe(&self, token: &str) -> Result<ProbeOutcome, RefreshError> {
        let response = self
            .client
            .get(&self.probe_url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(RefreshError::transport(Stage::Probe))?;

        let status = response.status();
        debug!(status = status.as_u16(), "probe answered");
        if status == StatusCode::OK {
            Ok(ProbeOutcome::Accepted)
        } else {
            Ok(ProbeOutcome::Rejected(status))
        }
    }

    async fn exchange(&self, credentials: &Credentials) -> Result<String, RefreshError> {
        let response = self
            .client
            .post(&self.token_url)
            .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
            .form(&[("grant_type", GRANT_TYPE_CLIENT_CREDENTIALS)])
            .send()
            .await
            .map_err(RefreshError::transport(Stage::Exchange))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RefreshError::UpstreamRejection { stage: Stage::Exchange, status });
        }

        let body = response.text().await.map_err(RefreshError::transport(Stage::Exchange))?;
        let parsed: TokenResponse =
            serde_json::from_str(&body).map_err(|e| RefreshError::decode(Stage::Exchange, e))?;

        match parsed.access_token {
            Some(token) if !token.is_empty() => {
                info!("exchanged client credentials for a new access token");
                Ok(token)
            }
            _ => Err(RefreshError::MissingField { stage: Stage::Exchange, field: ACCESS_TOKEN_FIELD }),
        }
    }
}
