use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::{error, info, warn};

use crate::api::http_api::HttpRemoteApi;
use crate::api::{Credentials, ProbeOutcome, RemoteApi};
use crate::config::refresher::{ProbePolicy, ServiceConfig};
use crate::error::{RefreshError, Stage};
use crate::secrets::google::GoogleSecretManager;
use crate::secrets::identity::Identity;
use crate::secrets::{SecretStore, TokenRefs};

/// How the returned token came to be.
#[derive(Debug)]
pub enum TokenStatus {
    /// cached token was accepted, nothing written
    Cached,
    /// new token exchanged and stored
    Refreshed,
    /// new token exchanged but the store write failed
    Unpersisted(RefreshError),
}

#[derive(Debug)]
pub struct FreshToken {
    pub value: String,
    pub status: TokenStatus,
}

impl FreshToken {
    pub fn is_persisted(&self) -> bool {
        !matches!(self.status, TokenStatus::Unpersisted(_))
    }
}

/// Probe-then-refresh over a secret store and the remote API.
///
/// No retries and no locking: concurrent callers may both refresh and the
/// last write wins.
#[derive(Debug, Clone)]
pub struct TokenProvider<S, A> {
    store: S,
    api: A,
    probe_policy: ProbePolicy,
}

impl TokenProvider<GoogleSecretManager, HttpRemoteApi> {
    /// Google Secret Manager + HTTP remote API, sharing one HTTP client.
    pub fn from_config(service_config: &ServiceConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(service_config.settings.http.timeout_ms))
            .build()
            .context("failed to build HTTP client")?;

        let store_config = &service_config.secret_store;
        let identity = Identity::new(store_config.identity.clone(), client.clone());
        let store = GoogleSecretManager::new(client.clone(), &store_config.base_url, identity);
        let api = HttpRemoteApi::new(client, &service_config.api);
        Ok(Self::new(store, api, service_config.api.probe))
    }
}

impl<S, A> TokenProvider<S, A>
where
    S: SecretStore + Sync,
    A: RemoteApi + Sync,
{
    pub fn new(store: S, api: A, probe_policy: ProbePolicy) -> Self {
        Self { store, api, probe_policy }
    }

    pub async fn ensure_fresh_token(&self, refs: &TokenRefs) -> Result<FreshToken, RefreshError> {
        // -------------------------------
        // 1. Cached token
        // -------------------------------
        let cached = self.store.get(&refs.token).await?;

        // -------------------------------
        // 2. Probe
        // -------------------------------
        match self.api.probe(&cached).await? {
            ProbeOutcome::Accepted => {
                info!(secret = %refs.token, "cached token accepted");
                return Ok(FreshToken { value: cached, status: TokenStatus::Cached });
            }
            ProbeOutcome::Rejected(status)
                if status.is_server_error() && self.probe_policy.abort_on_server_error =>
            {
                warn!(status = status.as_u16(), "probe hit a server error, refresh aborted");
                return Err(RefreshError::UpstreamRejection { stage: Stage::Probe, status });
            }
            ProbeOutcome::Rejected(status) => {
                info!(status = status.as_u16(), secret = %refs.token, "cached token rejected, refreshing");
            }
        }

        // -------------------------------
        // 3. Exchange and persist
        // -------------------------------
        let credentials = Credentials::new(
            self.store.get(&refs.client_id).await?,
            self.store.get(&refs.client_secret).await?,
        );
        let token = self.api.exchange(&credentials).await?;

        let status = match self.store.set(&refs.token, &token).await {
            Ok(()) => {
                info!(secret = %refs.token, "refreshed token stored");
                TokenStatus::Refreshed
            }
            Err(err) => {
                error!(secret = %refs.token, error = %err, "refreshed token could not be stored");
                TokenStatus::Unpersisted(err)
            }
        };

        Ok(FreshToken { value: token, status })
    }
}
