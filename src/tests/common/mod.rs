// tests/common/mod.rs
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use http::StatusCode;
use reqwest::Client;

use crate::api::{Credentials, ProbeOutcome, RemoteApi};
use crate::config::refresher::IdentityConfig;
use crate::config::refresher::SecretValue;
use crate::error::{RefreshError, Stage};
use crate::secrets::google::GoogleSecretManager;
use crate::secrets::identity::Identity;
use crate::secrets::{SecretRef, SecretStore, TokenRefs};

pub const PROJECT: &str = "test-project";
pub const IDENTITY_TOKEN: &str = "ya29.identity";

pub fn build_reqwest_client() -> Client {
    Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .expect("reqwest client")
}

pub fn token_refs() -> TokenRefs {
    TokenRefs {
        client_id: SecretRef::new(PROJECT, "api-client-id"),
        client_secret: SecretRef::new(PROJECT, "api-client-secret"),
        token: SecretRef::new(PROJECT, "api-access-token"),
    }
}

/// Secret Manager client authenticated with a fixed identity token.
pub fn static_secret_manager(base_url: &str) -> GoogleSecretManager {
    let client = build_reqwest_client();
    let identity = Identity::new(
        IdentityConfig::Static { token: SecretValue::Literal { value: IDENTITY_TOKEN.to_owned() } },
        client.clone(),
    );
    GoogleSecretManager::new(client, base_url, identity)
}

/// In-memory secret store recording every write attempt.
#[derive(Debug, Clone, Default)]
pub struct FakeSecretStore {
    values: Arc<Mutex<HashMap<SecretRef, String>>>,
    writes: Arc<Mutex<Vec<(SecretRef, String)>>>,
    fail_writes_with: Option<StatusCode>,
}

impl FakeSecretStore {
    pub fn seeded(refs: &TokenRefs, token: &str) -> Self {
        let store = Self::default();
        store.put(&refs.client_id, "client-123");
        store.put(&refs.client_secret, "s3cr3t");
        store.put(&refs.token, token);
        store
    }

    pub fn failing_writes(mut self, status: StatusCode) -> Self {
        self.fail_writes_with = Some(status);
        self
    }

    pub fn put(&self, secret: &SecretRef, value: &str) {
        self.values.lock().unwrap().insert(secret.clone(), value.to_owned());
    }

    pub fn value(&self, secret: &SecretRef) -> Option<String> {
        self.values.lock().unwrap().get(secret).cloned()
    }

    pub fn writes(&self) -> Vec<(SecretRef, String)> {
        self.writes.lock().unwrap().clone()
    }
}

impl SecretStore for FakeSecretStore {
    async fn get(&self, secret: &SecretRef) -> Result<String, RefreshError> {
        self.value(secret).ok_or(RefreshError::UpstreamRejection {
            stage: Stage::SecretRead,
            status: StatusCode::NOT_FOUND,
        })
    }

    async fn set(&self, secret: &SecretRef, value: &str) -> Result<(), RefreshError> {
        self.writes.lock().unwrap().push((secret.clone(), value.to_owned()));
        if let Some(status) = self.fail_writes_with {
            return Err(RefreshError::UpstreamRejection { stage: Stage::SecretWrite, status });
        }
        self.put(secret, value);
        Ok(())
    }
}

/// Remote API answering every probe with one status and every exchange with one token.
#[derive(Debug, Clone)]
pub struct ScriptedApi {
    probe_status: StatusCode,
    new_token: Option<String>,
    probes: Arc<AtomicUsize>,
    exchanges: Arc<Mutex<Vec<Credentials>>>,
}

impl ScriptedApi {
    pub fn new(probe_status: StatusCode, new_token: Option<&str>) -> Self {
        Self {
            probe_status,
            new_token: new_token.map(str::to_owned),
            probes: Arc::new(AtomicUsize::new(0)),
            exchanges: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn probes(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }

    pub fn exchanges(&self) -> Vec<Credentials> {
        self.exchanges.lock().unwrap().clone()
    }
}

impl RemoteApi for ScriptedApi {
    async fn probe(&self, _token: &str) -> Result<ProbeOutcome, RefreshError> {
        self.probes.fetch_add(1, Ordering::SeqCst);
        if self.probe_status == StatusCode::OK {
            Ok(ProbeOutcome::Accepted)
        } else {
            Ok(ProbeOutcome::Rejected(self.probe_status))
        }
    }

    async fn exchange(&self, credentials: &Credentials) -> Result<String, RefreshError> {
        self.exchanges.lock().unwrap().push(credentials.clone());
        self.new_token.clone().ok_or(RefreshError::MissingField {
            stage: Stage::Exchange,
            field: "access_token",
        })
    }
}
