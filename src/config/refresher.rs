use serde::Deserialize;

use crate::config::settings::SettingsConfig;
use crate::secrets::{SecretRef, TokenRefs};
use crate::utils::constants::{
    DEFAULT_METADATA_TOKEN_URL, DEFAULT_PROBE_PATH, DEFAULT_SECRET_MANAGER_URL, DEFAULT_TOKEN_PATH,
};

/// ================================
/// Full service configuration
/// ================================
///
/// The refresh protocol assumes a single caller per token secret: two
/// processes running against the same `secret_store.secrets.token` may both
/// refresh, and the last write wins.
#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    #[serde(default)]
    pub settings: SettingsConfig,
    pub secret_store: SecretStoreConfig,
    pub api: ApiConfig,
}

/// ================================
/// Secret store
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct SecretStoreConfig {
    pub project: String,
    #[serde(default = "default_secret_manager_url")]
    pub base_url: String,
    #[serde(default)]
    pub identity: IdentityConfig,
    pub secrets: SecretNames,
}

impl SecretStoreConfig {
    pub fn token_refs(&self) -> TokenRefs {
        TokenRefs {
            client_id: SecretRef::new(&self.project, &self.secrets.client_id),
            client_secret: SecretRef::new(&self.project, &self.secrets.client_secret),
            token: SecretRef::new(&self.project, &self.secrets.token),
        }
    }
}

/// Names of the three secrets under `project`
#[derive(Debug, Deserialize, Clone)]
pub struct SecretNames {
    pub client_id: String,
    pub client_secret: String,
    pub token: String,
}

/// How the bearer token for the secret store is obtained
#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IdentityConfig {
    /// GCE / GKE / Cloud Run metadata server
    Metadata {
        #[serde(default = "default_metadata_url")]
        url: String,
    },
    Static {
        token: SecretValue,
    },
}

impl Default for IdentityConfig {
    fn default() -> Self {
        IdentityConfig::Metadata { url: default_metadata_url() }
    }
}

/// Value sources
#[derive(Debug, Deserialize, Clone)]
#[serde(untagged)]
pub enum SecretValue {
    Literal {
        value: String,
    },
    FromEnv {
        from_env: String,
    },
    FromFile {
        path: String,
    },
}

/// ================================
/// Remote API
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// scheme + host (+ optional base path), no trailing slash needed
    pub root: String,
    #[serde(default = "default_probe_path")]
    pub probe_path: String,
    #[serde(default = "default_token_path")]
    pub token_path: String,
    #[serde(default)]
    pub probe: ProbePolicy,
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProbePolicy {
    /// 5xx from the probe aborts instead of triggering a refresh
    #[serde(default)]
    pub abort_on_server_error: bool,
}

fn default_secret_manager_url() -> String {
    DEFAULT_SECRET_MANAGER_URL.to_string()
}

fn default_metadata_url() -> String {
    DEFAULT_METADATA_TOKEN_URL.to_string()
}

fn default_probe_path() -> String {
    DEFAULT_PROBE_PATH.to_string()
}

fn default_token_path() -> String {
    DEFAULT_TOKEN_PATH.to_string()
}
