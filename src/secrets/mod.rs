//! Secret store seam
//!
//! The store holds the client credentials and acts as the token cache.

use std::fmt;
use std::future::Future;

use crate::error::RefreshError;

pub mod google;
pub mod identity;

/// Address of one secret in the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SecretRef {
    pub project: String,
    pub name: String,
}

impl SecretRef {
    pub fn new(project: &str, name: &str) -> Self {
        Self { project: project.to_owned(), name: name.to_owned() }
    }
}

impl fmt::Display for SecretRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "projects/{}/secrets/{}", self.project, self.name)
    }
}

/// The three secrets one refresh cycle touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRefs {
    pub client_id: SecretRef,
    pub client_secret: SecretRef,
    pub token: SecretRef,
}

pub trait SecretStore {
    /// Latest version of the secret, decoded to text.
    fn get(&self, secret: &SecretRef) -> impl Future<Output = Result<String, RefreshError>> + Send;

    /// Stores `value` as a new version of the secret.
    fn set(&self, secret: &SecretRef, value: &str) -> impl Future<Output = Result<(), RefreshError>> + Send;
}
