//! Remote API seam: token acceptance probe and client-credentials exchange.

use std::fmt;
use std::future::Future;

use http::StatusCode;

use crate::error::RefreshError;

pub mod http_api;

/// Client credentials as read from the secret store.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    pub fn new(client_id: String, client_secret: String) -> Self {
        Self { client_id, client_secret }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    Accepted,
    Rejected(StatusCode),
}

pub trait RemoteApi {
    /// Checks whether `token` is still accepted. Only a missing response is an error.
    fn probe(&self, token: &str) -> impl Future<Output = Result<ProbeOutcome, RefreshError>> + Send;

    /// Client-credentials grant, returns the new access token.
    fn exchange(&self, credentials: &Credentials) -> impl Future<Output = Result<String, RefreshError>> + Send;
}
