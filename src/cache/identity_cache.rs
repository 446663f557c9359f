use std::sync::Arc;
use tokio::sync::RwLock;

use crate::cache::identity_token::IdentityToken;

/// Process-local slot for the secret store identity token.
#[derive(Debug, Clone, Default)]
pub struct IdentityCache {
    inner: Arc<RwLock<Option<IdentityToken>>>,
}

impl IdentityCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set(&self, token: IdentityToken) {
        *self.inner.write().await = Some(token);
    }

    /// Get token value if it exists and is not about to expire
    pub async fn get(&self) -> Option<String> {
        self.inner
            .read()
            .await
            .as_ref()
            .filter(|token| !token.should_update())
            .map(|token| token.value.to_owned())
    }

    pub async fn clear(&self) {
        *self.inner.write().await = None;
    }
}
