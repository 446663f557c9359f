use crate::helpers::time::now_u64;

/// Bearer token used against the secret store, with its expiry.
#[derive(Debug, Clone)]
pub struct IdentityToken {
    pub value: String,
    pub exp_unix_ts: u64, // UNIX TIMESTAMP
    /// reuse stops at this point
    pub refresh_at_unix_ts: u64,
}

impl IdentityToken {
    pub fn new(value: String, exp_unix_ts: u64, safety_margin_seconds: u64) -> Self {
        let refresh_at_unix_ts = exp_unix_ts.saturating_sub(safety_margin_seconds);
        Self { value, exp_unix_ts, refresh_at_unix_ts }
    }

    pub fn expiring_in(value: String, expires_in_seconds: u64, safety_margin_seconds: u64) -> Self {
        Self::new(value, now_u64() + expires_in_seconds, safety_margin_seconds)
    }

    /// Check if token should be fetched again
    pub fn should_update(&self) -> bool {
        now_u64() >= self.refresh_at_unix_ts
    }
}
