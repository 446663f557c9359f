//! Shared constants and invariants

pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 5000;

/// identity token is reused until this many seconds before its expiry
pub const IDENTITY_SAFETY_MARGIN_SECS: u64 = 60;

pub const DEFAULT_SECRET_MANAGER_URL: &str = "https://secretmanager.googleapis.com";
pub const DEFAULT_METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";

pub const DEFAULT_PROBE_PATH: &str = "/ws/v1/district/";
pub const DEFAULT_TOKEN_PATH: &str = "/oauth/access_token";

pub const GRANT_TYPE_CLIENT_CREDENTIALS: &str = "client_credentials";
pub const ACCESS_TOKEN_FIELD: &str = "access_token";
