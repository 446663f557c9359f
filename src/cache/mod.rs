pub mod identity_cache;
pub mod identity_token;
