//! # Token Refresher Library
//!
//! Keeps one OAuth2 client-credentials access token fresh. The token lives in
//! Google Secret Manager next to the client credentials; each run probes the
//! cached token and only exchanges credentials when the remote API rejects it.
//!
//! Modules:
//! - `config` — service configuration, loading and validation
//! - `secrets` — secret store seam, Google Secret Manager client, identity
//! - `api` — remote API seam: probe and client-credentials exchange
//! - `provider` — the probe-then-refresh protocol
//! - `cache` — identity token reuse within one process

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod helpers;
pub mod provider;
pub mod secrets;
#[cfg(test)]
mod tests;
pub mod utils;


pub use crate::config::refresher::ServiceConfig;
pub use crate::error::{RefreshError, Stage};
pub use crate::provider::token_provider::{FreshToken, TokenProvider, TokenStatus};
