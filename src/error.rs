use std::fmt;

use http::StatusCode;
use thiserror::Error;

/// Where in the refresh sequence a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    SecretRead,
    SecretWrite,
    Probe,
    Exchange,
    Identity,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match *self {
            Stage::SecretRead => "secret read",
            Stage::SecretWrite => "secret write",
            Stage::Probe => "probe",
            Stage::Exchange => "exchange",
            Stage::Identity => "identity",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum RefreshError {
    /// No HTTP response was received.
    #[error("{stage}: transport failure: {source}")]
    Transport {
        stage: Stage,
        #[source]
        source: reqwest::Error,
    },

    /// Payload could not be decoded (base64, utf-8 or json).
    #[error("{stage}: malformed payload: {reason}")]
    Decode { stage: Stage, reason: String },

    #[error("{stage}: upstream rejected request with status {status}")]
    UpstreamRejection { stage: Stage, status: StatusCode },

    #[error("{stage}: response has no '{field}' field")]
    MissingField { stage: Stage, field: &'static str },

    #[error("identity token unavailable: {0}")]
    Identity(String),
}

impl RefreshError {
    pub fn transport(stage: Stage) -> impl FnOnce(reqwest::Error) -> Self {
        move |source| RefreshError::Transport { stage, source }
    }

    pub fn decode(stage: Stage, reason: impl fmt::Display) -> Self {
        RefreshError::Decode { stage, reason: reason.to_string() }
    }

    pub fn stage(&self) -> Stage {
        match self {
            RefreshError::Transport { stage, .. }
            | RefreshError::Decode { stage, .. }
            | RefreshError::UpstreamRejection { stage, .. }
            | RefreshError::MissingField { stage, .. } => *stage,
            RefreshError::Identity(_) => Stage::Identity,
        }
    }
}
