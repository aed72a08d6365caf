use thiserror::Error;

use crate::session::SessionError;

/// Failure of a call to the registration server.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The server rejected the token. The session has already been expired.
    #[error("session is no longer valid, please log in again")]
    Unauthorized,

    /// `404`. The existing-application endpoints use it to say "none yet".
    #[error("not found: {0}")]
    NotFound(String),

    #[error("server responded with {status}: {detail}")]
    Status { status: u16, detail: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("failed to decode server response: {0}")]
    Decode(String),

    /// The category has no such endpoint, e.g. cancelling a trail application.
    #[error("operation not supported: {0}")]
    Unsupported(&'static str),

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl ApiError {
    /// Whether the failure ended the session.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
