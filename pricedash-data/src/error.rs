use serde::{Deserialize, Serialize};
use thiserror::Error;

/// All errors generated in `pricedash-data`.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize, Serialize, Error)]
pub enum FetchError {
    #[error("invalid price API url: {0}")]
    InvalidUrl(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("HTTP request timed out: {0}")]
    Timeout(String),

    #[error("price API responded with HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("failed to decode price API response: {0}")]
    Decode(String),
}

impl FetchError {
    /// Determine if the request failed before the price API produced a response.
    #[allow(clippy::match_like_matches_macro)]
    pub fn is_transport(&self) -> bool {
        match self {
            FetchError::Http(_) | FetchError::Timeout(_) => true,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_timeout() {
            Self::Timeout(value.to_string())
        } else if value.is_decode() {
            Self::Decode(value.to_string())
        } else {
            Self::Http(value.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(value: serde_json::Error) -> Self {
        Self::Decode(value.to_string())
    }
}

impl From<url::ParseError> for FetchError {
    fn from(value: url::ParseError) -> Self {
        Self::InvalidUrl(value.to_string())
    }
}
