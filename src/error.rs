//! CoinMarketCap client error types

use thiserror::Error;

use crate::endpoint::Endpoint;
use crate::tier::Tier;

#[derive(Debug, Error)]
pub enum CmcError {
    /// The configured key tier is below what the endpoint requires.
    /// Raised before any network call and never suppressed.
    #[error("{endpoint} requires a {required} key or higher (configured key is {configured})")]
    TierViolation {
        endpoint: Endpoint,
        required: Tier,
        configured: Tier,
    },

    /// Non-200 HTTP response
    #[error("{status} {message}")]
    Request { status: u16, message: String },

    /// A 200 response whose body is not valid JSON
    #[error("Failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid query parameters: {0}")]
    InvalidParams(String),

    #[error("Missing configuration: {0}")]
    Config(String),

    #[error("Unknown key type: {0}")]
    UnknownTier(String),

    #[error("Unknown endpoint: {0}")]
    UnknownEndpoint(String),
}

impl From<reqwest::Error> for CmcError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl CmcError {
    pub fn is_tier_violation(&self) -> bool {
        matches!(self, Self::TierViolation { .. })
    }

    /// HTTP status for request failures
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Request { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type CmcResult<T> = Result<T, CmcError>;
