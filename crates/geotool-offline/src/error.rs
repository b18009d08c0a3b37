//! Error types for the offline controller

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OfflineError {
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Network request to {url} failed: {message}")]
    Network { url: String, message: String },

    #[error("Install failed: {asset} could not be cached ({reason})")]
    InstallFailed { asset: String, reason: String },

    #[error("Cannot activate before a successful install")]
    NotInstalled,

    #[error("Cache storage error: {0}")]
    Storage(String),

    #[error("Invalid push payload: {0}")]
    InvalidPayload(String),
}

impl From<serde_json::Error> for OfflineError {
    fn from(err: serde_json::Error) -> Self {
        OfflineError::InvalidPayload(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, OfflineError>;
