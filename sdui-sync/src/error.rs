//! Error types for the sync layer.

use sdui_contract::LoaderError;
use sdui_storage::StorageError;
use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur while loading screens or syncing bundles.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Connection-level failure.
    #[error("network error: {0}")]
    Network(String),

    /// The request exceeded the client timeout.
    #[error("operation timed out")]
    Timeout,

    /// The server answered with a non-success status.
    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Storage error.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// The transport could not be configured.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl SyncError {
    /// Whether repeating the operation may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout => true,
            Self::Status { status, .. } => *status >= 500 || *status == 429,
            Self::Serialization(_) | Self::Storage(_) | Self::Config(_) => false,
        }
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if let Some(status) = e.status() {
            Self::Status {
                status: status.as_u16(),
                body: e.to_string(),
            }
        } else {
            Self::Network(e.to_string())
        }
    }
}

impl From<SyncError> for LoaderError {
    fn from(e: SyncError) -> Self {
        match e {
            SyncError::Status { status, body } => {
                let message = if body.is_empty() {
                    format!("server returned {status}")
                } else {
                    body
                };
                LoaderError::status(status, message)
            }
            SyncError::Network(_) | SyncError::Timeout => LoaderError::network(e.to_string()),
            other => LoaderError::invalid(other.to_string()),
        }
    }
}
