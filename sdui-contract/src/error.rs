//! Error types for the contract layer.
//!
//! These never cross the public boundary: the orchestrator and handlers
//! fold them into `EventResult::Error` / `ActionResult::Error`.

use sdui_model::ScreenEvent;
use thiserror::Error;

/// A failure reported by a [`DataLoader`](crate::DataLoader).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct LoaderError {
    pub message: String,
    /// HTTP status, when the failure came from a response.
    pub status: Option<u16>,
    /// Whether repeating the request may succeed.
    pub retryable: bool,
}

impl LoaderError {
    /// Connection-level failure. Always retryable.
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
            retryable: true,
        }
    }

    /// Non-success HTTP status. Server errors and 429 are retryable.
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: Some(status),
            retryable: status >= 500 || status == 429,
        }
    }

    /// The response could not be understood. Not retryable.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
            retryable: false,
        }
    }
}

/// Errors raised while executing a screen event.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("no contract registered for screen '{0}'")]
    UnknownScreen(String),

    #[error("screen '{screen_key}' has no endpoint for {event}")]
    NoEndpoint {
        screen_key: String,
        event: ScreenEvent,
    },

    #[error("screen '{0}' has no selected item to delete")]
    MissingItemId(String),

    #[error("screen '{screen_key}' has no custom handler '{handler_id}'")]
    NoCustomHandler {
        screen_key: String,
        handler_id: String,
    },

    #[error("request failed: {0}")]
    Transport(#[from] LoaderError),
}

impl OrchestratorError {
    /// Only transport failures are worth retrying.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(e) => e.retryable,
            _ => false,
        }
    }
}
