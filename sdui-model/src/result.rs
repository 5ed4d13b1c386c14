//! Tagged outcomes returned across public boundaries instead of errors.

use serde_json::{Map, Value};
use std::collections::HashMap;

/// Progress of an asynchronous load.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Loading,
    Success(T),
    Failure { message: String, retry: bool },
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn success(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }
}

/// Outcome of running a [`ScreenEvent`](crate::ScreenEvent) through a contract.
#[derive(Debug, Clone, PartialEq)]
pub enum EventResult {
    /// Rows loaded by a read event. `extra` holds the other top-level
    /// fields of the list response.
    Success {
        items: Vec<Value>,
        has_more: bool,
        extra: Map<String, Value>,
    },
    /// Response of a create/update submission, after the contract's hook.
    Submitted { response: Value },
    NavigateTo {
        screen_key: String,
        params: HashMap<String, String>,
    },
    /// A delete the caller must confirm before it is executed.
    PendingDelete { item_id: String, endpoint: String },
    /// A confirmed delete went through.
    Deleted { item_id: String },
    PermissionDenied { permission: String },
    Error { message: String, retry: bool },
    NoOp,
}

impl EventResult {
    pub fn error(message: impl Into<String>, retry: bool) -> Self {
        Self::Error {
            message: message.into(),
            retry,
        }
    }

    pub fn navigate(screen_key: impl Into<String>) -> Self {
        Self::NavigateTo {
            screen_key: screen_key.into(),
            params: HashMap::new(),
        }
    }

    /// A page of rows with no extra fields.
    pub fn items(items: Vec<Value>, has_more: bool) -> Self {
        Self::Success {
            items,
            has_more,
            extra: Map::new(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

/// Outcome of executing an [`ActionDefinition`](crate::ActionDefinition).
#[derive(Debug, Clone, PartialEq)]
pub enum ActionResult {
    Success {
        message: Option<String>,
        data: Option<Value>,
    },
    NavigateTo {
        screen_key: String,
        params: HashMap<String, String>,
    },
    NavigateBack,
    /// The screen should reload its data.
    Refresh,
    Error { message: String, retry: bool },
    Logout,
    Cancelled,
}

impl ActionResult {
    pub fn ok() -> Self {
        Self::Success {
            message: None,
            data: None,
        }
    }

    pub fn error(message: impl Into<String>, retry: bool) -> Self {
        Self::Error {
            message: message.into(),
            retry,
        }
    }

    pub fn navigate(screen_key: impl Into<String>) -> Self {
        Self::NavigateTo {
            screen_key: screen_key.into(),
            params: HashMap::new(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}
