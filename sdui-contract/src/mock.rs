//! In-process [`DataLoader`] for tests and local demos.

use crate::error::LoaderError;
use crate::loader::{DataLoader, Page, QueryParams};
use async_trait::async_trait;
use sdui_model::HttpMethod;
use serde_json::Value;
use std::sync::{Mutex, MutexGuard};

/// A request the loader received.
#[derive(Debug, Clone, PartialEq)]
pub enum LoaderCall {
    Load {
        endpoint: String,
        params: QueryParams,
    },
    Submit {
        method: HttpMethod,
        endpoint: String,
        body: Value,
    },
    Delete {
        endpoint: String,
    },
}

/// Records every call and answers with canned responses.
#[derive(Debug, Default)]
pub struct RecordingLoader {
    page: Mutex<Page>,
    submit_response: Mutex<Value>,
    failure: Mutex<Option<LoaderError>>,
    calls: Mutex<Vec<LoaderCall>>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl RecordingLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers `load` with `page`.
    pub fn with_page(self, page: Page) -> Self {
        *lock(&self.page) = page;
        self
    }

    /// Answers `submit` with `response`.
    pub fn with_submit_response(self, response: Value) -> Self {
        *lock(&self.submit_response) = response;
        self
    }

    /// Makes every call fail with `error` until cleared.
    pub fn fail_with(&self, error: LoaderError) {
        *lock(&self.failure) = Some(error);
    }

    pub fn clear_failure(&self) {
        *lock(&self.failure) = None;
    }

    pub fn set_page(&self, page: Page) {
        *lock(&self.page) = page;
    }

    pub fn calls(&self) -> Vec<LoaderCall> {
        lock(&self.calls).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    fn record(&self, call: LoaderCall) -> Result<(), LoaderError> {
        lock(&self.calls).push(call);
        match lock(&self.failure).clone() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DataLoader for RecordingLoader {
    async fn load(&self, endpoint: &str, params: &QueryParams) -> Result<Page, LoaderError> {
        self.record(LoaderCall::Load {
            endpoint: endpoint.to_string(),
            params: params.clone(),
        })?;
        Ok(lock(&self.page).clone())
    }

    async fn submit(
        &self,
        method: HttpMethod,
        endpoint: &str,
        body: &Value,
    ) -> Result<Value, LoaderError> {
        self.record(LoaderCall::Submit {
            method,
            endpoint: endpoint.to_string(),
            body: body.clone(),
        })?;
        Ok(lock(&self.submit_response).clone())
    }

    async fn delete(&self, endpoint: &str) -> Result<(), LoaderError> {
        self.record(LoaderCall::Delete {
            endpoint: endpoint.to_string(),
        })
    }
}
