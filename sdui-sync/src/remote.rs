//! HTTP transports against the screen-config and sync backend.

use crate::delta::SyncApi;
use crate::error::{SyncError, SyncResult};
use crate::loader::ScreenLoader;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, Url};
use sdui_contract::{DataLoader, LoaderError, Page, QueryParams};
use sdui_model::{
    DeltaSyncRequest, DeltaSyncResponse, HttpMethod, NavigationDefinition, ScreenDefinition,
    UserDataBundle,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Where and how to reach the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// e.g. `https://api.example.com`. No trailing slash needed.
    pub base_url: String,
    /// Target platform sent when resolving screens (`android`, `ios`, `web`).
    pub platform: Option<String>,
    pub timeout_secs: u64,
    /// Static token sent as `Authorization: Bearer`.
    pub bearer_token: Option<String>,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            platform: None,
            timeout_secs: 30,
            bearer_token: None,
        }
    }
}

/// Shared reqwest plumbing.
#[derive(Debug, Clone)]
struct HttpClient {
    config: RemoteConfig,
    client: Client,
}

impl HttpClient {
    fn new(config: RemoteConfig) -> SyncResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SyncError::Config(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { config, client })
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// `path` with one more percent-encoded segment appended.
    fn segment_url(&self, path: &str, segment: &str) -> SyncResult<String> {
        let mut url = Url::parse(&self.url(path))
            .map_err(|e| SyncError::Config(format!("invalid base URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| SyncError::Config("base URL cannot take path segments".into()))?
            .pop_if_empty()
            .push(segment);
        Ok(url.into())
    }

    fn request(&self, method: HttpMethod, path: &str) -> RequestBuilder {
        let url = self.url(path);
        debug!(%method, %url, "HTTP request");
        let builder = match method {
            HttpMethod::Get => self.client.get(url),
            HttpMethod::Post => self.client.post(url),
            HttpMethod::Put => self.client.put(url),
            HttpMethod::Delete => self.client.delete(url),
        };
        match &self.config.bearer_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Sends and maps non-success statuses to [`SyncError::Status`].
    async fn send(&self, builder: RequestBuilder) -> SyncResult<Response> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(SyncError::Status {
            status: status.as_u16(),
            body,
        })
    }

    async fn json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> SyncResult<T> {
        let text = self.send(builder).await?.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Response body as JSON, `Null` when empty.
    async fn value(&self, builder: RequestBuilder) -> SyncResult<Value> {
        let text = self.send(builder).await?.text().await?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

/// Loads screen definitions from `/v1/screen-config`.
#[derive(Debug, Clone)]
pub struct RemoteScreenLoader {
    http: HttpClient,
}

impl RemoteScreenLoader {
    pub fn new(config: RemoteConfig) -> SyncResult<Self> {
        Ok(Self {
            http: HttpClient::new(config)?,
        })
    }
}

#[async_trait]
impl ScreenLoader for RemoteScreenLoader {
    async fn load_screen(&self, screen_key: &str) -> SyncResult<ScreenDefinition> {
        let url = self
            .http
            .segment_url("/v1/screen-config/resolve/key", screen_key)?;
        let mut request = self.http.request(HttpMethod::Get, &url);
        if let Some(platform) = &self.http.config.platform {
            request = request.query(&[("platform", platform)]);
        }
        self.http.json(request).await
    }

    async fn load_navigation(&self) -> SyncResult<NavigationDefinition> {
        let request = self
            .http
            .request(HttpMethod::Get, "/v1/screen-config/navigation");
        self.http.json(request).await
    }
}

/// Full and delta bundle sync over `/v1/sync`.
#[derive(Debug, Clone)]
pub struct RemoteSyncApi {
    http: HttpClient,
}

impl RemoteSyncApi {
    pub fn new(config: RemoteConfig) -> SyncResult<Self> {
        Ok(Self {
            http: HttpClient::new(config)?,
        })
    }
}

#[async_trait]
impl SyncApi for RemoteSyncApi {
    async fn full_sync(&self) -> SyncResult<UserDataBundle> {
        let request = self.http.request(HttpMethod::Get, "/v1/sync/bundle");
        self.http.json(request).await
    }

    async fn delta_sync(&self, request: &DeltaSyncRequest) -> SyncResult<DeltaSyncResponse> {
        let builder = self
            .http
            .request(HttpMethod::Post, "/v1/sync/delta")
            .json(request);
        self.http.json(builder).await
    }
}

/// [`DataLoader`] for screen data endpoints.
#[derive(Debug, Clone)]
pub struct HttpDataLoader {
    http: HttpClient,
}

impl HttpDataLoader {
    pub fn new(config: RemoteConfig) -> SyncResult<Self> {
        Ok(Self {
            http: HttpClient::new(config)?,
        })
    }
}

#[async_trait]
impl DataLoader for HttpDataLoader {
    async fn load(&self, endpoint: &str, params: &QueryParams) -> Result<Page, LoaderError> {
        let request = self.http.request(HttpMethod::Get, endpoint).query(params);
        let body = self.http.value(request).await?;
        Ok(Page::from_response(body))
    }

    async fn submit(
        &self,
        method: HttpMethod,
        endpoint: &str,
        body: &Value,
    ) -> Result<Value, LoaderError> {
        let request = self.http.request(method, endpoint).json(body);
        Ok(self.http.value(request).await?)
    }

    async fn delete(&self, endpoint: &str) -> Result<(), LoaderError> {
        let request = self.http.request(HttpMethod::Delete, endpoint);
        self.http.send(request).await?;
        Ok(())
    }
}
