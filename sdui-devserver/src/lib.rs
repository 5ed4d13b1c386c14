//! Fixture-backed backend for local client development.
//!
//! Serves the screen-config and sync endpoints from a directory:
//!
//! ```text
//! fixtures/
//!   screens/*.json      one ScreenDefinition per file
//!   navigation.json     NavigationDefinition (optional)
//!   menu.json           [MenuItem] (optional)
//!   permissions.json    ["resource:verb", ...] (optional)
//!   contexts.json       [UserContext] (optional)
//! ```

use axum::extract::{Path as UrlPath, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use sdui_model::{
    BucketDelta, BucketKey, DeltaSyncRequest, DeltaSyncResponse, MenuItem, NavigationDefinition,
    ScreenBundleEntry, ScreenDefinition, UserContext, UserDataBundle,
};
use sdui_types::content_hash;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

pub type DevServerResult<T> = Result<T, DevServerError>;

#[derive(Debug, Error)]
pub enum DevServerError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("duplicate screen key '{0}' in fixtures")]
    DuplicateScreen(String),

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevServerConfig {
    pub bind: SocketAddr,
    pub fixtures: PathBuf,
}

/// Everything the server answers with, loaded once at start-up.
#[derive(Debug, Clone, Default)]
pub struct Fixtures {
    screens: HashMap<String, ScreenDefinition>,
    navigation: NavigationDefinition,
    bundle: UserDataBundle,
    buckets: HashMap<String, BucketDelta>,
}

impl Fixtures {
    /// Reads a fixtures directory. Only `screens/` is required.
    pub fn load(dir: impl AsRef<Path>) -> DevServerResult<Self> {
        let dir = dir.as_ref();
        let screens_dir = dir.join("screens");
        let entries = std::fs::read_dir(&screens_dir).map_err(|source| DevServerError::Io {
            path: screens_dir.clone(),
            source,
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| DevServerError::Io {
                path: screens_dir.clone(),
                source,
            })?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut screens = Vec::with_capacity(paths.len());
        for path in &paths {
            screens.push(read_json::<ScreenDefinition>(path)?);
        }

        Self::new(
            screens,
            read_optional(&dir.join("navigation.json"))?.unwrap_or_default(),
            read_optional(&dir.join("menu.json"))?.unwrap_or_default(),
            read_optional(&dir.join("permissions.json"))?.unwrap_or_default(),
            read_optional(&dir.join("contexts.json"))?.unwrap_or_default(),
        )
    }

    pub fn new(
        screens: Vec<ScreenDefinition>,
        navigation: NavigationDefinition,
        menu: Vec<MenuItem>,
        permissions: Vec<String>,
        contexts: Vec<UserContext>,
    ) -> DevServerResult<Self> {
        let mut by_key = HashMap::with_capacity(screens.len());
        for screen in screens {
            let key = screen.screen_key.clone();
            if by_key.insert(key.clone(), screen).is_some() {
                return Err(DevServerError::DuplicateScreen(key));
            }
        }

        let mut buckets = HashMap::new();
        bucket(&mut buckets, BucketKey::Menu, &menu)?;
        bucket(&mut buckets, BucketKey::Permissions, &permissions)?;
        bucket(&mut buckets, BucketKey::AvailableContexts, &contexts)?;
        for (key, screen) in &by_key {
            let entry = ScreenBundleEntry::from(screen.clone());
            bucket(&mut buckets, BucketKey::screen(key.clone()), &entry)?;
        }

        let bundle = UserDataBundle {
            menu,
            permissions,
            screens: by_key
                .iter()
                .map(|(k, s)| (k.clone(), ScreenBundleEntry::from(s.clone())))
                .collect(),
            available_contexts: contexts,
            hashes: buckets
                .iter()
                .map(|(k, b)| (k.clone(), b.hash.clone()))
                .collect(),
        };

        Ok(Self {
            screens: by_key,
            navigation,
            bundle,
            buckets,
        })
    }

    pub fn screen_count(&self) -> usize {
        self.screens.len()
    }

    /// The delta a client holding `request.hashes` needs.
    ///
    /// Buckets the client knows that no longer exist come back changed
    /// with null data.
    pub fn delta(&self, request: &DeltaSyncRequest) -> DeltaSyncResponse {
        let mut response = DeltaSyncResponse::default();
        for (key, bucket) in &self.buckets {
            if request.hashes.get(key) == Some(&bucket.hash) {
                response.unchanged.push(key.clone());
            } else {
                response.changed.insert(key.clone(), bucket.clone());
            }
        }
        for key in request.hashes.keys() {
            if !self.buckets.contains_key(key) {
                response.changed.insert(
                    key.clone(),
                    BucketDelta {
                        data: Value::Null,
                        hash: String::new(),
                    },
                );
            }
        }
        response.unchanged.sort();
        response
    }
}

fn bucket<T: Serialize>(
    buckets: &mut HashMap<String, BucketDelta>,
    key: BucketKey,
    data: &T,
) -> DevServerResult<()> {
    let key = key.to_string();
    let data = serde_json::to_value(data).map_err(|source| DevServerError::Json {
        path: PathBuf::from(&key),
        source,
    })?;
    let hash = content_hash(&data);
    buckets.insert(key, BucketDelta { data, hash });
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> DevServerResult<T> {
    let raw = std::fs::read_to_string(path).map_err(|source| DevServerError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| DevServerError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn read_optional<T: DeserializeOwned>(path: &Path) -> DevServerResult<Option<T>> {
    if !path.exists() {
        debug!(path = %path.display(), "Optional fixture absent");
        return Ok(None);
    }
    read_json(path).map(Some)
}

#[derive(Debug, Deserialize)]
struct ResolveQuery {
    platform: Option<String>,
}

async fn resolve_screen(
    State(fixtures): State<Arc<Fixtures>>,
    UrlPath(screen_key): UrlPath<String>,
    Query(query): Query<ResolveQuery>,
) -> Result<Json<ScreenDefinition>, (StatusCode, String)> {
    let Some(screen) = fixtures.screens.get(&screen_key) else {
        warn!(screen_key, "Unknown screen requested");
        return Err((
            StatusCode::NOT_FOUND,
            format!("no screen with key '{screen_key}'"),
        ));
    };
    let screen = match query.platform.as_deref() {
        Some(platform) => screen.for_platform(platform),
        None => screen.clone(),
    };
    debug!(screen_key, platform = ?query.platform, "Serving screen");
    Ok(Json(screen))
}

async fn navigation(State(fixtures): State<Arc<Fixtures>>) -> Json<NavigationDefinition> {
    Json(fixtures.navigation.clone())
}

async fn full_bundle(State(fixtures): State<Arc<Fixtures>>) -> Json<UserDataBundle> {
    info!(screens = fixtures.bundle.screens.len(), "Serving full bundle");
    Json(fixtures.bundle.clone())
}

async fn delta(
    State(fixtures): State<Arc<Fixtures>>,
    Json(request): Json<DeltaSyncRequest>,
) -> Json<DeltaSyncResponse> {
    let response = fixtures.delta(&request);
    info!(
        changed = response.changed.len(),
        unchanged = response.unchanged.len(),
        "Serving sync delta"
    );
    Json(response)
}

/// Build the HTTP router over loaded fixtures.
pub fn build_router(fixtures: Arc<Fixtures>) -> Router {
    Router::new()
        .route(
            "/v1/screen-config/resolve/key/{screen_key}",
            get(resolve_screen),
        )
        .route("/v1/screen-config/navigation", get(navigation))
        .route("/v1/sync/bundle", get(full_bundle))
        .route("/v1/sync/delta", post(delta))
        .with_state(fixtures)
}

/// Loads fixtures and serves them until the task is cancelled.
pub async fn serve(config: &DevServerConfig) -> DevServerResult<()> {
    let fixtures = Fixtures::load(&config.fixtures)?;
    info!(
        screens = fixtures.screen_count(),
        fixtures = %config.fixtures.display(),
        "Fixtures loaded"
    );
    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .map_err(DevServerError::Serve)?;
    info!(addr = %config.bind, "Dev server listening");
    axum::serve(listener, build_router(Arc::new(fixtures)))
        .await
        .map_err(DevServerError::Serve)
}
