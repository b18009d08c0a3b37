//! Request interception and cache generation lifecycle.
//!
//! Policy per request class:
//!
//! - tiles are served cache first; a fresh 200 is stored in the runtime
//!   generation and a placeholder tile stands in when the network is gone
//! - declared static assets are served cache first and never re-cached here
//! - everything else goes to the network first, stores a 200 in the runtime
//!   generation, and falls back to the cache, then the app shell for page
//!   navigations, then a synthetic 503
//!
//! Only GET responses are stored. Non-http(s) requests are left alone.

use std::sync::Arc;

use futures::future::join_all;
use reqwest::Method;
use serde::Serialize;
use tokio::sync::RwLock;

use crate::config::OfflineConfig;
use crate::error::{OfflineError, Result};
use crate::fetch::Fetcher;
use crate::policy::{self, RequestClass};
use crate::request::{RequestKey, ResourceRequest};
use crate::response::CachedResponse;
use crate::storage::CacheStorage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifecycle {
    /// Static generation not populated yet
    New,
    /// Static generation populated, old generations still present
    Installed,
    /// Stale generations purged and requests intercepted
    Active,
}

/// Where an intercepted response came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseSource {
    Cache,
    Network,
    /// Offline map tile
    Placeholder,
    /// Cached app shell standing in for a page
    AppShell,
    /// Synthetic 503
    Unavailable,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Disposition {
    /// Not intercepted; the caller goes to the network itself
    Bypass,
    Respond {
        response: CachedResponse,
        source: ResponseSource,
        class: RequestClass,
    },
}

impl Disposition {
    pub fn response(&self) -> Option<&CachedResponse> {
        match self {
            Disposition::Bypass => None,
            Disposition::Respond { response, .. } => Some(response),
        }
    }

    pub fn source(&self) -> Option<ResponseSource> {
        match self {
            Disposition::Bypass => None,
            Disposition::Respond { source, .. } => Some(*source),
        }
    }
}

pub struct OfflineController {
    config: OfflineConfig,
    storage: Arc<dyn CacheStorage>,
    fetcher: Arc<dyn Fetcher>,
    lifecycle: RwLock<Lifecycle>,
}

impl OfflineController {
    pub fn new(config: OfflineConfig, storage: Arc<dyn CacheStorage>, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            config,
            storage,
            fetcher,
            lifecycle: RwLock::new(Lifecycle::New),
        }
    }

    pub fn config(&self) -> &OfflineConfig {
        &self.config
    }

    pub async fn lifecycle(&self) -> Lifecycle {
        *self.lifecycle.read().await
    }

    /// Fetch every declared asset and store them in the static generation.
    ///
    /// All or nothing: if any asset fails, nothing is stored and the
    /// controller stays uninstalled.
    pub async fn install(&self) -> Result<usize> {
        let cache = self.config.static_cache();
        tracing::info!(cache = %cache, assets = self.config.static_assets.len(), "Installing static assets");

        let fetches = self.config.static_assets.iter().map(|url| async move {
            let request = ResourceRequest::new(Method::GET, url.clone());
            let result = self.fetcher.fetch(&request).await;
            (request, result)
        });

        let mut entries = Vec::with_capacity(self.config.static_assets.len());
        for (request, result) in join_all(fetches).await {
            let response = result.map_err(|e| OfflineError::InstallFailed {
                asset: request.url.to_string(),
                reason: e.to_string(),
            })?;
            if !response.is_success() {
                return Err(OfflineError::InstallFailed {
                    asset: request.url.to_string(),
                    reason: format!("status {}", response.status),
                });
            }
            entries.push((request.key(), response));
        }

        let count = entries.len();
        self.storage.open(&cache).await?;
        for (key, response) in entries {
            self.storage.put(&cache, key, response).await?;
        }

        *self.lifecycle.write().await = Lifecycle::Installed;
        tracing::info!(cache = %cache, count, "Static assets cached");
        Ok(count)
    }

    /// Delete every generation except the current static and runtime ones,
    /// then start intercepting. Returns the deleted names.
    pub async fn activate(&self) -> Result<Vec<String>> {
        if self.lifecycle().await == Lifecycle::New {
            return Err(OfflineError::NotInstalled);
        }

        let keep = [self.config.static_cache(), self.config.runtime_cache().to_string()];
        let mut deleted = Vec::new();
        for name in self.storage.names().await? {
            if !keep.contains(&name) {
                tracing::info!(cache = %name, "Deleting stale cache generation");
                self.storage.delete(&name).await?;
                deleted.push(name);
            }
        }

        *self.lifecycle.write().await = Lifecycle::Active;
        tracing::info!(deleted = deleted.len(), "Offline controller active");
        Ok(deleted)
    }

    pub fn classify(&self, request: &ResourceRequest) -> RequestClass {
        policy::classify(&request.url, &self.config.tile_hosts, &self.config.static_assets)
    }

    /// Answer an intercepted request. Never fails: every failure degrades to
    /// a cached copy or a synthetic response.
    pub async fn handle(&self, request: &ResourceRequest) -> Disposition {
        if !request.is_http() || self.lifecycle().await != Lifecycle::Active {
            return Disposition::Bypass;
        }

        let class = self.classify(request);
        let (response, source) = match class {
            RequestClass::Tile => self.serve_tile(request).await,
            RequestClass::StaticAsset => self.serve_static(request).await,
            RequestClass::Dynamic => self.serve_dynamic(request).await,
        };

        tracing::debug!(url = %request.url, ?class, ?source, status = response.status, "Request served");
        Disposition::Respond {
            response,
            source,
            class,
        }
    }

    async fn serve_tile(&self, request: &ResourceRequest) -> (CachedResponse, ResponseSource) {
        if let Some(cached) = self.cached(&request.key()).await {
            return (cached, ResponseSource::Cache);
        }

        match self.fetcher.fetch(request).await {
            Ok(response) => {
                self.store_runtime(request, &response).await;
                (response, ResponseSource::Network)
            }
            Err(e) => {
                tracing::debug!(url = %request.url, error = %e, "Tile unavailable, serving placeholder");
                (CachedResponse::offline_tile(), ResponseSource::Placeholder)
            }
        }
    }

    async fn serve_static(&self, request: &ResourceRequest) -> (CachedResponse, ResponseSource) {
        if let Some(cached) = self.cached(&request.key()).await {
            return (cached, ResponseSource::Cache);
        }

        match self.fetcher.fetch(request).await {
            Ok(response) => (response, ResponseSource::Network),
            Err(e) => {
                tracing::warn!(url = %request.url, error = %e, "Static asset missing from cache and network");
                (CachedResponse::service_unavailable(), ResponseSource::Unavailable)
            }
        }
    }

    async fn serve_dynamic(&self, request: &ResourceRequest) -> (CachedResponse, ResponseSource) {
        let error = match self.fetcher.fetch(request).await {
            Ok(response) => {
                self.store_runtime(request, &response).await;
                return (response, ResponseSource::Network);
            }
            Err(e) => e,
        };
        tracing::debug!(url = %request.url, error = %error, "Network failed, trying cache");

        if let Some(cached) = self.cached(&request.key()).await {
            return (cached, ResponseSource::Cache);
        }

        if request.expects_document() {
            if let Some(shell) = self.cached(&RequestKey::get(&self.config.app_shell)).await {
                return (shell, ResponseSource::AppShell);
            }
        }

        (CachedResponse::service_unavailable(), ResponseSource::Unavailable)
    }

    /// Cache lookup across generations; storage errors count as a miss
    async fn cached(&self, key: &RequestKey) -> Option<CachedResponse> {
        match self.storage.lookup_any(key).await {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Cache lookup failed");
                None
            }
        }
    }

    async fn store_runtime(&self, request: &ResourceRequest, response: &CachedResponse) {
        if request.method != Method::GET || !response.is_cacheable() {
            return;
        }
        if let Err(e) = self
            .storage
            .put(self.config.runtime_cache(), request.key(), response.clone())
            .await
        {
            tracing::warn!(url = %request.url, error = %e, "Failed to store runtime response");
        }
    }
}
