//! Network access for the controller

use async_trait::async_trait;

use crate::error::{OfflineError, Result};
use crate::request::ResourceRequest;
use crate::response::CachedResponse;

/// Performs a request against the network.
///
/// `Err` means the network could not be reached at all. Any HTTP status,
/// including errors, comes back as `Ok`.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, request: &ResourceRequest) -> Result<CachedResponse>;
}

/// HTTP fetcher
#[derive(Debug, Clone, Default)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
}

impl ReqwestFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, request: &ResourceRequest) -> Result<CachedResponse> {
        let network_error = |e: reqwest::Error| OfflineError::Network {
            url: request.url.to_string(),
            message: e.to_string(),
        };

        let response = self
            .client
            .request(request.method.clone(), request.url.clone())
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value.to_str().ok().map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.bytes().await.map_err(network_error)?;

        let mut cached = CachedResponse::new(status.as_u16(), headers, body.to_vec());
        if let Some(reason) = status.canonical_reason() {
            cached.status_text = reason.to_string();
        }
        Ok(cached)
    }
}
