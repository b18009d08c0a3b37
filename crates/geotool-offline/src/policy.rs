//! Request classification

use reqwest::Url;
use serde::Serialize;

/// How a request is served
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestClass {
    /// Map tile: cache first, placeholder tile when offline
    Tile,
    /// Declared app-shell asset: cache first, never re-cached at runtime
    StaticAsset,
    /// Everything else: network first with cached fallback
    Dynamic,
}

/// Whether `host` is one of `tile_hosts` or a subdomain of one
pub fn is_tile_host(host: &str, tile_hosts: &[String]) -> bool {
    let host = host.to_ascii_lowercase();
    tile_hosts.iter().any(|tile| {
        host == *tile
            || host
                .strip_suffix(tile.as_str())
                .is_some_and(|prefix| prefix.ends_with('.'))
    })
}

/// Classify a request URL. Tile hosts win over the static list.
pub fn classify(url: &Url, tile_hosts: &[String], static_assets: &[Url]) -> RequestClass {
    if url.host_str().is_some_and(|host| is_tile_host(host, tile_hosts)) {
        return RequestClass::Tile;
    }

    let mut bare = url.clone();
    bare.set_fragment(None);
    if static_assets.contains(&bare) {
        RequestClass::StaticAsset
    } else {
        RequestClass::Dynamic
    }
}
