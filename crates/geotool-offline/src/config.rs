//! Offline controller settings

use geotool_core::config::LayeredConfig;
use reqwest::Url;

use crate::error::{OfflineError, Result};
use crate::request::parse_url;

pub const RUNTIME_CACHE: &str = "geotool-runtime";

/// App shell served for offline page navigations
pub const APP_SHELL: &str = "/index.html";

/// Assets cached at install time. Paths resolve against the origin.
pub const DEFAULT_STATIC_ASSETS: &[&str] = &[
    "/",
    "/index.html",
    "/styles.css",
    "/app.js",
    "/manifest.json",
    "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css",
    "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js",
    "https://cdnjs.cloudflare.com/ajax/libs/proj4js/2.9.2/proj4.js",
    "https://unpkg.com/shpjs@latest/dist/shp.js",
    "https://fonts.googleapis.com/css2?family=Manrope:wght@400;600;800&family=IBM+Plex+Mono:wght@500;700&display=swap",
];

#[derive(Debug, Clone)]
pub struct OfflineConfig {
    pub origin: Url,
    pub cache_version: String,
    pub static_assets: Vec<Url>,
    pub tile_hosts: Vec<String>,
    pub app_shell: Url,
}

impl OfflineConfig {
    /// Build from an origin and a list of asset paths or absolute URLs
    pub fn new(
        origin: &str,
        cache_version: &str,
        assets: &[&str],
        tile_hosts: Vec<String>,
    ) -> Result<Self> {
        let origin = parse_url(origin)?;
        let static_assets = assets
            .iter()
            .map(|asset| resolve(&origin, asset))
            .collect::<Result<Vec<_>>>()?;
        let app_shell = resolve(&origin, APP_SHELL)?;

        Ok(Self {
            origin,
            cache_version: cache_version.to_string(),
            static_assets,
            tile_hosts,
            app_shell,
        })
    }

    pub fn from_layered(config: &LayeredConfig) -> Result<Self> {
        Self::new(
            &config.origin.value,
            &config.cache_version.value,
            DEFAULT_STATIC_ASSETS,
            config.tile_hosts.value.clone(),
        )
    }

    /// Versioned generation holding the install-time assets
    pub fn static_cache(&self) -> String {
        format!("geotool-{}", self.cache_version)
    }

    pub fn runtime_cache(&self) -> &'static str {
        RUNTIME_CACHE
    }

    /// Resolve a path against the origin
    pub fn resolve(&self, path: &str) -> Result<Url> {
        resolve(&self.origin, path)
    }
}

fn resolve(origin: &Url, path: &str) -> Result<Url> {
    origin.join(path).map_err(|e| OfflineError::InvalidUrl {
        url: path.to_string(),
        reason: e.to_string(),
    })
}
