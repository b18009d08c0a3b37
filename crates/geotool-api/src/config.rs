use std::env;

use geotool_core::config::LayeredConfig;

/// API server configuration.
///
/// The port defaults to the layered `port` value and can be overridden with
/// `GEOTOOL_API_PORT`. The CORS origin defaults to the app origin.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub port: u16,
    pub cors_origin: String,
}

impl ApiConfig {
    /// Load server-only settings from environment variables
    pub fn from_env(layered: &LayeredConfig) -> Self {
        let port = env::var("GEOTOOL_API_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(layered.port.value);

        let cors_origin =
            env::var("GEOTOOL_CORS_ORIGIN").unwrap_or_else(|_| layered.origin.value.clone());

        Self { port, cors_origin }
    }

    /// Get the server bind address
    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}
