use std::sync::Arc;

use anyhow::Context;
use axum::http::{header, HeaderValue, Method};
use geotool_core::config::LayeredConfig;
use geotool_core::FieldSession;
use geotool_offline::{Fetcher, MemoryCacheStorage, OfflineConfig, OfflineController, ReqwestFetcher};
use geotool_store::file::JsonFilePersistence;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use geotool_api::{create_router, ApiConfig, AppState};

const CONFIG_FILE: &str = "geotool.toml";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "geotool_api=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let layered = LayeredConfig::with_defaults()
        .load_from_optional_file(CONFIG_FILE)
        .context("Failed to load geotool.toml")?
        .load_from_env();
    let config = ApiConfig::from_env(&layered);

    tracing::info!(
        port = config.port,
        data_file = %layered.data_file.value.display(),
        cache = %layered.static_cache_name(),
        "Starting GeoTool API server"
    );

    let persistence = Arc::new(JsonFilePersistence::new(layered.data_file.value.clone()));
    let session = FieldSession::open(persistence).await;

    let fetcher: Arc<dyn Fetcher> = Arc::new(ReqwestFetcher::new());
    let offline_config =
        OfflineConfig::from_layered(&layered).context("Invalid offline cache configuration")?;
    let offline = Arc::new(OfflineController::new(
        offline_config,
        Arc::new(MemoryCacheStorage::new()),
        fetcher.clone(),
    ));

    // The app shell may be served by this very process, so warm the cache
    // once the listener is up.
    let warmup = offline.clone();

    let state = Arc::new(AppState::new(session, offline, fetcher));

    let cors_origin = config
        .cors_origin
        .parse::<HeaderValue>()
        .context("Invalid CORS origin")?;
    let cors = CorsLayer::new()
        .allow_origin(cors_origin)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    let app = create_router(state).layer(cors);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Listening on {}", addr);
    tracing::info!("CORS enabled for {}", config.cors_origin);

    tokio::spawn(async move {
        match warmup.install().await {
            Ok(count) => {
                if let Err(e) = warmup.activate().await {
                    tracing::error!(error = %e, "Offline cache activation failed");
                } else {
                    tracing::info!(count, "Offline cache ready");
                }
            }
            Err(e) => tracing::warn!(error = %e, "Offline cache install failed, requests bypass the cache"),
        }
    });

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
