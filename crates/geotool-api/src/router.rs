use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Create the API router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health
        .route("/health", get(handlers::health_check))

        // Captures
        .route("/api/v1/captures", get(handlers::list_captures))
        .route("/api/v1/captures", delete(handlers::clear_captures))
        .route("/api/v1/captures/stats", get(handlers::capture_stats))
        .route("/api/v1/captures/export", get(handlers::export_captures))
        .route("/api/v1/captures/{id}", get(handlers::get_capture))
        .route("/api/v1/captures/{id}", delete(handlers::delete_capture))

        // Capture tool
        .route("/api/v1/capture", get(handlers::capture_state))
        .route("/api/v1/capture/tool", post(handlers::select_tool))
        .route("/api/v1/capture/tool", delete(handlers::deselect_tool))
        .route("/api/v1/capture/click", post(handlers::handle_click))

        // GPS track
        .route("/api/v1/track", get(handlers::get_track))
        .route("/api/v1/track", post(handlers::record_position))

        // Reference layers
        .route("/api/v1/layers", get(handlers::list_layers))
        .route("/api/v1/layers", post(handlers::upload_layer))
        .route("/api/v1/layers/{id}", get(handlers::get_layer))
        .route("/api/v1/layers/{id}", delete(handlers::delete_layer))
        .route("/api/v1/layers/{id}/visibility", post(handlers::set_layer_visibility))
        .route("/api/v1/layers/{id}/bounds", get(handlers::layer_bounds))

        // Offline
        .route("/api/v1/offline/status", get(handlers::offline_status))
        .route("/api/v1/offline/sync", post(handlers::trigger_sync))
        .route("/api/v1/offline/push", post(handlers::push_notification))
        .route("/proxy", get(handlers::proxy))
        .fallback(handlers::same_origin)

        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
