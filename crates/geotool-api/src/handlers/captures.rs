use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use geotool_core::export::{self, ExportFormat};
use geotool_core::models::{Capture, CaptureId};
use geotool_core::CaptureStats;
use geotool_offline::hooks::PendingQueue;

use crate::dto::{DeleteResponse, EventsResponse, ExportQuery};
use crate::error::ApiError;
use crate::state::AppState;

pub async fn list_captures(State(state): State<Arc<AppState>>) -> Json<Vec<Capture>> {
    let session = state.session.lock().await;
    Json(session.captures().to_vec())
}

pub async fn get_capture(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<Capture>, ApiError> {
    let session = state.session.lock().await;
    session
        .store()
        .get(CaptureId(id))
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Capture not found"))
}

/// Deleting an unknown id is not an error; `removed` reports what happened
pub async fn delete_capture(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Json<DeleteResponse> {
    tracing::info!(id, "Deleting capture");

    let events = state.session.lock().await.remove_capture(CaptureId(id)).await;
    if events.is_empty() {
        return Json(DeleteResponse::missing("capture", &id.to_string()));
    }

    state.pending.retain(|item| item["id"] != id).await;
    Json(DeleteResponse::success("capture", &id.to_string(), events))
}

pub async fn clear_captures(State(state): State<Arc<AppState>>) -> Json<EventsResponse> {
    tracing::info!("Clearing all captures");

    let mut session = state.session.lock().await;
    let events = session.clear_all().await;
    if let Err(e) = state.pending.clear().await {
        tracing::warn!(error = %e, "Failed to clear pending queue");
    }
    Json(EventsResponse {
        state: session.state().clone(),
        events,
        capture: None,
    })
}

pub async fn capture_stats(State(state): State<Arc<AppState>>) -> Json<CaptureStats> {
    Json(state.session.lock().await.stats())
}

/// Download all captures; `format` defaults to GeoJSON
pub async fn export_captures(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ExportQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let format = match query.format.as_deref() {
        Some(raw) => raw.parse::<ExportFormat>()?,
        None => ExportFormat::GeoJson,
    };

    let body = {
        let session = state.session.lock().await;
        export::export(session.captures(), format)?
    };
    tracing::info!(%format, bytes = body.len(), "Exported captures");

    let headers = [
        (header::CONTENT_TYPE, format.mime_type().to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", format.file_name()),
        ),
    ];
    Ok((headers, body))
}
