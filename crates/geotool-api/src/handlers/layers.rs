use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use geotool_core::layers::LayerId;
use geotool_core::models::Bounds;

use crate::dto::{DeleteResponse, LayerResponse, LayerSummary, VisibilityRequest, VisibilityResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// Parse an uploaded reference layer and keep it for display. Layers never
/// enter the capture store.
pub async fn upload_layer(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<LayerResponse>), ApiError> {
    let (filename, data) = extract_file(&mut multipart).await?;
    tracing::info!(filename = %filename, size = data.len(), "Received reference layer");

    let layer = state.formats.load_bytes(&filename, &data)?;

    let mut layers = state.layers.lock().await;
    let id = layers.add(layer);
    let stored = layers
        .get(id)
        .ok_or_else(|| ApiError::internal("Layer vanished after upload"))?;

    Ok((StatusCode::CREATED, Json(stored.into())))
}

pub async fn list_layers(State(state): State<Arc<AppState>>) -> Json<Vec<LayerSummary>> {
    let layers = state.layers.lock().await;
    Json(layers.list().iter().map(LayerSummary::from).collect())
}

pub async fn get_layer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<LayerResponse>, ApiError> {
    let layers = state.layers.lock().await;
    layers
        .get(LayerId(id))
        .map(|layer| Json(layer.into()))
        .ok_or_else(|| ApiError::not_found("Layer not found"))
}

pub async fn delete_layer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Json<DeleteResponse> {
    match state.layers.lock().await.remove(LayerId(id)) {
        Some(layer) => {
            tracing::info!(id, name = %layer.layer.name, "Removed reference layer");
            Json(DeleteResponse::success("layer", &id.to_string(), Vec::new()))
        }
        None => Json(DeleteResponse::missing("layer", &id.to_string())),
    }
}

/// Show or hide a layer; an empty body toggles it
pub async fn set_layer_visibility(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    request: Option<Json<VisibilityRequest>>,
) -> Result<Json<VisibilityResponse>, ApiError> {
    let id = LayerId(id);
    let request = request.map(|Json(r)| r).unwrap_or_default();

    let mut layers = state.layers.lock().await;
    let visible = match request.visible {
        Some(visible) => layers.set_visible(id, visible),
        None => layers.toggle(id),
    }
    .ok_or_else(|| ApiError::not_found("Layer not found"))?;

    Ok(Json(VisibilityResponse { id, visible }))
}

/// Extent the map should zoom to for a layer
pub async fn layer_bounds(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<Bounds>, ApiError> {
    let layers = state.layers.lock().await;
    let layer = layers
        .get(LayerId(id))
        .ok_or_else(|| ApiError::not_found("Layer not found"))?;
    layer
        .layer
        .bounds
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Layer has no geometry"))
}

async fn extract_file(multipart: &mut Multipart) -> Result<(String, Vec<u8>), ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        ApiError::bad_request("Failed to parse multipart form").with_details(e.to_string())
    })? {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or("upload.geojson").to_string();
            let data = field.bytes().await.map_err(|e| {
                ApiError::bad_request("Failed to read file data").with_details(e.to_string())
            })?;
            return Ok((filename, data.to_vec()));
        }
    }

    Err(ApiError::bad_request("No file provided")
        .with_details("Expected a 'file' field in the multipart form"))
}
