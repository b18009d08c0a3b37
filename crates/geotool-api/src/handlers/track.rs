use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use geotool_core::models::TrackSample;

use crate::dto::{TrackResponse, TrackSampleRequest};
use crate::error::ApiError;
use crate::state::AppState;

pub async fn get_track(State(state): State<Arc<AppState>>) -> Json<TrackResponse> {
    let session = state.session.lock().await;
    let store = session.store();
    Json(TrackResponse {
        samples: store.track().to_vec(),
        duration_seconds: store.track_duration().map(|d| d.num_seconds()),
    })
}

pub async fn record_position(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TrackSampleRequest>,
) -> Result<StatusCode, ApiError> {
    let sample = TrackSample::new(request.coordinate()?, request.accuracy, request.altitude);
    state.session.lock().await.record_position(sample).await;
    Ok(StatusCode::CREATED)
}
