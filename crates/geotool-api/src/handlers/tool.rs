use std::sync::Arc;

use axum::{extract::State, Json};
use geotool_core::capture::PresetAnswers;

use crate::dto::{ClickRequest, EventsResponse, SelectToolRequest};
use crate::error::ApiError;
use crate::state::AppState;

pub async fn capture_state(State(state): State<Arc<AppState>>) -> Json<EventsResponse> {
    let session = state.session.lock().await;
    Json(EventsResponse {
        state: session.state().clone(),
        events: Vec::new(),
        capture: None,
    })
}

pub async fn select_tool(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SelectToolRequest>,
) -> Json<EventsResponse> {
    tracing::debug!(tool = ?request.tool, "Selecting tool");

    let mut session = state.session.lock().await;
    let events = session.select_tool(request.tool);
    Json(EventsResponse {
        state: session.state().clone(),
        events,
        capture: None,
    })
}

pub async fn deselect_tool(State(state): State<Arc<AppState>>) -> Json<EventsResponse> {
    let mut session = state.session.lock().await;
    let events = session.deselect();
    Json(EventsResponse {
        state: session.state().clone(),
        events,
        capture: None,
    })
}

pub async fn handle_click(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ClickRequest>,
) -> Result<Json<EventsResponse>, ApiError> {
    let coordinate = request.coordinate()?;
    let answers = PresetAnswers {
        name: request.name,
        description: request.description,
        finalize: request.finalize,
    };

    let mut session = state.session.lock().await;
    let outcome = session.click(coordinate, &answers).await;
    if let Some(capture) = &outcome.capture {
        // Queued for background sync
        let record = serde_json::to_value(capture).map_err(|e| {
            ApiError::internal("Failed to queue capture").with_details(e.to_string())
        })?;
        state.pending.push(record).await;
    }
    Ok(Json(EventsResponse {
        state: session.state().clone(),
        events: outcome.events,
        capture: outcome.capture,
    }))
}
