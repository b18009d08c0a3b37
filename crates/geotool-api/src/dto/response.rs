use geotool_core::capture::{CaptureEvent, CaptureState};
use geotool_core::layers::{LayerId, ReferenceLayer};
use geotool_core::models::{Bounds, Capture, TrackSample};
use geotool_offline::Lifecycle;
use serde::Serialize;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self { status: "ok", service: "geotool-api" }
    }
}

/// Machine state after a reaction plus the events a renderer should apply
#[derive(Debug, Serialize)]
pub struct EventsResponse {
    pub state: CaptureState,
    pub events: Vec<CaptureEvent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capture: Option<Capture>,
}

/// Delete operation response. Deleting an unknown id succeeds with
/// `removed: false`.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub removed: bool,
    pub message: String,
    pub events: Vec<CaptureEvent>,
}

impl DeleteResponse {
    pub fn success(entity: &str, id: &str, events: Vec<CaptureEvent>) -> Self {
        Self {
            success: true,
            removed: true,
            message: format!("Successfully deleted {} {}", entity, id),
            events,
        }
    }

    pub fn missing(entity: &str, id: &str) -> Self {
        Self {
            success: true,
            removed: false,
            message: format!("No {} {}, nothing deleted", entity, id),
            events: Vec::new(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TrackResponse {
    pub samples: Vec<TrackSample>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<i64>,
}

/// Reference layer with its features
#[derive(Debug, Serialize)]
pub struct LayerResponse {
    #[serde(flatten)]
    pub summary: LayerSummary,
    pub features: geojson::FeatureCollection,
}

impl From<&ReferenceLayer> for LayerResponse {
    fn from(layer: &ReferenceLayer) -> Self {
        Self {
            summary: layer.into(),
            features: layer.layer.features.clone(),
        }
    }
}

/// Reference layer listing entry
#[derive(Debug, Serialize)]
pub struct LayerSummary {
    pub id: LayerId,
    pub name: String,
    pub format: String,
    pub visible: bool,
    pub feature_count: usize,
    pub bounds: Option<Bounds>,
}

impl From<&ReferenceLayer> for LayerSummary {
    fn from(layer: &ReferenceLayer) -> Self {
        Self {
            id: layer.id,
            name: layer.layer.name.clone(),
            format: layer.layer.format_name.clone(),
            visible: layer.visible,
            feature_count: layer.layer.feature_count(),
            bounds: layer.layer.bounds,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct VisibilityResponse {
    pub id: LayerId,
    pub visible: bool,
}

#[derive(Debug, Serialize)]
pub struct OfflineStatusResponse {
    pub lifecycle: Lifecycle,
    pub static_cache: String,
    pub runtime_cache: &'static str,
    pub static_assets: usize,
}

