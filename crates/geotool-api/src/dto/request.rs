use geotool_core::models::{CaptureTool, Coordinate};
use serde::Deserialize;

/// Tool selection body
#[derive(Debug, Deserialize)]
pub struct SelectToolRequest {
    pub tool: CaptureTool,
}

/// Map click body.
///
/// The client collects the prompt answers up front: a missing or blank
/// `name` cancels, and `finalize` answers the "finish the shape?" question.
#[derive(Debug, Deserialize)]
pub struct ClickRequest {
    pub lat: f64,
    pub lon: f64,
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub finalize: bool,
}

/// GPS fix reported by the client
#[derive(Debug, Deserialize)]
pub struct TrackSampleRequest {
    pub lat: f64,
    pub lon: f64,
    pub accuracy: f64,
    pub altitude: Option<f64>,
}

/// Layer visibility change; without `visible` the flag is toggled
#[derive(Debug, Default, Deserialize)]
pub struct VisibilityRequest {
    pub visible: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub format: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProxyQuery {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct SyncRequest {
    #[serde(default = "default_sync_tag")]
    pub tag: String,
}

fn default_sync_tag() -> String {
    geotool_offline::hooks::SYNC_TAG.to_string()
}

impl ClickRequest {
    pub fn coordinate(&self) -> geotool_core::Result<Coordinate> {
        Coordinate::validated(self.lat, self.lon)
    }
}

impl TrackSampleRequest {
    pub fn coordinate(&self) -> geotool_core::Result<Coordinate> {
        Coordinate::validated(self.lat, self.lon)
    }
}
