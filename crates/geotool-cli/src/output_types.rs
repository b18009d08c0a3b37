use geotool_core::models::{Bounds, Capture, CaptureKind, TrackSample};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{format_area, format_length};

/// One row of `geotool list`
#[derive(Debug, Tabled)]
pub struct CaptureRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Type")]
    pub kind: CaptureKind,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Vertices")]
    pub vertices: usize,
    #[tabled(rename = "Measure")]
    pub measure: String,
    #[tabled(rename = "Created")]
    pub created: String,
}

impl From<&Capture> for CaptureRow {
    fn from(capture: &Capture) -> Self {
        let measure = match capture.kind() {
            CaptureKind::Point => capture.description().to_string(),
            CaptureKind::Line => format_length(capture.length().unwrap_or(0.0)),
            CaptureKind::Polygon => format_area(capture.area().unwrap_or(0.0)),
        };
        Self {
            id: capture.id.map(|id| id.to_string()).unwrap_or_default(),
            kind: capture.kind(),
            name: capture.name().to_string(),
            vertices: capture.coordinates().len(),
            measure,
            created: capture.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

#[derive(Debug, Tabled)]
pub struct TrackRow {
    #[tabled(rename = "#")]
    pub index: usize,
    #[tabled(rename = "Latitude")]
    pub lat: String,
    #[tabled(rename = "Longitude")]
    pub lon: String,
    #[tabled(rename = "Accuracy")]
    pub accuracy: String,
    #[tabled(rename = "Altitude")]
    pub altitude: String,
    #[tabled(rename = "Time (UTC)")]
    pub time: String,
}

impl TrackRow {
    pub fn new(index: usize, sample: &TrackSample) -> Self {
        Self {
            index: index + 1,
            lat: format!("{:.6}", sample.coordinate.lat),
            lon: format!("{:.6}", sample.coordinate.lon),
            accuracy: format!("±{:.0} m", sample.accuracy),
            altitude: format!("{:.0} m", sample.altitude),
            time: sample.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

/// Output for track show
#[derive(Debug, Serialize)]
pub struct TrackOutput {
    pub samples: Vec<TrackSample>,
    pub duration_seconds: Option<i64>,
    pub last_fix_utm: Option<String>,
}

/// Output for load command
#[derive(Debug, Serialize)]
pub struct LayerOutput {
    pub name: String,
    pub format: String,
    pub feature_count: usize,
    pub bounds: Option<Bounds>,
}

/// Output for export command
#[derive(Debug, Serialize)]
pub struct ExportOutput {
    pub format: String,
    pub path: String,
    pub captures: usize,
    pub bytes: usize,
}

#[derive(Debug, Serialize)]
pub struct RemoveOutput {
    pub id: u64,
    pub removed: bool,
}

#[derive(Debug, Tabled)]
pub struct ConfigRow {
    #[tabled(rename = "Key")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Source")]
    pub source: String,
}

#[derive(Debug, Serialize)]
pub struct ConfigEntry {
    pub value: String,
    pub source: String,
}
