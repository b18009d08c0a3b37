use serde::Serialize;

use crate::models::{Capture, CaptureId, CaptureKind, Coordinate};

/// Live preview of the shape being digitized
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "coordinates", rename_all = "lowercase")]
pub enum PreviewShape {
    /// Open path through all vertices (lines)
    Path(Vec<Coordinate>),
    /// Closed ring through all vertices (polygons)
    Ring(Vec<Coordinate>),
}

impl PreviewShape {
    pub fn for_kind(kind: CaptureKind, vertices: &[Coordinate]) -> Self {
        match kind {
            CaptureKind::Polygon => PreviewShape::Ring(vertices.to_vec()),
            _ => PreviewShape::Path(vertices.to_vec()),
        }
    }
}

/// Something a renderer should react to
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CaptureEvent {
    ToolSelected { kind: CaptureKind },
    ToolCleared,
    VertexAdded { kind: CaptureKind, coordinate: Coordinate },
    PreviewUpdated { preview: PreviewShape },
    EphemeralCleared,
    ShapeDiscarded { kind: CaptureKind, vertex_count: usize },
    CaptureAdded { capture: Capture },
    CaptureRemoved { id: CaptureId },
}
