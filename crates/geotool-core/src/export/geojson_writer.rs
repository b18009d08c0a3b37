use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use serde_json::json;

use super::{export_error, ExportFormat};
use crate::error::Result;
use crate::models::{Capture, CaptureShape, Coordinate};

pub(super) fn write(captures: &[Capture]) -> Result<String> {
    let collection = FeatureCollection {
        bbox: None,
        features: captures.iter().map(feature).collect(),
        foreign_members: None,
    };

    serde_json::to_string_pretty(&collection).map_err(|e| export_error(ExportFormat::GeoJson, e))
}

fn feature(capture: &Capture) -> Feature {
    let value = match capture.shape() {
        CaptureShape::Point { coordinates, .. } => Value::Point(position(coordinates)),
        CaptureShape::Line { coordinates, .. } => {
            Value::LineString(coordinates.iter().map(position).collect())
        }
        CaptureShape::Polygon { coordinates, .. } => Value::Polygon(vec![closed_ring(coordinates)]),
    };

    let mut properties = JsonObject::new();
    properties.insert("name".into(), json!(capture.name()));
    properties.insert("description".into(), json!(capture.description()));
    properties.insert("kind".into(), json!(capture.kind()));
    properties.insert("length_m".into(), json!(capture.length()));
    properties.insert("area_m2".into(), json!(capture.area()));
    properties.insert("created_at".into(), json!(capture.created_at));

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(value)),
        id: capture.id.map(|id| geojson::feature::Id::Number(id.0.into())),
        properties: Some(properties),
        foreign_members: None,
    }
}

fn position(coordinate: &Coordinate) -> Vec<f64> {
    coordinate.lon_lat().to_vec()
}

/// Polygon rings repeat their first position at the end
fn closed_ring(vertices: &[Coordinate]) -> Vec<Vec<f64>> {
    let mut ring: Vec<Vec<f64>> = vertices.iter().map(position).collect();
    if let Some(first) = ring.first().cloned() {
        if ring.last() != Some(&first) {
            ring.push(first);
        }
    }
    ring
}
