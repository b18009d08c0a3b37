//! KML (Keyhole Markup Language) format reader implementation
//!
//! Placemarks become GeoJSON features. Folder names are kept in a
//! `folder_path` property so nested layers stay distinguishable.

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use kml::types::{Coord, Geometry as KmlGeometry, Placemark};
use kml::Kml;

use crate::error::{GeotoolError, Result};
use crate::formats::{FormatReader, LoadedLayer};

/// KML format reader
pub struct KmlReader;

impl FormatReader for KmlReader {
    fn parse(&self, name: &str, content: &str) -> Result<LoadedLayer> {
        let kml: Kml = content.parse().map_err(|e| GeotoolError::FormatValidation {
            format: "KML".to_string(),
            reason: format!("Failed to parse KML: {}", e),
        })?;

        let mut features = Vec::new();
        extract_features_recursive(&kml, &mut features, &[]);

        let collection = FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        };
        Ok(LoadedLayer::new(name, self.format_name(), collection))
    }

    fn supported_extensions(&self) -> &[&str] {
        &["kml"]
    }

    fn format_name(&self) -> &str {
        "KML"
    }
}

/// Walk documents and folders, collecting placemarks
fn extract_features_recursive(kml: &Kml, features: &mut Vec<Feature>, folder_path: &[String]) {
    match kml {
        Kml::KmlDocument(doc) => {
            for element in &doc.elements {
                extract_features_recursive(element, features, folder_path);
            }
        }
        Kml::Document { elements, .. } => {
            for element in elements {
                extract_features_recursive(element, features, folder_path);
            }
        }
        Kml::Folder { attrs, elements } => {
            let mut nested = folder_path.to_vec();
            if let Some(name) = folder_name(attrs, elements) {
                nested.push(name);
            }
            for element in elements {
                extract_features_recursive(element, features, &nested);
            }
        }
        Kml::Placemark(placemark) => {
            if let Some(feature) = convert_placemark(placemark, features.len(), folder_path) {
                features.push(feature);
            }
        }
        _ => {}
    }
}

fn folder_name(
    attrs: &std::collections::HashMap<String, String>,
    elements: &[Kml],
) -> Option<String> {
    attrs.get("name").cloned().or_else(|| {
        elements.iter().find_map(|e| match e {
            Kml::Element(el) if el.name == "name" => el.content.clone(),
            _ => None,
        })
    })
}

/// Placemarks without a supported geometry are skipped
fn convert_placemark(placemark: &Placemark, index: usize, folder_path: &[String]) -> Option<Feature> {
    let value = match placemark.geometry.as_ref().map(convert_geometry) {
        Some(Some(value)) => value,
        Some(None) => {
            tracing::debug!(placemark = ?placemark.name, "Skipping placemark with unsupported geometry");
            return None;
        }
        None => return None,
    };

    let mut properties = JsonObject::new();
    if let Some(name) = &placemark.name {
        properties.insert("name".to_string(), name.clone().into());
    }
    if let Some(description) = &placemark.description {
        properties.insert("description".to_string(), description.clone().into());
    }
    if !folder_path.is_empty() {
        properties.insert("folder_path".to_string(), folder_path.join("/").into());
    }

    Some(Feature {
        bbox: None,
        geometry: Some(Geometry::new(value)),
        id: Some(geojson::feature::Id::String(format!("placemark_{}", index))),
        properties: Some(properties),
        foreign_members: None,
    })
}

fn convert_geometry(geometry: &KmlGeometry) -> Option<Value> {
    match geometry {
        KmlGeometry::Point(point) => Some(Value::Point(position(&point.coord))),
        KmlGeometry::LineString(line) => Some(Value::LineString(positions(&line.coords))),
        KmlGeometry::LinearRing(ring) => Some(Value::LineString(positions(&ring.coords))),
        KmlGeometry::Polygon(polygon) => {
            let mut rings = vec![positions(&polygon.outer.coords)];
            rings.extend(polygon.inner.iter().map(|r| positions(&r.coords)));
            Some(Value::Polygon(rings))
        }
        KmlGeometry::MultiGeometry(multi) => {
            let geometries = multi
                .geometries
                .iter()
                .filter_map(convert_geometry)
                .map(Geometry::new)
                .collect();
            Some(Value::GeometryCollection(geometries))
        }
        _ => None,
    }
}

fn position(coord: &Coord) -> Vec<f64> {
    match coord.z {
        Some(z) => vec![coord.x, coord.y, z],
        None => vec![coord.x, coord.y],
    }
}

fn positions(coords: &[Coord]) -> Vec<Vec<f64>> {
    coords.iter().map(position).collect()
}
