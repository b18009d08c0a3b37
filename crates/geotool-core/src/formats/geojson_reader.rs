//! GeoJSON format reader implementation

use geojson::{Feature, FeatureCollection, GeoJson};

use crate::error::{GeotoolError, Result};
use crate::formats::{FormatReader, LoadedLayer};

/// GeoJSON format reader
pub struct GeoJsonReader;

impl FormatReader for GeoJsonReader {
    fn parse(&self, name: &str, content: &str) -> Result<LoadedLayer> {
        let geojson: GeoJson = content.parse().map_err(|e| GeotoolError::FormatValidation {
            format: "GeoJSON".to_string(),
            reason: format!("Failed to parse GeoJSON: {}", e),
        })?;

        let features = match geojson {
            GeoJson::FeatureCollection(fc) => fc,
            GeoJson::Feature(feature) => single(feature),
            // Single geometry - wrap in a feature
            GeoJson::Geometry(geometry) => single(Feature {
                geometry: Some(geometry),
                ..Default::default()
            }),
        };

        Ok(LoadedLayer::new(name, self.format_name(), features))
    }

    fn supported_extensions(&self) -> &[&str] {
        &["json", "geojson"]
    }

    fn format_name(&self) -> &str {
        "GeoJSON"
    }
}

fn single(feature: Feature) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: vec![feature],
        foreign_members: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[tokio::test]
    async fn test_geojson_reader_feature_collection() {
        let reader = GeoJsonReader;

        let temp_dir = tempfile::tempdir().unwrap();
        let file_path = temp_dir.path().join("predios.geojson");

        let geojson_content = r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "id": "predio-1",
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[[-104.7, 24.0], [-104.6, 24.0], [-104.6, 24.1], [-104.7, 24.0]]]
                    },
                    "properties": {
                        "name": "El Salto"
                    }
                }
            ]
        }"#;

        fs::write(&file_path, geojson_content).unwrap();

        let layer = reader.read(&file_path).await.unwrap();

        assert_eq!(layer.name, "predios");
        assert_eq!(layer.format_name, "GeoJSON");
        assert_eq!(layer.feature_count(), 1);
        let bounds = layer.bounds.unwrap();
        assert_eq!(bounds.north, 24.1);
        assert_eq!(bounds.west, -104.7);
    }

    #[test]
    fn test_bare_geometry_is_wrapped() {
        let layer = GeoJsonReader
            .parse("punto", r#"{"type": "Point", "coordinates": [1.0, 2.0]}"#)
            .unwrap();

        assert_eq!(layer.feature_count(), 1);
        assert!(layer.features.features[0].geometry.is_some());
    }

    #[test]
    fn test_malformed_geojson_is_a_validation_error() {
        let err = GeoJsonReader.parse("roto", "not valid json").unwrap_err();
        assert!(matches!(err, GeotoolError::FormatValidation { ref format, .. } if format == "GeoJSON"));
    }

    #[tokio::test]
    async fn test_missing_file_is_an_io_error() {
        let err = GeoJsonReader.read(std::path::Path::new("/nonexistent/x.geojson")).await.unwrap_err();
        assert!(matches!(err, GeotoolError::Io(_)));
    }
}
