//! Reference layer loaders
//!
//! Files loaded here are displayed next to the captures but never enter the
//! capture store. Each format implements [`FormatReader`], and the
//! [`FormatRegistry`] picks the reader from the file extension.

use async_trait::async_trait;
use geojson::FeatureCollection;
use serde::Serialize;
use std::path::Path;

use crate::error::{GeotoolError, Result};
use crate::geometry;
use crate::models::{Bounds, Coordinate};

pub mod geojson_reader;
pub mod kml_reader;
pub mod shapefile_reader;

pub use geojson_reader::GeoJsonReader;
pub use kml_reader::KmlReader;
pub use shapefile_reader::ShapefileReader;

/// Format reader trait that all format implementations must implement
#[async_trait]
pub trait FormatReader: Send + Sync {
    /// Parse file content already in memory.
    ///
    /// `name` becomes the layer name.
    fn parse(&self, name: &str, content: &str) -> Result<LoadedLayer>;

    /// Parse raw file bytes. Text formats decode UTF-8 and defer to [`parse`].
    ///
    /// [`parse`]: FormatReader::parse
    fn parse_bytes(&self, name: &str, bytes: &[u8]) -> Result<LoadedLayer> {
        let content = std::str::from_utf8(bytes).map_err(|e| GeotoolError::FormatValidation {
            format: self.format_name().to_string(),
            reason: format!("File is not valid UTF-8: {}", e),
        })?;
        self.parse(name, content)
    }

    /// Get supported file extensions, lowercase and without the dot
    fn supported_extensions(&self) -> &[&str];

    /// Get human-readable format name (e.g., "GeoJSON", "KML")
    fn format_name(&self) -> &str;

    /// Read and parse a file
    async fn read(&self, path: &Path) -> Result<LoadedLayer> {
        let bytes = tokio::fs::read(path).await?;
        self.parse_bytes(&layer_name(path), &bytes)
    }
}

/// A reference layer ready to draw
#[derive(Debug, Clone, Serialize)]
pub struct LoadedLayer {
    pub name: String,
    pub format_name: String,
    pub features: FeatureCollection,
    /// Extent of every position in the layer, `None` when it has no geometry
    pub bounds: Option<Bounds>,
}

impl LoadedLayer {
    pub fn new(name: impl Into<String>, format_name: impl Into<String>, features: FeatureCollection) -> Self {
        let bounds = collection_bounds(&features);
        Self {
            name: name.into(),
            format_name: format_name.into(),
            features,
            bounds,
        }
    }

    pub fn feature_count(&self) -> usize {
        self.features.features.len()
    }
}

/// Central registry for format readers
pub struct FormatRegistry {
    readers: Vec<Box<dyn FormatReader>>,
}

impl FormatRegistry {
    /// Create a new empty format registry
    pub fn new() -> Self {
        Self {
            readers: Vec::new(),
        }
    }

    /// Registry with the GeoJSON, KML and Shapefile readers
    pub fn with_builtin_readers() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(GeoJsonReader));
        registry.register(Box::new(KmlReader));
        registry.register(Box::new(ShapefileReader));
        registry
    }

    /// Register a format reader
    pub fn register(&mut self, reader: Box<dyn FormatReader>) {
        self.readers.push(reader);
    }

    /// Find the reader for a file name or path by its extension
    pub fn detect_format(&self, path: &Path) -> Result<&dyn FormatReader> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .ok_or_else(|| GeotoolError::UnsupportedFormat {
                extension: "none".to_string(),
                supported: self.supported_formats().join(", "),
            })?;

        self.readers
            .iter()
            .find(|r| r.supported_extensions().contains(&extension.as_str()))
            .map(|r| r.as_ref())
            .ok_or_else(|| GeotoolError::UnsupportedFormat {
                extension,
                supported: self.supported_formats().join(", "),
            })
    }

    /// Detect the format and read the file
    pub async fn load(&self, path: &Path) -> Result<LoadedLayer> {
        let reader = self.detect_format(path)?;
        let layer = reader.read(path).await?;
        tracing::info!(
            layer = %layer.name,
            format = %layer.format_name,
            features = layer.feature_count(),
            "Reference layer loaded"
        );
        Ok(layer)
    }

    /// Detect the format from `file_name` and parse uploaded content
    pub fn load_content(&self, file_name: &str, content: &str) -> Result<LoadedLayer> {
        let path = Path::new(file_name);
        self.detect_format(path)?.parse(&layer_name(path), content)
    }

    /// Detect the format from `file_name` and parse uploaded bytes
    pub fn load_bytes(&self, file_name: &str, bytes: &[u8]) -> Result<LoadedLayer> {
        let path = Path::new(file_name);
        self.detect_format(path)?.parse_bytes(&layer_name(path), bytes)
    }

    /// Get list of all supported format extensions
    pub fn supported_formats(&self) -> Vec<String> {
        self.readers
            .iter()
            .flat_map(|r| r.supported_extensions())
            .map(|s| s.to_string())
            .collect()
    }

    /// Get all registered readers
    pub fn readers(&self) -> &[Box<dyn FormatReader>] {
        &self.readers
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_builtin_readers()
    }
}

pub(crate) fn layer_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unnamed")
        .to_string()
}

fn collection_bounds(collection: &FeatureCollection) -> Option<Bounds> {
    let mut coords = Vec::new();
    for feature in &collection.features {
        if let Some(geometry) = &feature.geometry {
            collect_positions(&geometry.value, &mut coords);
        }
    }
    geometry::bounds(&coords)
}

fn collect_positions(value: &geojson::Value, out: &mut Vec<Coordinate>) {
    use geojson::Value;

    match value {
        Value::Point(p) => push_position(p, out),
        Value::MultiPoint(ps) | Value::LineString(ps) => {
            ps.iter().for_each(|p| push_position(p, out))
        }
        Value::MultiLineString(lines) | Value::Polygon(lines) => {
            lines.iter().flatten().for_each(|p| push_position(p, out))
        }
        Value::MultiPolygon(polys) => {
            polys.iter().flatten().flatten().for_each(|p| push_position(p, out))
        }
        Value::GeometryCollection(geometries) => {
            for g in geometries {
                collect_positions(&g.value, out);
            }
        }
    }
}

fn push_position(position: &[f64], out: &mut Vec<Coordinate>) {
    if let [lon, lat, ..] = position {
        out.push(Coordinate::new(*lat, *lon));
    }
}
