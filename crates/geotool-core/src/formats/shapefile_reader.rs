//! ESRI Shapefile reader
//!
//! Accepts a zipped shapefile, where every `.shp` in the archive is read
//! together with the `.dbf` of the same name, or a bare `.shp` with an
//! optional sibling `.dbf`. Coordinates must already be WGS84 longitude and
//! latitude.

use async_trait::async_trait;
use geojson::{Feature, FeatureCollection, JsonObject, Value};
use serde_json::Value as JsonValue;
use shapefile::dbase::{self, FieldValue};
use shapefile::{Point, PointM, PointZ, PolygonRing, Shape, ShapeReader};
use std::collections::HashMap;
use std::io::{Cursor, ErrorKind, Read};
use std::path::Path;

use crate::error::{GeotoolError, Result};
use crate::formats::{layer_name, FormatReader, LoadedLayer};

const FORMAT: &str = "Shapefile";

/// Shapefile format reader
pub struct ShapefileReader;

#[async_trait]
impl FormatReader for ShapefileReader {
    fn parse(&self, name: &str, content: &str) -> Result<LoadedLayer> {
        self.parse_bytes(name, content.as_bytes())
    }

    fn parse_bytes(&self, name: &str, bytes: &[u8]) -> Result<LoadedLayer> {
        let features = if is_zip(bytes) {
            read_archive(bytes)?
        } else {
            read_shapes(bytes, None)?
        };
        geographic_layer(name, features)
    }

    fn supported_extensions(&self) -> &[&str] {
        &["zip", "shp"]
    }

    fn format_name(&self) -> &str {
        FORMAT
    }

    async fn read(&self, path: &Path) -> Result<LoadedLayer> {
        let bytes = tokio::fs::read(path).await?;
        if is_zip(&bytes) {
            return self.parse_bytes(&layer_name(path), &bytes);
        }

        let dbf = match tokio::fs::read(path.with_extension("dbf")).await {
            Ok(dbf) => Some(dbf),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No .dbf next to shapefile, loading geometry only");
                None
            }
            Err(e) => return Err(e.into()),
        };
        let features = read_shapes(&bytes, dbf.as_deref())?;
        geographic_layer(&layer_name(path), features)
    }
}

fn invalid(reason: impl Into<String>) -> GeotoolError {
    GeotoolError::FormatValidation {
        format: FORMAT.to_string(),
        reason: reason.into(),
    }
}

fn is_zip(bytes: &[u8]) -> bool {
    bytes.starts_with(b"PK")
}

fn read_archive(bytes: &[u8]) -> Result<Vec<Feature>> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| invalid(format!("Failed to open archive: {}", e)))?;

    // Lowercased entry name -> contents, for .shp and .dbf members only
    let mut members: HashMap<String, Vec<u8>> = HashMap::new();
    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| invalid(format!("Failed to read archive entry: {}", e)))?;
        let name = entry.name().to_ascii_lowercase();
        if entry.is_dir() || name.starts_with("__macosx/") {
            continue;
        }
        if name.ends_with(".shp") || name.ends_with(".dbf") {
            let mut data = Vec::new();
            entry.read_to_end(&mut data)?;
            members.insert(name, data);
        }
    }

    let mut shapes: Vec<&String> = members.keys().filter(|n| n.ends_with(".shp")).collect();
    if shapes.is_empty() {
        return Err(invalid("Archive contains no .shp file"));
    }
    shapes.sort();

    let mut features = Vec::new();
    for shp in shapes {
        let dbf = members.get(&format!("{}.dbf", shp.trim_end_matches(".shp")));
        features.extend(read_shapes(&members[shp], dbf.map(Vec::as_slice))?);
    }
    Ok(features)
}

fn read_shapes(shp: &[u8], dbf: Option<&[u8]>) -> Result<Vec<Feature>> {
    let shape_reader = ShapeReader::new(Cursor::new(shp))
        .map_err(|e| invalid(format!("Failed to open shapes: {}", e)))?;

    let Some(dbf) = dbf else {
        let shapes = shape_reader
            .read()
            .map_err(|e| invalid(format!("Failed to read shape: {}", e)))?;
        return Ok(shapes.iter().map(|shape| feature(shape, JsonObject::new())).collect());
    };

    let table = dbase::Reader::new(Cursor::new(dbf))
        .map_err(|e| invalid(format!("Failed to read attributes: {}", e)))?;
    let mut reader = shapefile::Reader::new(shape_reader, table);

    let mut features = Vec::new();
    for result in reader.iter_shapes_and_records() {
        let (shape, record) = result.map_err(|e| invalid(format!("Failed to read feature: {}", e)))?;
        let properties = record
            .into_iter()
            .map(|(name, value)| (name, attribute(&value)))
            .collect();
        features.push(feature(&shape, properties));
    }
    Ok(features)
}

/// Projected shapefiles would land far off the map, so they are refused
fn geographic_layer(name: &str, features: Vec<Feature>) -> Result<LoadedLayer> {
    let layer = LoadedLayer::new(
        name,
        FORMAT,
        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        },
    );

    if let Some(bounds) = layer.bounds {
        let geographic = bounds.south >= -90.0
            && bounds.north <= 90.0
            && bounds.west >= -180.0
            && bounds.east <= 180.0;
        if !geographic {
            return Err(invalid(
                "Coordinates are not longitude/latitude; reproject the layer to WGS84 (EPSG:4326)",
            ));
        }
    }
    Ok(layer)
}

fn feature(shape: &Shape, properties: JsonObject) -> Feature {
    Feature {
        geometry: geometry(shape).map(geojson::Geometry::new),
        properties: Some(properties),
        ..Default::default()
    }
}

/// Anything with planar coordinates; Z is kept, M is dropped
trait Planar {
    fn position(&self) -> Vec<f64>;
}

impl Planar for Point {
    fn position(&self) -> Vec<f64> {
        vec![self.x, self.y]
    }
}

impl Planar for PointM {
    fn position(&self) -> Vec<f64> {
        vec![self.x, self.y]
    }
}

impl Planar for PointZ {
    fn position(&self) -> Vec<f64> {
        vec![self.x, self.y, self.z]
    }
}

fn path<P: Planar>(points: &[P]) -> Vec<Vec<f64>> {
    points.iter().map(Planar::position).collect()
}

fn lines<P: Planar>(parts: &[Vec<P>]) -> Value {
    let mut lines: Vec<_> = parts.iter().map(|part| path(part)).collect();
    if lines.len() == 1 {
        Value::LineString(lines.remove(0))
    } else {
        Value::MultiLineString(lines)
    }
}

/// Inner rings attach to the outer ring read before them
fn polygons<P: Planar>(rings: &[PolygonRing<P>]) -> Value {
    let mut polygons: Vec<Vec<Vec<Vec<f64>>>> = Vec::new();
    for ring in rings {
        match ring {
            PolygonRing::Outer(points) => polygons.push(vec![path(points)]),
            PolygonRing::Inner(points) => match polygons.last_mut() {
                Some(polygon) => polygon.push(path(points)),
                None => polygons.push(vec![path(points)]),
            },
        }
    }

    if polygons.len() == 1 {
        Value::Polygon(polygons.remove(0))
    } else {
        Value::MultiPolygon(polygons)
    }
}

fn geometry(shape: &Shape) -> Option<Value> {
    let value = match shape {
        Shape::NullShape => return None,
        Shape::Point(p) => Value::Point(p.position()),
        Shape::PointM(p) => Value::Point(p.position()),
        Shape::PointZ(p) => Value::Point(p.position()),
        Shape::Polyline(line) => lines(line.parts()),
        Shape::PolylineM(line) => lines(line.parts()),
        Shape::PolylineZ(line) => lines(line.parts()),
        Shape::Polygon(polygon) => polygons(polygon.rings()),
        Shape::PolygonM(polygon) => polygons(polygon.rings()),
        Shape::PolygonZ(polygon) => polygons(polygon.rings()),
        Shape::Multipoint(points) => Value::MultiPoint(path(points.points())),
        Shape::MultipointM(points) => Value::MultiPoint(path(points.points())),
        Shape::MultipointZ(points) => Value::MultiPoint(path(points.points())),
        Shape::Multipatch(_) => {
            tracing::debug!("Skipping multipatch geometry");
            return None;
        }
    };
    Some(value)
}

fn number(value: f64) -> JsonValue {
    serde_json::Number::from_f64(value)
        .map(JsonValue::Number)
        .unwrap_or(JsonValue::Null)
}

fn attribute(value: &FieldValue) -> JsonValue {
    match value {
        FieldValue::Character(Some(s)) => JsonValue::String(s.trim().to_string()),
        FieldValue::Numeric(Some(n)) => number(*n),
        FieldValue::Float(Some(f)) => number(f64::from(*f)),
        FieldValue::Double(d) => number(*d),
        FieldValue::Currency(c) => number(*c),
        FieldValue::Integer(i) => JsonValue::from(*i),
        FieldValue::Logical(Some(b)) => JsonValue::Bool(*b),
        FieldValue::Date(Some(date)) => JsonValue::String(format!(
            "{:04}-{:02}-{:02}",
            date.year(),
            date.month(),
            date.day()
        )),
        FieldValue::Memo(s) => JsonValue::String(s.clone()),
        _ => JsonValue::Null,
    }
}
