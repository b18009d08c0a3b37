//! Finalized capture records.
//!
//! A [`Capture`] can only be built through its constructors (or deserialized
//! through the same checks), so the kind/geometry/metric pairing always holds:
//! points carry a description and no metric, lines carry a length, polygons
//! carry an area.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{Bounds, Coordinate};
use crate::error::{GeotoolError, Result};
use crate::geometry;

/// Unique identifier for a capture, ordered by creation time
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CaptureId(pub u64);

impl fmt::Display for CaptureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of a finalized capture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureKind {
    Point,
    Line,
    Polygon,
}

impl CaptureKind {
    /// Vertex count at which the shape may be finalized
    pub fn min_vertices(&self) -> usize {
        match self {
            CaptureKind::Point => 1,
            CaptureKind::Line => 2,
            CaptureKind::Polygon => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CaptureKind::Point => "point",
            CaptureKind::Line => "line",
            CaptureKind::Polygon => "polygon",
        }
    }
}

impl fmt::Display for CaptureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Digitizing tool offered to the user.
///
/// `Area` is a separate affordance in the toolbar but produces the same
/// polygon captures as `Polygon`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureTool {
    Point,
    Line,
    Polygon,
    Area,
}

impl CaptureTool {
    pub fn kind(&self) -> CaptureKind {
        match self {
            CaptureTool::Point => CaptureKind::Point,
            CaptureTool::Line => CaptureKind::Line,
            CaptureTool::Polygon | CaptureTool::Area => CaptureKind::Polygon,
        }
    }
}

impl FromStr for CaptureTool {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "point" => Ok(CaptureTool::Point),
            "line" => Ok(CaptureTool::Line),
            "polygon" => Ok(CaptureTool::Polygon),
            "area" => Ok(CaptureTool::Area),
            other => Err(format!(
                "unknown tool '{}': expected point, line, polygon, or area",
                other
            )),
        }
    }
}

/// Geometry plus the metric derived from it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CaptureShape {
    Point {
        coordinates: Coordinate,
        #[serde(default)]
        description: String,
    },
    Line {
        coordinates: Vec<Coordinate>,
        /// Length in meters
        distance: f64,
    },
    Polygon {
        /// Implicitly closed ring, first vertex not repeated
        coordinates: Vec<Coordinate>,
        /// Area in square meters
        area: f64,
    },
}

impl CaptureShape {
    pub fn kind(&self) -> CaptureKind {
        match self {
            CaptureShape::Point { .. } => CaptureKind::Point,
            CaptureShape::Line { .. } => CaptureKind::Line,
            CaptureShape::Polygon { .. } => CaptureKind::Polygon,
        }
    }

    fn check(&self) -> Result<()> {
        let (kind, count, metric) = match self {
            CaptureShape::Point { .. } => return Ok(()),
            CaptureShape::Line { coordinates, distance } => {
                (CaptureKind::Line, coordinates.len(), *distance)
            }
            CaptureShape::Polygon { coordinates, area } => {
                (CaptureKind::Polygon, coordinates.len(), *area)
            }
        };

        if count < kind.min_vertices() {
            return Err(GeotoolError::TooFewVertices {
                kind,
                required: kind.min_vertices(),
                actual: count,
            });
        }
        if !metric.is_finite() || metric < 0.0 {
            return Err(GeotoolError::Serialization(format!(
                "{} metric must be a non-negative number, got {}",
                kind, metric
            )));
        }
        Ok(())
    }
}

/// A finalized, named geometric record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CaptureRecord")]
pub struct Capture {
    /// Assigned by the store when the capture is added
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<CaptureId>,

    name: String,

    #[serde(flatten)]
    shape: CaptureShape,

    pub created_at: DateTime<Utc>,
}

impl Capture {
    /// Create a point capture
    pub fn point(
        name: impl Into<String>,
        description: impl Into<String>,
        coordinate: Coordinate,
    ) -> Result<Self> {
        Self::new(
            name.into(),
            CaptureShape::Point {
                coordinates: coordinate,
                description: description.into(),
            },
        )
    }

    /// Create a line capture, measuring its length
    pub fn line(name: impl Into<String>, vertices: Vec<Coordinate>) -> Result<Self> {
        let distance = geometry::distance(&vertices);
        Self::new(
            name.into(),
            CaptureShape::Line {
                coordinates: vertices,
                distance,
            },
        )
    }

    /// Create a polygon capture, measuring its area
    pub fn polygon(name: impl Into<String>, vertices: Vec<Coordinate>) -> Result<Self> {
        let area = geometry::area(&vertices);
        Self::new(
            name.into(),
            CaptureShape::Polygon {
                coordinates: vertices,
                area,
            },
        )
    }

    fn new(name: String, shape: CaptureShape) -> Result<Self> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(GeotoolError::EmptyName);
        }
        shape.check()?;

        Ok(Self {
            id: None,
            name,
            shape,
            created_at: Utc::now(),
        })
    }

    /// Set the identifier (normally done by the store)
    pub fn with_id(mut self, id: CaptureId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn kind(&self) -> CaptureKind {
        self.shape.kind()
    }

    /// Trimmed, never empty
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> &CaptureShape {
        &self.shape
    }

    /// Vertices in capture order (a single one for points)
    pub fn coordinates(&self) -> &[Coordinate] {
        match &self.shape {
            CaptureShape::Point { coordinates, .. } => std::slice::from_ref(coordinates),
            CaptureShape::Line { coordinates, .. } => coordinates,
            CaptureShape::Polygon { coordinates, .. } => coordinates,
        }
    }

    /// Free-text description; always empty for lines and polygons
    pub fn description(&self) -> &str {
        match &self.shape {
            CaptureShape::Point { description, .. } => description,
            _ => "",
        }
    }

    /// Length in meters, present only for lines
    pub fn length(&self) -> Option<f64> {
        match &self.shape {
            CaptureShape::Line { distance, .. } => Some(*distance),
            _ => None,
        }
    }

    /// Area in square meters, present only for polygons
    pub fn area(&self) -> Option<f64> {
        match &self.shape {
            CaptureShape::Polygon { area, .. } => Some(*area),
            _ => None,
        }
    }

    pub fn bounds(&self) -> Option<Bounds> {
        geometry::bounds(self.coordinates())
    }
}

/// Wire form of a capture, validated into [`Capture`] on deserialization
#[derive(Deserialize)]
struct CaptureRecord {
    #[serde(default)]
    id: Option<CaptureId>,
    name: String,
    #[serde(flatten)]
    shape: CaptureShape,
    created_at: DateTime<Utc>,
}

impl TryFrom<CaptureRecord> for Capture {
    type Error = GeotoolError;

    fn try_from(record: CaptureRecord) -> Result<Self> {
        let mut capture = Capture::new(record.name, record.shape)?;
        capture.id = record.id;
        capture.created_at = record.created_at;
        Ok(capture)
    }
}
