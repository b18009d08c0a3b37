//! WGS84 coordinates and bounding boxes.
//!
//! Coordinates are kept latitude-first internally, matching how field crews
//! read positions off a GPS receiver. Interchange formats (GeoJSON, KML) flip
//! to longitude-first at the export boundary.

use serde::{Deserialize, Serialize};

use crate::error::{GeotoolError, Result};

/// A latitude/longitude pair in decimal degrees (WGS84)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Create a coordinate, rejecting values outside the WGS84 range
    pub fn validated(lat: f64, lon: f64) -> Result<Self> {
        if !lat.is_finite() || !lon.is_finite() {
            return Err(GeotoolError::InvalidCoordinate {
                lat,
                lon,
                reason: "not a finite number".to_string(),
            });
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(GeotoolError::InvalidCoordinate {
                lat,
                lon,
                reason: "latitude must be within [-90, 90]".to_string(),
            });
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(GeotoolError::InvalidCoordinate {
                lat,
                lon,
                reason: "longitude must be within [-180, 180]".to_string(),
            });
        }
        Ok(Self { lat, lon })
    }

    /// Longitude-first pair, as used by GeoJSON and KML
    pub fn lon_lat(&self) -> [f64; 2] {
        [self.lon, self.lat]
    }

    pub(crate) fn to_point(self) -> geo::Point<f64> {
        geo::Point::new(self.lon, self.lat)
    }
}

impl std::str::FromStr for Coordinate {
    type Err = GeotoolError;

    /// Parse "lat,lon" (whitespace tolerated)
    fn from_str(s: &str) -> Result<Self> {
        let invalid = |reason: &str| GeotoolError::InvalidCoordinate {
            lat: f64::NAN,
            lon: f64::NAN,
            reason: format!("'{}': {}", s, reason),
        };

        let (lat, lon) = s.split_once(',').ok_or_else(|| invalid("expected 'lat,lon'"))?;
        let lat: f64 = lat.trim().parse().map_err(|_| invalid("latitude is not a number"))?;
        let lon: f64 = lon.trim().parse().map_err(|_| invalid("longitude is not a number"))?;

        Self::validated(lat, lon)
    }
}

/// Axis-aligned bounding box in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    /// Bounds of a single coordinate (zero-area box)
    pub fn around(coordinate: Coordinate) -> Self {
        Self {
            south: coordinate.lat,
            west: coordinate.lon,
            north: coordinate.lat,
            east: coordinate.lon,
        }
    }

    /// Grow the box to include another box
    pub fn union(self, other: Bounds) -> Self {
        Self {
            south: self.south.min(other.south),
            west: self.west.min(other.west),
            north: self.north.max(other.north),
            east: self.east.max(other.east),
        }
    }

    pub fn contains(&self, coordinate: Coordinate) -> bool {
        (self.south..=self.north).contains(&coordinate.lat)
            && (self.west..=self.east).contains(&coordinate.lon)
    }

    pub fn center(&self) -> Coordinate {
        Coordinate::new((self.south + self.north) / 2.0, (self.west + self.east) / 2.0)
    }
}
