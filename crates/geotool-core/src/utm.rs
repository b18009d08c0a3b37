//! UTM readout for a WGS84 position.
//!
//! The zone is always available. Easting and northing need the `utm`
//! feature, which links libproj through the `proj` crate.

use serde::Serialize;
use std::fmt;

use crate::models::Coordinate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Hemisphere {
    #[serde(rename = "N")]
    North,
    #[serde(rename = "S")]
    South,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UtmZone {
    pub number: u8,
    pub hemisphere: Hemisphere,
}

impl UtmZone {
    /// Zone containing a coordinate; the equator counts as north
    pub fn of(coordinate: Coordinate) -> Self {
        let number = ((coordinate.lon + 180.0) / 6.0).floor() as i64 + 1;
        let hemisphere = if coordinate.lat >= 0.0 {
            Hemisphere::North
        } else {
            Hemisphere::South
        };
        Self {
            number: number.clamp(1, 60) as u8,
            hemisphere,
        }
    }

    /// WGS 84 / UTM code, 326xx north and 327xx south
    pub fn epsg(&self) -> u32 {
        let base = match self.hemisphere {
            Hemisphere::North => 32600,
            Hemisphere::South => 32700,
        };
        base + u32::from(self.number)
    }
}

impl fmt::Display for UtmZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self.hemisphere {
            Hemisphere::North => 'N',
            Hemisphere::South => 'S',
        };
        write!(f, "{}{}", self.number, letter)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UtmPosition {
    pub zone: UtmZone,
    pub easting: f64,
    pub northing: f64,
}

impl fmt::Display for UtmPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "UTM {} {:.2} E, {:.2} N",
            self.zone, self.easting, self.northing
        )
    }
}

/// Project a coordinate into its own UTM zone
#[cfg(feature = "utm")]
pub fn project(coordinate: Coordinate) -> crate::Result<UtmPosition> {
    use crate::GeotoolError;
    use proj::Proj;

    let zone = UtmZone::of(coordinate);
    let target = format!("EPSG:{}", zone.epsg());
    let proj = Proj::new_known_crs("EPSG:4326", &target, None).map_err(|e| {
        GeotoolError::ConfigInvalid {
            key: "utm".to_string(),
            reason: format!("Failed to create projection to {}: {}", target, e),
        }
    })?;

    let (easting, northing) =
        proj.convert((coordinate.lon, coordinate.lat))
            .map_err(|e| GeotoolError::ConfigInvalid {
                key: "utm".to_string(),
                reason: format!("Projection failed: {}", e),
            })?;

    Ok(UtmPosition {
        zone,
        easting,
        northing,
    })
}

/// Human readout: full position when projection is available, zone otherwise
pub fn readout(coordinate: Coordinate) -> String {
    #[cfg(feature = "utm")]
    match project(coordinate) {
        Ok(position) => return position.to_string(),
        Err(e) => tracing::warn!(error = %e, "UTM projection failed"),
    }

    format!("UTM zone {}", UtmZone::of(coordinate))
}
