use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Coordinate;

/// One GPS fix recorded while the position watch is active
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackSample {
    #[serde(flatten)]
    pub coordinate: Coordinate,

    /// Horizontal accuracy radius in meters
    pub accuracy: f64,

    /// Altitude in meters (0 when the receiver reports none)
    pub altitude: f64,

    pub timestamp: DateTime<Utc>,
}

impl TrackSample {
    pub fn new(coordinate: Coordinate, accuracy: f64, altitude: Option<f64>) -> Self {
        Self::at(coordinate, accuracy, altitude, Utc::now())
    }

    pub fn at(
        coordinate: Coordinate,
        accuracy: f64,
        altitude: Option<f64>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            coordinate,
            accuracy,
            altitude: altitude.unwrap_or(0.0),
            timestamp,
        }
    }
}
