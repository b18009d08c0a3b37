//! In-session store of finalized captures and the GPS track log.

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{GeotoolError, Result};
use crate::models::{Capture, CaptureId, CaptureKind, TrackSample};

/// Summary figures shown on the dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CaptureStats {
    pub point_count: usize,
    pub line_count: usize,
    pub polygon_count: usize,
    /// Sum of all line lengths in meters
    pub total_length: f64,
    /// Sum of all polygon areas in square meters
    pub total_area: f64,
    pub track_samples: usize,
}

/// Serializable form of the store handed to persistence
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    #[serde(default)]
    pub captures: Vec<Capture>,
    #[serde(default, rename = "gpsTrack", alias = "gps_track")]
    pub gps_track: Vec<TrackSample>,
}

/// Ordered captures plus the raw GPS track
#[derive(Debug, Clone, Default)]
pub struct CaptureStore {
    captures: Vec<Capture>,
    track: Vec<TrackSample>,
    last_id: u64,
}

impl CaptureStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a capture, assigning an id if it has none.
    ///
    /// Ids derive from the creation clock in milliseconds and are bumped when
    /// two captures land in the same millisecond, so they stay unique and
    /// ordered by creation.
    pub fn add(&mut self, mut capture: Capture) -> Result<CaptureId> {
        let id = match capture.id {
            Some(id) => {
                if self.get(id).is_some() {
                    return Err(GeotoolError::DuplicateCapture(id));
                }
                id
            }
            None => self.next_id(),
        };

        self.last_id = self.last_id.max(id.0);
        capture.id = Some(id);
        tracing::debug!(id = %id, kind = %capture.kind(), name = %capture.name(), "Capture stored");
        self.captures.push(capture);
        Ok(id)
    }

    /// Remove a capture; unknown ids are ignored
    pub fn remove(&mut self, id: CaptureId) -> Option<Capture> {
        let index = self.captures.iter().position(|c| c.id == Some(id))?;
        Some(self.captures.remove(index))
    }

    pub fn get(&self, id: CaptureId) -> Option<&Capture> {
        self.captures.iter().find(|c| c.id == Some(id))
    }

    /// Captures in insertion order
    pub fn list(&self) -> &[Capture] {
        &self.captures
    }

    pub fn len(&self) -> usize {
        self.captures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.captures.is_empty()
    }

    /// Recompute the summary from current membership
    pub fn aggregate(&self) -> CaptureStats {
        let mut stats = CaptureStats {
            track_samples: self.track.len(),
            ..Default::default()
        };

        for capture in &self.captures {
            match capture.kind() {
                CaptureKind::Point => stats.point_count += 1,
                CaptureKind::Line => {
                    stats.line_count += 1;
                    stats.total_length += capture.length().unwrap_or(0.0);
                }
                CaptureKind::Polygon => {
                    stats.polygon_count += 1;
                    stats.total_area += capture.area().unwrap_or(0.0);
                }
            }
        }

        stats
    }

    pub fn append_track_sample(&mut self, sample: TrackSample) {
        self.track.push(sample);
    }

    pub fn track(&self) -> &[TrackSample] {
        &self.track
    }

    /// Time between the first and last GPS fix
    pub fn track_duration(&self) -> Option<Duration> {
        let first = self.track.first()?;
        let last = self.track.last()?;
        Some(last.timestamp - first.timestamp)
    }

    /// Drop every capture and track sample
    pub fn clear(&mut self) {
        self.captures.clear();
        self.track.clear();
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            captures: self.captures.clone(),
            gps_track: self.track.clone(),
        }
    }

    /// Rebuild a store from a snapshot.
    ///
    /// Captures without an id get a fresh one; a repeated id keeps its first
    /// occurrence and drops the rest.
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        let mut store = CaptureStore::new();
        for capture in snapshot.captures {
            if let Err(e) = store.add(capture) {
                tracing::warn!(error = %e, "Dropping capture from snapshot");
            }
        }
        store.track = snapshot.gps_track;
        store
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.snapshot())?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: StoreSnapshot = serde_json::from_str(json)?;
        Ok(Self::from_snapshot(snapshot))
    }

    fn next_id(&self) -> CaptureId {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        CaptureId(now.max(self.last_id + 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Coordinate;

    fn c(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon)
    }

    fn point(name: &str) -> Capture {
        Capture::point(name, "", c(24.0, -104.6)).unwrap()
    }

    #[test]
    fn test_ids_are_unique_and_ordered() {
        let mut store = CaptureStore::new();
        let ids: Vec<CaptureId> =
            (0..5).map(|i| store.add(point(&format!("p{}", i))).unwrap()).collect();

        for pair in ids.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        let names: Vec<&str> = store.list().iter().map(|c| c.name()).collect();
        assert_eq!(names, ["p0", "p1", "p2", "p3", "p4"]);
    }

    #[test]
    fn test_explicit_ids_are_kept_and_duplicates_rejected() {
        let mut store = CaptureStore::new();
        assert_eq!(store.add(point("a").with_id(CaptureId(42))).unwrap(), CaptureId(42));
        assert!(matches!(
            store.add(point("b").with_id(CaptureId(42))),
            Err(GeotoolError::DuplicateCapture(CaptureId(42)))
        ));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_remove_unknown_id_is_a_no_op() {
        let mut store = CaptureStore::new();
        let id = store.add(point("a")).unwrap();
        let before = store.list().to_vec();

        assert!(store.remove(CaptureId(id.0 + 1000)).is_none());
        assert_eq!(store.list(), before.as_slice());
    }

    #[test]
    fn test_remove_does_not_renumber() {
        let mut store = CaptureStore::new();
        let a = store.add(point("a")).unwrap();
        let b = store.add(point("b")).unwrap();
        let d = store.add(point("d")).unwrap();

        assert_eq!(store.remove(b).unwrap().name(), "b");
        assert_eq!(store.get(a).unwrap().name(), "a");
        assert_eq!(store.get(d).unwrap().name(), "d");
    }

    #[test]
    fn test_aggregate() {
        let line = Capture::line("l", vec![c(0.0, 0.0), c(0.0, 0.01)]).unwrap();
        let polygon =
            Capture::polygon("p", vec![c(0.0, 0.0), c(0.0, 0.01), c(0.01, 0.0)]).unwrap();

        let mut store = CaptureStore::new();
        store.add(line.clone()).unwrap();
        store.add(polygon.clone()).unwrap();

        let stats = store.aggregate();
        assert_eq!(stats.point_count, 0);
        assert_eq!(stats.line_count, 1);
        assert_eq!(stats.polygon_count, 1);
        assert_eq!(stats.total_length, line.length().unwrap());
        assert_eq!(stats.total_area, polygon.area().unwrap());

        store.add(point("a")).unwrap();
        let stats = store.aggregate();
        assert_eq!(stats.point_count, 1);
        assert_eq!(stats.total_length, line.length().unwrap());
    }

    #[test]
    fn test_aggregate_sums_stored_metrics() {
        let line: Capture = serde_json::from_value(serde_json::json!({
            "name": "Brecha",
            "type": "line",
            "coordinates": [{"lat": 24.0, "lon": -104.6}, {"lat": 24.009, "lon": -104.6}],
            "distance": 1000.0,
            "created_at": "2024-05-01T10:00:00Z"
        }))
        .unwrap();
        let polygon: Capture = serde_json::from_value(serde_json::json!({
            "name": "Rodal 7",
            "type": "polygon",
            "coordinates": [
                {"lat": 24.0, "lon": -104.6},
                {"lat": 24.001, "lon": -104.6},
                {"lat": 24.001, "lon": -104.601}
            ],
            "area": 20000.0,
            "created_at": "2024-05-01T10:00:00Z"
        }))
        .unwrap();

        let mut store = CaptureStore::new();
        store.add(line).unwrap();
        store.add(polygon).unwrap();

        let stats = store.aggregate();
        assert_eq!(stats.point_count, 0);
        assert_eq!(stats.total_length, 1000.0);
        assert_eq!(stats.total_area, 20000.0);
    }

    #[test]
    fn test_json_round_trip_keeps_ids_and_track() {
        let mut store = CaptureStore::new();
        let id = store.add(point("a")).unwrap();
        store.append_track_sample(TrackSample::new(c(24.0, -104.6), 4.5, Some(1890.0)));

        let restored = CaptureStore::from_json(&store.to_json().unwrap()).unwrap();
        assert_eq!(restored.list(), store.list());
        assert_eq!(restored.track(), store.track());
        assert!(restored.get(id).is_some());
    }

    #[test]
    fn test_snapshot_uses_gps_track_key() {
        let json = r#"{"gpsTrack":[{"lat":1.0,"lon":2.0,"accuracy":3.0,"altitude":0.0,"timestamp":"2024-05-01T10:00:00Z"}]}"#;
        let store = CaptureStore::from_json(json).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.track().len(), 1);
    }

    #[test]
    fn test_track_duration() {
        let mut store = CaptureStore::new();
        assert!(store.track_duration().is_none());

        let start = Utc::now();
        store.append_track_sample(TrackSample::at(c(0.0, 0.0), 5.0, None, start));
        store.append_track_sample(TrackSample::at(
            c(0.0, 0.001),
            5.0,
            None,
            start + Duration::minutes(90),
        ));
        assert_eq!(store.track_duration(), Some(Duration::minutes(90)));
    }
}
