//! Spherical measurements for captured shapes.
//!
//! Both operations treat the Earth as a sphere of radius [`EARTH_RADIUS_M`].
//! That is accurate enough for field-scale shapes (hectares to a few km²);
//! error grows for very large polygons or polygons close to the poles.

use geo::{BoundingRect, Distance, Haversine, MultiPoint};

use crate::models::{Bounds, Coordinate};

/// Mean Earth radius in meters, the radius `geo`'s haversine uses
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Total great-circle length of a path in meters.
///
/// Returns 0 for fewer than two coordinates.
pub fn distance(coordinates: &[Coordinate]) -> f64 {
    coordinates
        .windows(2)
        .map(|pair| Haversine.distance(pair[0].to_point(), pair[1].to_point()))
        .sum()
}

/// Area of an implicitly closed ring in square meters.
///
/// Sums `(λ2 − λ1)(2 + sin φ1 + sin φ2)` over consecutive vertex pairs
/// (wrapping back to the first vertex), then scales by `R² / 2`. Winding
/// direction does not affect the result. Returns 0 for fewer than three
/// coordinates.
pub fn area(ring: &[Coordinate]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }

    let sum: f64 = ring
        .iter()
        .zip(ring.iter().cycle().skip(1))
        .map(|(a, b)| {
            let (lon1, lat1) = (a.lon.to_radians(), a.lat.to_radians());
            let (lon2, lat2) = (b.lon.to_radians(), b.lat.to_radians());
            (lon2 - lon1) * (2.0 + lat1.sin() + lat2.sin())
        })
        .sum();

    (sum * EARTH_RADIUS_M * EARTH_RADIUS_M / 2.0).abs()
}

/// Bounding box of a coordinate sequence, `None` when empty
pub fn bounds(coordinates: &[Coordinate]) -> Option<Bounds> {
    let points: MultiPoint<f64> = coordinates.iter().map(|c| c.to_point()).collect();
    let rect = points.bounding_rect()?;

    Some(Bounds {
        south: rect.min().y,
        west: rect.min().x,
        north: rect.max().y,
        east: rect.max().x,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn c(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon)
    }

    #[test]
    fn test_distance_degenerate_inputs() {
        assert_eq!(distance(&[]), 0.0);
        assert_eq!(distance(&[c(24.0, -104.6)]), 0.0);
        assert!(distance(&[c(24.0, -104.6), c(24.0, -104.6)]).abs() < 1e-9);
    }

    #[test]
    fn test_distance_one_degree_of_longitude_at_equator() {
        // 2πR / 360
        let expected = 2.0 * std::f64::consts::PI * EARTH_RADIUS_M / 360.0;
        let measured = distance(&[c(0.0, 0.0), c(0.0, 1.0)]);
        assert!((measured - expected).abs() < 1.0, "got {}", measured);
    }

    #[test]
    fn test_distance_sums_segments() {
        let a = c(0.0, 0.0);
        let b = c(0.0, 0.01);
        let d = c(0.01, 0.01);
        let total = distance(&[a, b, d]);
        let parts = distance(&[a, b]) + distance(&[b, d]);
        assert!((total - parts).abs() < 1e-6);
    }

    #[test]
    fn test_area_degenerate_inputs() {
        assert_eq!(area(&[]), 0.0);
        assert_eq!(area(&[c(0.0, 0.0), c(1.0, 1.0)]), 0.0);
    }

    #[test]
    fn test_area_small_square_matches_planar_estimate() {
        let ring = [c(0.0, 0.0), c(0.0, 0.001), c(0.001, 0.001), c(0.001, 0.0)];
        let planar = (0.001_f64 * 111_320.0).powi(2);
        let measured = area(&ring);

        assert!(measured > 0.0);
        assert!(
            ((measured - planar) / planar).abs() < 0.02,
            "area {} should be within 2% of {}",
            measured,
            planar
        );
    }

    #[test]
    fn test_bounds() {
        assert!(bounds(&[]).is_none());

        let b = bounds(&[c(1.0, -3.0), c(-2.0, 4.0), c(0.5, 0.5)]).unwrap();
        assert_eq!(b.south, -2.0);
        assert_eq!(b.north, 1.0);
        assert_eq!(b.west, -3.0);
        assert_eq!(b.east, 4.0);
    }

    fn field_coordinate() -> impl Strategy<Value = Coordinate> {
        (-60.0..60.0f64, -170.0..170.0f64).prop_map(|(lat, lon)| Coordinate::new(lat, lon))
    }

    proptest! {
        #[test]
        fn prop_area_ignores_winding(
            origin in field_coordinate(),
            offsets in prop::collection::vec((-0.05..0.05f64, -0.05..0.05f64), 3..12),
        ) {
            let ring: Vec<Coordinate> = offsets
                .iter()
                .map(|(dlat, dlon)| Coordinate::new(origin.lat + dlat, origin.lon + dlon))
                .collect();
            let mut reversed = ring.clone();
            reversed.reverse();

            let forward = area(&ring);
            let backward = area(&reversed);
            prop_assert!((forward - backward).abs() <= 1e-3 + 1e-9 * forward);
        }

        #[test]
        fn prop_distance_is_non_negative_and_symmetric(
            path in prop::collection::vec(field_coordinate(), 0..10),
        ) {
            let mut reversed = path.clone();
            reversed.reverse();

            let forward = distance(&path);
            prop_assert!(forward >= 0.0);
            prop_assert!((forward - distance(&reversed)).abs() <= 1e-6 * forward.max(1.0));
        }
    }
}
