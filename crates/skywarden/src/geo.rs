//! Great-circle distance between two coordinates.

use crate::domain::Coordinate;

/// Mean Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometers between two points.
///
/// Symmetric and deterministic; input ranges are the caller's concern.
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let (lat1, lon1) = (a.lat.to_radians(), a.lon.to_radians());
    let (lat2, lon2) = (b.lat.to_radians(), b.lon.to_radians());

    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    #[test]
    fn distance_to_self_is_zero() {
        let zurich = coord(47.3769, 8.5417);
        assert_eq!(distance_km(zurich, zurich), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let zurich = coord(47.3769, 8.5417);
        let tokyo = coord(35.6762, 139.6503);
        assert_eq!(distance_km(zurich, tokyo), distance_km(tokyo, zurich));
    }

    #[test]
    fn zurich_to_bern_roughly_95km() {
        let zurich = coord(47.3769, 8.5417);
        let bern = coord(46.9480, 7.4474);
        let d = distance_km(zurich, bern);
        assert!((d - 95.0).abs() < 5.0, "expected ~95 km, got {d}");
    }

    #[test]
    fn antipodal_points_half_circumference() {
        let a = coord(0.0, 0.0);
        let b = coord(0.0, 180.0);
        let d = distance_km(a, b);
        // Half the Earth's circumference at radius 6371 km.
        assert!((d - std::f64::consts::PI * 6371.0).abs() < 1.0, "got {d}");
    }

    #[test]
    fn crosses_antimeridian() {
        let east = coord(0.0, 179.5);
        let west = coord(0.0, -179.5);
        let d = distance_km(east, west);
        assert!(d < 200.0, "short hop across the antimeridian, got {d}");
    }
}
