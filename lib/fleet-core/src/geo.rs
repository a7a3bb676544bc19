//! Great-circle distance on a spherical Earth

/// Mean Earth radius used by all distance calculations, in kilometres
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Calculate the great-circle distance between two positions.
///
/// Uses the haversine formula. Positions are `(latitude, longitude)` in
/// degrees; the result is in kilometres.
///
/// ```
/// use fleet_core::geo::haversine_km;
///
/// // One degree of latitude is roughly 111 km
/// let dist = haversine_km((0.0, 0.0), (1.0, 0.0));
/// assert!((dist - 111.19).abs() < 0.01);
/// ```
pub fn haversine_km(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lon1) = from;
    let (lat2, lon2) = to;

    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (delta_lon / 2.0).sin().powi(2);
    // Rounding can push `a` just past 1 for antipodal points
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_point_is_zero() {
        assert_eq!(haversine_km((22.74, 69.70), (22.74, 69.70)), 0.0);
    }

    #[test]
    fn test_symmetric() {
        let a = (23.00, 70.18);
        let b = (22.47, 70.05);
        assert!((haversine_km(a, b) - haversine_km(b, a)).abs() < 1e-9);
    }

    #[test]
    fn test_known_short_distance() {
        // 0.01 degrees in both axes near the Gulf of Kutch
        let dist = haversine_km((22.75, 69.71), (22.74, 69.70));
        assert!((dist - 1.513).abs() < 0.01, "got {}", dist);
    }

    #[test]
    fn test_antipodal_points() {
        let dist = haversine_km((0.0, 0.0), (0.0, 180.0));
        let half_circumference = std::f64::consts::PI * EARTH_RADIUS_KM;
        assert!((dist - half_circumference).abs() < 1e-6);
        assert!(haversine_km((90.0, 0.0), (-90.0, 0.0)).is_finite());
    }

    #[test]
    fn test_negative_coordinates() {
        // Berlin to Paris is roughly 878 km; mirrored into the southern/western hemisphere
        let dist = haversine_km((-52.5200, -13.4050), (-48.8566, -2.3522));
        assert!((dist - 878.0).abs() < 10.0);
    }
}
