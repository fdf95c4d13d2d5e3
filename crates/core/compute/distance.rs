//! Great-circle distance and planar interpolation between points.

use cellpath_types::geo::GeoPoint;

/// Sphere radius used for every distance in this crate.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Haversine distance between two points in meters.
///
/// Symmetric, never negative, and exactly zero for identical points.
/// Non-finite coordinates produce a non-finite result.
///
/// # Examples
///
/// ```
/// use cellpath::compute::distance::haversine_distance;
/// use cellpath::GeoPoint;
///
/// let a = GeoPoint::new(0.0, 0.0);
/// let b = GeoPoint::new(0.0, 0.01);
/// let d = haversine_distance(&a, &b);
/// assert!((d - 1111.95).abs() < 0.01);
/// ```
pub fn haversine_distance(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat1 = a.lat().to_radians();
    let lat2 = b.lat().to_radians();
    let delta_lat = lat2 - lat1;
    let delta_lon = (b.lon() - a.lon()).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);

    // Rounding can push h a hair above 1 for antipodal points. NaN must
    // survive, so no f64::min here.
    let h = if h > 1.0 { 1.0 } else { h };

    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}

/// Point at `fraction` of the way from `start` to `end` on the lon/lat plane.
///
/// Each coordinate is `start + fraction * (end - start)`. This is not a
/// geodesic interpolation; it is accurate enough for the short segments of
/// a travel path. `fraction` 0 returns `start` and 1 returns `end` exactly.
/// Values outside `[0, 1]` extrapolate.
pub fn interpolate(start: &GeoPoint, end: &GeoPoint, fraction: f64) -> GeoPoint {
    // start + 1.0 * (end - start) can miss `end` by an ulp.
    if fraction == 1.0 {
        return *end;
    }

    GeoPoint::new(
        start.lon() + fraction * (end.lon() - start.lon()),
        start.lat() + fraction * (end.lat() - start.lat()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_for_same_point() {
        let p = GeoPoint::new(77.5946, 12.9716);
        assert_eq!(haversine_distance(&p, &p), 0.0);
    }

    #[test]
    fn test_symmetric() {
        let pairs = [
            (GeoPoint::new(-74.0060, 40.7128), GeoPoint::new(-118.2437, 34.0522)),
            (GeoPoint::new(0.0, 0.0), GeoPoint::new(179.9, -0.1)),
            (GeoPoint::new(12.5, -33.0), GeoPoint::new(12.5001, -33.0002)),
        ];
        for (a, b) in pairs {
            assert_eq!(haversine_distance(&a, &b), haversine_distance(&b, &a));
        }
    }

    #[test]
    fn test_known_distance() {
        let nyc = GeoPoint::new(-74.0060, 40.7128);
        let la = GeoPoint::new(-118.2437, 34.0522);
        let d = haversine_distance(&nyc, &la);
        assert!(d > 3_900_000.0 && d < 4_000_000.0);
    }

    #[test]
    fn test_one_degree_of_latitude() {
        let d = haversine_distance(&GeoPoint::new(0.0, 0.0), &GeoPoint::new(0.0, 1.0));
        let expected = EARTH_RADIUS_M * 1f64.to_radians();
        assert!((d - expected).abs() < 1e-6);
    }

    #[test]
    fn test_antipodal_is_half_circumference() {
        let d = haversine_distance(&GeoPoint::new(0.0, 0.0), &GeoPoint::new(180.0, 0.0));
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_M).abs() < 1e-3);
    }

    #[test]
    fn test_nan_propagates() {
        let d = haversine_distance(&GeoPoint::new(f64::NAN, 0.0), &GeoPoint::new(0.0, 0.0));
        assert!(d.is_nan());
    }

    #[test]
    fn test_interpolate_endpoints_exact() {
        let a = GeoPoint::new(77.123456789, 12.987654321);
        let b = GeoPoint::new(77.223456789, 13.087654321);
        assert_eq!(interpolate(&a, &b, 0.0), a);
        assert_eq!(interpolate(&a, &b, 1.0), b);
    }

    #[test]
    fn test_interpolate_interior_uses_start_plus_offset() {
        let a = GeoPoint::new(77.5946, 12.9716);
        let b = GeoPoint::new(77.6100, 12.9800);
        let f = 0.3;
        let p = interpolate(&a, &b, f);
        assert_eq!(p.lon(), a.lon() + f * (b.lon() - a.lon()));
        assert_eq!(p.lat(), a.lat() + f * (b.lat() - a.lat()));
    }

    #[test]
    fn test_interpolate_midpoint() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(2.0, -4.0);
        let mid = interpolate(&a, &b, 0.5);
        assert_eq!(mid, GeoPoint::new(1.0, -2.0));
    }
}
