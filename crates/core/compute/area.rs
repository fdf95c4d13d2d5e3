//! Flat-earth size estimates for bounding boxes.
//!
//! 1 degree of latitude is taken as 111 km everywhere and 1 degree of
//! longitude as 111 km scaled by the cosine of the box's center latitude.

use cellpath_types::bbox::BoundingBox;

/// Kilometers per degree of latitude.
pub const KM_PER_DEGREE: f64 = 111.0;

/// Kilometers per degree of longitude at `lat_deg`.
#[inline]
pub fn km_per_degree_lon(lat_deg: f64) -> f64 {
    KM_PER_DEGREE * lat_deg.to_radians().cos()
}

/// `(width_km, height_km)` of a bounding box, measured at its center latitude.
pub fn dimensions_km(bbox: &BoundingBox) -> (f64, f64) {
    let height_km = bbox.height() * KM_PER_DEGREE;
    let width_km = bbox.width() * km_per_degree_lon(bbox.center().lat());
    (width_km, height_km)
}

/// Approximate area of a bounding box in km².
///
/// Zero for boxes with no width or no height.
///
/// # Examples
///
/// ```
/// use cellpath::compute::area::approx_area_km2;
/// use cellpath::BoundingBox;
///
/// let area = approx_area_km2(&BoundingBox::new(0.0, 0.0, 0.1, 0.1));
/// assert!((area - 123.21).abs() < 0.01);
/// ```
pub fn approx_area_km2(bbox: &BoundingBox) -> f64 {
    let (width_km, height_km) = dimensions_km(bbox);
    width_km * height_km
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equator_square() {
        let area = approx_area_km2(&BoundingBox::new(0.0, 0.0, 1.0, 1.0));
        let expected = 111.0 * 111.0 * 0.5f64.to_radians().cos();
        assert!((area - expected).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_is_zero() {
        assert_eq!(approx_area_km2(&BoundingBox::new(1.0, 1.0, 1.0, 2.0)), 0.0);
        assert_eq!(approx_area_km2(&BoundingBox::new(1.0, 1.0, 2.0, 1.0)), 0.0);
    }

    #[test]
    fn test_shrinks_toward_pole() {
        let equator = approx_area_km2(&BoundingBox::new(0.0, 0.0, 0.1, 0.1));
        let north = approx_area_km2(&BoundingBox::new(0.0, 60.0, 0.1, 60.1));
        assert!(north < equator);
        assert!((north / equator - 60.05f64.to_radians().cos() / 0.05f64.to_radians().cos()).abs() < 1e-9);
    }

    #[test]
    fn test_monotonic_in_each_span() {
        let full = approx_area_km2(&BoundingBox::new(10.0, 20.0, 10.2, 20.2));
        let narrower = approx_area_km2(&BoundingBox::new(10.0, 20.0, 10.1, 20.2));
        let shorter = approx_area_km2(&BoundingBox::new(10.0, 20.0, 10.2, 20.1));
        assert!(narrower < full);
        assert!(shorter < full);
    }

    #[test]
    fn test_dimensions_km() {
        let (w, h) = dimensions_km(&BoundingBox::new(0.0, 0.0, 0.02, 0.01));
        assert!((h - 1.11).abs() < 1e-9);
        assert!((w - 2.22).abs() < 1e-3);
    }
}
