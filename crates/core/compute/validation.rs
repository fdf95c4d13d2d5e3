//! Validation for geographic coordinates and algorithm parameters.

use crate::error::{CellpathError, Result};
use cellpath_types::bbox::BoundingBox;
use cellpath_types::geo::GeoPoint;

/// Validates a point has finite, in-range longitude and latitude.
///
/// Longitude: [-180.0, 180.0], Latitude: [-90.0, 90.0]
///
/// # Examples
///
/// ```
/// use cellpath::compute::validation::validate_geographic_point;
/// use cellpath::GeoPoint;
///
/// assert!(validate_geographic_point(&GeoPoint::new(77.59, 12.97)).is_ok());
/// assert!(validate_geographic_point(&GeoPoint::new(200.0, 12.97)).is_err());
/// assert!(validate_geographic_point(&GeoPoint::new(77.59, f64::NAN)).is_err());
/// ```
pub fn validate_geographic_point(point: &GeoPoint) -> Result<()> {
    let (lon, lat) = (point.lon(), point.lat());

    if !lon.is_finite() {
        return Err(CellpathError::InvalidInput(format!(
            "Longitude must be finite, got: {}",
            lon
        )));
    }

    if !lat.is_finite() {
        return Err(CellpathError::InvalidInput(format!(
            "Latitude must be finite, got: {}",
            lat
        )));
    }

    if !(-180.0..=180.0).contains(&lon) {
        return Err(CellpathError::InvalidInput(format!(
            "Longitude out of range [-180.0, 180.0]: {}",
            lon
        )));
    }

    if !(-90.0..=90.0).contains(&lat) {
        return Err(CellpathError::InvalidInput(format!(
            "Latitude out of range [-90.0, 90.0]: {}",
            lat
        )));
    }

    Ok(())
}

/// Validates multiple points, reporting the index of the first bad one.
pub fn validate_points(points: &[GeoPoint]) -> Result<()> {
    for (idx, point) in points.iter().enumerate() {
        validate_geographic_point(point)
            .map_err(|e| CellpathError::InvalidInput(format!("Point at index {}: {}", idx, e)))?;
    }
    Ok(())
}

/// Builds a bounding box, rejecting inverted, non-finite or out-of-range corners.
///
/// Arguments are in GeoJSON `bbox` order.
pub fn bounding_box(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Result<BoundingBox> {
    validate_geographic_point(&GeoPoint::new(min_lon, min_lat))
        .map_err(|e| CellpathError::InvalidInput(format!("Bounding box minimum corner: {}", e)))?;
    validate_geographic_point(&GeoPoint::new(max_lon, max_lat))
        .map_err(|e| CellpathError::InvalidInput(format!("Bounding box maximum corner: {}", e)))?;

    if min_lon > max_lon {
        return Err(CellpathError::InvalidInput(format!(
            "min_lon ({}) must be <= max_lon ({})",
            min_lon, max_lon
        )));
    }
    if min_lat > max_lat {
        return Err(CellpathError::InvalidInput(format!(
            "min_lat ({}) must be <= max_lat ({})",
            min_lat, max_lat
        )));
    }

    Ok(BoundingBox::new(min_lon, min_lat, max_lon, max_lat))
}

/// Validates both corners of an already built bounding box.
pub fn validate_bbox(bbox: &BoundingBox) -> Result<()> {
    bounding_box(bbox.min_lon(), bbox.min_lat(), bbox.max_lon(), bbox.max_lat()).map(|_| ())
}

/// Validates that a named parameter is a finite, strictly positive number.
pub fn validate_positive(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(CellpathError::InvalidInput(format!(
            "{} must be a finite number greater than zero, got: {}",
            name, value
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_edge_coordinates() {
        for point in [
            GeoPoint::new(180.0, 90.0),
            GeoPoint::new(-180.0, -90.0),
            GeoPoint::new(0.0, 0.0),
        ] {
            assert!(validate_geographic_point(&point).is_ok());
        }
    }

    #[test]
    fn test_invalid_coordinates() {
        assert!(validate_geographic_point(&GeoPoint::new(180.1, 0.0)).is_err());
        assert!(validate_geographic_point(&GeoPoint::new(0.0, -90.5)).is_err());
        assert!(validate_geographic_point(&GeoPoint::new(f64::INFINITY, 0.0)).is_err());
    }

    #[test]
    fn test_validate_points_reports_index() {
        let points = vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(1.0, 1.0),
            GeoPoint::new(999.0, 1.0),
        ];
        let err = validate_points(&points).unwrap_err();
        assert!(err.to_string().contains("index 2"));
    }

    #[test]
    fn test_bounding_box() {
        let bbox = bounding_box(77.5, 12.9, 77.7, 13.0).unwrap();
        assert_eq!(bbox.min_lon(), 77.5);
        assert_eq!(bbox.min_lat(), 12.9);
        assert_eq!(bbox.max_lon(), 77.7);
        assert_eq!(bbox.max_lat(), 13.0);
    }

    #[test]
    fn test_bounding_box_inverted() {
        assert!(bounding_box(77.7, 12.9, 77.5, 13.0).is_err());
        assert!(bounding_box(77.5, 13.0, 77.7, 12.9).is_err());
    }

    #[test]
    fn test_bounding_box_non_finite() {
        assert!(bounding_box(f64::NAN, 0.0, 1.0, 1.0).is_err());
        assert!(bounding_box(0.0, 0.0, 1.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_positive() {
        assert!(validate_positive("cell_size_km", 2.0).is_ok());
        assert!(validate_positive("cell_size_km", 0.0).is_err());
        assert!(validate_positive("cell_size_km", -1.0).is_err());
        assert!(validate_positive("cell_size_km", f64::NAN).is_err());
        assert!(validate_positive("cell_size_km", f64::INFINITY).is_err());
    }
}
