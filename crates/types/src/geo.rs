//! Wrapped geometric types from the `geo` crate.

use serde::{Deserialize, Serialize};

/// A geographic point with longitude/latitude coordinates in degrees.
///
/// This wraps `geo::Point`. On the wire it is a GeoJSON position,
/// `[longitude, latitude]`.
///
/// # Examples
///
/// ```
/// use cellpath_types::geo::GeoPoint;
///
/// let p = GeoPoint::new(77.5946, 12.9716);
/// assert_eq!(p.lon(), 77.5946);
/// assert_eq!(p.lat(), 12.9716);
///
/// let json = serde_json::to_string(&p).unwrap();
/// assert_eq!(json, "[77.5946,12.9716]");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct GeoPoint {
    inner: geo::Point<f64>,
}

impl GeoPoint {
    /// Create a new point from longitude and latitude.
    ///
    /// # Arguments
    ///
    /// * `lon` - Longitude in degrees (-180 to 180)
    /// * `lat` - Latitude in degrees (-90 to 90)
    #[inline]
    pub fn new(lon: f64, lat: f64) -> Self {
        Self {
            inner: geo::Point::new(lon, lat),
        }
    }

    #[inline]
    pub fn lon(&self) -> f64 {
        self.inner.x()
    }

    #[inline]
    pub fn lat(&self) -> f64 {
        self.inner.y()
    }

    /// Get the x coordinate (longitude).
    #[inline]
    pub fn x(&self) -> f64 {
        self.inner.x()
    }

    /// Get the y coordinate (latitude).
    #[inline]
    pub fn y(&self) -> f64 {
        self.inner.y()
    }

    /// True when both coordinates are finite numbers.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.lon().is_finite() && self.lat().is_finite()
    }

    /// Access the inner `geo::Point`.
    #[inline]
    pub fn inner(&self) -> &geo::Point<f64> {
        &self.inner
    }

    /// Convert into the inner `geo::Point`.
    #[inline]
    pub fn into_inner(self) -> geo::Point<f64> {
        self.inner
    }
}

impl From<geo::Point<f64>> for GeoPoint {
    fn from(point: geo::Point<f64>) -> Self {
        Self { inner: point }
    }
}

impl From<GeoPoint> for geo::Point<f64> {
    fn from(point: GeoPoint) -> Self {
        point.inner
    }
}

impl From<geo::Coord<f64>> for GeoPoint {
    fn from(coord: geo::Coord<f64>) -> Self {
        Self::new(coord.x, coord.y)
    }
}

/// `(lon, lat)`, the GeoJSON position order.
impl From<(f64, f64)> for GeoPoint {
    fn from((lon, lat): (f64, f64)) -> Self {
        Self::new(lon, lat)
    }
}

impl From<GeoPoint> for (f64, f64) {
    fn from(point: GeoPoint) -> Self {
        (point.lon(), point.lat())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_creation() {
        let point = GeoPoint::new(-74.0060, 40.7128);
        assert_eq!(point.x(), -74.0060);
        assert_eq!(point.y(), 40.7128);
        assert_eq!(point.lon(), -74.0060);
        assert_eq!(point.lat(), 40.7128);
    }

    #[test]
    fn test_point_from_tuple_is_lon_lat() {
        let point: GeoPoint = (77.59, 12.97).into();
        assert_eq!(point.lon(), 77.59);
        assert_eq!(point.lat(), 12.97);
    }

    #[test]
    fn test_point_serializes_as_position() {
        let point = GeoPoint::new(1.5, -2.25);
        let json = serde_json::to_value(point).unwrap();
        assert_eq!(json, serde_json::json!([1.5, -2.25]));

        let back: GeoPoint = serde_json::from_value(json).unwrap();
        assert_eq!(back, point);
    }

    #[test]
    fn test_is_finite() {
        assert!(GeoPoint::new(0.0, 0.0).is_finite());
        assert!(!GeoPoint::new(f64::NAN, 0.0).is_finite());
        assert!(!GeoPoint::new(0.0, f64::INFINITY).is_finite());
    }
}
