//! Per-point distance profile of a path.

use crate::compute::distance::haversine_distance;
use cellpath_types::geo::GeoPoint;
use serde::{Deserialize, Serialize};

/// One path point with the distance travelled since the previous point.
///
/// Serializes as `lat,long,dist`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfileRow {
    pub lat: f64,
    #[serde(rename = "long")]
    pub lon: f64,
    /// Whole meters from the previous point; 0 for the first point.
    #[serde(rename = "dist")]
    pub distance_m: u64,
}

/// Distance-from-previous for every point of a path.
pub fn path_profile(path: &[GeoPoint]) -> Vec<ProfileRow> {
    let mut previous: Option<GeoPoint> = None;

    path.iter()
        .map(|&point| {
            let distance_m = previous
                .map(|prev| haversine_distance(&prev, &point).round() as u64)
                .unwrap_or(0);
            previous = Some(point);
            ProfileRow {
                lat: point.lat(),
                lon: point.lon(),
                distance_m,
            }
        })
        .collect()
}

/// Sum of the unrounded segment lengths of a path in meters.
pub fn path_length_m(path: &[GeoPoint]) -> f64 {
    path.windows(2)
        .map(|w| haversine_distance(&w[0], &w[1]))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        assert!(path_profile(&[]).is_empty());
        assert_eq!(path_length_m(&[]), 0.0);
    }

    #[test]
    fn test_first_row_is_zero() {
        let rows = path_profile(&[GeoPoint::new(77.59, 12.97), GeoPoint::new(77.59, 12.98)]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].distance_m, 0);
        assert_eq!(rows[0].lat, 12.97);
        assert_eq!(rows[0].lon, 77.59);
        assert_eq!(rows[1].distance_m, 1112);
    }

    #[test]
    fn test_row_field_names() {
        let row = ProfileRow {
            lat: 12.97,
            lon: 77.59,
            distance_m: 15,
        };
        assert_eq!(
            serde_json::to_value(row).unwrap(),
            serde_json::json!({"lat": 12.97, "long": 77.59, "dist": 15})
        );
    }

    #[test]
    fn test_length_sums_segments() {
        let path = [
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 0.01),
            GeoPoint::new(0.0, 0.02),
        ];
        let expected = haversine_distance(&path[0], &path[2]);
        assert!((path_length_m(&path) - expected).abs() < 1e-6);
    }
}
