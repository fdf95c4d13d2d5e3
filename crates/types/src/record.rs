//! Point-of-interest records and their ranked matches.

use crate::geo::GeoPoint;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An externally supplied point of interest (typically a cell tower).
///
/// The payload is the record exactly as it was received and is never
/// modified. The position is read from the payload's numeric `lat` and
/// `lon` members; if either is missing or not a number the record has no
/// position and is excluded from ranking.
///
/// # Examples
///
/// ```
/// use cellpath_types::record::CandidateRecord;
/// use serde_json::json;
///
/// let tower = CandidateRecord::from_value(json!({"lat": 12.97, "lon": 77.59, "cellid": 1203}));
/// assert_eq!(tower.position().unwrap().lat(), 12.97);
///
/// let broken = CandidateRecord::from_value(json!({"lat": 12.97, "cellid": 1204}));
/// assert!(broken.position().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub struct CandidateRecord {
    position: Option<GeoPoint>,
    payload: Value,
}

impl CandidateRecord {
    /// Build a record from a JSON payload, reading `lat` and `lon`.
    pub fn from_value(payload: Value) -> Self {
        let lat = payload.get("lat").and_then(Value::as_f64);
        let lon = payload.get("lon").and_then(Value::as_f64);
        let position = match (lon, lat) {
            (Some(lon), Some(lat)) => Some(GeoPoint::new(lon, lat)),
            _ => None,
        };
        Self { position, payload }
    }

    pub fn position(&self) -> Option<GeoPoint> {
        self.position
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }

    pub fn into_payload(self) -> Value {
        self.payload
    }
}

impl From<Value> for CandidateRecord {
    fn from(value: Value) -> Self {
        Self::from_value(value)
    }
}

impl From<CandidateRecord> for Value {
    fn from(record: CandidateRecord) -> Self {
        record.payload
    }
}

/// A candidate paired with the closest point of the reference path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedMatch {
    record: CandidateRecord,
    nearest_path_point: GeoPoint,
    distance_meters: f64,
}

impl RankedMatch {
    pub fn new(record: CandidateRecord, nearest_path_point: GeoPoint, distance_meters: f64) -> Self {
        Self {
            record,
            nearest_path_point,
            distance_meters,
        }
    }

    pub fn record(&self) -> &CandidateRecord {
        &self.record
    }

    pub fn nearest_path_point(&self) -> GeoPoint {
        self.nearest_path_point
    }

    pub fn distance_meters(&self) -> f64 {
        self.distance_meters
    }

    /// Drop the match metadata and keep the untouched record payload.
    pub fn into_payload(self) -> Value {
        self.record.into_payload()
    }
}
