//! Nearest-path ranking of candidate records.
//!
//! Each candidate is matched to the single closest vertex of the reference
//! path, not to the closest point on a segment. Densify the path first when
//! vertices are far apart.

use crate::compute::distance::haversine_distance;
use crate::compute::validation::validate_geographic_point;
use cellpath_types::geo::GeoPoint;
use cellpath_types::record::{CandidateRecord, RankedMatch};
use cellpath_types::stats::MatchStats;
use serde_json::Value;

/// Rank candidates by distance to their nearest path point and keep the top `top_k`.
///
/// Candidates with missing or invalid coordinates are skipped. An empty
/// path has no nearest point, so every candidate goes unmatched.
///
/// # Examples
///
/// ```
/// use cellpath::compute::matcher::rank;
/// use cellpath::{CandidateRecord, GeoPoint};
/// use serde_json::json;
///
/// let candidates = vec![
///     CandidateRecord::from_value(json!({"lat": 1.0, "lon": 1.0})),
///     CandidateRecord::from_value(json!({"lat": 0.0, "lon": 0.0})),
/// ];
/// let ranked = rank(&candidates, &[GeoPoint::new(0.0, 0.0)], 1);
///
/// assert_eq!(ranked.len(), 1);
/// assert_eq!(ranked[0].distance_meters(), 0.0);
/// assert_eq!(ranked[0].record().payload()["lat"], 0.0);
/// ```
pub fn rank(candidates: &[CandidateRecord], path: &[GeoPoint], top_k: usize) -> Vec<RankedMatch> {
    rank_with_stats(candidates, path, top_k).0
}

/// Same as [`rank`], also reporting how many records were skipped.
pub fn rank_with_stats(
    candidates: &[CandidateRecord],
    path: &[GeoPoint],
    top_k: usize,
) -> (Vec<RankedMatch>, MatchStats) {
    let mut stats = MatchStats {
        candidates: candidates.len(),
        ..MatchStats::default()
    };
    let mut matches = Vec::with_capacity(candidates.len());

    for (idx, record) in candidates.iter().enumerate() {
        let Some(position) = valid_position(record) else {
            log::debug!("Skipping candidate {} without valid coordinates: {}", idx, record.payload());
            stats.record_skipped();
            continue;
        };

        if let Some((nearest, distance)) = nearest_path_point(&position, path) {
            matches.push(RankedMatch::new(record.clone(), nearest, distance));
        }
    }

    stats.matched = matches.len();

    // Stable: equal distances keep input order.
    matches.sort_by(|a, b| a.distance_meters().total_cmp(&b.distance_meters()));
    matches.truncate(top_k);
    stats.returned = matches.len();

    if stats.skipped > 0 {
        log::debug!(
            "Skipped {} of {} candidates with invalid coordinates",
            stats.skipped,
            stats.candidates
        );
    }

    (matches, stats)
}

/// Closest path vertex to `point` and its distance in meters.
///
/// The first vertex wins ties. Vertices at a non-finite distance are ignored.
pub fn nearest_path_point(point: &GeoPoint, path: &[GeoPoint]) -> Option<(GeoPoint, f64)> {
    let mut best: Option<(GeoPoint, f64)> = None;

    for vertex in path {
        let distance = haversine_distance(point, vertex);
        if !distance.is_finite() {
            continue;
        }
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((*vertex, distance)),
        }
    }

    best
}

/// Record payloads in ranked order, exactly as they were supplied.
pub fn into_payloads(matches: Vec<RankedMatch>) -> Vec<Value> {
    matches.into_iter().map(RankedMatch::into_payload).collect()
}

fn valid_position(record: &CandidateRecord) -> Option<GeoPoint> {
    record
        .position()
        .filter(|p| validate_geographic_point(p).is_ok())
}
