//! Path densification.

use crate::compute::distance::{haversine_distance, interpolate};
use crate::compute::validation::validate_positive;
use crate::error::Result;
use cellpath_types::geo::GeoPoint;

/// Insert interpolated points so consecutive points are at most
/// `interval_meters` apart.
///
/// The first point is always kept. Each segment is measured from the last
/// emitted point to the next input point; a segment longer than the interval
/// gets `floor(d / interval)` points at whole multiples of the interval,
/// minus any that would land on or past the endpoint, then the endpoint
/// itself. Input points are never dropped or moved.
///
/// # Errors
///
/// `InvalidInput` if `interval_meters` is not a finite positive number.
///
/// # Examples
///
/// ```
/// use cellpath::compute::densify::densify;
/// use cellpath::GeoPoint;
///
/// let path = vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 0.01)];
/// let dense = densify(&path, 500.0)?;
///
/// assert_eq!(dense.first(), path.first());
/// assert_eq!(dense.last(), path.last());
/// assert!((dense[1].lat() - 0.0045).abs() < 1e-4);
/// # Ok::<(), cellpath::CellpathError>(())
/// ```
pub fn densify(path: &[GeoPoint], interval_meters: f64) -> Result<Vec<GeoPoint>> {
    validate_positive("interval_meters", interval_meters)?;

    let Some((&first, rest)) = path.split_first() else {
        return Ok(Vec::new());
    };

    let mut dense = Vec::with_capacity(path.len());
    dense.push(first);
    let mut last = first;

    for &end in rest {
        let distance = haversine_distance(&last, &end);

        if distance > interval_meters {
            let steps = (distance / interval_meters).floor() as usize;
            dense.reserve(steps + 1);
            for j in 1..=steps {
                let fraction = (j as f64 * interval_meters) / distance;
                if fraction < 1.0 {
                    dense.push(interpolate(&last, &end, fraction));
                }
            }
        }

        dense.push(end);
        last = end;
    }

    Ok(dense)
}
