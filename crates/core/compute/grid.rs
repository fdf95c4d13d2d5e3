//! Area-bounded grid partitioning of a bounding box.
//!
//! A region is first tiled row by row in fixed degree steps derived from the
//! requested cell size. The tiling uses the longitude scale at the center of
//! the whole region, so cells far from that latitude come out larger or
//! smaller than intended. A refinement pass then halves every cell whose
//! estimated area is over the threshold, always across its longer side in
//! kilometers, until every leaf fits.
//!
//! Each remote lookup for a cell returns a bounded number of records, so the
//! threshold effectively bounds how much can be missed by pagination limits.
//!
//! # Algorithm
//!
//! - Coarse tiling: `lat_step = size / 111`, `lon_step = size / (111 * cos(center_lat))`.
//!   Cells touching the far edges are clipped to the region.
//! - Refinement: an explicit stack per coarse cell. Each halving at least
//!   halves the area, so the depth is bounded by `log2(area / threshold)`.
//!
//! Output order is row-major over coarse cells, and within one coarse cell
//! the first half (west or south) always precedes the second.

use crate::compute::area::{KM_PER_DEGREE, approx_area_km2, dimensions_km, km_per_degree_lon};
use crate::compute::validation::{validate_bbox, validate_positive};
use crate::error::Result;
use cellpath_types::bbox::{BoundingBox, GridCell};
use cellpath_types::stats::PartitionStats;

/// Partition `bbox` into cells whose estimated area is at most `threshold_area_km2`.
///
/// Returns an empty vector for a box with zero width or height.
///
/// # Errors
///
/// `InvalidInput` for non-finite or out-of-range corners and for a cell size
/// or threshold that is not a finite positive number.
///
/// # Examples
///
/// ```
/// use cellpath::compute::area::approx_area_km2;
/// use cellpath::compute::grid::partition;
/// use cellpath::BoundingBox;
///
/// let region = BoundingBox::new(0.0, 0.0, 0.1, 0.1);
/// let cells = partition(&region, 2.0, 4.0)?;
///
/// assert!(cells.iter().all(|c| approx_area_km2(&c.bbox) <= 4.0));
/// let total: f64 = cells.iter().map(|c| approx_area_km2(&c.bbox)).sum();
/// assert!((total - approx_area_km2(&region)).abs() < 0.01);
/// # Ok::<(), cellpath::CellpathError>(())
/// ```
pub fn partition(
    bbox: &BoundingBox,
    cell_size_km: f64,
    threshold_area_km2: f64,
) -> Result<Vec<GridCell>> {
    partition_with_stats(bbox, cell_size_km, threshold_area_km2).map(|(cells, _)| cells)
}

/// Same as [`partition`], also reporting how much refinement was needed.
pub fn partition_with_stats(
    bbox: &BoundingBox,
    cell_size_km: f64,
    threshold_area_km2: f64,
) -> Result<(Vec<GridCell>, PartitionStats)> {
    validate_bbox(bbox)?;
    validate_positive("cell_size_km", cell_size_km)?;
    validate_positive("threshold_area_km2", threshold_area_km2)?;

    let mut stats = PartitionStats::new();
    if bbox.is_degenerate() {
        return Ok((Vec::new(), stats));
    }

    let coarse = coarse_cells(bbox, cell_size_km);
    stats.coarse_cells = coarse.len();

    let mut leaves = Vec::with_capacity(coarse.len());
    let mut pending: Vec<GridCell> = Vec::new();

    for cell in coarse {
        pending.push(cell);

        while let Some(cell) = pending.pop() {
            if approx_area_km2(&cell.bbox) <= threshold_area_km2 {
                stats.max_depth = stats.max_depth.max(cell.depth);
                leaves.push(cell);
                continue;
            }

            match split_longer_side(&cell) {
                Some((first, second)) => {
                    stats.splits += 1;
                    // LIFO: push the second half first so the first is emitted first.
                    pending.push(second);
                    pending.push(first);
                }
                None => {
                    log::warn!(
                        "Cell {:?} exceeds {} km² but cannot be split further; keeping it",
                        cell.bbox.to_geojson_bbox(),
                        threshold_area_km2
                    );
                    stats.max_depth = stats.max_depth.max(cell.depth);
                    leaves.push(cell);
                }
            }
        }
    }

    stats.leaf_cells = leaves.len();
    log::debug!(
        "Partitioned region into {} cells ({} coarse, {} splits, depth {})",
        stats.leaf_cells,
        stats.coarse_cells,
        stats.splits,
        stats.max_depth
    );

    Ok((leaves, stats))
}

/// Fixed-step row-major tiling, clipped to the region at the far edges.
///
/// Row and column origins are computed from their index rather than by
/// accumulation so neighbouring cells share bit-identical edges.
fn coarse_cells(bbox: &BoundingBox, cell_size_km: f64) -> Vec<GridCell> {
    let lat_step = cell_size_km / KM_PER_DEGREE;
    let lon_step = cell_size_km / km_per_degree_lon(bbox.center().lat());

    let (min_lon, min_lat) = (bbox.min_lon(), bbox.min_lat());
    let (max_lon, max_lat) = (bbox.max_lon(), bbox.max_lat());

    let mut cells = Vec::new();
    let mut row = 0u64;
    loop {
        let lat = min_lat + row as f64 * lat_step;
        if lat >= max_lat {
            break;
        }
        let cell_max_lat = (min_lat + (row + 1) as f64 * lat_step).min(max_lat);

        let mut col = 0u64;
        loop {
            let lon = min_lon + col as f64 * lon_step;
            if lon >= max_lon {
                break;
            }
            let cell_max_lon = (min_lon + (col + 1) as f64 * lon_step).min(max_lon);
            cells.push(GridCell::from(BoundingBox::new(
                lon,
                lat,
                cell_max_lon,
                cell_max_lat,
            )));
            col += 1;
        }
        row += 1;
    }
    cells
}

/// Halve a cell across its longer side in kilometers (ties split longitude).
///
/// `None` when the midpoint is no longer distinct from the edges, which only
/// happens once the cell is down to floating point resolution.
fn split_longer_side(cell: &GridCell) -> Option<(GridCell, GridCell)> {
    let b = &cell.bbox;
    let (width_km, height_km) = dimensions_km(b);

    if width_km >= height_km {
        let mid = (b.min_lon() + b.max_lon()) / 2.0;
        (mid > b.min_lon() && mid < b.max_lon()).then(|| cell.split_lon(mid))
    } else {
        let mid = (b.min_lat() + b.max_lat()) / 2.0;
        (mid > b.min_lat() && mid < b.max_lat()).then(|| cell.split_lat(mid))
    }
}
