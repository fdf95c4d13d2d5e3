//! Cell tower candidate selection along a travel path.
//!
//! ## Features
//! - **Grid partitioning**: tile a region into ~N km cells, then halve any cell
//!   whose approximate area exceeds a threshold
//! - **Path densification**: insert interpolated points so no two consecutive
//!   points are more than a fixed distance apart
//! - **Nearest matching**: rank candidate records by great-circle distance to
//!   their nearest path vertex and keep the top K
//! - **GeoJSON glue**: region bounding boxes in, LineString paths in and out,
//!   grid cells out as a FeatureCollection
//!
//! All operations are pure functions over their inputs. Fetching records for
//! each grid cell is left to a [`compute::source::RecordSource`].
//!
//! ```rust
//! use cellpath::compute::{densify::densify, grid::partition, matcher::rank};
//! use cellpath::{BoundingBox, CandidateRecord, GeoPoint};
//! use serde_json::json;
//!
//! let region = BoundingBox::new(0.0, 0.0, 0.1, 0.1);
//! let cells = partition(&region, 2.0, 4.0)?;
//! assert!(!cells.is_empty());
//!
//! let path = densify(&[GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 0.01)], 500.0)?;
//! let candidates = vec![
//!     CandidateRecord::from_value(json!({"lat": 0.005, "lon": 0.0001, "cellid": 7})),
//!     CandidateRecord::from_value(json!({"lat": 0.09, "lon": 0.09, "cellid": 8})),
//! ];
//! let ranked = rank(&candidates, &path, 1);
//! assert_eq!(ranked[0].record().payload()["cellid"], 7);
//! # Ok::<(), cellpath::CellpathError>(())
//! ```

pub mod compute;
pub mod config;
pub mod error;

pub use config::{Config, DensifyConfig, GridConfig, MatchConfig};
pub use error::{CellpathError, Result};

pub use cellpath_types::Path;
pub use cellpath_types::bbox::{BoundingBox, GridCell};
pub use cellpath_types::geo::GeoPoint;
pub use cellpath_types::record::{CandidateRecord, RankedMatch};
pub use cellpath_types::stats::{FetchStats, MatchStats, PartitionStats};

pub use compute::geojson;
pub use compute::validation;

pub mod prelude {
    pub use crate::compute::densify::densify;
    pub use crate::compute::distance::haversine_distance;
    pub use crate::compute::grid::partition;
    pub use crate::compute::matcher::rank;
    pub use crate::compute::source::{CellQuery, RecordSource, collect_records};
    pub use crate::{BoundingBox, CandidateRecord, CellpathError, Config, GeoPoint, GridCell};
    pub use crate::{RankedMatch, Result};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
