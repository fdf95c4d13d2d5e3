//! # cellpath-types
//!
//! Geographic value types shared by the cellpath crates.
//!
//! - **Point types**: `GeoPoint`
//! - **Area types**: `BoundingBox`, `GridCell`
//! - **Record types**: `CandidateRecord`, `RankedMatch`
//! - **Statistics**: `MatchStats`, `PartitionStats`, `FetchStats`
//!
//! All types are serializable with Serde and built on top of the `geo` crate's
//! geometric primitives.
//!
//! ## Examples
//!
//! ```rust
//! use cellpath_types::bbox::BoundingBox;
//! use cellpath_types::geo::GeoPoint;
//!
//! let station = GeoPoint::new(77.5946, 12.9716);
//! let region = BoundingBox::new(77.50, 12.90, 77.70, 13.05);
//! assert!(region.contains_point(&station));
//! ```

pub mod bbox;
pub mod geo;
pub mod record;
pub mod stats;

/// A travel trajectory, first point to last.
pub type Path = Vec<geo::GeoPoint>;
