//! Geodesy, grid partitioning, path densification, matching, and GeoJSON conversion.

pub mod area;
pub mod densify;
pub mod distance;
pub mod geojson;
pub mod grid;
pub mod matcher;
pub mod profile;
pub mod source;
pub mod validation;
