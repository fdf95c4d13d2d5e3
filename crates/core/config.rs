//! Pipeline configuration.
//!
//! Every operation in [`crate::compute`] takes its parameters explicitly;
//! this module only holds the defaults a caller starts from and the file
//! formats they can be loaded from.
use crate::compute::{densify, grid, matcher};
use crate::error::{CellpathError, Result};
use cellpath_types::bbox::{BoundingBox, GridCell};
use cellpath_types::geo::GeoPoint;
use cellpath_types::record::{CandidateRecord, RankedMatch};
use serde::de::Error;
use std::path::Path;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub grid: GridConfig,

    #[serde(default)]
    pub densify: DensifyConfig,

    #[serde(default)]
    pub matching: MatchConfig,
}

/// Grid partitioning parameters
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GridConfig {
    /// Coarse cell edge length in kilometers
    #[serde(default = "GridConfig::default_cell_size_km")]
    pub cell_size_km: f64,

    /// Maximum leaf area in km². `None` means `cell_size_km` squared.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold_area_km2: Option<f64>,
}

impl GridConfig {
    const fn default_cell_size_km() -> f64 {
        2.0
    }

    pub fn effective_threshold(&self) -> f64 {
        self.threshold_area_km2
            .unwrap_or(self.cell_size_km * self.cell_size_km)
    }

    pub fn partition(&self, bbox: &BoundingBox) -> Result<Vec<GridCell>> {
        grid::partition(bbox, self.cell_size_km, self.effective_threshold())
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cell_size_km: Self::default_cell_size_km(),
            threshold_area_km2: None,
        }
    }
}

/// Path densification parameters
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DensifyConfig {
    #[serde(default = "DensifyConfig::default_interval_meters")]
    pub interval_meters: f64,
}

impl DensifyConfig {
    const fn default_interval_meters() -> f64 {
        10.0
    }

    pub fn densify(&self, path: &[GeoPoint]) -> Result<Vec<GeoPoint>> {
        densify::densify(path, self.interval_meters)
    }
}

impl Default for DensifyConfig {
    fn default() -> Self {
        Self {
            interval_meters: Self::default_interval_meters(),
        }
    }
}

/// Ranking parameters
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MatchConfig {
    #[serde(default = "MatchConfig::default_top_k")]
    pub top_k: usize,
}

impl MatchConfig {
    const fn default_top_k() -> usize {
        20
    }

    pub fn rank(&self, candidates: &[CandidateRecord], path: &[GeoPoint]) -> Vec<RankedMatch> {
        matcher::rank(candidates, path, self.top_k)
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            top_k: Self::default_top_k(),
        }
    }
}

impl Config {
    pub fn with_cell_size_km(mut self, cell_size_km: f64) -> Self {
        self.grid.cell_size_km = cell_size_km;
        self
    }

    pub fn with_threshold_area_km2(mut self, threshold: f64) -> Self {
        self.grid.threshold_area_km2 = Some(threshold);
        self
    }

    pub fn with_interval_meters(mut self, interval_meters: f64) -> Self {
        if interval_meters > 0.0 && interval_meters < 1.0 {
            log::warn!(
                "Densify interval of {} m is very small and may produce a very large path",
                interval_meters
            );
        }

        self.densify.interval_meters = interval_meters;
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.matching.top_k = top_k;
        self
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        let positive = |name: &str, value: f64| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(format!("{} must be a positive number, got {}", name, value))
            }
        };

        positive("grid.cell_size_km", self.grid.cell_size_km)?;
        if let Some(threshold) = self.grid.threshold_area_km2 {
            positive("grid.threshold_area_km2", threshold)?;
        }
        positive("densify.interval_meters", self.densify.interval_meters)?;

        Ok(())
    }

    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        let config: Config = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(Error::custom(e));
        }
        Ok(config)
    }

    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> std::result::Result<Self, toml::de::Error> {
        let config: Config = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Load a config file, picking the format from its extension.
    ///
    /// `.json` is always supported; `.toml` needs the `toml` feature.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        let config = match extension.as_deref() {
            Some("json") => Self::from_json(&contents)
                .map_err(|e| CellpathError::Config(format!("{}: {}", path.display(), e)))?,
            #[cfg(feature = "toml")]
            Some("toml") => Self::from_toml(&contents)
                .map_err(|e| CellpathError::Config(format!("{}: {}", path.display(), e)))?,
            _ => {
                return Err(CellpathError::Config(format!(
                    "Unsupported config format: {}",
                    path.display()
                )));
            }
        };

        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }
}
