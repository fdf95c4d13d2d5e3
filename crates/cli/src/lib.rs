//! File-level commands behind the `cellpath` binary.
//!
//! Each command reads its inputs from disk, runs one library operation and
//! returns the rendered output; `main.rs` decides where that output goes.

use anyhow::{Context, Result};
use cellpath::compute::densify::densify;
use cellpath::compute::matcher::{into_payloads, rank_with_stats};
use cellpath::compute::profile::path_profile;
use cellpath::compute::source::{CellQuery, CellsDocument, RecordSource, collect_records};
use cellpath::geojson::{
    bbox_from_geojson, cells_to_feature_collection, densify_geojson, linestrings_from_geojson,
    path_from_geojson,
};
use cellpath::validation::validate_points;
use cellpath::{CandidateRecord, Config, GridCell};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

#[cfg(feature = "fetch")]
pub mod fetch;

/// Where and how to ask for the records of each grid cell.
#[derive(Debug, Clone)]
pub struct SourceRequest {
    pub query: CellQuery,
    pub api_key: String,
    pub base_url: String,
}

pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(Config::default()),
    }
}

fn read_input(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Write to `output`, or print to stdout when no output path is given.
pub fn write_output(output: Option<&Path>, contents: &str) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, contents)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Results saved to {}", path.display());
        }
        None => println!("{}", contents),
    }
    Ok(())
}

/// Partition the region's bbox and render the cells as GeoJSON.
///
/// With a [`SourceRequest`], the request URL for every cell is logged too.
pub fn grid(config: &Config, input: &Path, request: Option<&SourceRequest>) -> Result<String> {
    let cells = partition_file(config, input)?;

    if let Some(request) = request {
        log_requests(request, &cells);
    }

    Ok(cells_to_feature_collection(&cells)?)
}

/// Partition the region's bbox and fetch the records of every cell.
///
/// Failed cells are skipped; the result is a `{"cells": [...]}` document.
pub fn fetch_cells<S>(config: &Config, input: &Path, source: &mut S) -> Result<String>
where
    S: RecordSource + ?Sized,
{
    let cells = partition_file(config, input)?;
    let (records, stats) = collect_records(source, &cells);
    info!(
        "Fetched {} records from {} cells ({} duplicates dropped)",
        records.len(),
        stats.requested,
        stats.duplicates
    );
    if stats.failed > 0 {
        warn!("{} of {} cells failed", stats.failed, stats.requested);
    }
    Ok(CellsDocument::new(records).to_json()?)
}

fn partition_file(config: &Config, input: &Path) -> Result<Vec<GridCell>> {
    let region = bbox_from_geojson(&read_input(input)?)
        .with_context(|| format!("No usable bbox in {}", input.display()))?;

    let cells = config.grid.partition(&region)?;
    info!(
        "Partitioned {:?} into {} cells (cell size {} km, threshold {} km²)",
        region.to_geojson_bbox(),
        cells.len(),
        config.grid.cell_size_km,
        config.grid.effective_threshold()
    );
    Ok(cells)
}

fn log_requests(request: &SourceRequest, cells: &[GridCell]) {
    for (idx, cell) in cells.iter().enumerate() {
        let url = request
            .query
            .request_url(&request.base_url, &request.api_key, cell);
        info!("Cell {}/{}: {}", idx + 1, cells.len(), url);
    }
}

/// Densify every LineString of a GeoJSON file.
pub fn densify_file(config: &Config, input: &Path) -> Result<String> {
    let geojson = read_input(input)?;
    let interval = config.densify.interval_meters;
    debug!("Densifying {} every {} m", input.display(), interval);
    Ok(densify_geojson(&geojson, interval)?)
}

/// Rank the records of a `{"cells": [...]}` file against a path.
///
/// The path is densified first when `densify_path` is set.
pub fn rank_files(
    config: &Config,
    cells_path: &Path,
    path_path: &Path,
    densify_path: bool,
) -> Result<String> {
    let document = CellsDocument::from_json(&read_input(cells_path)?)
        .with_context(|| format!("Invalid cells file {}", cells_path.display()))?;
    let mut path = path_from_geojson(&read_input(path_path)?)
        .with_context(|| format!("No usable path in {}", path_path.display()))?;
    validate_points(&path).with_context(|| format!("Invalid path in {}", path_path.display()))?;

    if densify_path {
        path = densify(&path, config.densify.interval_meters)?;
    }

    let (ranked, stats) = rank_with_stats(&document.cells, &path, config.matching.top_k);
    info!(
        "Ranked {} records against {} path points: {} matched, {} skipped, {} returned",
        stats.candidates,
        path.len(),
        stats.matched,
        stats.skipped,
        stats.returned
    );

    let cells: Vec<CandidateRecord> = into_payloads(ranked)
        .into_iter()
        .map(CandidateRecord::from_value)
        .collect();
    Ok(CellsDocument::new(cells).to_json()?)
}

/// `lat,long,dist` rows for every LineString of a GeoJSON file.
///
/// Each LineString starts again at `dist` 0. A file without LineStrings
/// yields just the header.
pub fn profile_csv(input: &Path) -> Result<String> {
    let paths = linestrings_from_geojson(&read_input(input)?)
        .with_context(|| format!("Invalid GeoJSON in {}", input.display()))?;

    let mut writer = csv::Writer::from_writer(Vec::new());
    let mut rows = 0;
    for path in &paths {
        for row in path_profile(path) {
            writer.serialize(row)?;
            rows += 1;
        }
    }
    if rows == 0 {
        writer.write_record(["lat", "long", "dist"])?;
    }
    debug!("Profiled {} points over {} paths", rows, paths.len());

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV: {}", e.error()))?;
    Ok(String::from_utf8(bytes)?)
}
