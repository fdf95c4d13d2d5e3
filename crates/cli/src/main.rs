use anyhow::Context;
use cellpath::compute::source::{CellQuery, OPENCELLID_AREA_URL, Radio};
use cellpath::Config;
use cellpath_cli::{
    SourceRequest, densify_file, grid, load_config, profile_csv, rank_files, write_output,
};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON or TOML file with default parameters
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Partition a region's bbox into grid cells
    Grid {
        #[arg(long)]
        input: PathBuf,

        #[arg(long)]
        cell_size_km: Option<f64>,

        #[arg(long)]
        threshold_km2: Option<f64>,

        #[arg(long, requires = "mnc")]
        mcc: Option<u16>,

        #[arg(long, requires = "mcc")]
        mnc: Option<u16>,

        #[arg(long, default_value = "LTE")]
        radio: Radio,

        #[arg(long, env = "OPENCELLID_API_KEY", default_value = "")]
        api_key: String,

        #[arg(long, default_value = OPENCELLID_AREA_URL)]
        base_url: String,

        /// Fetch the records of every cell and write them as `{"cells": [...]}`
        #[arg(long, requires = "mcc")]
        fetch: bool,

        /// Defaults to cells_data.json with --fetch, stdout otherwise
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Insert points along every LineString of a GeoJSON file
    Densify {
        input: PathBuf,

        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Maximum spacing in meters
        #[arg(short, long)]
        interval: Option<f64>,
    },

    /// Rank cell records by distance to a path
    Rank {
        cells: PathBuf,

        path: PathBuf,

        #[arg(long)]
        top_k: Option<usize>,

        /// Densify the path at this spacing before matching
        #[arg(long)]
        interval: Option<f64>,

        #[arg(short, long, default_value = "nearest_cells_output.json")]
        output: PathBuf,
    },

    /// Write per-point distances of a path as CSV
    Profile {
        input: PathBuf,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[cfg(feature = "fetch")]
fn fetch_records(
    config: &Config,
    input: &Path,
    request: SourceRequest,
) -> anyhow::Result<String> {
    let mut source = cellpath_cli::fetch::HttpSource::new(request)?;
    cellpath_cli::fetch_cells(config, input, &mut source)
}

#[cfg(not(feature = "fetch"))]
fn fetch_records(
    _config: &Config,
    _input: &Path,
    _request: SourceRequest,
) -> anyhow::Result<String> {
    anyhow::bail!("--fetch needs cellpath built with the `fetch` feature")
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cellpath=info,cellpath_cli=info,info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())?;

    match args.command {
        Command::Grid {
            input,
            cell_size_km,
            threshold_km2,
            mcc,
            mnc,
            radio,
            api_key,
            base_url,
            fetch,
            output,
        } => {
            if let Some(cell_size_km) = cell_size_km {
                config = config.with_cell_size_km(cell_size_km);
            }
            if let Some(threshold) = threshold_km2 {
                config = config.with_threshold_area_km2(threshold);
            }
            config.validate().map_err(anyhow::Error::msg)?;

            let request = mcc.zip(mnc).map(|(mcc, mnc)| SourceRequest {
                query: CellQuery::new(mcc, mnc).with_radio(radio),
                api_key,
                base_url,
            });
            match request {
                Some(request) if fetch => {
                    let cells = fetch_records(&config, &input, request)?;
                    let output = output.unwrap_or_else(|| PathBuf::from("cells_data.json"));
                    write_output(Some(output.as_path()), &cells)?;
                }
                request => {
                    let cells = grid(&config, &input, request.as_ref())?;
                    write_output(output.as_deref(), &cells)?;
                }
            }
        }
        Command::Densify {
            input,
            output,
            interval,
        } => {
            if let Some(interval) = interval {
                config = config.with_interval_meters(interval);
            }
            let densified = densify_file(&config, &input)?;
            write_output(output.as_deref(), &densified)?;
        }
        Command::Rank {
            cells,
            path,
            top_k,
            interval,
            output,
        } => {
            if let Some(top_k) = top_k {
                config = config.with_top_k(top_k);
            }
            if let Some(interval) = interval {
                config = config.with_interval_meters(interval);
            }
            let ranked = rank_files(&config, &cells, &path, interval.is_some())
                .context("Ranking failed")?;
            write_output(Some(output.as_path()), &ranked)?;
        }
        Command::Profile { input, output } => {
            let csv = profile_csv(&input)?;
            write_output(output.as_deref(), &csv)?;
        }
    }

    info!("Done");
    Ok(())
}
