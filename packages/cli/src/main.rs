#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for `GeoJSON` normalization and viewport
//! inference.
//!
//! Reads arbitrary geographic JSON from files or stdin, normalizes it into a
//! `FeatureCollection`, and prints the collection, its bounding box and
//! fitted viewport, or its grid projection as CSV. Also places a viewport
//! on saved Nominatim search results.

use std::io::{Read as _, Write as _};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use geomap_geojson::{
    BoundingBox, FeatureCollection, FeatureCollectionExt as _, export, normalize_with_report, table,
};
use geomap_viewport::{
    ViewportConfig, ViewportState, compute_bounding_box, config, fit::fit_features_with,
    location::{parse_search_results, viewport_for_location_with},
};
use serde::Serialize;

/// Input argument meaning stdin.
const STDIN: &str = "-";

#[derive(Parser)]
#[command(name = "geomap", about = "GeoJSON normalization and viewport tool")]
struct Cli {
    /// Viewport configuration TOML overriding the embedded zoom table
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize inputs and merge them, in order, into one `FeatureCollection`
    Normalize {
        /// Input files (`-` for stdin; stdin when omitted)
        inputs: Vec<String>,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the bounding box, center, and zoom for an input
    Bounds {
        /// Input file (`-` or omitted for stdin)
        input: Option<String>,
    },
    /// Print the grid projection of an input as CSV
    Table {
        /// Input file (`-` or omitted for stdin)
        input: Option<String>,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the viewport for the first Nominatim search result
    Locate {
        /// Nominatim `/search` JSON (`-` or omitted for stdin)
        input: Option<String>,
    },
}

/// Bounding box and fitted camera for a collection.
#[derive(Debug, Serialize)]
struct BoundsReport {
    features: usize,
    bbox: Option<BoundingBox>,
    center: Option<[f64; 2]>,
    zoom: Option<f64>,
}

/// Camera placement for a search result.
#[derive(Debug, Serialize)]
struct LocateReport {
    display_name: String,
    viewport: ViewportState,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Normalize { inputs, output } => {
            let collection = normalize_inputs(&inputs)?;
            match output {
                Some(path) => export::export_to_path(&collection, &path)?,
                None => export::write_geojson(&collection, std::io::stdout().lock())?,
            }
        }
        Commands::Bounds { input } => {
            let collection = normalize_input(input.as_deref().unwrap_or(STDIN))?;
            let report = bounds_report(&collection, &config);
            print_json(&report)?;
        }
        Commands::Table { input, output } => {
            let collection = normalize_input(input.as_deref().unwrap_or(STDIN))?;
            let grid = table::build_table(&collection);
            match output {
                Some(path) => {
                    let file = std::fs::File::create(&path)?;
                    grid.write_csv(std::io::BufWriter::new(file))?;
                    log::info!("Wrote {} rows to {}", grid.rows.len(), path.display());
                }
                None => grid.write_csv(std::io::stdout().lock())?,
            }
        }
        Commands::Locate { input } => {
            let body = read_json(input.as_deref().unwrap_or(STDIN))?;
            let locations = parse_search_results(&body)?;
            let Some(location) = locations.first() else {
                return Err("No locations found".into());
            };
            log::info!(
                "Using first of {} results: {}",
                locations.len(),
                location.display_name
            );

            let viewport =
                viewport_for_location_with(location, &config.initial_viewport(), &config);
            print_json(&LocateReport {
                display_name: location.display_name.clone(),
                viewport,
            })?;
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<ViewportConfig, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(config::standard().clone());
    };

    log::info!("Loading viewport config from {}", path.display());
    let text = std::fs::read_to_string(path)?;
    Ok(config::from_toml_str(&text)?)
}

/// Reads and parses JSON from a file path, or from stdin for `-`.
fn read_json(input: &str) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
    let text = if input == STDIN {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        text
    } else {
        std::fs::read_to_string(input)?
    };

    Ok(serde_json::from_str(&text)?)
}

fn normalize_input(input: &str) -> Result<FeatureCollection, Box<dyn std::error::Error>> {
    let report = normalize_with_report(&read_json(input)?);

    if report.dropped_records > 0 {
        log::warn!(
            "{input}: dropped {} records without usable coordinates",
            report.dropped_records
        );
    }
    log::info!(
        "{input}: {} input, {} features",
        report.shape,
        report.collection.features.len()
    );

    Ok(report.collection)
}

fn normalize_inputs(inputs: &[String]) -> Result<FeatureCollection, Box<dyn std::error::Error>> {
    if inputs.is_empty() {
        return normalize_input(STDIN);
    }

    let collections = inputs
        .iter()
        .map(|input| normalize_input(input))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(merge_collections(&collections))
}

/// Merges collections in order, each later one after the features already
/// gathered.
fn merge_collections(collections: &[FeatureCollection]) -> FeatureCollection {
    collections
        .iter()
        .fold(FeatureCollection::empty(), |gathered, next| {
            FeatureCollection::merged(&gathered, next)
        })
}

fn bounds_report(collection: &FeatureCollection, config: &ViewportConfig) -> BoundsReport {
    let bbox = compute_bounding_box(&collection.features);
    let viewport = fit_features_with(&collection.features, &config.initial_viewport(), config);

    BoundsReport {
        features: collection.features.len(),
        bbox,
        center: viewport.map(|v| [v.longitude, v.latitude]),
        zoom: viewport.map(|v| v.zoom),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}
