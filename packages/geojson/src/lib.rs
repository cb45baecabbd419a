#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! `GeoJSON` normalization, tabular record conversion, grid projection, and
//! export.
//!
//! Takes arbitrary, possibly malformed geographic JSON (already-valid
//! `GeoJSON` of any shape, or flat records with latitude/longitude-like
//! fields) and produces one canonical [`FeatureCollection`]. Normalization
//! is total: unconvertible input yields the empty collection rather than an
//! error. The fallible operations in this crate are the outer ones: writing
//! exports and CSV grids.

pub mod export;
pub mod normalize;
pub mod table;
pub mod tabular;

pub use geomap_geojson_models::{
    BoundingBox, Feature, FeatureCollection, FeatureCollectionExt, FeatureExt, Geometry,
    GeometryExt, GeometryKind, Id, Position, Properties, RAW_GEOMETRY_MEMBER, Value, point,
};
pub use normalize::{InputShape, NormalizeReport, is_valid_geojson, normalize, normalize_with_report};

use thiserror::Error;

/// Errors that can occur while exporting or rendering feature data.
#[derive(Debug, Error)]
pub enum GeoJsonError {
    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Writing the output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV rendering failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The collection to export holds no features.
    #[error("No features to export")]
    NothingToExport,
}
