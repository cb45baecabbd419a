#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Bounding-box computation, zoom inference, and viewport placement.
//!
//! Walks a feature collection's geometries to compute a minimal enclosing
//! box, then derives a center point and a discrete zoom level from the
//! box's extent. Also places the viewport on geocoder search results.
//! Everything here is a pure function of its inputs; the embedded
//! configuration is parsed once and never mutated.

pub mod bounds;
pub mod config;
pub mod fit;
pub mod location;
pub mod zoom;

pub use bounds::compute_bounding_box;
pub use fit::fit_features;
pub use geomap_viewport_models::{LocationData, ViewportConfig, ViewportState, ZoomRule};
pub use location::viewport_for_location;
pub use zoom::zoom_from_bounds;

use thiserror::Error;

/// Errors that can occur while loading configuration or parsing geocoder
/// responses.
#[derive(Debug, Error)]
pub enum ViewportError {
    /// The configuration is not valid TOML for [`ViewportConfig`].
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    /// The zoom rules are not ordered by strictly decreasing extent.
    #[error("Invalid zoom rules: {message}")]
    InvalidZoomRules {
        /// Description of the offending rule.
        message: String,
    },

    /// A geocoder response could not be interpreted.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of what went wrong.
        message: String,
    },
}
