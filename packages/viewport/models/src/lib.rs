#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Viewport state, location search result, and viewport configuration
//! types.
//!
//! A [`ViewportState`] is derived and ephemeral: it is recomputed whenever
//! the active feature collection or the selected location changes and is
//! never persisted.

use serde::{Deserialize, Serialize};

/// Camera position handed to the map renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    /// Center longitude.
    pub longitude: f64,
    /// Center latitude.
    pub latitude: f64,
    /// Zoom level. Inferred levels are integral, but the renderer may
    /// report fractional levels after user interaction.
    pub zoom: f64,
    /// Tilt in degrees.
    pub pitch: f64,
    /// Rotation in degrees.
    pub bearing: f64,
}

impl ViewportState {
    /// Creates a flat, north-up viewport.
    #[must_use]
    pub const fn new(longitude: f64, latitude: f64, zoom: f64) -> Self {
        Self {
            longitude,
            latitude,
            zoom,
            pitch: 0.0,
            bearing: 0.0,
        }
    }

    /// Moves the camera, keeping pitch and bearing.
    #[must_use]
    pub const fn centered_on(self, longitude: f64, latitude: f64, zoom: f64) -> Self {
        Self {
            longitude,
            latitude,
            zoom,
            ..self
        }
    }
}

/// Identifier of a geocoder result (`place_id`), numeric or textual.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocationId {
    /// Numeric identifier.
    Number(u64),
    /// Textual identifier.
    Text(String),
}

/// A coordinate that may arrive as a number or as a decimal string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CoordinateValue {
    /// Already numeric.
    Number(f64),
    /// Decimal text, as geocoders commonly return.
    Text(String),
}

/// A location search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationData {
    /// Geocoder place identifier.
    pub id: LocationId,
    /// Human-readable place name.
    pub display_name: String,
    /// Latitude (WGS84).
    pub lat: f64,
    /// Longitude (WGS84).
    pub lon: f64,
    /// Place type (e.g. `"city"`, `"house"`).
    #[serde(rename = "type")]
    pub kind: String,
    /// Geocoder ranking score.
    pub importance: f64,
    /// Extent as `[south, north, west, east]`.
    #[serde(default)]
    pub boundingbox: Option<Vec<CoordinateValue>>,
}

/// Maps a spatial extent to a zoom level: applies when the extent is
/// strictly greater than `min_extent`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomRule {
    /// Exclusive lower bound on the larger axis span, in degrees.
    pub min_extent: f64,
    /// Zoom level to use.
    pub zoom: u8,
}

/// Viewport placement settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewportConfig {
    /// Zoom of the initial whole-world view.
    pub world_zoom: u8,
    /// Zoom used when no zoom rule matches, and for locations without an
    /// extent.
    pub default_zoom: u8,
    /// Zoom used when centering on a single position because no bounding
    /// box is available.
    pub fallback_zoom: u8,
    /// Rules ordered by strictly decreasing `min_extent`; first match wins.
    pub zoom_rules: Vec<ZoomRule>,
}

impl ViewportConfig {
    /// Returns the zoom level for an extent in degrees.
    #[must_use]
    pub fn zoom_for_extent(&self, extent: f64) -> u8 {
        self.zoom_rules
            .iter()
            .find(|rule| extent > rule.min_extent)
            .map_or(self.default_zoom, |rule| rule.zoom)
    }

    /// The whole-world view shown before any data is loaded.
    #[must_use]
    pub fn initial_viewport(&self) -> ViewportState {
        ViewportState::new(0.0, 0.0, f64::from(self.world_zoom))
    }
}
