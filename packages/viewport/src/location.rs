//! Viewport placement on location search results.
//!
//! Results follow the Nominatim `/search` JSON shape, where coordinates and
//! bounding box edges usually arrive as decimal strings.
//!
//! See <https://nominatim.org/release-docs/develop/api/Output/>

use geomap_geojson::tabular::parse_float_prefix;
use geomap_geojson_models::BoundingBox;
use geomap_viewport_models::{
    CoordinateValue, LocationData, LocationId, ViewportConfig, ViewportState,
};
use serde_json::Value;

use crate::{ViewportError, config, fit::center_of, zoom::zoom_from_bounds_with};

/// Moves the viewport to `location` using the standard configuration.
///
/// See [`viewport_for_location_with`].
#[must_use]
pub fn viewport_for_location(location: &LocationData, current: &ViewportState) -> ViewportState {
    viewport_for_location_with(location, current, config::standard())
}

/// Moves the viewport to `location`, keeping the current pitch and bearing.
///
/// A four-element `boundingbox` (`[south, north, west, east]`) centers the
/// camera on its midpoint at the zoom inferred from its extent. Otherwise
/// the camera centers on `lon`/`lat` at the default zoom.
#[must_use]
pub fn viewport_for_location_with(
    location: &LocationData,
    current: &ViewportState,
    config: &ViewportConfig,
) -> ViewportState {
    if let Some([south, north, west, east]) = location
        .boundingbox
        .as_deref()
        .and_then(|edges| <&[CoordinateValue; 4]>::try_from(edges).ok())
    {
        let bbox = BoundingBox::new(
            parse_coord(west),
            parse_coord(south),
            parse_coord(east),
            parse_coord(north),
        );
        let center = center_of(&bbox);
        let zoom = zoom_from_bounds_with(&bbox, config);
        log::debug!(
            "Placing viewport on '{}' extent at zoom {zoom}",
            location.display_name
        );
        return current.centered_on(center.x, center.y, f64::from(zoom));
    }

    current.centered_on(location.lon, location.lat, f64::from(config.default_zoom))
}

/// Reads a coordinate that may be numeric or decimal text.
///
/// Text is read by its leading decimal number, with trailing text ignored
/// (see [`parse_float_prefix`]). Anything that does not yield a finite
/// number becomes `0.0`.
#[must_use]
pub fn parse_coord(value: &CoordinateValue) -> f64 {
    let parsed = match value {
        CoordinateValue::Number(number) => Some(*number),
        CoordinateValue::Text(text) => parse_float_prefix(text),
    };

    match parsed {
        Some(number) if number.is_finite() => number,
        _ => {
            log::warn!("Invalid coordinate value {value:?}, using 0");
            0.0
        }
    }
}

/// Parses a Nominatim `/search` response body into locations, in result
/// order.
///
/// # Errors
///
/// Returns [`ViewportError::Parse`] if the body is not an array or any
/// result is malformed.
pub fn parse_search_results(body: &Value) -> Result<Vec<LocationData>, ViewportError> {
    let results = body.as_array().ok_or_else(|| ViewportError::Parse {
        message: "Nominatim response is not an array".to_string(),
    })?;

    results.iter().map(location_from_nominatim).collect()
}

/// Parses a single Nominatim search result.
///
/// `lat`/`lon` may be decimal strings (as Nominatim returns them) or
/// numbers. A missing `type` becomes empty and a missing `importance`
/// becomes `0`.
///
/// # Errors
///
/// Returns [`ViewportError::Parse`] if `place_id`, `display_name`, `lat`
/// or `lon` is missing or invalid.
pub fn location_from_nominatim(result: &Value) -> Result<LocationData, ViewportError> {
    let id = match &result["place_id"] {
        Value::Number(number) => number.as_u64().map(LocationId::Number),
        Value::String(text) => Some(LocationId::Text(text.clone())),
        _ => None,
    }
    .ok_or_else(|| ViewportError::Parse {
        message: "Missing place_id in Nominatim result".to_string(),
    })?;

    let display_name = result["display_name"]
        .as_str()
        .ok_or_else(|| ViewportError::Parse {
            message: "Missing display_name in Nominatim result".to_string(),
        })?
        .to_string();

    let lat = coordinate_field(result, "lat")?;
    let lon = coordinate_field(result, "lon")?;

    let boundingbox = result["boundingbox"].as_array().map(|edges| {
        edges
            .iter()
            .map(|edge| match edge {
                Value::Number(number) => {
                    CoordinateValue::Number(number.as_f64().unwrap_or(f64::NAN))
                }
                Value::String(text) => CoordinateValue::Text(text.clone()),
                other => CoordinateValue::Text(other.to_string()),
            })
            .collect()
    });

    Ok(LocationData {
        id,
        display_name,
        lat,
        lon,
        kind: result["type"].as_str().unwrap_or_default().to_string(),
        importance: result["importance"].as_f64().unwrap_or_default(),
        boundingbox,
    })
}

fn coordinate_field(result: &Value, field: &str) -> Result<f64, ViewportError> {
    let value = match &result[field] {
        Value::String(text) => text.trim().parse::<f64>().ok(),
        Value::Number(number) => number.as_f64(),
        _ => None,
    };

    value
        .filter(|v| v.is_finite())
        .ok_or_else(|| ViewportError::Parse {
            message: format!("Missing {field} in Nominatim result"),
        })
}
