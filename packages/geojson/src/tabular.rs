//! Conversion of flat coordinate-bearing records into point features.
//!
//! Records such as CSV-derived airport or port lists carry their location
//! in a pair of latitude/longitude fields. Field names are resolved first
//! against a fixed list of well-known pairs and then, failing that, by a
//! case-insensitive scan of the record's keys.

use geomap_geojson_models::{Feature, FeatureExt as _, Properties, point};
use serde_json::Value;

/// Well-known `(latitude, longitude)` field pairs, checked in order with
/// exact, case-sensitive key matching.
pub const COORDINATE_FIELD_PAIRS: [(&str, &str); 4] = [
    ("lat", "lon"),
    ("latitude", "longitude"),
    ("LAT", "LON"),
    ("Latitude", "Longitude"),
];

/// Whether the record exposes one of the [`COORDINATE_FIELD_PAIRS`].
#[must_use]
pub fn has_named_coordinate_fields(record: &Properties) -> bool {
    named_coordinate_fields(record).is_some()
}

/// Converts a list of records into point features.
///
/// Returns the surviving features in input order together with the number
/// of records that were dropped.
#[must_use]
pub fn records_to_features(records: &[Value]) -> (Vec<Feature>, usize) {
    let features: Vec<Feature> = records.iter().filter_map(record_to_feature).collect();
    let dropped = records.len() - features.len();
    (features, dropped)
}

/// Converts one record into a point feature.
///
/// Returns `None` if the record is not an object, has no resolvable
/// coordinate fields, or either value is non-numeric or out of range. The
/// feature's properties are a copy of the whole record, coordinate fields
/// included.
#[must_use]
pub fn record_to_feature(record: &Value) -> Option<Feature> {
    let fields = record.as_object()?;
    let (lat, lon) =
        named_coordinate_fields(fields).or_else(|| scanned_coordinate_fields(fields))?;

    let latitude = parse_coordinate(lat).filter(|lat| (-90.0..=90.0).contains(lat))?;
    let longitude = parse_coordinate(lon).filter(|lon| (-180.0..=180.0).contains(lon))?;

    Some(Feature::from_geometry(Some(point(longitude, latitude))).with_properties(fields.clone()))
}

/// Parses a coordinate value as a finite float.
///
/// Numbers are taken as-is. Strings are parsed by their leading decimal
/// prefix after leading whitespace, so `"40.7 N"` yields `40.7`. Anything
/// else is non-numeric.
#[must_use]
pub fn parse_coordinate(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => parse_float_prefix(text),
        _ => None,
    }
    .filter(|parsed| parsed.is_finite())
}

fn named_coordinate_fields(record: &Properties) -> Option<(&Value, &Value)> {
    COORDINATE_FIELD_PAIRS
        .iter()
        .find_map(|(lat, lon)| Some((record.get(*lat)?, record.get(*lon)?)))
}

/// First key containing `lat` (or equal to `y`) wins latitude; first key
/// containing `lon`/`lng` (or equal to `x`) wins longitude. A key claimed
/// for latitude is not also considered for longitude.
fn scanned_coordinate_fields(record: &Properties) -> Option<(&Value, &Value)> {
    let mut lat = None;
    let mut lon = None;

    for (key, value) in record {
        let key = key.to_lowercase();
        if lat.is_none() && (key.contains("lat") || key == "y") {
            lat = Some(value);
        } else if lon.is_none() && (key.contains("lon") || key.contains("lng") || key == "x") {
            lon = Some(value);
        }
    }

    lat.zip(lon)
}

/// Parses the leading decimal number of `text`, after leading whitespace,
/// ignoring whatever follows it.
///
/// Accepts an optional sign, digits with an optional fraction, and an
/// optional exponent. Words such as `inf` or `NaN` are not numbers here.
#[must_use]
pub fn parse_float_prefix(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let digits = |from: usize| bytes[from..].iter().take_while(|b| b.is_ascii_digit()).count();

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let integer_digits = digits(end);
    end += integer_digits;

    let mut fraction_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        fraction_digits = digits(end + 1);
        end += 1 + fraction_digits;
    }

    if integer_digits + fraction_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exponent = end + 1;
        if matches!(bytes.get(exponent), Some(b'+' | b'-')) {
            exponent += 1;
        }
        let exponent_digits = digits(exponent);
        if exponent_digits > 0 {
            end = exponent + exponent_digits;
        }
    }

    text[..end].parse().ok()
}
