//! Validation and conversion of heterogeneous input into a canonical
//! [`FeatureCollection`].
//!
//! Input is classified into an [`InputShape`] by [`detect_shape`], which
//! accepts, in priority order:
//!
//! 1. a non-empty array whose first record has a well-known
//!    latitude/longitude field pair (other records are not inspected);
//! 2. a `FeatureCollection` with a `features` array, of which only the
//!    first element's `type` is checked;
//! 3. any `Feature`;
//! 4. a geometry object carrying a `coordinates` (or, for
//!    `GeometryCollection`, `geometries`) array.
//!
//! Malformed later features are not rejected by (2); they are normalized
//! leniently. A `geometry` member that does not parse as `GeoJSON` is kept
//! verbatim rather than discarded.

use geomap_geojson_models::{
    Feature, FeatureCollection, FeatureCollectionExt as _, FeatureExt as _, Geometry, GeometryKind,
    Id, Properties, RAW_GEOMETRY_MEMBER,
};
use serde_json::Value;
use strum_macros::{AsRefStr, Display};

use crate::tabular;

/// The kind of input recognized by [`detect_shape`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum InputShape {
    /// Array of flat records with coordinate fields.
    Records,
    /// A `FeatureCollection` object.
    FeatureCollection,
    /// A single `Feature` object.
    Feature,
    /// A bare geometry of one of the six simple kinds.
    Geometry,
    /// A `GeometryCollection` object.
    GeometryCollection,
    /// Anything not convertible.
    Unrecognized,
}

/// Outcome of [`normalize_with_report`].
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizeReport {
    /// The shape the input was recognized as.
    pub shape: InputShape,
    /// The canonical collection.
    pub collection: FeatureCollection,
    /// Number of tabular records dropped for missing, non-numeric, or
    /// out-of-range coordinates. Always zero for non-tabular input.
    pub dropped_records: usize,
}

/// Normalizes arbitrary input into a feature collection.
///
/// Total: unrecognized input yields the empty collection.
#[must_use]
pub fn normalize(input: &Value) -> FeatureCollection {
    normalize_with_report(input).collection
}

/// Normalizes arbitrary input, also reporting the detected shape and the
/// number of dropped tabular records.
#[must_use]
pub fn normalize_with_report(input: &Value) -> NormalizeReport {
    let shape = detect_shape(input);
    let (collection, dropped_records) = convert(input, shape);

    log::debug!(
        "Normalized {shape} input into {} features ({dropped_records} records dropped)",
        collection.features.len()
    );

    NormalizeReport {
        shape,
        collection,
        dropped_records,
    }
}

/// Whether the input is convertible into a feature collection.
#[must_use]
pub fn is_valid_geojson(input: &Value) -> bool {
    detect_shape(input) != InputShape::Unrecognized
}

/// Classifies the input using the validation rules described in the
/// module documentation.
#[must_use]
pub fn detect_shape(input: &Value) -> InputShape {
    match input {
        Value::Array(records) => {
            if records
                .first()
                .and_then(Value::as_object)
                .is_some_and(tabular::has_named_coordinate_fields)
            {
                InputShape::Records
            } else {
                InputShape::Unrecognized
            }
        }
        Value::Object(object) => detect_object_shape(object),
        _ => InputShape::Unrecognized,
    }
}

/// Converts input into a feature collection without the validation step,
/// branching on the same discriminator as [`detect_shape`] but without the
/// first-record and first-feature checks.
#[must_use]
pub fn to_feature_collection(input: &Value) -> FeatureCollection {
    convert(input, conversion_shape(input)).0
}

fn detect_object_shape(object: &Properties) -> InputShape {
    let Some(kind) = object.get("type").and_then(Value::as_str) else {
        return InputShape::Unrecognized;
    };

    match kind {
        "FeatureCollection" => match object.get("features") {
            Some(Value::Array(features)) if accepts_first_feature(features.first()) => {
                InputShape::FeatureCollection
            }
            _ => InputShape::Unrecognized,
        },
        "Feature" => InputShape::Feature,
        _ => match kind.parse::<GeometryKind>() {
            Ok(GeometryKind::GeometryCollection) if has_array(object, "geometries") => {
                InputShape::GeometryCollection
            }
            Ok(kind) if kind.has_coordinates() && has_array(object, "coordinates") => {
                InputShape::Geometry
            }
            _ => InputShape::Unrecognized,
        },
    }
}

/// A missing first element, or one whose `type` is absent or `"Feature"`,
/// is accepted.
fn accepts_first_feature(first: Option<&Value>) -> bool {
    match first.and_then(|feature| feature.get("type")) {
        None | Some(Value::Null) => true,
        Some(kind) => kind.as_str() == Some("Feature"),
    }
}

fn has_array(object: &Properties, key: &str) -> bool {
    object.get(key).is_some_and(Value::is_array)
}

fn conversion_shape(input: &Value) -> InputShape {
    match input {
        Value::Array(records) if !records.is_empty() => InputShape::Records,
        Value::Object(object) => match object.get("type").and_then(Value::as_str) {
            Some("FeatureCollection") if has_array(object, "features") => {
                InputShape::FeatureCollection
            }
            Some("Feature") => InputShape::Feature,
            Some("GeometryCollection") if has_array(object, "geometries") => {
                InputShape::GeometryCollection
            }
            Some(kind) => match kind.parse::<GeometryKind>() {
                Ok(kind) if kind.has_coordinates() => InputShape::Geometry,
                _ => InputShape::Unrecognized,
            },
            None => InputShape::Unrecognized,
        },
        _ => InputShape::Unrecognized,
    }
}

fn convert(input: &Value, shape: InputShape) -> (FeatureCollection, usize) {
    match (shape, input) {
        (InputShape::Records, Value::Array(records)) => {
            let (features, dropped) = tabular::records_to_features(records);
            (FeatureCollection::from_features(features), dropped)
        }
        (InputShape::FeatureCollection, Value::Object(object)) => {
            (collection_from_object(object), 0)
        }
        (InputShape::Feature, _) => (
            FeatureCollection::from_features(vec![feature_from_value(input)]),
            0,
        ),
        (InputShape::Geometry, _) => (
            FeatureCollection::from_features(vec![feature_from_geometry_value(input)]),
            0,
        ),
        (InputShape::GeometryCollection, _) => {
            let features = input
                .get("geometries")
                .and_then(Value::as_array)
                .map(|geometries| geometries.iter().map(feature_from_geometry_value).collect())
                .unwrap_or_default();
            (FeatureCollection::from_features(features), 0)
        }
        _ => (FeatureCollection::empty(), 0),
    }
}

fn collection_from_object(object: &Properties) -> FeatureCollection {
    let mut collection = FeatureCollection::empty();
    let mut foreign = Properties::new();

    for (key, value) in object {
        match key.as_str() {
            "type" => {}
            "features" => {
                collection.features = value
                    .as_array()
                    .map(|features| features.iter().map(feature_from_value).collect())
                    .unwrap_or_default();
            }
            "bbox" => collection.bbox = parse_bbox(key, value, &mut foreign),
            _ => {
                foreign.insert(key.clone(), value.clone());
            }
        }
    }

    collection.foreign_members = non_empty(foreign);
    collection
}

/// Builds a feature from any value. Non-objects become an empty
/// geometry-less feature; null or non-object properties become `{}`.
fn feature_from_value(value: &Value) -> Feature {
    let mut feature = Feature::from_geometry(None);
    let Some(object) = value.as_object() else {
        return feature;
    };

    let mut foreign = Properties::new();

    for (key, member) in object {
        match key.as_str() {
            "type" => {}
            "id" => match member {
                Value::String(id) => feature.id = Some(Id::String(id.clone())),
                Value::Number(id) => feature.id = Some(Id::Number(id.clone())),
                Value::Null => {}
                _ => {
                    foreign.insert(key.clone(), member.clone());
                }
            },
            "geometry" => attach_geometry(&mut feature, &mut foreign, member),
            "properties" => {
                if let Some(properties) = member.as_object() {
                    feature.properties = Some(properties.clone());
                }
            }
            "bbox" => feature.bbox = parse_bbox(key, member, &mut foreign),
            _ => {
                foreign.insert(key.clone(), member.clone());
            }
        }
    }

    feature.foreign_members = non_empty(foreign);
    feature
}

/// A geometry that does not parse is kept verbatim under
/// [`RAW_GEOMETRY_MEMBER`] so export writes it back unchanged.
fn attach_geometry(feature: &mut Feature, foreign: &mut Properties, value: &Value) {
    if value.is_null() {
        return;
    }

    match Geometry::from_json_value(value.clone()) {
        Ok(geometry) => feature.geometry = Some(geometry),
        Err(e) => {
            log::debug!("Keeping unparsed geometry verbatim: {e}");
            foreign.insert(RAW_GEOMETRY_MEMBER.to_string(), value.clone());
        }
    }
}

fn feature_from_geometry_value(value: &Value) -> Feature {
    let mut feature = Feature::from_geometry(None);
    let mut foreign = Properties::new();
    attach_geometry(&mut feature, &mut foreign, value);
    feature.foreign_members = non_empty(foreign);
    feature
}

/// A numeric `bbox` array is parsed; anything else is kept as a foreign
/// member.
fn parse_bbox(key: &str, value: &Value, foreign: &mut Properties) -> Option<Vec<f64>> {
    if value.is_null() {
        return None;
    }

    let bbox = value
        .as_array()
        .and_then(|edges| edges.iter().map(Value::as_f64).collect::<Option<Vec<_>>>());
    if bbox.is_none() {
        foreign.insert(key.to_string(), value.clone());
    }
    bbox
}

fn non_empty(members: Properties) -> Option<Properties> {
    (!members.is_empty()).then_some(members)
}
