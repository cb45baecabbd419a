//! `GeoJSON` export.
//!
//! Serializes a collection as formatted JSON text: exactly the standard
//! `GeoJSON` serialization of the in-memory structure, with no metadata
//! added.
//!
//! Output goes through [`serde_json::Value`] first so a geometry kept
//! verbatim under [`crate::RAW_GEOMETRY_MEMBER`] replaces the feature's
//! `null` geometry instead of being written as a second `geometry` key.

use std::io::Write;
use std::path::Path;

use geomap_geojson_models::FeatureCollection;

use crate::GeoJsonError;

/// File name offered for downloads when the user does not choose one.
pub const DEFAULT_EXPORT_FILE_NAME: &str = "map-features.geojson";

/// Serializes the collection as pretty-printed (2-space) JSON.
///
/// Parsed coordinates are held as `f64` and always written as floats, so an
/// input position `[10, 20]` is exported as `[10.0, 20.0]`. Geometries that
/// did not parse are written back unchanged, integers included.
///
/// # Errors
///
/// Returns [`GeoJsonError::Json`] if serialization fails.
pub fn to_geojson_string(collection: &FeatureCollection) -> Result<String, GeoJsonError> {
    Ok(serde_json::to_string_pretty(&serde_json::to_value(collection)?)?)
}

/// Writes the pretty-printed collection to `writer`, followed by a newline.
///
/// # Errors
///
/// Returns [`GeoJsonError`] if serialization or writing fails.
pub fn write_geojson<W: Write>(
    collection: &FeatureCollection,
    mut writer: W,
) -> Result<(), GeoJsonError> {
    serde_json::to_writer_pretty(&mut writer, &serde_json::to_value(collection)?)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Exports the collection to a file.
///
/// Refuses to write an empty collection.
///
/// # Errors
///
/// Returns [`GeoJsonError::NothingToExport`] if the collection is empty,
/// or another [`GeoJsonError`] if the file cannot be written.
pub fn export_to_path(collection: &FeatureCollection, path: &Path) -> Result<(), GeoJsonError> {
    if collection.features.is_empty() {
        return Err(GeoJsonError::NothingToExport);
    }

    let file = std::fs::File::create(path)?;
    write_geojson(collection, std::io::BufWriter::new(file))?;

    log::info!(
        "Exported {} features to {}",
        collection.features.len(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::str::FromStr as _;

    use geomap_geojson_models::{Feature, FeatureCollectionExt as _, FeatureExt as _, point};
    use serde_json::json;

    use super::*;
    use crate::normalize;

    fn sample() -> FeatureCollection {
        normalize(&json!({
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "geometry": {"type": "Point", "coordinates": [10.0, 20.0]},
                 "properties": {"name": "A"}},
                {"type": "Feature", "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]
                }}
            ]
        }))
    }

    #[test]
    fn exports_standard_geojson() {
        let text = to_geojson_string(&sample()).unwrap();
        let parsed = geojson::GeoJson::from_str(&text).unwrap();

        let geojson::GeoJson::FeatureCollection(collection) = parsed else {
            panic!("expected a FeatureCollection");
        };
        assert_eq!(collection.features.len(), 2);
        assert_eq!(
            collection.features[0]
                .property("name")
                .and_then(serde_json::Value::as_str),
            Some("A")
        );
        assert!(collection.features[1].properties.is_some());
    }

    #[test]
    fn uses_two_space_indentation() {
        let collection =
            FeatureCollection::from_features(vec![Feature::from_geometry(Some(point(1.0, 2.0)))]);
        let text = to_geojson_string(&collection).unwrap();
        assert!(text.starts_with("{\n  \"type\": \"FeatureCollection\",\n  \"features\": ["));
    }

    #[test]
    fn export_round_trips_through_normalize() {
        let collection = sample();
        let text = to_geojson_string(&collection).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(normalize(&value), collection);
    }

    #[test]
    fn unparsed_geometry_is_written_back_unchanged() {
        let raw = json!({"type": "Polygon", "coordinates": [[[0, 0], [5, 0], [5, 5], [0, null]]]});
        let collection = normalize(&json!({
            "type": "FeatureCollection",
            "features": [{"type": "Feature", "properties": {"n": 1}, "geometry": raw}]
        }));

        let text = to_geojson_string(&collection).unwrap();
        assert_eq!(text.matches("\"geometry\"").count(), 1);

        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["features"][0]["geometry"], raw);
        assert_eq!(value["features"][0]["properties"], json!({"n": 1}));
        assert_eq!(normalize(&value), collection);
    }

    #[test]
    fn integer_coordinates_are_written_as_floats() {
        let collection = normalize(&json!({"type": "Point", "coordinates": [10, 20]}));
        let value: serde_json::Value =
            serde_json::from_str(&to_geojson_string(&collection).unwrap()).unwrap();
        assert_eq!(
            value["features"][0]["geometry"]["coordinates"].to_string(),
            "[10.0,20.0]"
        );
    }

    #[test]
    fn write_geojson_appends_newline() {
        let mut out = Vec::new();
        write_geojson(&sample(), &mut out).unwrap();
        assert_eq!(out.last(), Some(&b'\n'));
    }

    #[test]
    fn refuses_to_export_empty_collection() {
        let path = std::env::temp_dir().join("geomap-export-empty.geojson");
        let result = export_to_path(&FeatureCollection::empty(), &path);
        assert!(matches!(result, Err(GeoJsonError::NothingToExport)));
        assert!(!path.exists());
    }

    #[test]
    fn exports_to_file() {
        let path = std::env::temp_dir().join(format!(
            "geomap-export-{}-{DEFAULT_EXPORT_FILE_NAME}",
            std::process::id()
        ));
        export_to_path(&sample(), &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(text, format!("{}\n", to_geojson_string(&sample()).unwrap()));
    }
}
