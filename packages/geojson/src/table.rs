//! Row/column projection of a feature collection for the tabular grid.
//!
//! One row per feature, keyed by the feature's positional index. Feature
//! properties are flattened into columns and a synthesized `geometry_type`
//! column carries each feature's geometry kind.

use std::io::Write;

use geomap_geojson_models::{FeatureCollection, FeatureExt as _, Properties};
use serde::Serialize;
use serde_json::Value;

use crate::GeoJsonError;

/// Column holding the row identifier.
pub const ID_COLUMN: &str = "id";

/// Synthesized column holding the geometry kind.
pub const GEOMETRY_TYPE_COLUMN: &str = "geometry_type";

/// A grid column definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    /// Key into each row's cells.
    pub field: String,
    /// Display header, derived from the field name.
    pub header_name: String,
}

impl Column {
    fn new(field: &str) -> Self {
        Self {
            field: field.to_string(),
            header_name: header_name(field),
        }
    }
}

/// One grid row. A property named `id` is shadowed by the positional id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    /// Positional index of the feature within its collection.
    pub id: usize,
    /// Flattened properties plus `geometry_type`.
    #[serde(flatten)]
    pub cells: Properties,
}

/// The grid projection of a feature collection.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct FeatureTable {
    /// `id`, then property keys in first-seen order, then `geometry_type`.
    pub columns: Vec<Column>,
    /// One row per feature, in collection order.
    pub rows: Vec<Row>,
}

impl FeatureTable {
    /// Writes the table as CSV, header row first.
    ///
    /// Strings are written verbatim, null and missing cells are empty, and
    /// other values are written as compact JSON.
    ///
    /// # Errors
    ///
    /// Returns [`GeoJsonError`] if a record cannot be written.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), GeoJsonError> {
        let mut csv = csv::Writer::from_writer(writer);

        csv.write_record(self.columns.iter().map(|column| column.field.as_str()))?;

        for row in &self.rows {
            let record: Vec<String> = self
                .columns
                .iter()
                .map(|column| {
                    if column.field == ID_COLUMN {
                        row.id.to_string()
                    } else {
                        row.cells.get(&column.field).map(cell_text).unwrap_or_default()
                    }
                })
                .collect();
            csv.write_record(&record)?;
        }

        csv.flush()?;
        Ok(())
    }
}

/// Projects a collection into grid columns and rows.
///
/// An empty collection yields an empty table with no columns.
#[must_use]
pub fn build_table(collection: &FeatureCollection) -> FeatureTable {
    if collection.features.is_empty() {
        return FeatureTable::default();
    }

    let mut fields: Vec<&str> = Vec::new();
    for feature in &collection.features {
        for key in feature.properties.iter().flat_map(|properties| properties.keys()) {
            if key != ID_COLUMN && !fields.contains(&key.as_str()) {
                fields.push(key.as_str());
            }
        }
    }
    if !fields.contains(&GEOMETRY_TYPE_COLUMN) {
        fields.push(GEOMETRY_TYPE_COLUMN);
    }

    let columns = std::iter::once(Column {
        field: ID_COLUMN.to_string(),
        header_name: "ID".to_string(),
    })
    .chain(fields.into_iter().map(Column::new))
    .collect();

    let rows = collection
        .features
        .iter()
        .enumerate()
        .map(|(id, feature)| {
            let mut cells = feature.properties.clone().unwrap_or_default();
            cells.remove(ID_COLUMN);
            if let Some(kind) = feature.geometry_type_name() {
                cells.insert(
                    GEOMETRY_TYPE_COLUMN.to_string(),
                    Value::String(kind.to_string()),
                );
            }
            Row { id, cells }
        })
        .collect();

    FeatureTable { columns, rows }
}

/// `geometry_type` becomes `Geometry type`. Only underscores after the
/// first character become spaces, so `_id` stays `_id`.
fn header_name(field: &str) -> String {
    let mut chars = field.chars();
    chars.next().map_or_else(String::new, |first| {
        first
            .to_uppercase()
            .chain(chars.map(|c| if c == '_' { ' ' } else { c }))
            .collect()
    })
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use geomap_geojson_models::{Feature, FeatureCollectionExt as _, FeatureExt as _, point};

    use crate::normalize;
    use serde_json::json;

    use super::*;

    fn properties(value: Value) -> Properties {
        value.as_object().cloned().unwrap()
    }

    fn sample() -> FeatureCollection {
        FeatureCollection::from_features(vec![
            Feature::from_geometry(Some(point(1.0, 2.0)))
                .with_properties(properties(json!({"name": "A", "max_speed": 30}))),
            Feature::from_geometry(None)
                .with_properties(properties(json!({"name": "B", "note": null}))),
        ])
    }

    #[test]
    fn columns_follow_first_seen_order() {
        let table = build_table(&sample());
        let fields: Vec<&str> = table.columns.iter().map(|c| c.field.as_str()).collect();
        assert_eq!(fields, ["id", "name", "max_speed", "note", "geometry_type"]);
    }

    #[test]
    fn derives_header_names() {
        let table = build_table(&sample());
        let headers: Vec<&str> = table
            .columns
            .iter()
            .map(|c| c.header_name.as_str())
            .collect();
        assert_eq!(headers, ["ID", "Name", "Max speed", "Note", "Geometry type"]);
    }

    #[test]
    fn rows_use_positional_ids_and_geometry_type() {
        let table = build_table(&sample());
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].id, 0);
        assert_eq!(table.rows[0].cells["geometry_type"], json!("Point"));
        assert_eq!(table.rows[1].id, 1);
        assert!(!table.rows[1].cells.contains_key("geometry_type"));
    }

    #[test]
    fn existing_geometry_type_property_keeps_its_position() {
        let collection = FeatureCollection::from_features(vec![
            Feature::from_geometry(Some(point(0.0, 0.0)))
                .with_properties(properties(json!({"geometry_type": "custom", "b": 1}))),
        ]);
        let table = build_table(&collection);
        let fields: Vec<&str> = table.columns.iter().map(|c| c.field.as_str()).collect();
        assert_eq!(fields, ["id", "geometry_type", "b"]);
        assert_eq!(table.rows[0].cells["geometry_type"], json!("Point"));
    }

    #[test]
    fn id_property_does_not_replace_row_id() {
        let collection = FeatureCollection::from_features(vec![
            Feature::from_geometry(None)
                .with_properties(properties(json!({"id": 9, "name": "x"}))),
        ]);
        let table = build_table(&collection);
        let fields: Vec<&str> = table.columns.iter().map(|c| c.field.as_str()).collect();
        assert_eq!(fields, ["id", "name", "geometry_type"]);
        assert_eq!(
            serde_json::to_value(&table.rows[0]).unwrap(),
            json!({"id": 0, "name": "x"})
        );
    }

    #[test]
    fn header_names_keep_leading_underscore() {
        assert_eq!(header_name("_id"), "_id");
        assert_eq!(header_name("__private_key"), "_ private key");
        assert_eq!(header_name("geometry_type"), "Geometry type");
        assert_eq!(header_name("élan"), "Élan");
        assert_eq!(header_name(""), "");
    }

    #[test]
    fn unparsed_geometry_still_reports_its_type() {
        let collection = normalize(&json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": {"n": 1},
                "geometry": {"type": "Polygon", "coordinates": [[[0, 0], [5, 0], [5, 5], [0, null]]]}
            }]
        }));
        let table = build_table(&collection);
        assert_eq!(
            serde_json::to_value(&table.rows[0]).unwrap(),
            json!({"id": 0, "n": 1, "geometry_type": "Polygon"})
        );
    }

    #[test]
    fn empty_collection_has_no_columns() {
        let table = build_table(&FeatureCollection::empty());
        assert!(table.columns.is_empty());
        assert!(table.rows.is_empty());
    }

    #[test]
    fn serializes_rows_flat() {
        let table = build_table(&sample());
        assert_eq!(
            serde_json::to_value(&table.rows[0]).unwrap(),
            json!({"id": 0, "name": "A", "max_speed": 30, "geometry_type": "Point"})
        );
        assert_eq!(table.columns[2].header_name, "Max speed");
        assert_eq!(
            serde_json::to_value(&table.columns[0]).unwrap(),
            json!({"field": "id", "headerName": "ID"})
        );
    }

    #[test]
    fn writes_csv() {
        let mut collection = sample();
        collection.features[1].set_property("tags", json!(["a", "b"]));

        let mut out = Vec::new();
        build_table(&collection).write_csv(&mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "id,name,max_speed,note,tags,geometry_type\n\
             0,A,30,,,Point\n\
             1,B,,,\"[\"\"a\"\",\"\"b\"\"]\",\n"
        );
    }
}
