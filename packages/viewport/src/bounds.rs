//! Minimal enclosing box of a set of features.

use geomap_geojson_models::{BoundingBox, Feature, GeometryExt as _};

/// Computes the box enclosing every position of every feature's geometry.
///
/// Features without geometry (including those whose `geometry` member did
/// not parse) and `GeometryCollection` geometries contribute nothing.
/// Positions with fewer than two values or non-finite values are skipped.
/// Returns `None` when no position was visited.
#[must_use]
pub fn compute_bounding_box(features: &[Feature]) -> Option<BoundingBox> {
    let mut min_lng = f64::INFINITY;
    let mut min_lat = f64::INFINITY;
    let mut max_lng = f64::NEG_INFINITY;
    let mut max_lat = f64::NEG_INFINITY;

    for geometry in features.iter().filter_map(|f| f.geometry.as_ref()) {
        geometry.for_each_position(|position| {
            if let [lng, lat, ..] = *position
                && lng.is_finite()
                && lat.is_finite()
            {
                min_lng = min_lng.min(lng);
                min_lat = min_lat.min(lat);
                max_lng = max_lng.max(lng);
                max_lat = max_lat.max(lat);
            }
        });
    }

    if min_lng.is_finite() && min_lat.is_finite() && max_lng.is_finite() && max_lat.is_finite() {
        Some(BoundingBox::new(min_lng, min_lat, max_lng, max_lat))
    } else {
        None
    }
}
