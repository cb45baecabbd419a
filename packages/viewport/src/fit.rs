//! Fits the viewport to a set of features.

use geo::{Rect, coord};
use geomap_geojson_models::{BoundingBox, Feature, GeometryExt as _};
use geomap_viewport_models::{ViewportConfig, ViewportState};

use crate::{bounds::compute_bounding_box, config, zoom::zoom_from_bounds_with};

/// Centers the viewport on `features` using the standard configuration.
///
/// See [`fit_features_with`].
#[must_use]
pub fn fit_features(features: &[Feature], current: &ViewportState) -> Option<ViewportState> {
    fit_features_with(features, current, config::standard())
}

/// Centers the viewport on `features`, keeping the current pitch and
/// bearing.
///
/// With a bounding box, the camera moves to the box center at the zoom
/// inferred from its extent. Without one, it moves to the first position
/// of the first feature at the fallback zoom. Returns `None` when neither
/// is available, in which case the viewport should be left unchanged.
#[must_use]
pub fn fit_features_with(
    features: &[Feature],
    current: &ViewportState,
    config: &ViewportConfig,
) -> Option<ViewportState> {
    if let Some(bbox) = compute_bounding_box(features) {
        let center = center_of(&bbox);
        let zoom = zoom_from_bounds_with(&bbox, config);
        log::debug!(
            "Fitting viewport to bbox {:?} at zoom {zoom}",
            <[f64; 4]>::from(bbox)
        );
        return Some(current.centered_on(center.x, center.y, f64::from(zoom)));
    }

    let (longitude, latitude) = features
        .first()
        .and_then(|feature| feature.geometry.as_ref())
        .and_then(|geometry| geometry.first_position())
        .filter(|(lng, lat)| lng.is_finite() && lat.is_finite())?;

    log::debug!("No bounding box; centering on first position {longitude},{latitude}");
    Some(current.centered_on(longitude, latitude, f64::from(config.fallback_zoom)))
}

pub(crate) fn center_of(bbox: &BoundingBox) -> geo::Coord<f64> {
    Rect::new(
        coord! { x: bbox.min_lng, y: bbox.min_lat },
        coord! { x: bbox.max_lng, y: bbox.max_lat },
    )
    .center()
}

#[cfg(test)]
mod tests {
    use geomap_geojson_models::{FeatureExt as _, Geometry, Value, point};

    use super::*;

    fn initial() -> ViewportState {
        config::standard().initial_viewport()
    }

    #[test]
    fn fits_single_point() {
        let features = vec![Feature::from_geometry(Some(point(10.0, 20.0)))];
        let viewport = fit_features(&features, &initial()).unwrap();
        assert!((viewport.longitude - 10.0).abs() < f64::EPSILON);
        assert!((viewport.latitude - 20.0).abs() < f64::EPSILON);
        assert!((viewport.zoom - 14.0).abs() < f64::EPSILON);
    }

    #[test]
    fn centers_on_box_midpoint() {
        let features = vec![
            Feature::from_geometry(Some(point(-10.0, 0.0))),
            Feature::from_geometry(Some(point(10.0, 4.0))),
        ];
        let viewport = fit_features(&features, &initial()).unwrap();
        assert!(viewport.longitude.abs() < f64::EPSILON);
        assert!((viewport.latitude - 2.0).abs() < f64::EPSILON);
        assert!((viewport.zoom - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn keeps_pitch_and_bearing() {
        let current = ViewportState {
            pitch: 30.0,
            bearing: 15.0,
            ..initial()
        };
        let features = vec![Feature::from_geometry(Some(point(1.0, 1.0)))];
        let viewport = fit_features(&features, &current).unwrap();
        assert!((viewport.pitch - 30.0).abs() < f64::EPSILON);
        assert!((viewport.bearing - 15.0).abs() < f64::EPSILON);
    }

    #[test]
    fn leaves_viewport_unchanged_without_positions() {
        assert!(fit_features(&[], &initial()).is_none());
        assert!(fit_features(&[Feature::from_geometry(None)], &initial()).is_none());

        let empty_collection =
            Feature::from_geometry(Some(Geometry::new(Value::GeometryCollection(vec![]))));
        assert!(fit_features(&[empty_collection], &initial()).is_none());
    }

    #[test]
    fn ignores_features_without_geometry() {
        let features = vec![
            Feature::from_geometry(None),
            Feature::from_geometry(Some(point(5.0, 6.0))),
        ];
        let viewport = fit_features(&features, &initial()).unwrap();
        assert!((viewport.longitude - 5.0).abs() < f64::EPSILON);
        assert!((viewport.latitude - 6.0).abs() < f64::EPSILON);
    }

    #[test]
    fn non_finite_positions_never_reach_the_viewport() {
        let features = vec![Feature::from_geometry(Some(Geometry::new(Value::MultiPoint(
            vec![vec![f64::INFINITY, 1.0]],
        ))))];
        assert!(fit_features(&features, &initial()).is_none());

        let features = vec![Feature::from_geometry(Some(Geometry::new(Value::LineString(
            vec![vec![f64::NAN, 0.0], vec![7.0, 8.0]],
        ))))];
        let viewport = fit_features(&features, &initial()).unwrap();
        assert!((viewport.longitude - 7.0).abs() < f64::EPSILON);
        assert!((viewport.latitude - 8.0).abs() < f64::EPSILON);
    }

    #[test]
    fn custom_config_changes_zoom() {
        let config = ViewportConfig {
            zoom_rules: vec![],
            default_zoom: 17,
            ..config::standard().clone()
        };
        let features = vec![
            Feature::from_geometry(Some(point(0.0, 0.0))),
            Feature::from_geometry(Some(point(40.0, 40.0))),
        ];
        let viewport = fit_features_with(&features, &initial(), &config).unwrap();
        assert!((viewport.zoom - 17.0).abs() < f64::EPSILON);
        assert!((viewport.longitude - 20.0).abs() < f64::EPSILON);
    }
}
