//! Discrete zoom inference from a bounding box's extent.

use geomap_geojson_models::BoundingBox;
use geomap_viewport_models::ViewportConfig;

use crate::config;

/// Picks a zoom level for `bbox` using the standard zoom table.
///
/// The extent is the larger of the box's latitude and longitude spans.
#[must_use]
pub fn zoom_from_bounds(bbox: &BoundingBox) -> u8 {
    zoom_from_bounds_with(bbox, config::standard())
}

/// Picks a zoom level for `bbox` using the rules in `config`.
#[must_use]
pub fn zoom_from_bounds_with(bbox: &BoundingBox, config: &ViewportConfig) -> u8 {
    config.zoom_for_extent(bbox.max_span())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(extent: f64) -> BoundingBox {
        BoundingBox::new(0.0, 0.0, extent, extent)
    }

    #[test]
    fn follows_zoom_table() {
        let cases = [
            (45.0, 4),
            (12.0, 4),
            (7.0, 5),
            (4.0, 6),
            (2.0, 8),
            (0.7, 9),
            (0.2, 11),
            (0.07, 12),
            (0.02, 13),
            (0.005, 14),
            (0.0, 14),
        ];
        for (extent, zoom) in cases {
            assert_eq!(zoom_from_bounds(&square(extent)), zoom, "extent {extent}");
        }
    }

    #[test]
    fn thresholds_are_exclusive() {
        assert_eq!(zoom_from_bounds(&square(10.0)), 5);
        assert_eq!(zoom_from_bounds(&square(1.0)), 9);
        assert_eq!(zoom_from_bounds(&square(0.01)), 14);
    }

    #[test]
    fn uses_larger_span() {
        let wide = BoundingBox::new(-6.0, 0.0, 6.0, 0.02);
        assert_eq!(zoom_from_bounds(&wide), 4);

        let tall = BoundingBox::new(0.0, 0.0, 0.02, 2.0);
        assert_eq!(zoom_from_bounds(&tall), 8);
    }

    #[test]
    fn honors_custom_config() {
        let config = crate::config::from_toml_str(
            "world_zoom = 2\n\
             default_zoom = 18\n\
             fallback_zoom = 10\n\
             [[zoom_rules]]\n\
             min_extent = 1.0\n\
             zoom = 3\n",
        )
        .unwrap();
        assert_eq!(zoom_from_bounds_with(&square(2.0), &config), 3);
        assert_eq!(zoom_from_bounds_with(&square(0.5), &config), 18);
    }
}
