#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! `GeoJSON` model types and helpers shared by the normalizer, the viewport
//! calculator, the grid table, and the exporter.
//!
//! The object model is the [`geojson`] crate's. A [`FeatureCollection`] is
//! created fresh on every load or draw event and is never mutated in place
//! afterwards; consumers replace it wholesale. Features produced here
//! always carry `properties: Some(..)`.
//!
//! A feature whose `geometry` member could not be parsed keeps that member
//! verbatim in `foreign_members` under [`RAW_GEOMETRY_MEMBER`], with
//! `geometry: None`. Serializing through [`serde_json::to_value`] writes it
//! back in place of the `null` geometry.

use std::convert::Infallible;
use std::ops::ControlFlow;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

pub use geojson::{
    Feature, FeatureCollection, Geometry, JsonObject, JsonValue, Position, Value, feature::Id,
};

/// Open-ended feature property mapping. Key order follows the input.
pub type Properties = JsonObject;

/// Foreign member holding a `geometry` that did not parse as `GeoJSON`.
pub const RAW_GEOMETRY_MEMBER: &str = "geometry";

/// The `type` discriminator of a `GeoJSON` geometry object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
pub enum GeometryKind {
    /// A single position.
    Point,
    /// A sequence of positions.
    LineString,
    /// A sequence of linear rings.
    Polygon,
    /// A sequence of positions, each a separate point.
    MultiPoint,
    /// A sequence of line strings.
    MultiLineString,
    /// A sequence of polygons.
    MultiPolygon,
    /// A heterogeneous list of geometries with no coordinates of its own.
    GeometryCollection,
}

impl GeometryKind {
    /// The kind of a parsed geometry value.
    #[must_use]
    pub const fn of(value: &Value) -> Self {
        match value {
            Value::Point(_) => Self::Point,
            Value::LineString(_) => Self::LineString,
            Value::Polygon(_) => Self::Polygon,
            Value::MultiPoint(_) => Self::MultiPoint,
            Value::MultiLineString(_) => Self::MultiLineString,
            Value::MultiPolygon(_) => Self::MultiPolygon,
            Value::GeometryCollection(_) => Self::GeometryCollection,
        }
    }

    /// Whether geometries of this kind carry a `coordinates` member.
    ///
    /// Only [`GeometryKind::GeometryCollection`] does not; it carries
    /// `geometries` instead.
    #[must_use]
    pub const fn has_coordinates(self) -> bool {
        !matches!(self, Self::GeometryCollection)
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Point,
            Self::LineString,
            Self::Polygon,
            Self::MultiPoint,
            Self::MultiLineString,
            Self::MultiPolygon,
            Self::GeometryCollection,
        ]
    }
}

/// Position traversal over a geometry's coordinate payload.
///
/// `GeometryCollection` has no coordinate payload of its own and visits
/// nothing.
pub trait GeometryExt {
    /// The geometry kind.
    fn kind(&self) -> GeometryKind;

    /// Visits every position in document order, stopping early when
    /// `visit` breaks.
    fn try_for_each_position<B>(
        &self,
        visit: &mut impl FnMut(&[f64]) -> ControlFlow<B>,
    ) -> ControlFlow<B>;

    /// Visits every position in document order.
    fn for_each_position(&self, mut visit: impl FnMut(&[f64])) {
        let flow = self.try_for_each_position(&mut |position: &[f64]| {
            visit(position);
            ControlFlow::<Infallible>::Continue(())
        });
        match flow {
            ControlFlow::Continue(()) => {}
            ControlFlow::Break(never) => match never {},
        }
    }

    /// The first position with at least a longitude and a latitude.
    fn first_position(&self) -> Option<(f64, f64)> {
        match self.try_for_each_position(&mut |position: &[f64]| match position {
            [lng, lat, ..] => ControlFlow::Break((*lng, *lat)),
            _ => ControlFlow::Continue(()),
        }) {
            ControlFlow::Break(found) => Some(found),
            ControlFlow::Continue(()) => None,
        }
    }
}

impl GeometryExt for Value {
    fn kind(&self) -> GeometryKind {
        GeometryKind::of(self)
    }

    fn try_for_each_position<B>(
        &self,
        visit: &mut impl FnMut(&[f64]) -> ControlFlow<B>,
    ) -> ControlFlow<B> {
        match self {
            Self::Point(position) => visit(position.as_slice()),
            Self::LineString(positions) | Self::MultiPoint(positions) => positions
                .iter()
                .try_for_each(|position| visit(position.as_slice())),
            Self::Polygon(rings) | Self::MultiLineString(rings) => rings
                .iter()
                .flatten()
                .try_for_each(|position| visit(position.as_slice())),
            Self::MultiPolygon(polygons) => polygons
                .iter()
                .flatten()
                .flatten()
                .try_for_each(|position| visit(position.as_slice())),
            Self::GeometryCollection(_) => ControlFlow::Continue(()),
        }
    }
}

impl GeometryExt for Geometry {
    fn kind(&self) -> GeometryKind {
        self.value.kind()
    }

    fn try_for_each_position<B>(
        &self,
        visit: &mut impl FnMut(&[f64]) -> ControlFlow<B>,
    ) -> ControlFlow<B> {
        self.value.try_for_each_position(visit)
    }
}

/// Creates a point geometry at `[longitude, latitude]`.
#[must_use]
pub fn point(longitude: f64, latitude: f64) -> Geometry {
    Geometry::new(Value::Point(vec![longitude, latitude]))
}

/// Construction and geometry inspection for features.
pub trait FeatureExt: Sized {
    /// A feature with the given geometry and empty properties.
    fn from_geometry(geometry: Option<Geometry>) -> Self;

    /// Replaces the property mapping.
    #[must_use]
    fn with_properties(self, properties: Properties) -> Self;

    /// Kind of the parsed geometry, if any.
    fn geometry_kind(&self) -> Option<GeometryKind>;

    /// The `geometry` member kept verbatim because it did not parse.
    fn raw_geometry(&self) -> Option<&JsonValue>;

    /// The `type` of the parsed geometry, or of the raw one when it names a
    /// type.
    fn geometry_type_name(&self) -> Option<&str>;
}

impl FeatureExt for Feature {
    fn from_geometry(geometry: Option<Geometry>) -> Self {
        Self {
            geometry,
            properties: Some(Properties::new()),
            ..Self::default()
        }
    }

    fn with_properties(mut self, properties: Properties) -> Self {
        self.properties = Some(properties);
        self
    }

    fn geometry_kind(&self) -> Option<GeometryKind> {
        self.geometry.as_ref().map(GeometryExt::kind)
    }

    fn raw_geometry(&self) -> Option<&JsonValue> {
        if self.geometry.is_some() {
            return None;
        }
        self.foreign_members
            .as_ref()
            .and_then(|members| members.get(RAW_GEOMETRY_MEMBER))
    }

    fn geometry_type_name(&self) -> Option<&str> {
        match &self.geometry {
            Some(geometry) => Some(geometry.value.type_name()),
            None => self
                .raw_geometry()
                .and_then(|raw| raw.get("type"))
                .and_then(JsonValue::as_str),
        }
    }
}

/// Construction helpers for feature collections.
pub trait FeatureCollectionExt {
    /// A collection holding `features`, with no `bbox` or foreign members.
    fn from_features(features: Vec<Feature>) -> Self;

    /// The empty collection returned for unconvertible input.
    fn empty() -> Self;

    /// Concatenates drawn and loaded collections, drawn features first.
    ///
    /// The result is a fresh collection with no `bbox` or foreign members.
    fn merged(drawn: &Self, loaded: &Self) -> Self;
}

impl FeatureCollectionExt for FeatureCollection {
    fn from_features(features: Vec<Feature>) -> Self {
        Self {
            bbox: None,
            features,
            foreign_members: None,
        }
    }

    fn empty() -> Self {
        Self::from_features(Vec::new())
    }

    fn merged(drawn: &Self, loaded: &Self) -> Self {
        Self::from_features(
            drawn
                .features
                .iter()
                .chain(&loaded.features)
                .cloned()
                .collect(),
        )
    }
}

/// Minimal axis-aligned rectangle in longitude/latitude.
///
/// Serialized as `[minLongitude, minLatitude, maxLongitude, maxLatitude]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct BoundingBox {
    /// Western edge.
    pub min_lng: f64,
    /// Southern edge.
    pub min_lat: f64,
    /// Eastern edge.
    pub max_lng: f64,
    /// Northern edge.
    pub max_lat: f64,
}

impl BoundingBox {
    /// Creates a box from its four edges.
    #[must_use]
    pub const fn new(min_lng: f64, min_lat: f64, max_lng: f64, max_lat: f64) -> Self {
        Self {
            min_lng,
            min_lat,
            max_lng,
            max_lat,
        }
    }

    /// Longitude span.
    #[must_use]
    pub fn lng_span(&self) -> f64 {
        (self.max_lng - self.min_lng).abs()
    }

    /// Latitude span.
    #[must_use]
    pub fn lat_span(&self) -> f64 {
        (self.max_lat - self.min_lat).abs()
    }

    /// The larger of the two axis spans.
    #[must_use]
    pub fn max_span(&self) -> f64 {
        self.lat_span().max(self.lng_span())
    }
}

impl From<[f64; 4]> for BoundingBox {
    fn from([min_lng, min_lat, max_lng, max_lat]: [f64; 4]) -> Self {
        Self::new(min_lng, min_lat, max_lng, max_lat)
    }
}

impl From<BoundingBox> for [f64; 4] {
    fn from(bbox: BoundingBox) -> Self {
        [bbox.min_lng, bbox.min_lat, bbox.max_lng, bbox.max_lat]
    }
}
