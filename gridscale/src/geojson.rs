//! Serde representation of the GeoJSON entities the transform operates on.
//!
//! Only the structure relevant to scaling is typed: `coordinates` payloads
//! and the feature/collection skeleton. Everything else (properties, ids,
//! bounding boxes, the `crs` tag) is carried as opaque JSON and copied
//! verbatim to the output.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single GeoJSON position: `[x, y]` or `[x, y, z, ...]`.
/// Components beyond x/y are never scaled (a grid factor is a horizontal
/// correction) and pass through untouched.
pub type Position = Vec<f64>;

/// GeoJSON geometry, tagged by its `type` member.
///
/// The nesting depth of the `coordinates` payload is fixed by the tag,
/// which gives the transform compile-time exhaustiveness instead of
/// runtime "is the first element a number" dispatch.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: Position },
    MultiPoint { coordinates: Vec<Position> },
    LineString { coordinates: Vec<Position> },
    MultiLineString { coordinates: Vec<Vec<Position>> },
    Polygon { coordinates: Vec<Vec<Position>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Position>>> },
    GeometryCollection { geometries: Vec<Geometry> },
}

impl Geometry {
    /// The GeoJSON `type` tag of this geometry.
    pub fn type_name(&self) -> &'static str {
        match self {
            Geometry::Point { .. } => "Point",
            Geometry::MultiPoint { .. } => "MultiPoint",
            Geometry::LineString { .. } => "LineString",
            Geometry::MultiLineString { .. } => "MultiLineString",
            Geometry::Polygon { .. } => "Polygon",
            Geometry::MultiPolygon { .. } => "MultiPolygon",
            Geometry::GeometryCollection { .. } => "GeometryCollection",
        }
    }
}

/// Fixed `"type"` members of the container objects, modeled as explicit
/// zero-sized fields. Serde's internal tagging cannot be combined with
/// `flatten`: the consumed tag is re-collected into the flattened map and
/// the member comes out twice on serialization.
macro_rules! geojson_type_tag {
    ($name:ident, $tag:literal) => {
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
        pub struct $name;

        impl Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str($tag)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(
                deserializer: D,
            ) -> Result<Self, D::Error> {
                let tag = String::deserialize(deserializer)?;
                if tag == $tag {
                    Ok($name)
                } else {
                    Err(serde::de::Error::invalid_value(
                        serde::de::Unexpected::Str(&tag),
                        &$tag,
                    ))
                }
            }
        }
    };
}

geojson_type_tag!(FeatureTag, "Feature");
geojson_type_tag!(FeatureCollectionTag, "FeatureCollection");

/// A GeoJSON feature: an optional geometry plus an opaque property bag.
///
/// A feature without geometry is valid; it passes through a transform
/// unscaled. Foreign members (`id`, `bbox`, ...) are preserved.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Feature {
    #[serde(rename = "type")]
    pub tag: FeatureTag,
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub properties: Option<Value>,
    #[serde(flatten)]
    pub foreign_members: Map<String, Value>,
}

/// An ordered collection of features, with optional pass-through metadata.
///
/// The `crs` tag, if present, is copied verbatim across a transform;
/// scaling never changes or interprets it.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub tag: FeatureCollectionTag,
    pub features: Vec<Feature>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crs: Option<Value>,
    #[serde(flatten)]
    pub foreign_members: Map<String, Value>,
}
