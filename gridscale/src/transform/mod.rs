//! The scale-factor transform: a centroid-relative uniform rescaling of an
//! entire [`FeatureCollection`].
//!
//! The same pure entry point serves both an interactive caller (instant
//! preview on every factor edit) and a batch caller (authoritative artifact
//! generation), so the two paths can never drift apart numerically.

use std::ops::RangeInclusive;

use crate::error::{Result, ScaleError};
use crate::geojson::{Feature, FeatureCollection, FeatureCollectionTag, FeatureTag};

pub mod centroid;
pub mod scaler;
pub mod walker;

/// The surveying-correction domain both front ends enforce at their
/// boundary. The transform itself only requires a finite factor > 0.
pub const SUPPORTED_FACTOR_RANGE: RangeInclusive<f64> = 0.9..=1.1;

/// Origin of the scaling: the unweighted centroid of every vertex in the
/// collection. Computed once per transform invocation, never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point(pub f64, pub f64);

/// Scales every feature's geometry about the collection's centroid and
/// returns a new collection. The input is never mutated.
///
/// A factor of exactly `1.0` is a true identity: the output is a clone of
/// the input, bit-identical in every coordinate, with no centroid work.
/// Per-feature failures abort the whole transform; there is no
/// partial-success mode.
pub fn apply_scale_factor(collection: &FeatureCollection, factor: f64) -> Result<FeatureCollection> {
    validate_factor(factor)?;
    if collection.features.is_empty() {
        return Err(ScaleError::InvalidInput {
            argument: "collection",
            reason: "features must be a non-empty sequence".into(),
        });
    }

    if factor == 1.0 {
        return Ok(collection.clone());
    }

    let origin = centroid::collection_centroid(collection)?;

    let features = collection
        .features
        .iter()
        .enumerate()
        .map(|(index, feature)| {
            transform_feature(feature, origin, factor).map_err(|source| {
                ScaleError::FeatureTransform {
                    index,
                    source: Box::new(source),
                }
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(FeatureCollection {
        tag: FeatureCollectionTag,
        features,
        crs: collection.crs.clone(),
        foreign_members: collection.foreign_members.clone(),
    })
}

/// A feature without geometry passes through unscaled, properties and
/// foreign members intact.
fn transform_feature(feature: &Feature, origin: Point, factor: f64) -> Result<Feature> {
    let geometry = match &feature.geometry {
        None => None,
        Some(geometry) => Some(walker::scale_geometry(geometry, origin, factor)?),
    };
    Ok(Feature {
        tag: FeatureTag,
        geometry,
        properties: feature.properties.clone(),
        foreign_members: feature.foreign_members.clone(),
    })
}

fn validate_factor(factor: f64) -> Result<()> {
    if !factor.is_finite() {
        return Err(ScaleError::InvalidInput {
            argument: "factor",
            reason: format!("must be finite, got {factor}"),
        });
    }
    if factor <= 0.0 {
        return Err(ScaleError::InvalidInput {
            argument: "factor",
            reason: format!("must be greater than 0, got {factor}"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geojson::Geometry;
    use serde_json::Map;

    fn collection_of(features: Vec<Feature>) -> FeatureCollection {
        FeatureCollection {
            tag: FeatureCollectionTag,
            features,
            crs: None,
            foreign_members: Map::new(),
        }
    }

    fn point_feature(x: f64, y: f64) -> Feature {
        Feature {
            tag: FeatureTag,
            geometry: Some(Geometry::Point {
                coordinates: vec![x, y],
            }),
            properties: None,
            foreign_members: Map::new(),
        }
    }

    #[test]
    fn empty_collection_is_rejected_before_any_centroid_work() {
        let err = apply_scale_factor(&collection_of(vec![]), 1.2).unwrap_err();
        assert!(matches!(
            err,
            ScaleError::InvalidInput {
                argument: "collection",
                ..
            }
        ));
    }

    #[test]
    fn non_finite_and_non_positive_factors_are_rejected() {
        let collection = collection_of(vec![point_feature(0.0, 0.0)]);
        for factor in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY, 0.0, -1.0] {
            let err = apply_scale_factor(&collection, factor).unwrap_err();
            assert!(
                matches!(
                    err,
                    ScaleError::InvalidInput {
                        argument: "factor",
                        ..
                    }
                ),
                "factor {factor} should be rejected"
            );
        }
    }

    #[test]
    fn factor_one_returns_bit_identical_clone() {
        let collection = collection_of(vec![point_feature(0.1 + 0.2, -7.3)]);
        let scaled = apply_scale_factor(&collection, 1.0).unwrap();
        assert_eq!(scaled, collection);
    }

    #[test]
    fn feature_failures_carry_the_feature_index() {
        let collection = collection_of(vec![
            point_feature(0.0, 0.0),
            point_feature(f64::NAN, 5.0),
            point_feature(10.0, 0.0),
        ]);
        let err = apply_scale_factor(&collection, 1.05).unwrap_err();
        match err {
            ScaleError::FeatureTransform { index, .. } => assert_eq!(index, 1),
            other => panic!("expected FeatureTransform, got {other:?}"),
        }
    }
}
