//! Scales a single position relative to an origin by a factor.

use crate::error::{Result, ScaleError};
use crate::geojson::Position;
use crate::transform::Point;

/// Returns a new position with `new = origin + (value - origin) * factor`
/// applied to x and y. Components beyond x/y (elevation, measures) are
/// copied verbatim: a grid factor corrects horizontal distances only.
///
/// Note that factor `1.0` is only bit-exact when short-circuited by the
/// caller; the subtract-and-re-add here may drift in the last ulp.
pub fn scale_position(position: &[f64], origin: Point, factor: f64) -> Result<Position> {
    if !factor.is_finite() {
        return Err(ScaleError::InvalidInput {
            argument: "factor",
            reason: format!("must be finite, got {factor}"),
        });
    }
    if !origin.0.is_finite() || !origin.1.is_finite() {
        return Err(ScaleError::InvalidInput {
            argument: "origin",
            reason: format!("must have finite components, got ({}, {})", origin.0, origin.1),
        });
    }
    let [x, y, rest @ ..] = position else {
        return Err(ScaleError::InvalidInput {
            argument: "coordinate",
            reason: format!("must have at least 2 components, got {}", position.len()),
        });
    };
    if !x.is_finite() || !y.is_finite() {
        return Err(ScaleError::InvalidInput {
            argument: "coordinate",
            reason: format!("components must be finite, got [{x}, {y}]"),
        });
    }

    let scaled_x = origin.0 + (x - origin.0) * factor;
    let scaled_y = origin.1 + (y - origin.1) * factor;

    if !scaled_x.is_finite() {
        return Err(ScaleError::NumericOverflow {
            axis: 'x',
            value: scaled_x,
        });
    }
    if !scaled_y.is_finite() {
        return Err(ScaleError::NumericOverflow {
            axis: 'y',
            value: scaled_y,
        });
    }

    let mut scaled = Vec::with_capacity(position.len());
    scaled.push(scaled_x);
    scaled.push(scaled_y);
    scaled.extend_from_slice(rest);
    Ok(scaled)
}
