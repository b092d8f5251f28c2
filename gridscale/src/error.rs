//! Defines [`ScaleError`], representing all errors returned by this crate.

use std::fmt;

use thiserror::Error;

/// Crate-specific result type.
pub type Result<T> = std::result::Result<T, ScaleError>;

/// All the ways a scale-factor transform can fail.
///
/// Every variant carries enough context (which argument, which index, which
/// value) for a caller to render an actionable message. Nothing is retried
/// internally: the transform is deterministic, so the caller decides what to
/// do with a failure.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ScaleError {
    /// Malformed or missing argument (caller bug or corrupt upstream data).
    #[error("invalid {argument}: {reason}")]
    InvalidInput {
        argument: &'static str,
        reason: String,
    },

    /// The collection is well-formed but contains no finite coordinate pair
    /// to compute a centroid from.
    #[error("collection contains no valid coordinates")]
    NoValidCoordinates,

    /// The computed centroid is not finite. Unreachable as long as the
    /// accumulation guard skips non-finite vertices.
    #[error("computed centroid is not finite: ({x}, {y})")]
    InvalidResult { x: f64, y: f64 },

    /// A scaled axis value ended up non-finite. Only reachable with
    /// pathological extreme inputs.
    #[error("scaled {axis}-value is not finite: {value}")]
    NumericOverflow { axis: char, value: f64 },

    /// A coordinate-level failure, annotated with the index path of the
    /// offending vertex inside its geometry's `coordinates` payload.
    #[error("failed to scale geometry at coordinates{path}")]
    GeometryTransform {
        path: IndexPath,
        #[source]
        source: Box<ScaleError>,
    },

    /// A geometry-level failure, annotated with the feature's position in
    /// the collection.
    #[error("failed to scale feature at index {index}")]
    FeatureTransform {
        index: usize,
        #[source]
        source: Box<ScaleError>,
    },
}

impl ScaleError {
    /// Attaches a sequence index to the error while unwinding out of a
    /// nested coordinate payload. Prepends to an existing path so the final
    /// path reads outermost-first.
    pub(crate) fn at_index(self, index: usize) -> ScaleError {
        match self {
            ScaleError::GeometryTransform { mut path, source } => {
                path.0.insert(0, index);
                ScaleError::GeometryTransform { path, source }
            }
            other => ScaleError::GeometryTransform {
                path: IndexPath(vec![index]),
                source: Box::new(other),
            },
        }
    }

    /// Wraps a leaf scaler error without positional context (used for
    /// `Point` geometries, whose payload is a single coordinate).
    pub(crate) fn into_geometry_error(self) -> ScaleError {
        match self {
            err @ ScaleError::GeometryTransform { .. } => err,
            other => ScaleError::GeometryTransform {
                path: IndexPath::default(),
                source: Box::new(other),
            },
        }
    }
}

/// Position of a vertex inside a nested `coordinates` payload,
/// outermost index first. Displays as `[2][0][14]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexPath(pub Vec<usize>);

impl fmt::Display for IndexPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for index in &self.0 {
            write!(f, "[{index}]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_path_prepends_while_unwinding() {
        let leaf = ScaleError::NumericOverflow {
            axis: 'x',
            value: f64::INFINITY,
        };
        let err = leaf.at_index(14).at_index(0).at_index(2);
        match err {
            ScaleError::GeometryTransform { path, .. } => {
                assert_eq!(path, IndexPath(vec![2, 0, 14]));
                assert_eq!(path.to_string(), "[2][0][14]");
            }
            other => panic!("expected GeometryTransform, got {other:?}"),
        }
    }

    #[test]
    fn error_messages_carry_context() {
        let err = ScaleError::InvalidInput {
            argument: "factor",
            reason: "must be finite, got NaN".into(),
        };
        assert_eq!(err.to_string(), "invalid factor: must be finite, got NaN");
    }
}
