//! Recursively applies the coordinate scaler across a geometry's nested
//! `coordinates` payload, preserving shape and order exactly.

use crate::error::{Result, ScaleError};
use crate::geojson::{Geometry, Position};
use crate::transform::Point;
use crate::transform::scaler::scale_position;

/// Returns a structurally identical geometry with every vertex scaled about
/// `origin`. GeometryCollection children are scaled recursively with the
/// same origin, so one shared centroid governs the whole tree.
///
/// Any scaler failure aborts the whole geometry and surfaces as
/// [`ScaleError::GeometryTransform`] carrying the vertex's index path;
/// no partial payload is ever returned.
pub fn scale_geometry(geometry: &Geometry, origin: Point, factor: f64) -> Result<Geometry> {
    match geometry {
        Geometry::Point { coordinates } => Ok(Geometry::Point {
            coordinates: scale_position(coordinates, origin, factor)
                .map_err(ScaleError::into_geometry_error)?,
        }),
        Geometry::MultiPoint { coordinates } => Ok(Geometry::MultiPoint {
            coordinates: scale_line(coordinates, origin, factor)?,
        }),
        Geometry::LineString { coordinates } => Ok(Geometry::LineString {
            coordinates: scale_line(coordinates, origin, factor)?,
        }),
        Geometry::MultiLineString { coordinates } => Ok(Geometry::MultiLineString {
            coordinates: scale_rings(coordinates, origin, factor)?,
        }),
        Geometry::Polygon { coordinates } => Ok(Geometry::Polygon {
            coordinates: scale_rings(coordinates, origin, factor)?,
        }),
        Geometry::MultiPolygon { coordinates } => Ok(Geometry::MultiPolygon {
            coordinates: coordinates
                .iter()
                .enumerate()
                .map(|(i, polygon)| scale_rings(polygon, origin, factor).map_err(|e| e.at_index(i)))
                .collect::<Result<_>>()?,
        }),
        Geometry::GeometryCollection { geometries } => Ok(Geometry::GeometryCollection {
            geometries: geometries
                .iter()
                .enumerate()
                .map(|(i, child)| scale_geometry(child, origin, factor).map_err(|e| e.at_index(i)))
                .collect::<Result<_>>()?,
        }),
    }
}

fn scale_line(line: &[Position], origin: Point, factor: f64) -> Result<Vec<Position>> {
    line.iter()
        .enumerate()
        .map(|(i, position)| scale_position(position, origin, factor).map_err(|e| e.at_index(i)))
        .collect()
}

fn scale_rings(rings: &[Vec<Position>], origin: Point, factor: f64) -> Result<Vec<Vec<Position>>> {
    rings
        .iter()
        .enumerate()
        .map(|(i, ring)| scale_line(ring, origin, factor).map_err(|e| e.at_index(i)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IndexPath;

    const ORIGIN: Point = Point(0.0, 0.0);

    #[test]
    fn preserves_shape_at_every_nesting_level() {
        let geometry = Geometry::MultiPolygon {
            coordinates: vec![
                vec![vec![vec![1.0, 1.0], vec![2.0, 1.0], vec![1.0, 1.0]]],
                vec![
                    vec![vec![4.0, 4.0], vec![5.0, 4.0], vec![4.0, 4.0]],
                    vec![vec![4.2, 4.2], vec![4.4, 4.2], vec![4.2, 4.2]],
                ],
            ],
        };
        let scaled = scale_geometry(&geometry, ORIGIN, 2.0).unwrap();
        let Geometry::MultiPolygon { coordinates } = scaled else {
            panic!("type tag must be preserved");
        };
        assert_eq!(coordinates.len(), 2);
        assert_eq!(coordinates[0].len(), 1);
        assert_eq!(coordinates[1].len(), 2);
        assert_eq!(coordinates[1][1].len(), 3);
        assert_eq!(coordinates[0][0][1], vec![4.0, 2.0]);
    }

    #[test]
    fn reports_the_exact_index_path_of_a_bad_vertex() {
        let geometry = Geometry::Polygon {
            coordinates: vec![
                vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![0.0, 0.0]],
                vec![vec![0.2, 0.2], vec![f64::NAN, 0.3], vec![0.2, 0.2]],
            ],
        };
        let err = scale_geometry(&geometry, ORIGIN, 1.1).unwrap_err();
        match err {
            ScaleError::GeometryTransform { path, source } => {
                assert_eq!(path, IndexPath(vec![1, 1]));
                assert!(matches!(
                    *source,
                    ScaleError::InvalidInput {
                        argument: "coordinate",
                        ..
                    }
                ));
            }
            other => panic!("expected GeometryTransform, got {other:?}"),
        }
    }

    #[test]
    fn geometry_collection_children_share_the_given_origin() {
        let geometry = Geometry::GeometryCollection {
            geometries: vec![
                Geometry::Point {
                    coordinates: vec![10.0, 0.0],
                },
                Geometry::LineString {
                    coordinates: vec![vec![0.0, 10.0], vec![0.0, 20.0]],
                },
            ],
        };
        let scaled = scale_geometry(&geometry, Point(0.0, 10.0), 0.5).unwrap();
        let Geometry::GeometryCollection { geometries } = scaled else {
            panic!("type tag must be preserved");
        };
        assert_eq!(
            geometries[0],
            Geometry::Point {
                coordinates: vec![5.0, 5.0]
            }
        );
        assert_eq!(
            geometries[1],
            Geometry::LineString {
                coordinates: vec![vec![0.0, 10.0], vec![0.0, 15.0]]
            }
        );
    }

    #[test]
    fn point_failures_are_wrapped_with_an_empty_path() {
        let geometry = Geometry::Point {
            coordinates: vec![0.5],
        };
        let err = scale_geometry(&geometry, ORIGIN, 1.05).unwrap_err();
        match err {
            ScaleError::GeometryTransform { path, .. } => assert_eq!(path, IndexPath(vec![])),
            other => panic!("expected GeometryTransform, got {other:?}"),
        }
    }
}
