//! Reduces a feature collection to a single origin point: the unweighted
//! arithmetic mean of every vertex across every feature's geometry.

use log::warn;

use crate::error::{Result, ScaleError};
use crate::geojson::{FeatureCollection, Geometry};
use crate::transform::Point;

/// Computes the centroid of all vertices in the collection.
///
/// Vertices with fewer than 2 components or a non-finite x or y are skipped
/// rather than aborting the walk; features without geometry contribute
/// nothing. Fails with [`ScaleError::NoValidCoordinates`] when not a single
/// vertex survives the walk.
pub fn collection_centroid(collection: &FeatureCollection) -> Result<Point> {
    if collection.features.is_empty() {
        return Err(ScaleError::InvalidInput {
            argument: "collection",
            reason: "features must be a non-empty sequence".into(),
        });
    }

    let mut acc = Accumulator::default();
    for feature in &collection.features {
        if let Some(geometry) = &feature.geometry {
            acc.visit(geometry);
        }
    }
    acc.finish()
}

#[derive(Default)]
struct Accumulator {
    sum_x: f64,
    sum_y: f64,
    count: usize,
    skipped: usize,
}

impl Accumulator {
    fn visit(&mut self, geometry: &Geometry) {
        match geometry {
            Geometry::Point { coordinates } => self.visit_position(coordinates),
            Geometry::MultiPoint { coordinates } | Geometry::LineString { coordinates } => {
                coordinates.iter().for_each(|p| self.visit_position(p));
            }
            Geometry::MultiLineString { coordinates } | Geometry::Polygon { coordinates } => {
                coordinates
                    .iter()
                    .flatten()
                    .for_each(|p| self.visit_position(p));
            }
            Geometry::MultiPolygon { coordinates } => {
                coordinates
                    .iter()
                    .flatten()
                    .flatten()
                    .for_each(|p| self.visit_position(p));
            }
            Geometry::GeometryCollection { geometries } => {
                geometries.iter().for_each(|g| self.visit(g));
            }
        }
    }

    fn visit_position(&mut self, position: &[f64]) {
        match position {
            [x, y, ..] if x.is_finite() && y.is_finite() => {
                self.sum_x += x;
                self.sum_y += y;
                self.count += 1;
            }
            _ => self.skipped += 1,
        }
    }

    fn finish(self) -> Result<Point> {
        if self.skipped > 0 {
            warn!(
                "centroid: skipped {} non-finite or malformed vertices out of {}",
                self.skipped,
                self.skipped + self.count
            );
        }
        if self.count == 0 {
            return Err(ScaleError::NoValidCoordinates);
        }
        let centroid = Point(self.sum_x / self.count as f64, self.sum_y / self.count as f64);
        if !centroid.0.is_finite() || !centroid.1.is_finite() {
            return Err(ScaleError::InvalidResult {
                x: centroid.0,
                y: centroid.1,
            });
        }
        Ok(centroid)
    }
}
