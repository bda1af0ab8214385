use geo::ConvexHull;
use geo_types::{MultiPoint, Point};

use crate::error::{GeometryError, Result};

/// External collaborator building an ordered convex hull from an unordered
/// point set. Implementations must emit the vertices in a consistent
/// winding; the calipers sweep accepts either orientation as long as it is
/// consistent.
pub trait ConvexHullBuilder {
    fn hull(&self, points: &[[f32; 2]]) -> Result<Vec<[f32; 2]>>;
}

/// Hull builder backed by the geo crate's quick-hull implementation. The
/// returned ring is opened (no duplicated closing vertex) before it is
/// handed to the calipers.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeoHullBuilder;

impl ConvexHullBuilder for GeoHullBuilder {
    fn hull(&self, points: &[[f32; 2]]) -> Result<Vec<[f32; 2]>> {
        if points.len() < 3 {
            return Err(GeometryError::DegenerateHull { got: points.len() });
        }

        let multi_point: MultiPoint<f32> = points
            .iter()
            .map(|&[x, y]| Point::new(x, y))
            .collect::<Vec<_>>()
            .into();
        let polygon = multi_point.convex_hull();

        let mut hull: Vec<[f32; 2]> = polygon
            .exterior()
            .coords()
            .map(|c| [c.x, c.y])
            .collect();
        if hull.len() > 1 && hull.first() == hull.last() {
            hull.pop();
        }
        Ok(hull)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hull_drops_interior_points() {
        let points = [
            [0.0, 0.0],
            [4.0, 0.0],
            [4.0, 4.0],
            [0.0, 4.0],
            [2.0, 2.0],
            [1.0, 3.0],
        ];
        let hull = GeoHullBuilder.hull(&points).unwrap();
        assert_eq!(hull.len(), 4);
        for corner in [[0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [0.0, 4.0]] {
            assert!(hull.contains(&corner), "missing hull vertex {corner:?}");
        }
        assert!(!hull.contains(&[2.0, 2.0]));
    }

    #[test]
    fn hull_ring_is_open() {
        let hull = GeoHullBuilder
            .hull(&[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]])
            .unwrap();
        assert_eq!(hull.len(), 3);
        assert_ne!(hull.first(), hull.last());
    }

    #[test]
    fn too_few_points_is_an_error() {
        assert!(matches!(
            GeoHullBuilder.hull(&[[0.0, 0.0], [1.0, 1.0]]),
            Err(GeometryError::DegenerateHull { got: 2 })
        ));
    }
}
