//! Polygonal faces of a [`Polyhedron`](super::Polyhedron).

use crate::float_types::{EPSILON, Real};
use crate::math::Plane;
use crate::polyhedron::half_edge::EdgeId;
use nalgebra::{Point3, Vector3};

/// A closed loop of half-edges with its derived centroid and supporting plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Polygon {
    /// Any half-edge of the loop; traversal starts here.
    pub edge: EdgeId,
    pub centroid: Point3<Real>,
    pub plane: Plane,
}

/// Average of the contour points.
pub(crate) fn contour_centroid(contour: &[Point3<Real>]) -> Point3<Real> {
    if contour.is_empty() {
        return Point3::origin();
    }
    let sum = contour
        .iter()
        .fold(Vector3::zeros(), |acc, p| acc + p.coords);
    Point3::from(sum / contour.len() as Real)
}

/// Plane through the centroid with the Newell normal of the contour, so
/// slightly non-planar or partially collinear loops still get a stable normal.
pub(crate) fn contour_plane(contour: &[Point3<Real>], centroid: &Point3<Real>) -> Plane {
    let normal = contour
        .iter()
        .zip(contour.iter().cycle().skip(1))
        .fold(Vector3::zeros(), |acc, (curr, next)| {
            acc + Vector3::new(
                (curr.y - next.y) * (curr.z + next.z),
                (curr.z - next.z) * (curr.x + next.x),
                (curr.x - next.x) * (curr.y + next.y),
            )
        });
    if normal.norm_squared() < EPSILON * EPSILON {
        return Plane::default();
    }
    Plane::from_normal_and_point(normal, centroid)
}
