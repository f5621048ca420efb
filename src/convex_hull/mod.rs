//! Convex hulls of point sets (Quickhull).

pub mod builder;

pub use builder::HullBuilder;

use crate::errors::ValidationError;
use crate::float_types::{Real, tolerance};
use crate::polyhedron::Polyhedron;
use nalgebra::Point3;

/// Build parameters of a [`ConvexHull`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HullConfig {
    /// Merge adjacent coplanar triangles into single polygons.
    pub merge_faces: bool,
    /// Distance a point must lie above a face to be outside of it. `None`
    /// scales with the input: `3 * Real::EPSILON * (max|x| + max|y| + max|z|)`.
    pub tolerance: Option<Real>,
}

impl Default for HullConfig {
    fn default() -> Self {
        Self {
            merge_faces: true,
            tolerance: None,
        }
    }
}

/// A closed convex polyhedron enclosing a point set.
#[derive(Debug, Clone)]
pub struct ConvexHull {
    pub(crate) polyhedron: Polyhedron,
}

impl ConvexHull {
    /// Hull of `points` with the default [`HullConfig`].
    ///
    /// Fails with fewer than four points, with non-finite coordinates, or when
    /// the points are collinear or coplanar.
    pub fn from_points(points: &[Point3<Real>]) -> Result<Self, ValidationError> {
        HullBuilder::new(points, HullConfig::default()).build()
    }

    pub fn from_points_with_config(
        points: &[Point3<Real>],
        config: HullConfig,
    ) -> Result<Self, ValidationError> {
        HullBuilder::new(points, config).build()
    }

    #[inline]
    pub const fn polyhedron(&self) -> &Polyhedron {
        &self.polyhedron
    }

    pub fn into_polyhedron(self) -> Polyhedron {
        self.polyhedron
    }

    /// True if `point` is inside or on the hull, within the global tolerance.
    pub fn contains_point(&self, point: &Point3<Real>) -> bool {
        let eps = tolerance();
        self.polyhedron
            .faces()
            .iter()
            .all(|face| face.plane.signed_distance(point) <= eps)
    }

    /// Enclosed volume (divergence theorem over fan-triangulated faces).
    pub fn volume(&self) -> Real {
        let poly = &self.polyhedron;
        let mut six_volume = 0.0;
        for face in 0..poly.faces().len() {
            let contour = poly.contour(face);
            for k in 1..contour.len().saturating_sub(1) {
                six_volume += contour[0]
                    .coords
                    .dot(&contour[k].coords.cross(&contour[k + 1].coords));
            }
        }
        six_volume / 6.0
    }

    /// Separating axis test against another hull.
    pub fn intersects(&self, other: &ConvexHull) -> bool {
        self.polyhedron.intersects(&other.polyhedron)
    }
}

impl From<ConvexHull> for Polyhedron {
    fn from(hull: ConvexHull) -> Self {
        hull.polyhedron
    }
}
