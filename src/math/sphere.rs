//! Bounding spheres.

use crate::float_types::Real;
use crate::math::{aabb::BoundingBox, plane::Plane};
use nalgebra::Point3;

/// A sphere given by center and radius. A negative radius marks the empty sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    pub center: Point3<Real>,
    pub radius: Real,
}

impl Default for BoundingSphere {
    fn default() -> Self {
        Self::empty()
    }
}

impl BoundingSphere {
    #[inline]
    pub const fn new(center: Point3<Real>, radius: Real) -> Self {
        Self { center, radius }
    }

    pub fn empty() -> Self {
        Self {
            center: Point3::origin(),
            radius: -1.0,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.radius < 0.0
    }

    pub fn clear(&mut self) {
        *self = Self::empty();
    }

    /// Sphere centered on the bounding box of `points`, just large enough to hold them all.
    pub fn from_points(points: &[Point3<Real>]) -> Self {
        if points.is_empty() {
            return Self::empty();
        }
        let center = BoundingBox::from_points(points).center();
        let radius_sq = points
            .iter()
            .map(|p| (p - center).norm_squared())
            .fold(0.0, Real::max);
        Self::new(center, radius_sq.sqrt())
    }

    /// Grow the sphere so that it contains `point` as well as everything it held before.
    pub fn expand_point(&mut self, point: &Point3<Real>) {
        if self.is_empty() {
            self.center = *point;
            self.radius = 0.0;
            return;
        }
        let offset = point - self.center;
        let dist = offset.norm();
        if dist <= self.radius {
            return;
        }
        let new_radius = (self.radius + dist) * 0.5;
        self.center += offset * ((new_radius - self.radius) / dist);
        self.radius = new_radius;
    }

    pub fn contains_point(&self, point: &Point3<Real>) -> bool {
        (point - self.center).norm_squared() <= self.radius * self.radius
    }

    pub fn intersects_sphere(&self, other: &BoundingSphere) -> bool {
        let r = self.radius + other.radius;
        (other.center - self.center).norm_squared() <= r * r
    }

    pub fn intersects_box(&self, bb: &BoundingBox) -> bool {
        bb.intersects_sphere(self)
    }

    pub fn intersects_plane(&self, plane: &Plane) -> bool {
        plane.signed_distance(&self.center).abs() <= self.radius
    }

    pub fn clamp_point(&self, point: &Point3<Real>) -> Point3<Real> {
        let offset = point - self.center;
        let dist_sq = offset.norm_squared();
        if dist_sq > self.radius * self.radius {
            self.center + offset * (self.radius / dist_sq.sqrt())
        } else {
            *point
        }
    }

    /// Distance from `point` to the sphere surface, negative inside.
    pub fn distance_to_point(&self, point: &Point3<Real>) -> Real {
        (point - self.center).norm() - self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::float_types::EPSILON;

    #[test]
    fn expand_keeps_previous_content() {
        let mut sphere = BoundingSphere::empty();
        sphere.expand_point(&Point3::new(1.0, 0.0, 0.0));
        assert_eq!(sphere.radius, 0.0);
        sphere.expand_point(&Point3::new(-1.0, 0.0, 0.0));
        assert_eq!(sphere.center, Point3::origin());
        assert_eq!(sphere.radius, 1.0);
        let before = sphere;
        sphere.expand_point(&Point3::new(0.0, 3.0, 0.0));
        assert!(sphere.radius >= before.radius);
        assert!(sphere.distance_to_point(&Point3::new(0.0, 3.0, 0.0)) < EPSILON);
        assert!(sphere.distance_to_point(&Point3::new(-1.0, 0.0, 0.0)) < EPSILON);
    }

    #[test]
    fn from_points_covers_input() {
        let points = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
        ];
        let sphere = BoundingSphere::from_points(&points);
        assert_eq!(sphere.center, Point3::new(1.0, 0.5, 0.0));
        for p in &points {
            assert!(sphere.distance_to_point(p) <= EPSILON);
        }
    }
}
