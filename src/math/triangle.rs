//! Triangles given by three corner points.

use crate::float_types::{EPSILON, Real};
use crate::math::{aabb::BoundingBox, plane::Plane};
use nalgebra::{Point3, Vector3};

/// A triangle with counter-clockwise winding `a → b → c` (front face).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub a: Point3<Real>,
    pub b: Point3<Real>,
    pub c: Point3<Real>,
}

impl Triangle {
    #[inline]
    pub const fn new(a: Point3<Real>, b: Point3<Real>, c: Point3<Real>) -> Self {
        Self { a, b, c }
    }

    /// Read a triangle from nine consecutive floats (`ax ay az bx by bz cx cy cz`).
    ///
    /// # Panics
    /// If `coords` holds fewer than nine values.
    pub fn from_slice(coords: &[Real]) -> Self {
        Self {
            a: Point3::new(coords[0], coords[1], coords[2]),
            b: Point3::new(coords[3], coords[4], coords[5]),
            c: Point3::new(coords[6], coords[7], coords[8]),
        }
    }

    /// `(b - a) × (c - a)`; its length is twice the area.
    #[inline]
    pub fn scaled_normal(&self) -> Vector3<Real> {
        (self.b - self.a).cross(&(self.c - self.a))
    }

    /// Unit normal, or `None` for a zero-area triangle.
    pub fn normal(&self) -> Option<Vector3<Real>> {
        let n = self.scaled_normal();
        let len = n.norm();
        (len > EPSILON).then(|| n / len)
    }

    pub fn area(&self) -> Real {
        self.scaled_normal().norm() * 0.5
    }

    pub fn centroid(&self) -> Point3<Real> {
        Point3::from((self.a.coords + self.b.coords + self.c.coords) / 3.0)
    }

    pub fn plane(&self) -> Plane {
        Plane::from_points(&self.a, &self.b, &self.c)
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points([&self.a, &self.b, &self.c])
    }
}
