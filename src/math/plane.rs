//! Oriented planes in Hessian normal form.

use crate::float_types::{EPSILON, Real};
use nalgebra::{Point3, Vector3};

/// A plane `n · p = w` with (normally) unit normal `n`.
///
/// The signed distance of a point is positive on the side the normal
/// points to ("front" or "outside").
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Unit normal vector of the plane
    pub normal: Vector3<Real>,
    /// Distance from origin along normal (plane equation: n·p = w)
    pub w: Real,
}

impl Default for Plane {
    fn default() -> Self {
        Plane {
            normal: Vector3::z(),
            w: 0.0,
        }
    }
}

impl Plane {
    /// Create a new plane from normal vector and distance.
    ///
    /// The normal is normalized unless it is (nearly) zero, in which case it is
    /// stored verbatim and every distance query degenerates to `-w`.
    pub fn from_normal(normal: Vector3<Real>, w: Real) -> Self {
        let len = normal.norm();
        if len < EPSILON {
            return Plane { normal, w };
        }
        Plane {
            normal: normal / len,
            w: w / len,
        }
    }

    /// Plane through `point` with the given normal.
    pub fn from_normal_and_point(normal: Vector3<Real>, point: &Point3<Real>) -> Self {
        let n = if normal.norm_squared() < EPSILON * EPSILON {
            normal
        } else {
            normal.normalize()
        };
        Plane {
            normal: n,
            w: n.dot(&point.coords),
        }
    }

    /// Create a plane from three points.
    /// The normal direction follows the right-hand rule: (p2-p1) × (p3-p1)
    pub fn from_points(p1: &Point3<Real>, p2: &Point3<Real>, p3: &Point3<Real>) -> Self {
        let normal = (p2 - p1).cross(&(p3 - p1));

        if normal.norm_squared() < Real::EPSILON * Real::EPSILON {
            // Degenerate triangle, return default plane
            return Plane::default();
        }

        let normal = normal.normalize();
        let w = normal.dot(&p1.coords);
        Plane { normal, w }
    }

    #[inline]
    pub const fn normal(&self) -> Vector3<Real> {
        self.normal
    }

    #[inline]
    pub const fn offset(&self) -> Real {
        self.w
    }

    /// Signed distance from `point` to the plane, positive in front.
    #[inline]
    pub fn signed_distance(&self, point: &Point3<Real>) -> Real {
        self.normal.dot(&point.coords) - self.w
    }

    /// Orthogonal projection of `point` onto the plane.
    pub fn project_point(&self, point: &Point3<Real>) -> Point3<Real> {
        point - self.normal * self.signed_distance(point)
    }

    /// Reverse the orientation of the plane.
    pub fn flip(&mut self) {
        self.normal = -self.normal;
        self.w = -self.w;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_points_follows_right_hand_rule() {
        let plane = Plane::from_points(
            &Point3::new(0.0, 0.0, 1.0),
            &Point3::new(1.0, 0.0, 1.0),
            &Point3::new(0.0, 1.0, 1.0),
        );
        assert_eq!(plane.normal(), Vector3::z());
        assert_eq!(plane.offset(), 1.0);
        assert_eq!(plane.signed_distance(&Point3::new(3.0, -2.0, 4.0)), 3.0);
    }

    #[test]
    fn degenerate_points_give_default_plane() {
        let p = Point3::new(1.0, 1.0, 1.0);
        assert_eq!(Plane::from_points(&p, &p, &p), Plane::default());
    }

    #[test]
    fn from_normal_rescales_offset() {
        let plane = Plane::from_normal(Vector3::new(0.0, 2.0, 0.0), 4.0);
        assert_eq!(plane.normal(), Vector3::y());
        assert_eq!(plane.offset(), 2.0);
        let projected = plane.project_point(&Point3::new(1.0, 5.0, 1.0));
        assert_eq!(projected, Point3::new(1.0, 2.0, 1.0));
    }
}
