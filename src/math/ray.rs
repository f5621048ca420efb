//! Half-lines `origin + t * direction`, `t >= 0`, and their intersection queries.
//!
//! Every `intersect_*` query returns the first point hit in front of the origin, or
//! `None`. The `intersects_*` variants only answer whether there is a hit.

use crate::bvh::Bvh;
use crate::float_types::{Real, parry3d};
use crate::math::{aabb::BoundingBox, plane::Plane, sphere::BoundingSphere, triangle::Triangle};
use crate::obb::Obb;
use crate::polyhedron::Polyhedron;
use nalgebra::{Point3, Vector3};

/// A ray. The direction is **not** normalized automatically; all queries work
/// with any non-zero direction and report world-space points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Point3<Real>,
    pub direction: Vector3<Real>,
}

impl Ray {
    #[inline]
    pub const fn new(origin: Point3<Real>, direction: Vector3<Real>) -> Self {
        Self { origin, direction }
    }

    /// Point at parameter `t`.
    #[inline]
    pub fn at(&self, t: Real) -> Point3<Real> {
        self.origin + self.direction * t
    }

    /// Slab test. If the origin lies inside the box, the exit point is returned.
    pub fn intersect_box(&self, bb: &BoundingBox) -> Option<Point3<Real>> {
        let inv = Vector3::new(
            1.0 / self.direction.x,
            1.0 / self.direction.y,
            1.0 / self.direction.z,
        );

        let (mut tmin, mut tmax) = slab(self.origin.x, inv.x, bb.mins.x, bb.maxs.x);
        let (tymin, tymax) = slab(self.origin.y, inv.y, bb.mins.y, bb.maxs.y);

        if tmin > tymax || tymin > tmax {
            return None;
        }
        // NaN-aware: a NaN on either side is replaced by the other slab's value
        if tymin > tmin || tmin.is_nan() {
            tmin = tymin;
        }
        if tymax < tmax || tmax.is_nan() {
            tmax = tymax;
        }

        let (tzmin, tzmax) = slab(self.origin.z, inv.z, bb.mins.z, bb.maxs.z);
        if tmin > tzmax || tzmin > tmax {
            return None;
        }
        if tzmin > tmin || tmin.is_nan() {
            tmin = tzmin;
        }
        if tzmax < tmax || tmax.is_nan() {
            tmax = tzmax;
        }

        if tmax < 0.0 {
            return None;
        }
        Some(self.at(if tmin >= 0.0 { tmin } else { tmax }))
    }

    #[inline]
    pub fn intersects_box(&self, bb: &BoundingBox) -> bool {
        self.intersect_box(bb).is_some()
    }

    pub fn intersect_sphere(&self, sphere: &BoundingSphere) -> Option<Point3<Real>> {
        let oc = self.origin - sphere.center;
        let a = self.direction.norm_squared();
        if a == 0.0 {
            return None;
        }
        let b = oc.dot(&self.direction);
        let c = oc.norm_squared() - sphere.radius * sphere.radius;
        let discriminant = b * b - a * c;
        if discriminant < 0.0 {
            return None;
        }
        let root = discriminant.sqrt();
        let t0 = (-b - root) / a;
        let t1 = (-b + root) / a;
        if t1 < 0.0 {
            return None;
        }
        Some(self.at(if t0 < 0.0 { t1 } else { t0 }))
    }

    #[inline]
    pub fn intersects_sphere(&self, sphere: &BoundingSphere) -> bool {
        self.intersect_sphere(sphere).is_some()
    }

    /// A ray lying inside the plane reports its origin; a ray parallel to it
    /// reports nothing.
    pub fn intersect_plane(&self, plane: &Plane) -> Option<Point3<Real>> {
        let distance = plane.signed_distance(&self.origin);
        let denominator = plane.normal.dot(&self.direction);
        if denominator == 0.0 {
            return (distance == 0.0).then_some(self.origin);
        }
        let t = -distance / denominator;
        (t >= 0.0).then(|| self.at(t))
    }

    /// Ray/triangle test in the Möller–Trumbore family.
    ///
    /// A ray parallel to the triangle plane (zero denominator, which includes
    /// zero-area triangles) never hits. With `cull_back_faces`, hits on the side
    /// opposite the counter-clockwise normal are rejected.
    pub fn intersect_triangle(
        &self,
        triangle: &Triangle,
        cull_back_faces: bool,
    ) -> Option<Point3<Real>> {
        let edge1 = triangle.b - triangle.a;
        let edge2 = triangle.c - triangle.a;
        let normal = edge1.cross(&edge2);

        let mut ddn = self.direction.dot(&normal);
        let sign: Real;
        if ddn > 0.0 {
            if cull_back_faces {
                return None;
            }
            sign = 1.0;
        } else if ddn < 0.0 {
            sign = -1.0;
            ddn = -ddn;
        } else {
            return None;
        }

        let diff = self.origin - triangle.a;
        let ddqxe2 = sign * self.direction.dot(&diff.cross(&edge2));
        if ddqxe2 < 0.0 {
            return None;
        }
        let dde1xq = sign * self.direction.dot(&edge1.cross(&diff));
        if dde1xq < 0.0 {
            return None;
        }
        if ddqxe2 + dde1xq > ddn {
            return None;
        }
        let qdn = -sign * diff.dot(&normal);
        if qdn < 0.0 {
            return None;
        }
        Some(self.at(qdn / ddn))
    }

    /// Intersect with an oriented box by moving the ray into the box frame.
    pub fn intersect_obb(&self, obb: &Obb) -> Option<Point3<Real>> {
        let inverse = obb.rotation.transpose();
        let local = Ray::new(
            Point3::from(inverse * (self.origin - obb.center)),
            inverse * self.direction,
        );
        let local_box = BoundingBox::new(
            Point3::from(-obb.half_sizes),
            Point3::from(obb.half_sizes),
        );
        local
            .intersect_box(&local_box)
            .map(|p| obb.center + obb.rotation * p.coords)
    }

    #[inline]
    pub fn intersects_obb(&self, obb: &Obb) -> bool {
        self.intersect_obb(obb).is_some()
    }

    /// Clip the ray against every face plane of a convex polyhedron.
    pub fn intersect_convex_hull(&self, hull: &Polyhedron) -> Option<Point3<Real>> {
        let mut t_near = Real::NEG_INFINITY;
        let mut t_far = Real::INFINITY;

        for face in hull.faces() {
            let plane = &face.plane;
            let vn = plane.normal.dot(&self.direction);
            let vd = plane.signed_distance(&self.origin);

            if vn == 0.0 {
                // parallel to this face: outside means no hit at all
                if vd > 0.0 {
                    return None;
                }
                continue;
            }

            let t = -vd / vn;
            if vn > 0.0 {
                t_far = t_far.min(t);
            } else {
                t_near = t_near.max(t);
            }
            if t_near > t_far {
                return None;
            }
        }

        if t_far < 0.0 || hull.faces().is_empty() {
            return None;
        }
        Some(self.at(if t_near >= 0.0 { t_near } else { t_far }))
    }

    pub fn intersect_bvh(&self, bvh: &Bvh) -> Option<Point3<Real>> {
        bvh.intersect_ray(self)
    }

    pub fn intersects_bvh(&self, bvh: &Bvh) -> bool {
        bvh.intersects_ray(self)
    }
}

impl From<Ray> for parry3d::query::Ray {
    fn from(ray: Ray) -> Self {
        parry3d::query::Ray::new(ray.origin, ray.direction)
    }
}

impl From<parry3d::query::Ray> for Ray {
    fn from(ray: parry3d::query::Ray) -> Self {
        Ray::new(ray.origin, ray.dir)
    }
}

/// Entry/exit parameters of one slab, ordered so that `t0` is the entry.
#[inline]
fn slab(origin: Real, inv_dir: Real, min: Real, max: Real) -> (Real, Real) {
    if inv_dir >= 0.0 {
        ((min - origin) * inv_dir, (max - origin) * inv_dir)
    } else {
        ((max - origin) * inv_dir, (min - origin) * inv_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_triangle() -> Triangle {
        Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        )
    }

    #[test]
    fn triangle_front_hit() {
        let ray = Ray::new(Point3::new(0.25, 0.25, 1.0), -Vector3::z());
        let hit = ray.intersect_triangle(&unit_triangle(), true);
        assert_eq!(hit, Some(Point3::new(0.25, 0.25, 0.0)));
    }

    #[test]
    fn triangle_back_face_culling() {
        let ray = Ray::new(Point3::new(0.25, 0.25, -1.0), Vector3::z());
        assert!(ray.intersect_triangle(&unit_triangle(), true).is_none());
        assert_eq!(
            ray.intersect_triangle(&unit_triangle(), false),
            Some(Point3::new(0.25, 0.25, 0.0))
        );
    }

    #[test]
    fn triangle_parallel_ray_never_hits() {
        // Ray travelling inside the triangle plane
        let ray = Ray::new(Point3::new(-1.0, 0.25, 0.0), Vector3::x());
        assert!(ray.intersect_triangle(&unit_triangle(), false).is_none());
    }

    #[test]
    fn triangle_behind_origin() {
        let ray = Ray::new(Point3::new(0.25, 0.25, 1.0), Vector3::z());
        assert!(ray.intersect_triangle(&unit_triangle(), false).is_none());
    }

    #[test]
    fn box_entry_and_exit() {
        let bb = BoundingBox::new(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0));
        let outside = Ray::new(Point3::new(-5.0, 0.0, 0.0), Vector3::x());
        assert_eq!(outside.intersect_box(&bb), Some(Point3::new(-1.0, 0.0, 0.0)));

        let inside = Ray::new(Point3::origin(), Vector3::y());
        assert_eq!(inside.intersect_box(&bb), Some(Point3::new(0.0, 1.0, 0.0)));

        let away = Ray::new(Point3::new(-5.0, 0.0, 0.0), -Vector3::x());
        assert!(!away.intersects_box(&bb));

        let miss = Ray::new(Point3::new(-5.0, 2.0, 0.0), Vector3::x());
        assert!(!miss.intersects_box(&bb));
    }

    #[test]
    fn sphere_with_unnormalized_direction() {
        let sphere = BoundingSphere::new(Point3::new(0.0, 0.0, 5.0), 1.0);
        let ray = Ray::new(Point3::origin(), Vector3::new(0.0, 0.0, 10.0));
        let hit = ray.intersect_sphere(&sphere).unwrap();
        approx::assert_relative_eq!(hit, Point3::new(0.0, 0.0, 4.0));
    }

    #[test]
    fn plane_hit_and_parallel() {
        let plane = Plane::from_normal(Vector3::y(), 2.0);
        let ray = Ray::new(Point3::origin(), Vector3::new(1.0, 1.0, 0.0));
        assert_eq!(ray.intersect_plane(&plane), Some(Point3::new(2.0, 2.0, 0.0)));
        let parallel = Ray::new(Point3::origin(), Vector3::x());
        assert!(parallel.intersect_plane(&plane).is_none());
    }
}
