//! Axis-aligned bounding boxes.

use crate::float_types::{Real, parry3d::bounding_volume::Aabb};
use crate::math::{plane::Plane, sphere::BoundingSphere};
use nalgebra::{Point3, Vector3};

/// An axis-aligned box spanned by its `mins` and `maxs` corners.
///
/// `expand_*` only ever grows the box; [`BoundingBox::clear`] resets it to the
/// inverted "empty" box that any expansion will overwrite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub mins: Point3<Real>,
    pub maxs: Point3<Real>,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::empty()
    }
}

impl BoundingBox {
    #[inline]
    pub const fn new(mins: Point3<Real>, maxs: Point3<Real>) -> Self {
        Self { mins, maxs }
    }

    /// The inverted box: `mins = +MAX`, `maxs = -MAX`.
    pub fn empty() -> Self {
        Self {
            mins: Point3::new(Real::MAX, Real::MAX, Real::MAX),
            maxs: Point3::new(Real::MIN, Real::MIN, Real::MIN),
        }
    }

    /// A degenerate box collapsed onto the origin.
    pub fn zero() -> Self {
        Self {
            mins: Point3::origin(),
            maxs: Point3::origin(),
        }
    }

    /// Smallest box containing all `points`; the empty box if there are none.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3<Real>>) -> Self {
        let mut bb = Self::empty();
        for p in points {
            bb.expand_point(p);
        }
        bb
    }

    pub fn from_center_and_size(center: &Point3<Real>, size: &Vector3<Real>) -> Self {
        let half = size * 0.5;
        Self {
            mins: center - half,
            maxs: center + half,
        }
    }

    /// Reset to the empty box.
    pub fn clear(&mut self) {
        *self = Self::empty();
    }

    /// True if no point has been added since construction or [`clear`](Self::clear).
    pub fn is_empty(&self) -> bool {
        self.mins.x > self.maxs.x || self.mins.y > self.maxs.y || self.mins.z > self.maxs.z
    }

    pub fn expand_point(&mut self, point: &Point3<Real>) {
        self.mins = self.mins.inf(point);
        self.maxs = self.maxs.sup(point);
    }

    pub fn expand_box(&mut self, other: &BoundingBox) {
        self.mins = self.mins.inf(&other.mins);
        self.maxs = self.maxs.sup(&other.maxs);
    }

    #[inline]
    pub fn center(&self) -> Point3<Real> {
        nalgebra::center(&self.mins, &self.maxs)
    }

    #[inline]
    pub fn size(&self) -> Vector3<Real> {
        self.maxs - self.mins
    }

    #[inline]
    pub fn half_sizes(&self) -> Vector3<Real> {
        self.size() * 0.5
    }

    /// Inclusive containment test.
    pub fn contains_point(&self, point: &Point3<Real>) -> bool {
        point.x >= self.mins.x
            && point.x <= self.maxs.x
            && point.y >= self.mins.y
            && point.y <= self.maxs.y
            && point.z >= self.mins.z
            && point.z <= self.maxs.z
    }

    /// Inclusive overlap test; boxes that share only a face count as intersecting.
    #[inline]
    pub fn intersects_box(&self, other: &Self) -> bool {
        self.maxs.x >= other.mins.x
            && self.mins.x <= other.maxs.x
            && self.maxs.y >= other.mins.y
            && self.mins.y <= other.maxs.y
            && self.maxs.z >= other.mins.z
            && self.mins.z <= other.maxs.z
    }

    pub fn intersects_sphere(&self, sphere: &BoundingSphere) -> bool {
        let closest = self.clamp_point(&sphere.center);
        (closest - sphere.center).norm_squared() <= sphere.radius * sphere.radius
    }

    /// True if the plane passes through the box.
    pub fn intersects_plane(&self, plane: &Plane) -> bool {
        let center = self.center();
        let extents = self.maxs - center;
        let n = plane.normal;
        let r = extents.x * n.x.abs() + extents.y * n.y.abs() + extents.z * n.z.abs();
        plane.signed_distance(&center).abs() <= r
    }

    pub fn clamp_point(&self, point: &Point3<Real>) -> Point3<Real> {
        point.sup(&self.mins).inf(&self.maxs)
    }

    /// Euclidean distance from `point` to the box, zero inside.
    pub fn distance_to_point(&self, point: &Point3<Real>) -> Real {
        (self.clamp_point(point) - point).norm()
    }

    /// Sphere through the box corners.
    pub fn bounding_sphere(&self) -> BoundingSphere {
        BoundingSphere::new(self.center(), self.size().norm() * 0.5)
    }
}

impl From<BoundingBox> for Aabb {
    fn from(bb: BoundingBox) -> Self {
        Aabb::new(bb.mins, bb.maxs)
    }
}

impl From<Aabb> for BoundingBox {
    fn from(aabb: Aabb) -> Self {
        BoundingBox::new(aabb.mins, aabb.maxs)
    }
}

impl approx::AbsDiffEq for BoundingBox {
    type Epsilon = <Point3<Real> as approx::AbsDiffEq>::Epsilon;

    fn default_epsilon() -> Self::Epsilon {
        Point3::<Real>::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        approx::AbsDiffEq::abs_diff_eq(&self.mins, &other.mins, epsilon)
            && approx::AbsDiffEq::abs_diff_eq(&self.maxs, &other.maxs, epsilon)
    }
}

impl approx::RelativeEq for BoundingBox {
    fn default_max_relative() -> Self::Epsilon {
        Point3::<Real>::default_max_relative()
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        approx::RelativeEq::relative_eq(&self.mins, &other.mins, epsilon, max_relative)
            && approx::RelativeEq::relative_eq(&self.maxs, &other.maxs, epsilon, max_relative)
    }
}
