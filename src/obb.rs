//! Oriented bounding boxes (OBB) and the box/box separating axis test.

use crate::convex_hull::ConvexHull;
use crate::float_types::{EPSILON, Real};
use crate::math::{BoundingBox, BoundingSphere, Plane, eigen::symmetric_eigen};
use crate::polyhedron::Polyhedron;
use nalgebra::{Matrix3, Matrix4, Point3, Vector3};

/// A box with arbitrary orientation.
///
/// The columns of `rotation` are the box's local x/y/z axes in world space and
/// must stay mutually orthogonal unit vectors. `half_sizes` are measured along
/// those local axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obb {
    pub center: Point3<Real>,
    pub half_sizes: Vector3<Real>,
    pub rotation: Matrix3<Real>,
}

impl Default for Obb {
    fn default() -> Self {
        Self {
            center: Point3::origin(),
            half_sizes: Vector3::zeros(),
            rotation: Matrix3::identity(),
        }
    }
}

impl Obb {
    pub const fn new(
        center: Point3<Real>,
        half_sizes: Vector3<Real>,
        rotation: Matrix3<Real>,
    ) -> Self {
        Self {
            center,
            half_sizes,
            rotation,
        }
    }

    /// An axis-aligned OBB covering `bb` exactly.
    pub fn from_aabb(bb: &BoundingBox) -> Self {
        Self {
            center: bb.center(),
            half_sizes: bb.half_sizes(),
            rotation: Matrix3::identity(),
        }
    }

    /// Local axis `i` (0 = x, 1 = y, 2 = z) in world space.
    #[inline]
    pub fn axis(&self, i: usize) -> Vector3<Real> {
        self.rotation.column(i).into_owned()
    }

    #[inline]
    pub fn size(&self) -> Vector3<Real> {
        self.half_sizes * 2.0
    }

    pub fn corners(&self) -> [Point3<Real>; 8] {
        let ex = self.axis(0) * self.half_sizes.x;
        let ey = self.axis(1) * self.half_sizes.y;
        let ez = self.axis(2) * self.half_sizes.z;
        let c = self.center;
        [
            c - ex - ey - ez,
            c + ex - ey - ez,
            c + ex + ey - ez,
            c - ex + ey - ez,
            c - ex - ey + ez,
            c + ex - ey + ez,
            c + ex + ey + ez,
            c - ex + ey + ez,
        ]
    }

    /// The axis-aligned box enclosing all eight corners.
    pub fn to_aabb(&self) -> BoundingBox {
        BoundingBox::from_points(&self.corners())
    }

    /// Closest point of the box to `point`: project onto each local axis, clamp
    /// to the half size and walk from the center by the clamped amounts.
    pub fn clamp_point(&self, point: &Point3<Real>) -> Point3<Real> {
        let d = point - self.center;
        let mut result = self.center;
        for i in 0..3 {
            let axis = self.axis(i);
            let extent = self.half_sizes[i];
            result += axis * d.dot(&axis).clamp(-extent, extent);
        }
        result
    }

    pub fn contains_point(&self, point: &Point3<Real>) -> bool {
        let d = point - self.center;
        (0..3).all(|i| d.dot(&self.axis(i)).abs() <= self.half_sizes[i])
    }

    pub fn distance_to_point(&self, point: &Point3<Real>) -> Real {
        (self.clamp_point(point) - point).norm()
    }

    pub fn intersects_aabb(&self, bb: &BoundingBox) -> bool {
        self.intersects_obb(&Obb::from_aabb(bb))
    }

    pub fn intersects_sphere(&self, sphere: &BoundingSphere) -> bool {
        let closest = self.clamp_point(&sphere.center);
        (closest - sphere.center).norm_squared() <= sphere.radius * sphere.radius
    }

    /// 15-axis separating axis test with `ε = Real::EPSILON`.
    ///
    /// Boxes that merely touch (zero overlap along some axis) are reported as
    /// separated.
    pub fn intersects_obb(&self, other: &Obb) -> bool {
        self.intersects_obb_with_epsilon(other, Real::EPSILON)
    }

    /// 15-axis separating axis test: three face axes of each box and the nine
    /// cross products of one axis from each.
    ///
    /// `epsilon` is added to `|R[i][j]|` on the cross-product axes. When an
    /// edge pair is parallel the cross product vanishes and, without it, a
    /// zero-length axis would report a bogus separation.
    pub fn intersects_obb_with_epsilon(&self, other: &Obb, epsilon: Real) -> bool {
        let a = &self.half_sizes;
        let b = &other.half_sizes;

        // rotation expressing `other` in the frame of `self`
        let r = self.rotation.transpose() * other.rotation;
        let abs_r = r.abs();
        let abs_r_eps = abs_r.add_scalar(epsilon);

        // translation, in the frame of `self`
        let t = self.rotation.transpose() * (other.center - self.center);

        // axes of self
        for i in 0..3 {
            let ra = a[i];
            let rb = b[0] * abs_r[(i, 0)] + b[1] * abs_r[(i, 1)] + b[2] * abs_r[(i, 2)];
            if t[i].abs() >= ra + rb {
                return false;
            }
        }

        // axes of other
        for j in 0..3 {
            let ra = a[0] * abs_r[(0, j)] + a[1] * abs_r[(1, j)] + a[2] * abs_r[(2, j)];
            let rb = b[j];
            let distance = t[0] * r[(0, j)] + t[1] * r[(1, j)] + t[2] * r[(2, j)];
            if distance.abs() >= ra + rb {
                return false;
            }
        }

        // cross products A_i x B_j
        for i in 0..3 {
            let (i1, i2) = ((i + 1) % 3, (i + 2) % 3);
            for j in 0..3 {
                let (j1, j2) = ((j + 1) % 3, (j + 2) % 3);
                let ra = a[i1] * abs_r_eps[(i2, j)] + a[i2] * abs_r_eps[(i1, j)];
                let rb = b[j1] * abs_r_eps[(i, j2)] + b[j2] * abs_r_eps[(i, j1)];
                let distance = t[i2] * r[(i1, j)] - t[i1] * r[(i2, j)];
                if distance.abs() >= ra + rb {
                    return false;
                }
            }
        }

        // no separating axis found
        true
    }

    /// True if the plane passes through the box.
    pub fn intersects_plane(&self, plane: &Plane) -> bool {
        let n = plane.normal;
        let r = (0..3)
            .map(|i| self.half_sizes[i] * n.dot(&self.axis(i)).abs())
            .sum::<Real>();
        plane.signed_distance(&self.center).abs() <= r
    }

    /// Fit an OBB around a point cloud.
    ///
    /// The principal axes come from the eigenvectors of the area-weighted
    /// covariance of the convex hull's surface. Point sets without a
    /// three-dimensional hull fall back to the covariance of the raw points.
    pub fn from_points(points: &[Point3<Real>]) -> Self {
        if points.is_empty() {
            return Self::default();
        }

        let covariance = match ConvexHull::from_points(points) {
            Ok(hull) => hull_covariance(hull.polyhedron()),
            Err(err) => {
                log::warn!("OBB fit falls back to point covariance: {}", err);
                None
            },
        }
        .unwrap_or_else(|| point_covariance(points));

        let eigen = symmetric_eigen(&covariance);
        let mut axes = eigen.vectors;
        if axes.determinant() < 0.0 {
            let flipped = -axes.column(2).into_owned();
            axes.set_column(2, &flipped);
        }

        let mut mins = Vector3::repeat(Real::MAX);
        let mut maxs = Vector3::repeat(Real::MIN);
        for p in points {
            let local = axes.transpose() * p.coords;
            mins = mins.inf(&local);
            maxs = maxs.sup(&local);
        }

        let local_center = (mins + maxs) * 0.5;
        Self {
            center: Point3::from(axes * local_center),
            half_sizes: (maxs - mins) * 0.5,
            rotation: axes,
        }
    }

    /// Apply an affine transform.
    ///
    /// Rotation, translation and scale along the box axes are exact. Under
    /// shear the mapped box is a parallelepiped; the result is the box around
    /// it whose axes are the Gram-Schmidt orthonormalisation of the mapped axes.
    pub fn transform(&self, matrix: &Matrix4<Real>) -> Self {
        let linear: Matrix3<Real> = matrix.fixed_view::<3, 3>(0, 0).into_owned();
        let mapped = linear * self.rotation;

        let mut rotation = orthonormal_frame(&mapped);
        // a mirrored frame describes the same box; keep the rotation proper
        if rotation.determinant() < 0.0 {
            let flipped = -rotation.column(2).into_owned();
            rotation.set_column(2, &flipped);
        }

        // support of the parallelepiped with edge half-vectors mapped_j * h_j
        let half_sizes = Vector3::from_fn(|i, _| {
            let axis = rotation.column(i);
            (0..3)
                .map(|j| mapped.column(j).dot(&axis).abs() * self.half_sizes[j])
                .sum::<Real>()
        });

        Self {
            center: matrix.transform_point(&self.center),
            half_sizes,
            rotation,
        }
    }

    /// The box as a closed six-faced polyhedron, ready for the general SAT.
    pub fn to_polyhedron(&self) -> Polyhedron {
        Polyhedron::from_obb(self)
    }
}

/// Area-weighted covariance of the hull surface triangles, or `None` if the
/// hull has no measurable area.
fn hull_covariance(hull: &Polyhedron) -> Option<Matrix3<Real>> {
    let mut area_total = 0.0;
    let mut centroid_total = Vector3::zeros();
    let mut c = Matrix3::zeros();

    for face in 0..hull.faces().len() {
        let contour = hull.contour(face);
        for k in 1..contour.len().saturating_sub(1) {
            let p = contour[0].coords;
            let q = contour[k].coords;
            let r = contour[k + 1].coords;

            let area = (q - p).cross(&(r - p)).norm() * 0.5;
            let centroid = (p + q + r) / 3.0;
            area_total += area;
            centroid_total += centroid * area;

            let weight = area / 12.0;
            c += (centroid * centroid.transpose() * 9.0
                + p * p.transpose()
                + q * q.transpose()
                + r * r.transpose())
                * weight;
        }
    }

    if area_total < EPSILON {
        return None;
    }

    let mean = centroid_total / area_total;
    Some(c / area_total - mean * mean.transpose())
}

/// Orthonormalise the columns of `columns` in order. Columns that collapse
/// (zero scale, or dependent on earlier ones) are completed to a full frame.
fn orthonormal_frame(columns: &Matrix3<Real>) -> Matrix3<Real> {
    let mut axes: [Option<Vector3<Real>>; 3] = [None; 3];
    for i in 0..3 {
        let mut v = columns.column(i).into_owned();
        for axis in axes.iter().flatten() {
            v -= axis * axis.dot(&v);
        }
        axes[i] = v.try_normalize(EPSILON);
    }
    if axes.iter().all(Option::is_none) {
        return Matrix3::identity();
    }

    for m in 0..3 {
        if axes[m].is_some() {
            continue;
        }
        axes[m] = match (axes[(m + 1) % 3], axes[(m + 2) % 3]) {
            (Some(a), Some(b)) => Some(a.cross(&b)),
            (Some(a), None) | (None, Some(a)) => Some(any_perpendicular(&a)),
            (None, None) => None,
        };
    }

    let [x, y, z] = axes.map(|a| a.unwrap_or_else(Vector3::zeros));
    Matrix3::from_columns(&[x, y, z])
}

/// Some unit vector orthogonal to the unit vector `v`.
fn any_perpendicular(v: &Vector3<Real>) -> Vector3<Real> {
    let helper = if v.x.abs() < 0.9 { Vector3::x() } else { Vector3::y() };
    v.cross(&helper).normalize()
}

fn point_covariance(points: &[Point3<Real>]) -> Matrix3<Real> {
    let n = points.len() as Real;
    let mean = points.iter().fold(Vector3::zeros(), |acc, p| acc + p.coords) / n;
    points.iter().fold(Matrix3::zeros(), |acc, p| {
        let d = p.coords - mean;
        acc + d * d.transpose()
    }) / n
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Rotation3;

    fn unit_cube(center: Point3<Real>) -> Obb {
        Obb::new(center, Vector3::repeat(0.5), Matrix3::identity())
    }

    #[test]
    fn touching_cubes_are_separated() {
        let a = unit_cube(Point3::origin());
        assert!(!a.intersects_obb(&unit_cube(Point3::new(1.0, 0.0, 0.0))));
        assert!(a.intersects_obb(&unit_cube(Point3::new(0.9, 0.0, 0.0))));
    }

    #[test]
    fn rotated_box_reaches_further() {
        let a = unit_cube(Point3::origin());
        let rotation = Rotation3::from_axis_angle(&Vector3::z_axis(), std::f64::consts::FRAC_PI_4 as Real);
        let b = Obb::new(Point3::new(1.15, 0.0, 0.0), Vector3::repeat(0.5), *rotation.matrix());
        // the rotated corner reaches x = 1.15 - 0.707 < 0.5
        assert!(a.intersects_obb(&b));
        let c = Obb::new(Point3::new(1.3, 0.0, 0.0), Vector3::repeat(0.5), *rotation.matrix());
        assert!(!a.intersects_obb(&c));
    }

    #[test]
    fn clamp_and_contains_respect_rotation() {
        let rotation = Rotation3::from_axis_angle(&Vector3::z_axis(), std::f64::consts::FRAC_PI_2 as Real);
        let obb = Obb::new(Point3::origin(), Vector3::new(2.0, 1.0, 1.0), *rotation.matrix());
        // local x now points along world y
        assert!(obb.contains_point(&Point3::new(0.0, 1.5, 0.0)));
        assert!(!obb.contains_point(&Point3::new(1.5, 0.0, 0.0)));
        let clamped = obb.clamp_point(&Point3::new(3.0, 3.0, 0.0));
        assert_relative_eq!(clamped, Point3::new(1.0, 2.0, 0.0), epsilon = EPSILON);
    }

    #[test]
    fn plane_test() {
        let obb = unit_cube(Point3::new(0.0, 0.0, 2.0));
        assert!(obb.intersects_plane(&Plane::from_normal(Vector3::z(), 2.4)));
        assert!(!obb.intersects_plane(&Plane::from_normal(Vector3::z(), 2.6)));
    }

    #[test]
    fn transform_moves_and_rotates() {
        let obb = unit_cube(Point3::origin());
        let m = nalgebra::Isometry3::new(
            Vector3::new(1.0, 2.0, 3.0),
            Vector3::z() * (std::f64::consts::FRAC_PI_2 as Real),
        )
        .to_homogeneous();
        let moved = obb.transform(&m);
        assert_relative_eq!(moved.center, Point3::new(1.0, 2.0, 3.0), epsilon = EPSILON);
        assert_relative_eq!(moved.half_sizes, Vector3::repeat(0.5), epsilon = EPSILON);
        assert_relative_eq!(moved.axis(0), Vector3::y(), epsilon = EPSILON);
    }

    #[test]
    fn aabb_of_rotated_cube() {
        let rotation = Rotation3::from_axis_angle(&Vector3::z_axis(), std::f64::consts::FRAC_PI_4 as Real);
        let obb = Obb::new(Point3::new(1.0, 0.0, 0.0), Vector3::repeat(0.5), *rotation.matrix());
        let bb = obb.to_aabb();
        let reach = (0.5 as Real) * (2.0 as Real).sqrt();
        assert_relative_eq!(bb.mins, Point3::new(1.0 - reach, -reach, -0.5), epsilon = EPSILON);
        assert_relative_eq!(bb.maxs, Point3::new(1.0 + reach, reach, 0.5), epsilon = EPSILON);
        assert!(obb.corners().iter().all(|c| bb.contains_point(c)));
    }

    #[test]
    fn transform_with_nonuniform_scale() {
        let rotation = Rotation3::from_axis_angle(&Vector3::z_axis(), std::f64::consts::FRAC_PI_2 as Real);
        let obb = Obb::new(Point3::new(1.0, 1.0, 1.0), Vector3::repeat(0.5), *rotation.matrix());
        let scaled = obb.transform(&Matrix4::new_nonuniform_scaling(&Vector3::new(2.0, 3.0, 1.0)));

        assert_relative_eq!(scaled.center, Point3::new(2.0, 3.0, 1.0), epsilon = EPSILON);
        // local x lies along world y and picks up the y scale
        assert_relative_eq!(scaled.half_sizes, Vector3::new(1.5, 1.0, 0.5), epsilon = EPSILON);
        assert_relative_eq!(scaled.axis(0), Vector3::y(), epsilon = EPSILON);
        assert_relative_eq!(scaled.axis(1), -Vector3::x(), epsilon = EPSILON);
        assert!(scaled.rotation.determinant() > 0.0);
    }

    #[test]
    fn sheared_box_keeps_orthonormal_axes() {
        let obb = Obb::new(Point3::origin(), Vector3::repeat(0.5), Matrix3::identity());
        // x += y
        let shear = Matrix4::new(
            1.0, 1.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        );
        let sheared = obb.transform(&shear);

        let gram = sheared.rotation.transpose() * sheared.rotation;
        assert_relative_eq!(gram, Matrix3::identity(), epsilon = EPSILON);
        assert_relative_eq!(sheared.half_sizes, Vector3::new(1.0, 0.5, 0.5), epsilon = EPSILON);

        let padded = Obb::new(sheared.center, sheared.half_sizes.add_scalar(EPSILON), sheared.rotation);
        for corner in obb.corners() {
            assert!(padded.contains_point(&shear.transform_point(&corner)));
        }
    }

    #[test]
    fn collapsed_axis_is_completed() {
        let obb = Obb::new(Point3::origin(), Vector3::new(1.0, 2.0, 3.0), Matrix3::identity());
        let flat = obb.transform(&Matrix4::new_nonuniform_scaling(&Vector3::new(1.0, 0.0, 1.0)));
        let gram = flat.rotation.transpose() * flat.rotation;
        assert_relative_eq!(gram, Matrix3::identity(), epsilon = EPSILON);
        assert!(flat.rotation.determinant() > 0.0);
        assert_relative_eq!(flat.half_sizes, Vector3::new(1.0, 0.0, 3.0), epsilon = EPSILON);
    }
}
