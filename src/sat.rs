//! Separating axis test for arbitrary convex polyhedra.
//!
//! Candidate axes are the face normals of both shapes plus the cross products
//! of edge pairs. Edge pairs are pruned with the Gauss map: only pairs whose
//! arcs cross on the unit sphere build a face of the Minkowski difference and
//! can therefore separate the shapes.

use crate::float_types::Real;
use crate::polyhedron::{EdgeId, Polyhedron};
use nalgebra::{Point3, Vector3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sat {
    /// Edge pairs with `|e1 x e2| < parallel_tolerance * |e1| * |e2|` are skipped.
    pub parallel_tolerance: Real,
}

impl Default for Sat {
    fn default() -> Self {
        Self { parallel_tolerance: 0.005 }
    }
}

impl Sat {
    /// True unless a separating axis exists. Touching shapes intersect.
    pub fn intersects(&self, a: &Polyhedron, b: &Polyhedron) -> bool {
        if a.faces().is_empty() || b.faces().is_empty() {
            return false;
        }
        !(self.separated_by_faces(a, b)
            || self.separated_by_faces(b, a)
            || self.separated_by_edges(a, b))
    }

    fn separated_by_faces(&self, a: &Polyhedron, b: &Polyhedron) -> bool {
        a.faces().iter().any(|face| {
            let support = support_point(b, &-face.plane.normal);
            face.plane.signed_distance(&support) > 0.0
        })
    }

    fn separated_by_edges(&self, a: &Polyhedron, b: &Polyhedron) -> bool {
        for &edge_a in a.edges() {
            let Some((na, nb)) = adjacent_normals(a, edge_a) else {
                continue;
            };
            for &edge_b in b.edges() {
                let Some((nc, nd)) = adjacent_normals(b, edge_b) else {
                    continue;
                };
                if !is_minkowski_face(&na, &nb, &-nc, &-nd) {
                    continue;
                }
                if let Some(distance) = self.edge_distance(a, edge_a, b, edge_b) {
                    if distance > 0.0 {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Signed gap between two edges along their common normal, oriented away
    /// from `a`'s centroid. `None` for near-parallel edges.
    fn edge_distance(
        &self,
        a: &Polyhedron,
        edge_a: EdgeId,
        b: &Polyhedron,
        edge_b: EdgeId,
    ) -> Option<Real> {
        let dir_a = a.direction(edge_a);
        let dir_b = b.direction(edge_b);
        let cross = dir_a.cross(&dir_b);
        if cross.norm() < self.parallel_tolerance * dir_a.norm() * dir_b.norm() {
            return None;
        }

        let point_a = a.head(edge_a);
        let point_b = b.head(edge_b);
        let mut normal = cross.normalize();
        if normal.dot(&(point_a - a.centroid())) < 0.0 {
            normal = -normal;
        }
        Some(normal.dot(&(point_b - point_a)))
    }
}

/// Vertex of `poly` farthest along `direction`.
fn support_point(poly: &Polyhedron, direction: &Vector3<Real>) -> Point3<Real> {
    poly.vertices()
        .iter()
        .copied()
        .max_by(|p, q| {
            p.coords
                .dot(direction)
                .total_cmp(&q.coords.dot(direction))
        })
        .unwrap_or_else(Point3::origin)
}

/// Normals of the two faces sharing an edge, or `None` on an open boundary.
fn adjacent_normals(poly: &Polyhedron, edge: EdgeId) -> Option<(Vector3<Real>, Vector3<Real>)> {
    let half_edge = poly.half_edge(edge);
    let twin = poly.half_edge(half_edge.twin?);
    Some((
        poly.faces()[half_edge.polygon].plane.normal,
        poly.faces()[twin.polygon].plane.normal,
    ))
}

/// Gauss-map test: arcs `a-b` and `c-d` intersect on the unit sphere.
/// `c` and `d` are expected to be negated already.
fn is_minkowski_face(
    a: &Vector3<Real>,
    b: &Vector3<Real>,
    c: &Vector3<Real>,
    d: &Vector3<Real>,
) -> bool {
    let bxa = b.cross(a);
    let dxc = d.cross(c);

    let cba = c.dot(&bxa);
    let dba = d.dot(&bxa);
    let adc = a.dot(&dxc);
    let bdc = b.dot(&dxc);

    cba * dba < 0.0 && adc * bdc < 0.0 && cba * bdc > 0.0
}
