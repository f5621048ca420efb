//! Half-edge (DCEL) polyhedra.
//!
//! A [`Polyhedron`] owns every half-edge, face and vertex in flat arenas and
//! links them by integer handle, so the cyclic `next`/`prev`/`twin` structure
//! needs no shared ownership. Faces are built once from vertex loops; the
//! unique edge list, the vertex list and the centroid are derived from them.

pub mod half_edge;
pub mod polygon;

pub use half_edge::{EdgeId, FaceId, HalfEdge, VertexId};
pub use polygon::Polygon;

use crate::errors::ValidationError;
use crate::float_types::{Real, tolerance};
use crate::math::BoundingBox;
use crate::obb::Obb;
use crate::sat::Sat;
use hashbrown::HashMap;
use nalgebra::{Point3, Vector3};
use polygon::{contour_centroid, contour_plane};

#[derive(Debug, Clone, Default)]
pub struct Polyhedron {
    half_edges: Vec<HalfEdge>,
    faces: Vec<Polygon>,
    vertices: Vec<Point3<Real>>,
    /// One representative half-edge per undirected edge.
    edges: Vec<EdgeId>,
    centroid: Point3<Real>,
}

/// Exact position key; `-0.0` and `0.0` map to the same vertex.
fn position_key(p: &Point3<Real>) -> [u64; 3] {
    [p.x, p.y, p.z].map(|c| ((c as f64) + 0.0).to_bits())
}

impl Polyhedron {
    /// Build from polygon contours given counter-clockwise as seen from
    /// outside. Contours with fewer than three points are skipped.
    ///
    /// Vertices at identical positions are shared, and every half-edge is
    /// twinned with the half-edge running the opposite way between the same
    /// two vertices, if there is one.
    pub fn from_polygons(contours: &[Vec<Point3<Real>>]) -> Self {
        let mut poly = Polyhedron::default();
        let mut vertex_ids: HashMap<[u64; 3], VertexId> = HashMap::new();

        for contour in contours.iter().filter(|c| c.len() >= 3) {
            let face_id = poly.faces.len();
            let base = poly.half_edges.len();
            let n = contour.len();

            for (k, point) in contour.iter().enumerate() {
                let vertex = *vertex_ids.entry(position_key(point)).or_insert_with(|| {
                    poly.vertices.push(*point);
                    poly.vertices.len() - 1
                });
                poly.half_edges.push(HalfEdge {
                    vertex,
                    next: base + (k + 1) % n,
                    prev: base + (k + n - 1) % n,
                    twin: None,
                    polygon: face_id,
                });
            }

            let centroid = contour_centroid(contour);
            poly.faces.push(Polygon {
                edge: base,
                centroid,
                plane: contour_plane(contour, &centroid),
            });
        }

        poly.link_twins();
        poly.compute_unique_edges();
        poly.compute_centroid();
        poly
    }

    /// The six faces of an axis-aligned box.
    pub fn from_aabb(bb: &BoundingBox) -> Self {
        Self::from_obb(&Obb::from_aabb(bb))
    }

    /// The six faces of an oriented box.
    pub fn from_obb(obb: &Obb) -> Self {
        let c = obb.corners();
        let quads: [[usize; 4]; 6] = [
            [0, 3, 2, 1], // -z
            [4, 5, 6, 7], // +z
            [0, 1, 5, 4], // -y
            [3, 7, 6, 2], // +y
            [0, 4, 7, 3], // -x
            [1, 2, 6, 5], // +x
        ];
        let contours: Vec<Vec<Point3<Real>>> = quads
            .iter()
            .map(|q| q.iter().map(|&i| c[i]).collect())
            .collect();
        Self::from_polygons(&contours)
    }

    fn link_twins(&mut self) {
        let mut by_endpoints: HashMap<(VertexId, VertexId), EdgeId> = HashMap::new();
        for id in 0..self.half_edges.len() {
            by_endpoints.insert((self.tail_id(id), self.half_edges[id].vertex), id);
        }
        for id in 0..self.half_edges.len() {
            let key = (self.half_edges[id].vertex, self.tail_id(id));
            self.half_edges[id].twin = by_endpoints.get(&key).copied();
        }
    }

    /// Recompute the unique edge list from the half-edges.
    pub fn compute_unique_edges(&mut self) {
        self.edges = (0..self.half_edges.len())
            .filter(|&id| match self.half_edges[id].twin {
                Some(twin) => id < twin,
                None => true,
            })
            .collect();
    }

    /// Recompute the centroid as the average of all vertices.
    pub fn compute_centroid(&mut self) {
        self.centroid = contour_centroid(&self.vertices);
    }

    #[inline]
    pub fn faces(&self) -> &[Polygon] {
        &self.faces
    }

    #[inline]
    pub fn half_edges(&self) -> &[HalfEdge] {
        &self.half_edges
    }

    #[inline]
    pub fn half_edge(&self, id: EdgeId) -> &HalfEdge {
        &self.half_edges[id]
    }

    #[inline]
    pub fn vertices(&self) -> &[Point3<Real>] {
        &self.vertices
    }

    /// One half-edge per undirected edge.
    #[inline]
    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }

    #[inline]
    pub const fn centroid(&self) -> Point3<Real> {
        self.centroid
    }

    #[inline]
    fn tail_id(&self, id: EdgeId) -> VertexId {
        self.half_edges[self.half_edges[id].prev].vertex
    }

    #[inline]
    pub fn head(&self, id: EdgeId) -> Point3<Real> {
        self.vertices[self.half_edges[id].vertex]
    }

    #[inline]
    pub fn tail(&self, id: EdgeId) -> Point3<Real> {
        self.vertices[self.tail_id(id)]
    }

    /// Unnormalized `head - tail`.
    #[inline]
    pub fn direction(&self, id: EdgeId) -> Vector3<Real> {
        self.head(id) - self.tail(id)
    }

    pub fn length(&self, id: EdgeId) -> Real {
        self.direction(id).norm()
    }

    /// Half-edges of a face in loop order, starting at the face's `edge`.
    pub fn face_edges(&self, face: FaceId) -> FaceEdges<'_> {
        let start = self.faces[face].edge;
        FaceEdges {
            polyhedron: self,
            start,
            current: Some(start),
        }
    }

    /// Vertex positions of a face in loop order.
    pub fn contour(&self, face: FaceId) -> Vec<Point3<Real>> {
        self.face_edges(face).map(|e| self.head(e)).collect()
    }

    /// True if `point` lies on the face plane and inside its loop, within `epsilon`.
    pub fn face_contains(&self, face: FaceId, point: &Point3<Real>, epsilon: Real) -> bool {
        let plane = &self.faces[face].plane;
        if plane.signed_distance(point).abs() > epsilon {
            return false;
        }
        self.face_edges(face).all(|e| {
            let tail = self.tail(e);
            self.direction(e).cross(&(point - tail)).dot(&plane.normal) >= -epsilon
        })
    }

    /// True if every corner of the face turns left (counter-clockwise) around the normal.
    pub fn face_is_convex(&self, face: FaceId) -> bool {
        let normal = self.faces[face].plane.normal;
        let eps = tolerance();
        self.face_edges(face).all(|e| {
            let next = self.half_edges[e].next;
            self.direction(e).cross(&self.direction(next)).dot(&normal) >= -eps
        })
    }

    /// True if both faces lie in the same oriented plane, within `epsilon`.
    pub fn faces_coplanar(&self, a: FaceId, b: FaceId, epsilon: Real) -> bool {
        let pa = &self.faces[a].plane;
        let pb = &self.faces[b].plane;
        (pa.normal.dot(&pb.normal) - 1.0).abs() <= epsilon && (pa.w - pb.w).abs() <= epsilon
    }

    /// True if every half-edge has a twin.
    pub fn is_closed(&self) -> bool {
        self.half_edges.iter().all(|e| e.twin.is_some())
    }

    /// Check the half-edge invariants: `twin.twin == edge`, twins run in
    /// opposite directions, `next`/`prev` are inverse, and every loop returns
    /// to its start after exactly the face's edge count.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let broken = |edge, reason| Err(ValidationError::BrokenHalfEdge { edge, reason });

        for (id, edge) in self.half_edges.iter().enumerate() {
            if self.half_edges[edge.next].prev != id || self.half_edges[edge.prev].next != id {
                return broken(id, "next and prev are not inverse");
            }
            if self.half_edges[edge.next].polygon != edge.polygon {
                return broken(id, "next leaves the polygon");
            }
            if let Some(twin) = edge.twin {
                if self.half_edges[twin].twin != Some(id) {
                    return broken(id, "twin of twin is not the edge");
                }
                if self.half_edges[twin].vertex != self.tail_id(id) {
                    return broken(id, "twin does not run in the opposite direction");
                }
            }
        }

        let mut visited = 0;
        for (face_id, face) in self.faces.iter().enumerate() {
            let mut count = 0;
            let mut e = face.edge;
            loop {
                if self.half_edges[e].polygon != face_id {
                    return broken(e, "edge belongs to another polygon");
                }
                count += 1;
                e = self.half_edges[e].next;
                if e == face.edge {
                    break;
                }
                if count > self.half_edges.len() {
                    return broken(face.edge, "loop does not return to its start");
                }
            }
            visited += count;
        }
        if visited != self.half_edges.len() {
            return broken(0, "half-edges outside of any polygon loop");
        }
        Ok(())
    }

    /// Separating axis test against another convex polyhedron.
    pub fn intersects(&self, other: &Polyhedron) -> bool {
        Sat::default().intersects(self, other)
    }
}

/// Iterator over the half-edges of one polygon loop.
#[derive(Debug, Clone)]
pub struct FaceEdges<'a> {
    polyhedron: &'a Polyhedron,
    start: EdgeId,
    current: Option<EdgeId>,
}

impl Iterator for FaceEdges<'_> {
    type Item = EdgeId;

    fn next(&mut self) -> Option<EdgeId> {
        let current = self.current?;
        let next = self.polyhedron.half_edges[current].next;
        self.current = (next != self.start).then_some(next);
        Some(current)
    }
}
