//! Incremental Quickhull over a working half-edge mesh.

use crate::convex_hull::{ConvexHull, HullConfig};
use crate::errors::ValidationError;
use crate::float_types::Real;
use crate::math::Plane;
use crate::polyhedron::{EdgeId, FaceId, HalfEdge, Polyhedron};
use hashbrown::HashMap;
use nalgebra::{Point3, Vector3};

/// A triangle of the hull under construction together with the input points
/// that still lie outside of it.
#[derive(Debug, Clone)]
struct HullFace {
    edge: EdgeId,
    plane: Plane,
    centroid: Point3<Real>,
    /// Points assigned to this face, i.e. farther above it than any other face.
    outside: Vec<usize>,
    alive: bool,
}

/// Builds a [`ConvexHull`] from a point set.
///
/// Starts from a tetrahedron on four extreme points, then repeatedly absorbs
/// the point farthest above some face: every face visible from that point is
/// deleted, the horizon around them is connected to the point with new
/// triangles, and the orphaned outside points are handed to the new faces.
#[derive(Debug)]
pub struct HullBuilder<'a> {
    points: &'a [Point3<Real>],
    config: HullConfig,
    tolerance: Real,
    edges: Vec<HalfEdge>,
    faces: Vec<HullFace>,
    /// Outside points of deleted faces awaiting reassignment.
    unassigned: Vec<usize>,
}

impl<'a> HullBuilder<'a> {
    pub fn new(points: &'a [Point3<Real>], config: HullConfig) -> Self {
        Self {
            points,
            config,
            tolerance: config.tolerance.unwrap_or_else(|| scaled_tolerance(points)),
            edges: Vec::new(),
            faces: Vec::new(),
            unassigned: Vec::new(),
        }
    }

    /// Distance a point must be above a face plane to count as outside.
    #[inline]
    pub const fn tolerance(&self) -> Real {
        self.tolerance
    }

    pub fn build(mut self) -> Result<ConvexHull, ValidationError> {
        if self.points.len() < 4 {
            return Err(ValidationError::TooFewPoints(self.points.len()));
        }
        if let Some(bad) = self.points.iter().find(|p| !p.coords.iter().all(|c| c.is_finite())) {
            return Err(ValidationError::InvalidCoordinate(*bad));
        }

        let simplex = self.initial_simplex()?;
        self.assign_initial_points(&simplex);

        let mut iterations = 0usize;
        while let Some((eye, face)) = self.next_eye() {
            self.add_point(eye, face);
            iterations += 1;
        }

        let contours = self.contours();
        let polyhedron = Polyhedron::from_polygons(&contours);
        log::debug!(
            "convex hull: {} points, {} iterations, {} faces, {} vertices",
            self.points.len(),
            iterations,
            polyhedron.faces().len(),
            polyhedron.vertices().len()
        );
        Ok(ConvexHull { polyhedron })
    }

    /// Tetrahedron on the extreme points, oriented with outward normals.
    fn initial_simplex(&mut self) -> Result<[usize; 4], ValidationError> {
        let points = self.points;
        let tol = self.tolerance;

        let mut min_idx = [0usize; 3];
        let mut max_idx = [0usize; 3];
        for (i, p) in points.iter().enumerate() {
            for axis in 0..3 {
                if p[axis] < points[min_idx[axis]][axis] {
                    min_idx[axis] = i;
                }
                if p[axis] > points[max_idx[axis]][axis] {
                    max_idx[axis] = i;
                }
            }
        }
        let axis = (0..3)
            .max_by(|&a, &b| {
                let spread_a = points[max_idx[a]][a] - points[min_idx[a]][a];
                let spread_b = points[max_idx[b]][b] - points[min_idx[b]][b];
                spread_a.total_cmp(&spread_b)
            })
            .unwrap_or(0);
        let v0 = min_idx[axis];
        let v1 = max_idx[axis];
        if points[v1][axis] - points[v0][axis] <= tol {
            return Err(ValidationError::Collinear);
        }

        let line = points[v1] - points[v0];
        let (v2, line_distance) = farthest(points, |p| line.cross(&(p - points[v0])).norm() / line.norm());
        if line_distance <= tol {
            return Err(ValidationError::Collinear);
        }

        let base = Plane::from_points(&points[v0], &points[v1], &points[v2]);
        let (v3, plane_distance) = farthest(points, |p| base.signed_distance(p).abs());
        if plane_distance <= tol {
            return Err(ValidationError::Coplanar);
        }

        // keep v3 below the base triangle
        let (v1, v2) = if base.signed_distance(&points[v3]) > 0.0 {
            (v2, v1)
        } else {
            (v1, v2)
        };

        let faces = [
            self.add_triangle([v0, v1, v2]),
            self.add_triangle([v3, v1, v0]),
            self.add_triangle([v3, v2, v1]),
            self.add_triangle([v3, v0, v2]),
        ];
        let simplex_edges: Vec<EdgeId> = faces
            .iter()
            .flat_map(|&f| {
                let e = self.faces[f].edge;
                [e, e + 1, e + 2]
            })
            .collect();
        for &a in &simplex_edges {
            for &b in &simplex_edges {
                if self.edges[a].vertex == self.tail(b) && self.tail(a) == self.edges[b].vertex {
                    self.edges[a].twin = Some(b);
                }
            }
        }

        Ok([v0, v1, v2, v3])
    }

    fn assign_initial_points(&mut self, simplex: &[usize; 4]) {
        let faces: Vec<FaceId> = (0..self.faces.len()).collect();
        for point in (0..self.points.len()).filter(|i| !simplex.contains(i)) {
            self.assign_to_best_face(point, &faces);
        }
    }

    /// Push `point` onto the outside set of the face in `candidates` it lies
    /// farthest above. Points inside every face are dropped.
    fn assign_to_best_face(&mut self, point: usize, candidates: &[FaceId]) {
        let p = self.points[point];
        let best = candidates
            .iter()
            .map(|&f| (f, self.faces[f].plane.signed_distance(&p)))
            .filter(|&(_, d)| d > self.tolerance)
            .max_by(|a, b| a.1.total_cmp(&b.1));
        if let Some((face, _)) = best {
            self.faces[face].outside.push(point);
        }
    }

    /// First live face with outside points, and its farthest point.
    fn next_eye(&self) -> Option<(usize, FaceId)> {
        let (face_id, face) = self
            .faces
            .iter()
            .enumerate()
            .find(|(_, f)| f.alive && !f.outside.is_empty())?;
        let eye = face.outside.iter().copied().max_by(|&a, &b| {
            face.plane
                .signed_distance(&self.points[a])
                .total_cmp(&face.plane.signed_distance(&self.points[b]))
        })?;
        Some((eye, face_id))
    }

    fn add_point(&mut self, eye: usize, face: FaceId) {
        self.faces[face].outside.retain(|&p| p != eye);

        let mut horizon = Vec::new();
        self.compute_horizon(eye, None, face, &mut horizon);

        let new_faces = self.add_new_faces(eye, &horizon);
        for point in std::mem::take(&mut self.unassigned) {
            self.assign_to_best_face(point, &new_faces);
        }
    }

    /// Delete `face` and every face visible from `eye` reachable from it,
    /// collecting the boundary edges (on deleted faces) in loop order.
    fn compute_horizon(
        &mut self,
        eye: usize,
        cross_edge: Option<EdgeId>,
        face: FaceId,
        horizon: &mut Vec<EdgeId>,
    ) {
        let outside = std::mem::take(&mut self.faces[face].outside);
        self.unassigned.extend(outside);
        self.faces[face].alive = false;

        let start = match cross_edge {
            Some(e) => self.edges[e].next,
            None => self.faces[face].edge,
        };
        let stop = cross_edge.unwrap_or(start);

        let mut edge = start;
        loop {
            if let Some(twin) = self.edges[edge].twin {
                let opposite = self.edges[twin].polygon;
                if self.faces[opposite].alive {
                    let distance = self.faces[opposite]
                        .plane
                        .signed_distance(&self.points[eye]);
                    if distance > self.tolerance {
                        self.compute_horizon(eye, Some(twin), opposite, horizon);
                    } else {
                        horizon.push(edge);
                    }
                }
            }
            edge = self.edges[edge].next;
            if edge == stop {
                break;
            }
        }
    }

    /// Fan of triangles from `eye` to each horizon edge, twinned to the
    /// surviving faces and to each other.
    fn add_new_faces(&mut self, eye: usize, horizon: &[EdgeId]) -> Vec<FaceId> {
        let mut new_faces = Vec::with_capacity(horizon.len());
        let mut first_side: Option<EdgeId> = None;
        let mut previous_side: Option<EdgeId> = None;

        for &h in horizon {
            let face = self.add_triangle([eye, self.tail(h), self.edges[h].vertex]);
            let base = self.faces[face].edge;
            // base: head -> eye, base + 1: eye -> tail, base + 2: tail -> head
            if let Some(outer) = self.edges[h].twin {
                self.set_twin(base + 2, outer);
            }
            match previous_side {
                Some(previous) => self.set_twin(base + 1, previous),
                None => first_side = Some(base),
            }
            previous_side = Some(base);
            new_faces.push(face);
        }

        if let (Some(first), Some(last)) = (first_side, previous_side) {
            let first_next = self.edges[first].next;
            self.set_twin(first_next, last);
        }
        new_faces
    }

    fn add_triangle(&mut self, vertices: [usize; 3]) -> FaceId {
        let face = self.faces.len();
        let base = self.edges.len();
        for (k, &vertex) in vertices.iter().enumerate() {
            self.edges.push(HalfEdge {
                vertex,
                next: base + (k + 1) % 3,
                prev: base + (k + 2) % 3,
                twin: None,
                polygon: face,
            });
        }

        let [a, b, c] = vertices.map(|v| self.points[v]);
        self.faces.push(HullFace {
            edge: base,
            plane: Plane::from_points(&a, &b, &c),
            centroid: Point3::from((a.coords + b.coords + c.coords) / 3.0),
            outside: Vec::new(),
            alive: true,
        });
        face
    }

    #[inline]
    fn set_twin(&mut self, a: EdgeId, b: EdgeId) {
        self.edges[a].twin = Some(b);
        self.edges[b].twin = Some(a);
    }

    #[inline]
    fn tail(&self, edge: EdgeId) -> usize {
        self.edges[self.edges[edge].prev].vertex
    }

    fn face_loop(&self, face: FaceId) -> Vec<EdgeId> {
        let start = self.faces[face].edge;
        let mut edges = vec![start];
        let mut edge = self.edges[start].next;
        while edge != start {
            edges.push(edge);
            edge = self.edges[edge].next;
        }
        edges
    }

    fn triangle_contour(&self, face: FaceId) -> Vec<Point3<Real>> {
        self.face_loop(face)
            .into_iter()
            .map(|e| self.points[self.edges[e].vertex])
            .collect()
    }

    /// Final face loops, with near-coplanar neighbours merged if enabled.
    fn contours(&self) -> Vec<Vec<Point3<Real>>> {
        let alive: Vec<FaceId> = (0..self.faces.len()).filter(|&f| self.faces[f].alive).collect();
        if !self.config.merge_faces {
            return alive.iter().map(|&f| self.triangle_contour(f)).collect();
        }

        let mut sets = DisjointSets::new(self.faces.len());
        for &f in &alive {
            for e in self.face_loop(f) {
                let Some(twin) = self.edges[e].twin else {
                    continue;
                };
                let g = self.edges[twin].polygon;
                if g > f && self.faces[g].alive && self.coplanar(f, g) {
                    sets.union(f, g);
                }
            }
        }

        let mut groups: Vec<Vec<FaceId>> = Vec::new();
        let mut group_of_root: HashMap<FaceId, usize> = HashMap::new();
        for &f in &alive {
            let root = sets.find(f);
            let index = *group_of_root.entry(root).or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
            groups[index].push(f);
        }

        let mut contours = Vec::with_capacity(groups.len());
        for group in groups {
            match self.merged_contour(&group, &mut sets) {
                Some(contour) => contours.push(contour),
                None => contours.extend(group.iter().map(|&f| self.triangle_contour(f))),
            }
        }
        contours
    }

    fn coplanar(&self, f: FaceId, g: FaceId) -> bool {
        let (a, b) = (&self.faces[f], &self.faces[g]);
        a.plane.normal.dot(&b.plane.normal) > 0.0
            && a.plane.signed_distance(&b.centroid).abs() <= self.tolerance
            && b.plane.signed_distance(&a.centroid).abs() <= self.tolerance
    }

    /// Outer boundary of a group of faces as a single loop, or `None` if the
    /// boundary is not one simple loop.
    fn merged_contour(&self, group: &[FaceId], sets: &mut DisjointSets) -> Option<Vec<Point3<Real>>> {
        if group.len() == 1 {
            return Some(self.triangle_contour(group[0]));
        }
        let root = sets.find(group[0]);

        let mut by_tail: HashMap<usize, EdgeId> = HashMap::new();
        for &f in group {
            for e in self.face_loop(f) {
                let twin_face = self.edges[e].twin.map(|t| self.edges[t].polygon);
                if twin_face.is_some_and(|g| sets.find(g) == root) {
                    continue;
                }
                if by_tail.insert(self.tail(e), e).is_some() {
                    return None;
                }
            }
        }

        let start = *by_tail.values().min()?;
        let mut contour = Vec::with_capacity(by_tail.len());
        let mut edge = start;
        loop {
            let head = self.edges[edge].vertex;
            contour.push(self.points[head]);
            edge = *by_tail.get(&head)?;
            if edge == start {
                break;
            }
            if contour.len() > by_tail.len() {
                return None;
            }
        }
        (contour.len() == by_tail.len()).then_some(contour)
    }
}

/// `3 * machine epsilon * (max|x| + max|y| + max|z|)` over the input.
fn scaled_tolerance(points: &[Point3<Real>]) -> Real {
    let max_abs = points
        .iter()
        .fold(Vector3::<Real>::zeros(), |acc, p| acc.sup(&p.coords.abs()));
    3.0 * Real::EPSILON * max_abs.sum()
}

/// Index of the point maximising `metric`, with its value.
fn farthest(points: &[Point3<Real>], metric: impl Fn(&Point3<Real>) -> Real) -> (usize, Real) {
    points
        .iter()
        .enumerate()
        .map(|(i, p)| (i, metric(p)))
        .fold((0, Real::MIN), |best, cur| if cur.1 > best.1 { cur } else { best })
}

/// Union-find with path halving.
struct DisjointSets {
    parent: Vec<usize>,
}

impl DisjointSets {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            self.parent[ra.max(rb)] = ra.min(rb);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tolerance_scales_with_input() {
        let points = [Point3::new(1.0, -2.0, 0.5), Point3::new(-3.0, 1.0, 0.0)];
        let expected = 3.0 * Real::EPSILON * (3.0 + 2.0 + 0.5);
        assert_eq!(scaled_tolerance(&points), expected);
    }

    #[test]
    fn explicit_tolerance_wins() {
        let points = [Point3::origin(); 4];
        let config = HullConfig {
            tolerance: Some(0.25),
            ..HullConfig::default()
        };
        assert_eq!(HullBuilder::new(&points, config).tolerance(), 0.25);
    }

    #[test]
    fn disjoint_sets_merge_to_lowest_root() {
        let mut sets = DisjointSets::new(5);
        sets.union(3, 4);
        sets.union(4, 1);
        assert_eq!(sets.find(3), 1);
        assert_eq!(sets.find(0), 0);
    }
}
