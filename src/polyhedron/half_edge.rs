//! Half-edge records and the handles used to address them.

/// Index into [`Polyhedron::half_edges`](super::Polyhedron::half_edges).
pub type EdgeId = usize;
/// Index into [`Polyhedron::vertices`](super::Polyhedron::vertices).
pub type VertexId = usize;
/// Index into [`Polyhedron::faces`](super::Polyhedron::faces).
pub type FaceId = usize;

/// One directed side of an edge, owned by exactly one polygon.
///
/// `next`/`prev` cycle through the owning polygon's loop (counter-clockwise
/// seen from the front). `twin` is the oppositely directed half-edge of the
/// neighbouring polygon, or `None` on an open boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HalfEdge {
    /// Destination ("head") vertex.
    pub vertex: VertexId,
    pub next: EdgeId,
    pub prev: EdgeId,
    pub twin: Option<EdgeId>,
    pub polygon: FaceId,
}
