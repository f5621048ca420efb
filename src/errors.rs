//! Validation errors

use crate::float_types::Real;
use nalgebra::Point3;

/// All the possible validation issues we might encounter while building
/// geometry from caller supplied buffers.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// (TooFewPoints) A hull needs at least four points
    #[error("(TooFewPoints) A convex hull needs at least 4 points, got {0}")]
    TooFewPoints(usize),
    /// (Collinear) All points lie on one line
    #[error("(Collinear) The points are collinear and do not span a volume")]
    Collinear,
    /// (Coplanar) All points lie in one plane
    #[error("(Coplanar) The points are coplanar and do not span a volume")]
    Coplanar,
    /// (InvalidCoordinate) The coordinate has a NaN or infinite
    #[error("(InvalidCoordinate) The coordinate ({0}) has a NaN or infinite")]
    InvalidCoordinate(Point3<Real>),
    /// (IndexOutOfRange) An index buffer references a missing vertex
    #[error("(IndexOutOfRange) Index {index} is out of range (vertices.len = {len})")]
    IndexOutOfRange { index: usize, len: usize },
    /// (IncompleteTriangle) A buffer length is not a multiple of the triangle stride
    #[error("(IncompleteTriangle) Buffer of length {len} is not a multiple of {stride}")]
    IncompleteTriangle { len: usize, stride: usize },
    /// (BrokenHalfEdge) A half-edge violates the twin/next/prev invariants
    #[error("(BrokenHalfEdge) Half-edge {edge}: {reason}")]
    BrokenHalfEdge { edge: usize, reason: &'static str },
}
