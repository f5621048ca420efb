//! Seams between graph containers, search algorithms and node payloads.

use crate::float_types::Real;
use nalgebra::Point3;

/// A graph vertex identified by a non-negative index.
pub trait GraphNode {
    fn index(&self) -> usize;
}

/// A directed, weighted connection between two node indices.
pub trait GraphEdge: Clone {
    fn from(&self) -> usize;
    fn to(&self) -> usize;
    /// Non-negative traversal cost.
    fn cost(&self) -> Real;
    /// The same edge running `to -> from`, used to mirror undirected edges.
    fn reversed(&self) -> Self;
}

/// Nodes with a world position, as needed by distance heuristics.
pub trait Spatial {
    fn position(&self) -> Point3<Real>;
}
