//! Node and edge payloads.

use crate::float_types::Real;
use crate::graph::traits::{GraphEdge, GraphNode, Spatial};
use nalgebra::Point3;

/// A bare graph node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Node {
    pub index: usize,
}

impl Node {
    /// Index of a node that is not part of any graph.
    pub const INVALID: usize = usize::MAX;

    pub const fn new(index: usize) -> Self {
        Self { index }
    }

    #[inline]
    pub const fn is_valid(&self) -> bool {
        self.index != Self::INVALID
    }
}

impl Default for Node {
    fn default() -> Self {
        Self {
            index: Self::INVALID,
        }
    }
}

impl GraphNode for Node {
    #[inline]
    fn index(&self) -> usize {
        self.index
    }
}

/// A node placed in world space, e.g. a navigation waypoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavNode {
    pub index: usize,
    pub position: Point3<Real>,
}

impl NavNode {
    pub const fn new(index: usize, position: Point3<Real>) -> Self {
        Self { index, position }
    }
}

impl Default for NavNode {
    fn default() -> Self {
        Self {
            index: Node::INVALID,
            position: Point3::origin(),
        }
    }
}

impl GraphNode for NavNode {
    #[inline]
    fn index(&self) -> usize {
        self.index
    }
}

impl Spatial for NavNode {
    #[inline]
    fn position(&self) -> Point3<Real> {
        self.position
    }
}

/// A directed edge with a traversal cost.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub from: usize,
    pub to: usize,
    pub cost: Real,
}

impl Edge {
    pub const fn new(from: usize, to: usize, cost: Real) -> Self {
        Self { from, to, cost }
    }
}

impl Default for Edge {
    fn default() -> Self {
        Self::new(Node::INVALID, Node::INVALID, 0.0)
    }
}

impl GraphEdge for Edge {
    #[inline]
    fn from(&self) -> usize {
        self.from
    }

    #[inline]
    fn to(&self) -> usize {
        self.to
    }

    #[inline]
    fn cost(&self) -> Real {
        self.cost
    }

    fn reversed(&self) -> Self {
        Self::new(self.to, self.from, self.cost)
    }
}
