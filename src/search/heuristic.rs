//! Distance estimates for best-first search.

use crate::float_types::Real;
use crate::graph::{Graph, GraphEdge, GraphNode, Spatial};
use nalgebra::Point3;

/// Estimated remaining cost between two nodes of a graph.
///
/// Estimates for unknown nodes are `0`, which keeps the search correct at the
/// price of exploring more nodes.
pub trait Heuristic<N> {
    fn calculate<E: GraphEdge>(&self, graph: &Graph<N, E>, source: usize, target: usize) -> Real;
}

fn graph_positions<N: GraphNode + Spatial, E: GraphEdge>(
    graph: &Graph<N, E>,
    source: usize,
    target: usize,
) -> Option<(Point3<Real>, Point3<Real>)> {
    let a = graph.get_node(source)?.position();
    let b = graph.get_node(target)?.position();
    Some((a, b))
}

/// Straight-line distance. Admissible when edge costs are Euclidean lengths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Euclidean;

/// Squared straight-line distance. Cheaper, but overestimates on long edges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EuclideanSquared;

/// Sum of absolute per-axis differences.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Manhattan;

/// Always zero; turns A* into Dijkstra.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Zero;

impl<N: GraphNode + Spatial> Heuristic<N> for Euclidean {
    fn calculate<E: GraphEdge>(&self, graph: &Graph<N, E>, source: usize, target: usize) -> Real {
        graph_positions(graph, source, target).map_or(0.0, |(a, b)| nalgebra::distance(&a, &b))
    }
}

impl<N: GraphNode + Spatial> Heuristic<N> for EuclideanSquared {
    fn calculate<E: GraphEdge>(&self, graph: &Graph<N, E>, source: usize, target: usize) -> Real {
        graph_positions(graph, source, target)
            .map_or(0.0, |(a, b)| nalgebra::distance_squared(&a, &b))
    }
}

impl<N: GraphNode + Spatial> Heuristic<N> for Manhattan {
    fn calculate<E: GraphEdge>(&self, graph: &Graph<N, E>, source: usize, target: usize) -> Real {
        graph_positions(graph, source, target).map_or(0.0, |(a, b)| (b - a).abs().sum())
    }
}

impl<N> Heuristic<N> for Zero {
    fn calculate<E: GraphEdge>(&self, _graph: &Graph<N, E>, _source: usize, _target: usize) -> Real {
        0.0
    }
}
