//! Navigation graphs over world-space waypoints.

use crate::float_types::Real;
use crate::graph::{Edge, Graph, GraphEdge, GraphNode, NavNode, Spatial};
use nalgebra::Point3;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Build a directed grid graph on the XZ plane.
///
/// A square of side `size` centred on the origin is divided into `segments`
/// cells per side, giving `(segments + 1)^2` nodes indexed row by row (z
/// outer, x inner). Every ordered pair of nodes at most `1.5` cells apart is
/// joined by an edge whose cost is their distance, so each connection exists
/// in both directions and diagonals are included.
///
/// The pair scan is quadratic in the node count.
///
/// # Panics
/// If `segments` is zero.
pub fn create_grid_layout(size: Real, segments: usize) -> Graph<NavNode, Edge> {
    assert!(segments > 0, "a grid needs at least one segment");

    let mut graph = Graph::new(true);
    let half_size = size / 2.0;
    let segment_size = size / segments as Real;

    let mut index = 0;
    for i in 0..=segments {
        let z = i as Real * segment_size - half_size;
        for j in 0..=segments {
            let x = j as Real * segment_size - half_size;
            graph.add_node(NavNode::new(index, Point3::new(x, 0.0, z)));
            index += 1;
        }
    }

    let reach = segment_size * 1.5;
    let range = reach * reach;
    let nodes: Vec<NavNode> = graph.nodes().copied().collect();
    for edge in connect_within(&nodes, range) {
        graph.add_edge(edge);
    }

    log::debug!(
        "grid layout: {} nodes, {} edges",
        graph.node_count(),
        graph.edge_count()
    );
    graph
}

fn edges_from(node: &NavNode, nodes: &[NavNode], range: Real) -> Vec<Edge> {
    nodes
        .iter()
        .filter(|other| other.index != node.index)
        .filter_map(|other| {
            let distance_squared = nalgebra::distance_squared(&node.position, &other.position);
            (distance_squared <= range)
                .then(|| Edge::new(node.index, other.index, distance_squared.sqrt()))
        })
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn connect_within(nodes: &[NavNode], range: Real) -> Vec<Edge> {
    nodes
        .iter()
        .flat_map(|node| edges_from(node, nodes, range))
        .collect()
}

#[cfg(feature = "parallel")]
fn connect_within(nodes: &[NavNode], range: Real) -> Vec<Edge> {
    nodes
        .par_iter()
        .flat_map_iter(|node| edges_from(node, nodes, range))
        .collect()
}

/// Index of the node closest to `position`, or `None` for an empty graph.
/// Ties go to the lower index.
pub fn find_nearest_node<N, E>(graph: &Graph<N, E>, position: &Point3<Real>) -> Option<usize>
where
    N: GraphNode + Spatial,
    E: GraphEdge,
{
    graph
        .nodes()
        .map(|node| (node.index(), nalgebra::distance_squared(&node.position(), position)))
        .fold(None, |best: Option<(usize, Real)>, candidate| match best {
            Some(b) if b.1 <= candidate.1 => Some(b),
            _ => Some(candidate),
        })
        .map(|(index, _)| index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_segment_is_fully_connected() {
        let graph = create_grid_layout(2.0, 1);
        assert_eq!(graph.node_count(), 4);
        // diagonal is sqrt(2) cells, within 1.5
        assert_eq!(graph.edge_count(), 12);
        assert!(graph.is_digraph());
    }

    #[test]
    fn nearest_node() {
        let graph = create_grid_layout(10.0, 2);
        assert_eq!(find_nearest_node(&graph, &Point3::new(0.4, 3.0, -0.2)), Some(4));
        assert_eq!(find_nearest_node(&graph, &Point3::new(-9.0, 0.0, -9.0)), Some(0));
        assert_eq!(find_nearest_node(&Graph::<NavNode, Edge>::new(true), &Point3::origin()), None);
    }
}
