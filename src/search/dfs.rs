//! Depth-first search.

use crate::graph::{Graph, GraphEdge, GraphNode};
use crate::search::{GraphSearch, walk_route};
use hashbrown::{HashMap, HashSet};

/// Reachability by depth-first traversal. Paths are valid but not shortest.
#[derive(Debug, Clone)]
pub struct Dfs<'g, N, E> {
    graph: &'g Graph<N, E>,
    pub source: usize,
    pub target: usize,
    found: bool,
    route: HashMap<usize, usize>,
    visited: HashSet<usize>,
    spanning_tree: Vec<E>,
}

impl<'g, N: GraphNode, E: GraphEdge> Dfs<'g, N, E> {
    pub fn new(graph: &'g Graph<N, E>, source: usize, target: usize) -> Self {
        Self {
            graph,
            source,
            target,
            found: false,
            route: HashMap::new(),
            visited: HashSet::new(),
            spanning_tree: Vec::new(),
        }
    }

    pub fn visited(&self) -> &HashSet<usize> {
        &self.visited
    }
}

impl<N: GraphNode, E: GraphEdge> GraphSearch<E> for Dfs<'_, N, E> {
    fn search(&mut self) -> bool {
        self.clear();
        let graph = self.graph;
        if !graph.has_node(self.source) {
            return false;
        }

        let mut stack: Vec<(usize, Option<&E>)> = vec![(self.source, None)];
        while let Some((node, via)) = stack.pop() {
            // a node can be stacked by several neighbours before it is expanded
            if !self.visited.insert(node) {
                continue;
            }
            if let Some(edge) = via {
                self.route.insert(node, edge.from());
                self.spanning_tree.push(edge.clone());
            }
            if node == self.target {
                self.found = true;
                break;
            }
            for edge in graph.edges_of_node(node) {
                if !self.visited.contains(&edge.to()) {
                    stack.push((edge.to(), Some(edge)));
                }
            }
        }

        log::debug!(
            "dfs {} -> {}: found = {}, visited {} nodes",
            self.source,
            self.target,
            self.found,
            self.visited.len()
        );
        self.found
    }

    #[inline]
    fn found(&self) -> bool {
        self.found
    }

    fn path(&self) -> Vec<usize> {
        if !self.found {
            return Vec::new();
        }
        walk_route(&self.route, self.source, self.target)
    }

    fn search_tree(&self) -> &[E] {
        &self.spanning_tree
    }

    fn clear(&mut self) {
        self.found = false;
        self.route.clear();
        self.visited.clear();
        self.spanning_tree.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Edge, Node};

    #[test]
    fn follows_directed_edges_only() {
        let mut graph: Graph = Graph::new(true);
        for i in 0..4 {
            graph.add_node(Node::new(i));
        }
        graph
            .add_edge(Edge::new(0, 1, 1.0))
            .add_edge(Edge::new(1, 2, 1.0))
            .add_edge(Edge::new(3, 2, 1.0));

        let mut dfs = Dfs::new(&graph, 0, 2);
        assert!(dfs.search());
        assert_eq!(dfs.path(), vec![0, 1, 2]);

        let mut back = Dfs::new(&graph, 2, 0);
        assert!(!back.search());
        assert!(back.path().is_empty());

        let mut other = Dfs::new(&graph, 0, 3);
        assert!(!other.search());
        assert_eq!(other.visited().len(), 3);
    }

    #[test]
    fn path_edges_exist() {
        let mut graph: Graph = Graph::new(false);
        for i in 0..6 {
            graph.add_node(Node::new(i));
        }
        for (a, b) in [(0, 1), (0, 2), (1, 3), (2, 3), (3, 4), (4, 5), (2, 5)] {
            graph.add_edge(Edge::new(a, b, 1.0));
        }
        let mut dfs = Dfs::new(&graph, 0, 5);
        assert!(dfs.search());
        let path = dfs.path();
        assert_eq!(path.first(), Some(&0));
        assert_eq!(path.last(), Some(&5));
        assert!(path.windows(2).all(|w| graph.has_edge(w[0], w[1])));
    }
}
