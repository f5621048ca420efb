//! Breadth-first search.

use crate::graph::{Graph, GraphEdge, GraphNode};
use crate::search::{GraphSearch, walk_route};
use hashbrown::{HashMap, HashSet};
use std::collections::VecDeque;

/// Unweighted shortest paths by breadth-first traversal.
///
/// Nodes are marked visited when they are queued, so every node enters the
/// queue at most once. The search stops as soon as the target is dequeued.
#[derive(Debug, Clone)]
pub struct Bfs<'g, N, E> {
    graph: &'g Graph<N, E>,
    pub source: usize,
    pub target: usize,
    found: bool,
    route: HashMap<usize, usize>,
    visited: HashSet<usize>,
    spanning_tree: Vec<E>,
}

impl<'g, N: GraphNode, E: GraphEdge> Bfs<'g, N, E> {
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

    /// Nodes discovered by the last search, including the source.
    pub fn visited(&self) -> &HashSet<usize> {
        &self.visited
    }
}

impl<N: GraphNode, E: GraphEdge> GraphSearch<E> for Bfs<'_, N, E> {
    fn search(&mut self) -> bool {
        self.clear();
        let graph = self.graph;
        if !graph.has_node(self.source) {
            return false;
        }

        let mut queue: VecDeque<(usize, Option<&E>)> = VecDeque::new();
        queue.push_back((self.source, None));
        self.visited.insert(self.source);

        while let Some((node, via)) = queue.pop_front() {
            if let Some(edge) = via {
                self.route.insert(node, edge.from());
                self.spanning_tree.push(edge.clone());
            }
            if node == self.target {
                self.found = true;
                break;
            }
            for edge in graph.edges_of_node(node) {
                if self.visited.insert(edge.to()) {
                    queue.push_back((edge.to(), Some(edge)));
                }
            }
        }

        log::debug!(
            "bfs {} -> {}: found = {}, visited {} nodes",
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
