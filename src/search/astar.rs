//! Best-first search: A* and Dijkstra.

use crate::float_types::Real;
use crate::graph::{Graph, GraphEdge, GraphNode};
use crate::priority_queue::PriorityQueue;
use crate::search::{Euclidean, GraphSearch, Heuristic, Zero, walk_route};
use hashbrown::{HashMap, HashSet};

/// A* over non-negative edge costs.
///
/// Nodes are expanded in order of `cost so far + heuristic(node, target)`.
/// Stale queue entries are skipped when popped instead of being updated in
/// place, so the priority queue never needs a decrease-key operation.
#[derive(Debug, Clone)]
pub struct AStar<'g, N, E, H = Euclidean> {
    graph: &'g Graph<N, E>,
    heuristic: H,
    pub source: usize,
    pub target: usize,
    found: bool,
    /// Best known cost from the source, per discovered node.
    costs: HashMap<usize, Real>,
    /// Best known edge into each discovered but unsettled node.
    frontier: HashMap<usize, E>,
    route: HashMap<usize, usize>,
    shortest_path_tree: Vec<E>,
}

/// Dijkstra's algorithm: A* without an estimate.
pub type Dijkstra<'g, N, E> = AStar<'g, N, E, Zero>;

impl<'g, N, E, H> AStar<'g, N, E, H>
where
    N: GraphNode,
    E: GraphEdge,
    H: Heuristic<N>,
{
    pub fn new(graph: &'g Graph<N, E>, source: usize, target: usize) -> Self
    where
        H: Default,
    {
        Self::with_heuristic(graph, source, target, H::default())
    }

    pub fn with_heuristic(graph: &'g Graph<N, E>, source: usize, target: usize, heuristic: H) -> Self {
        Self {
            graph,
            heuristic,
            source,
            target,
            found: false,
            costs: HashMap::new(),
            frontier: HashMap::new(),
            route: HashMap::new(),
            shortest_path_tree: Vec::new(),
        }
    }

    /// Accumulated cost of the best path to `node` found by the last search.
    /// Only final for nodes on the returned path.
    pub fn cost_to(&self, node: usize) -> Option<Real> {
        self.costs.get(&node).copied()
    }

    /// Total cost of [`path`](GraphSearch::path), if the target was reached.
    pub fn path_cost(&self) -> Option<Real> {
        if self.found { self.cost_to(self.target) } else { None }
    }
}

impl<N, E, H> GraphSearch<E> for AStar<'_, N, E, H>
where
    N: GraphNode,
    E: GraphEdge,
    H: Heuristic<N>,
{
    fn search(&mut self) -> bool {
        self.clear();
        let graph = self.graph;
        if !graph.has_node(self.source) {
            return false;
        }

        let mut queue =
            PriorityQueue::with_comparator(|a: &(Real, usize), b: &(Real, usize)| a.0.total_cmp(&b.0));
        let mut settled: HashSet<usize> = HashSet::new();
        self.costs.insert(self.source, 0.0);
        queue.push((0.0, self.source));

        while let Some((_, node)) = queue.pop() {
            if !settled.insert(node) {
                continue;
            }
            if let Some(edge) = self.frontier.remove(&node) {
                self.route.insert(node, edge.from());
                self.shortest_path_tree.push(edge);
            }
            if node == self.target {
                self.found = true;
                break;
            }

            let cost_so_far = self.costs.get(&node).copied().unwrap_or(0.0);
            for edge in graph.edges_of_node(node) {
                let to = edge.to();
                if settled.contains(&to) {
                    continue;
                }
                let g = cost_so_far + edge.cost();
                if self.costs.get(&to).is_none_or(|&known| g < known) {
                    self.costs.insert(to, g);
                    self.frontier.insert(to, edge.clone());
                    let f = g + self.heuristic.calculate(graph, to, self.target);
                    queue.push((f, to));
                }
            }
        }

        log::debug!(
            "best-first {} -> {}: found = {}, settled {} nodes",
            self.source,
            self.target,
            self.found,
            settled.len()
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
        &self.shortest_path_tree
    }

    fn clear(&mut self) {
        self.found = false;
        self.costs.clear();
        self.frontier.clear();
        self.route.clear();
        self.shortest_path_tree.clear();
    }
}
