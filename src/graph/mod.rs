//! Sparse directed / undirected graphs stored as adjacency lists.
//!
//! Nodes and their outgoing edge lists are kept in `BTreeMap`s keyed by node
//! index so iteration (and therefore every search) is deterministic.

pub mod node;
pub mod traits;

pub use node::{Edge, NavNode, Node};
pub use traits::{GraphEdge, GraphNode, Spatial};

use std::collections::BTreeMap;

/// Adjacency-list graph over node payloads `N` and edge payloads `E`.
///
/// When `digraph` is `false`, every added edge is mirrored by its reverse and
/// removing either direction removes both.
#[derive(Debug, Clone)]
pub struct Graph<N = Node, E = Edge> {
    nodes: BTreeMap<usize, N>,
    edges: BTreeMap<usize, Vec<E>>,
    digraph: bool,
}

impl<N, E> Default for Graph<N, E> {
    fn default() -> Self {
        Self {
            nodes: BTreeMap::new(),
            edges: BTreeMap::new(),
            digraph: false,
        }
    }
}

impl<N: GraphNode, E: GraphEdge> Graph<N, E> {
    pub fn new(digraph: bool) -> Self {
        Self {
            digraph,
            ..Self::default()
        }
    }

    #[inline]
    pub const fn is_digraph(&self) -> bool {
        self.digraph
    }

    /// Insert (or replace) a node keyed by its index.
    ///
    /// # Panics
    /// If the node carries the invalid index.
    pub fn add_node(&mut self, node: N) -> &mut Self {
        let index = node.index();
        assert!(index != Node::INVALID, "cannot add a node with the invalid index");
        self.nodes.insert(index, node);
        self.edges.entry(index).or_default();
        self
    }

    /// Append `edge` to the adjacency list of its `from` node, and its reverse
    /// to the `to` node's list for undirected graphs.
    pub fn add_edge(&mut self, edge: E) -> &mut Self {
        if !self.digraph {
            let reversed = edge.reversed();
            self.edges.entry(reversed.from()).or_default().push(reversed);
        }
        self.edges.entry(edge.from()).or_default().push(edge);
        self
    }

    pub fn get_node(&self, index: usize) -> Option<&N> {
        self.nodes.get(&index)
    }

    pub fn get_node_mut(&mut self, index: usize) -> Option<&mut N> {
        self.nodes.get_mut(&index)
    }

    /// First edge `from -> to`, found by scanning `from`'s adjacency list.
    pub fn get_edge(&self, from: usize, to: usize) -> Option<&E> {
        self.edges_of_node(from).iter().find(|e| e.to() == to)
    }

    /// Outgoing edges of a node; empty for unknown nodes.
    pub fn edges_of_node(&self, index: usize) -> &[E] {
        self.edges.get(&index).map(Vec::as_slice).unwrap_or(&[])
    }

    #[inline]
    pub fn has_node(&self, index: usize) -> bool {
        self.nodes.contains_key(&index)
    }

    #[inline]
    pub fn has_edge(&self, from: usize, to: usize) -> bool {
        self.get_edge(from, to).is_some()
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of directed edges; an undirected connection counts twice.
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(Vec::len).sum()
    }

    /// Nodes in ascending index order.
    pub fn nodes(&self) -> impl Iterator<Item = &N> {
        self.nodes.values()
    }

    /// All directed edges, grouped by source node in ascending index order.
    pub fn edges(&self) -> impl Iterator<Item = &E> {
        self.edges.values().flatten()
    }

    /// Remove a node together with every edge that references it.
    pub fn remove_node(&mut self, index: usize) -> Option<N> {
        let node = self.nodes.remove(&index)?;
        let outgoing = self.edges.remove(&index).unwrap_or_default();

        if self.digraph {
            for list in self.edges.values_mut() {
                list.retain(|e| e.to() != index);
            }
        } else {
            for edge in &outgoing {
                if let Some(list) = self.edges.get_mut(&edge.to()) {
                    list.retain(|e| e.to() != index);
                }
            }
        }
        Some(node)
    }

    /// Remove the first edge `from -> to` and, for undirected graphs, the
    /// first edge `to -> from`. Returns the removed `from -> to` edge.
    pub fn remove_edge(&mut self, from: usize, to: usize) -> Option<E> {
        let removed = take_first(self.edges.get_mut(&from)?, to)?;
        if !self.digraph {
            if let Some(list) = self.edges.get_mut(&to) {
                take_first(list, from);
            }
        }
        Some(removed)
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
    }
}

fn take_first<E: GraphEdge>(list: &mut Vec<E>, to: usize) -> Option<E> {
    let position = list.iter().position(|e| e.to() == to)?;
    Some(list.remove(position))
}
