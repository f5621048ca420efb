use crate::graph::GraphEdge;

/// Common surface of the graph searches.
///
/// A search is configured with a source and an optional target
/// ([`Node::INVALID`](crate::graph::Node::INVALID) for none), run once with
/// [`search`](GraphSearch::search) and then queried.
pub trait GraphSearch<E: GraphEdge> {
    /// Run the search from scratch. Returns `true` if the target was reached.
    fn search(&mut self) -> bool;

    /// Whether the last search reached its target.
    fn found(&self) -> bool;

    /// Node indices from source to target, or empty if the target was not reached.
    fn path(&self) -> Vec<usize>;

    /// Edges by which each discovered node was first reached, in discovery order.
    fn search_tree(&self) -> &[E];

    /// Forget all state of the last search.
    fn clear(&mut self);
}
