//! Searches over a [`Graph`](crate::graph::Graph).
//!
//! [`Bfs`] and [`Dfs`] ignore edge costs; [`AStar`] expands nodes in order of
//! accumulated cost plus a [`Heuristic`] estimate, and [`Dijkstra`] is A* with
//! the [`Zero`] heuristic.

pub mod astar;
pub mod bfs;
pub mod dfs;
pub mod heuristic;
pub mod traits;

pub use astar::{AStar, Dijkstra};
pub use bfs::Bfs;
pub use dfs::Dfs;
pub use heuristic::{Euclidean, EuclideanSquared, Heuristic, Manhattan, Zero};
pub use traits::GraphSearch;

use hashbrown::HashMap;

/// Walk `route` (node -> predecessor) back from `target` to `source`.
pub(crate) fn walk_route(route: &HashMap<usize, usize>, source: usize, target: usize) -> Vec<usize> {
    let mut path = vec![target];
    let mut current = target;
    while current != source {
        match route.get(&current) {
            Some(&previous) => {
                path.push(previous);
                current = previous;
            },
            None => return Vec::new(),
        }
    }
    path.reverse();
    path
}
