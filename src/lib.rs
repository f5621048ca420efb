//! Spatial queries and graph search for interactive 3D scenes.
//!
//! The geometric half answers "does this ray / box / hull touch that": a
//! [bounding volume hierarchy](bvh) over triangle soups, [oriented boxes](obb)
//! with a 15-axis separating axis test, [half-edge polyhedra](polyhedron), a
//! [Quickhull](convex_hull) builder and a general [polyhedron SAT](sat).
//!
//! The graph half answers "how do I get from A to B": adjacency-list
//! [graphs](graph), [BFS, DFS, A* and Dijkstra](search) over a
//! [binary heap](priority_queue), and [grid layouts](navigation) of waypoints.
//!
//! All routines are pure with respect to global state and safe to call from
//! several threads at once.
//!
//! # Features
//! #### Default
//! - **f64**: use f64 as Real
//!
//! #### Optional
//! - **f32**: use f32 as Real, this conflicts with f64
//! - **parallel**: use rayon for the navigation grid pair scan

#![forbid(unsafe_code)]
#![warn(clippy::approx_constant, clippy::all)]

#[cfg(all(feature = "f64", feature = "f32"))]
compile_error!("Features \"f64\" and \"f32\" are mutually exclusive; enable only one.");

#[cfg(not(any(feature = "f64", feature = "f32")))]
compile_error!("Either feature \"f64\" or feature \"f32\" must be enabled.");

pub mod bvh;
pub mod convex_hull;
pub mod errors;
pub mod float_types;
pub mod graph;
pub mod math;
pub mod navigation;
pub mod obb;
pub mod polyhedron;
pub mod priority_queue;
pub mod sat;
pub mod search;

pub use bvh::{Bvh, BvhConfig};
pub use convex_hull::{ConvexHull, HullConfig};
pub use errors::ValidationError;
pub use graph::{Edge, Graph, NavNode, Node};
pub use math::{BoundingBox, BoundingSphere, Plane, Ray, Triangle};
pub use obb::Obb;
pub use polyhedron::Polyhedron;
pub use priority_queue::PriorityQueue;
pub use sat::Sat;
pub use search::{AStar, Bfs, Dfs, Dijkstra, GraphSearch};
