//! Test support library
//! Provides seeded random inputs and brute-force reference implementations.
#![allow(dead_code)]

use navgeom::{
    Edge, Graph, Node, Obb, Ray, Triangle,
    float_types::Real,
};
use nalgebra::{Matrix3, Point3, Rotation3, Unit, Vector3};
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Tolerance for results that pass through a handful of arithmetic steps.
#[cfg(feature = "f64")]
pub const EPS: Real = 1e-9;
#[cfg(feature = "f32")]
pub const EPS: Real = 1e-3;

/// Tolerance for results of longer numeric pipelines (eigen fits, hull volumes).
#[cfg(feature = "f64")]
pub const LOOSE_EPS: Real = 1e-6;
#[cfg(feature = "f32")]
pub const LOOSE_EPS: Real = 1e-2;

/// Deterministic generator so failures can be reproduced.
pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Quick helper to compare floating-point results with an acceptable tolerance.
pub fn approx_eq(a: Real, b: Real, eps: Real) -> bool {
    (a - b).abs() < eps
}

pub fn random_point(rng: &mut StdRng, extent: Real) -> Point3<Real> {
    Point3::new(
        rng.gen_range(-extent..extent),
        rng.gen_range(-extent..extent),
        rng.gen_range(-extent..extent),
    )
}

/// `count` small triangles scattered in a cube of half-size `extent`, as a flat
/// coordinate buffer.
pub fn random_triangle_soup(rng: &mut StdRng, count: usize, extent: Real) -> Vec<Real> {
    let mut coords = Vec::with_capacity(count * 9);
    for _ in 0..count {
        let center = random_point(rng, extent);
        for _ in 0..3 {
            let p = center + random_point(rng, 1.0).coords;
            coords.extend_from_slice(&[p.x, p.y, p.z]);
        }
    }
    coords
}

pub fn random_ray(rng: &mut StdRng, extent: Real) -> Ray {
    let origin = random_point(rng, extent * 1.5);
    let target = random_point(rng, extent * 0.5);
    Ray::new(origin, target - origin)
}

/// Closest hit over every triangle, without any acceleration structure.
pub fn brute_force_hit(ray: &Ray, coords: &[Real], cull_back_faces: bool) -> Option<Point3<Real>> {
    coords
        .chunks_exact(9)
        .filter_map(|c| ray.intersect_triangle(&Triangle::from_slice(c), cull_back_faces))
        .min_by(|a, b| {
            (a - ray.origin)
                .norm_squared()
                .total_cmp(&(b - ray.origin).norm_squared())
        })
}

pub fn random_rotation(rng: &mut StdRng) -> Matrix3<Real> {
    let axis = Unit::new_normalize(Vector3::new(
        rng.gen_range(-1.0..1.0),
        rng.gen_range(-1.0..1.0),
        rng.gen_range(0.1..1.0),
    ));
    let angle = rng.gen_range(0.0..std::f64::consts::TAU as Real);
    *Rotation3::from_axis_angle(&axis, angle).matrix()
}

pub fn random_obb(rng: &mut StdRng, extent: Real) -> Obb {
    Obb::new(
        random_point(rng, extent),
        Vector3::new(
            rng.gen_range(0.2..1.5),
            rng.gen_range(0.2..1.5),
            rng.gen_range(0.2..1.5),
        ),
        random_rotation(rng),
    )
}

/// Undirected graph on `nodes` nodes where each pair is joined with probability `p`.
pub fn random_graph(rng: &mut StdRng, nodes: usize, p: f64) -> Graph {
    let mut graph = Graph::new(false);
    for i in 0..nodes {
        graph.add_node(Node::new(i));
    }
    for a in 0..nodes {
        for b in (a + 1)..nodes {
            if rng.gen_bool(p) {
                graph.add_edge(Edge::new(a, b, 1.0));
            }
        }
    }
    graph
}

/// All-pairs hop counts (Floyd-Warshall); `usize::MAX` for unreachable pairs.
pub fn all_pairs_hops(graph: &Graph, nodes: usize) -> Vec<Vec<usize>> {
    let mut dist = vec![vec![usize::MAX; nodes]; nodes];
    for (i, row) in dist.iter_mut().enumerate() {
        row[i] = 0;
        for edge in graph.edges_of_node(i) {
            row[edge.to] = 1;
        }
    }
    for k in 0..nodes {
        for i in 0..nodes {
            for j in 0..nodes {
                if dist[i][k] != usize::MAX && dist[k][j] != usize::MAX {
                    let via = dist[i][k] + dist[k][j];
                    if via < dist[i][j] {
                        dist[i][j] = via;
                    }
                }
            }
        }
    }
    dist
}
