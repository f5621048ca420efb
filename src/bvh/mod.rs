//! Bounding Volume Hierarchy (BVH) over triangle soups
//!
//! The hierarchy is built once from a static primitive set and then queried
//! with rays. Nodes live in an arena owned by [`Bvh`]; children and parents
//! are referenced by [`BvhNodeId`].

pub mod node;
pub mod traits;

pub use node::{BvhNode, BvhNodeId, TRIANGLE_STRIDE};
pub use traits::{CentroidSpreadAxis, SplitAxisStrategy};

use crate::errors::ValidationError;
use crate::float_types::Real;
use crate::math::{Ray, Triangle};
use nalgebra::Point3;

/// Build parameters of a [`Bvh`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BvhConfig {
    /// Children created per split; must be at least 2.
    pub branching_factor: usize,
    /// A node is only split while every child would receive at least this
    /// many triangles; must be at least 1.
    pub primitives_per_node: usize,
    /// Nodes deeper than this are never split (the root is at depth 1).
    pub max_depth: usize,
    /// Reject triangle hits on the back side (clockwise as seen from the ray).
    pub cull_back_faces: bool,
}

impl Default for BvhConfig {
    fn default() -> Self {
        Self {
            branching_factor: 2,
            primitives_per_node: 1,
            max_depth: 10,
            cull_back_faces: true,
        }
    }
}

/// A bounding volume hierarchy. The root is always node `0`.
#[derive(Debug, Clone)]
pub struct Bvh {
    nodes: Vec<BvhNode>,
    config: BvhConfig,
}

impl Bvh {
    pub const ROOT: BvhNodeId = 0;

    /// Build from a flat triangle soup (nine floats per triangle).
    ///
    /// Trailing floats that do not form a whole triangle are ignored.
    pub fn from_triangles(vertices: &[Real], config: BvhConfig) -> Self {
        Self::from_triangles_with_strategy(vertices, config, &CentroidSpreadAxis)
    }

    pub fn from_triangles_with_strategy<SP: SplitAxisStrategy>(
        vertices: &[Real],
        config: BvhConfig,
        strategy: &SP,
    ) -> Self {
        assert!(config.branching_factor >= 2, "branching factor must be at least 2");
        assert!(config.primitives_per_node >= 1, "primitives per node must be at least 1");

        let remainder = vertices.len() % TRIANGLE_STRIDE;
        if remainder != 0 {
            log::warn!(
                "ignoring {} trailing floats that do not form a triangle",
                remainder
            );
        }
        let primitives = vertices[..vertices.len() - remainder].to_vec();

        let mut bvh = Bvh {
            nodes: vec![BvhNode::new(None, primitives)],
            config,
        };
        bvh.build_node(Self::ROOT, 1, strategy);

        log::debug!(
            "built BVH with {} nodes, {} leaves, {} triangles",
            bvh.nodes.len(),
            bvh.leaves().count(),
            bvh.primitive_count()
        );
        bvh
    }

    /// Build from triangles given as values.
    pub fn from_triangle_list(triangles: &[Triangle], config: BvhConfig) -> Self {
        let vertices: Vec<Real> = triangles
            .iter()
            .flat_map(|t| {
                [
                    t.a.x, t.a.y, t.a.z, t.b.x, t.b.y, t.b.z, t.c.x, t.c.y, t.c.z,
                ]
            })
            .collect();
        Self::from_triangles(&vertices, config)
    }

    /// Build from an indexed mesh: `positions` holds `xyz` triples and every
    /// three `indices` form a triangle.
    pub fn from_indexed(
        positions: &[Real],
        indices: &[u32],
        config: BvhConfig,
    ) -> Result<Self, ValidationError> {
        if positions.len() % 3 != 0 {
            return Err(ValidationError::IncompleteTriangle {
                len: positions.len(),
                stride: 3,
            });
        }
        if indices.len() % 3 != 0 {
            return Err(ValidationError::IncompleteTriangle {
                len: indices.len(),
                stride: 3,
            });
        }

        let vertex_count = positions.len() / 3;
        let mut vertices = Vec::with_capacity(indices.len() * 3);
        for &index in indices {
            let index = index as usize;
            if index >= vertex_count {
                return Err(ValidationError::IndexOutOfRange {
                    index,
                    len: vertex_count,
                });
            }
            vertices.extend_from_slice(&positions[index * 3..index * 3 + 3]);
        }
        Ok(Self::from_triangles(&vertices, config))
    }

    #[inline]
    pub const fn config(&self) -> &BvhConfig {
        &self.config
    }

    #[inline]
    pub fn root(&self) -> &BvhNode {
        &self.nodes[Self::ROOT]
    }

    #[inline]
    pub fn node(&self, id: BvhNodeId) -> Option<&BvhNode> {
        self.nodes.get(id)
    }

    #[inline]
    pub fn nodes(&self) -> &[BvhNode] {
        &self.nodes
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn leaves(&self) -> impl Iterator<Item = &BvhNode> + '_ {
        self.nodes.iter().filter(|n| n.is_leaf())
    }

    /// Number of ancestors of `id` (the root has depth 0), or `None` for a
    /// handle that does not belong to this hierarchy.
    pub fn depth(&self, id: BvhNodeId) -> Option<usize> {
        let mut depth = 0;
        let mut current = self.node(id)?.parent;
        while let Some(parent) = current {
            depth += 1;
            current = self.node(parent)?.parent;
        }
        Some(depth)
    }

    /// Total number of triangles held by the leaves.
    pub fn primitive_count(&self) -> usize {
        self.leaves().map(BvhNode::primitive_count).sum()
    }

    /// Visit every node in depth-first pre-order.
    pub fn traverse<F: FnMut(BvhNodeId, &BvhNode)>(&self, mut visit: F) {
        let mut stack = vec![Self::ROOT];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id];
            visit(id, node);
            stack.extend(node.children.iter().rev());
        }
    }

    /// The intersection point closest to the ray origin, if any.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<Point3<Real>> {
        let mut hits = Vec::new();
        self.collect_hits(Self::ROOT, ray, &mut hits);
        hits.into_iter().min_by(|a, b| {
            (a - ray.origin)
                .norm_squared()
                .total_cmp(&(b - ray.origin).norm_squared())
        })
    }

    /// True if the ray hits any triangle; stops at the first hit found.
    pub fn intersects_ray(&self, ray: &Ray) -> bool {
        let mut stack = vec![Self::ROOT];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id];
            if !ray.intersects_box(&node.bounding_box) {
                continue;
            }
            if node.is_leaf() {
                if node
                    .triangles()
                    .any(|t| ray.intersect_triangle(&t, self.config.cull_back_faces).is_some())
                {
                    return true;
                }
            } else {
                stack.extend(node.children.iter().copied());
            }
        }
        false
    }

    fn collect_hits(&self, id: BvhNodeId, ray: &Ray, hits: &mut Vec<Point3<Real>>) {
        let node = &self.nodes[id];
        if !ray.intersects_box(&node.bounding_box) {
            return;
        }
        if node.is_leaf() {
            hits.extend(
                node.triangles()
                    .filter_map(|t| ray.intersect_triangle(&t, self.config.cull_back_faces)),
            );
        } else {
            for &child in &node.children {
                self.collect_hits(child, ray, hits);
            }
        }
    }

    fn build_node<SP: SplitAxisStrategy>(
        &mut self,
        id: BvhNodeId,
        current_depth: usize,
        strategy: &SP,
    ) {
        self.nodes[id].compute_bounding_box();

        let primitive_count = self.nodes[id].primitive_count();
        let per_child = primitive_count / self.config.branching_factor;

        if current_depth <= self.config.max_depth && per_child >= self.config.primitives_per_node
        {
            for child in self.split(id, strategy) {
                self.build_node(child, current_depth + 1, strategy);
            }
        }
    }

    /// Move the node's primitives into `branching_factor` new children, sorted
    /// along the split axis. The last child absorbs the division remainder.
    fn split<SP: SplitAxisStrategy>(&mut self, id: BvhNodeId, strategy: &SP) -> Vec<BvhNodeId> {
        let primitives = std::mem::take(&mut self.nodes[id].primitives);
        let triangles: Vec<&[Real]> = primitives.chunks_exact(TRIANGLE_STRIDE).collect();
        let centroids: Vec<Point3<Real>> = triangles
            .iter()
            .map(|t| Triangle::from_slice(t).centroid())
            .collect();

        let axis = strategy.split_axis(&centroids);
        let mut order: Vec<usize> = (0..triangles.len()).collect();
        order.sort_by(|&a, &b| centroids[a][axis].total_cmp(&centroids[b][axis]));

        let branching = self.config.branching_factor;
        let per_child = triangles.len() / branching;
        let mut children = Vec::with_capacity(branching);

        for i in 0..branching {
            let start = i * per_child;
            let end = if i == branching - 1 {
                triangles.len()
            } else {
                start + per_child
            };
            let child_primitives: Vec<Real> = order[start..end]
                .iter()
                .flat_map(|&t| triangles[t].iter().copied())
                .collect();

            let child_id = self.nodes.len();
            self.nodes.push(BvhNode::new(Some(id), child_primitives));
            children.push(child_id);
        }

        self.nodes[id].children = children.clone();
        children
    }
}
