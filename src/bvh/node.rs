//! BVH node data structure

use crate::float_types::Real;
use crate::math::{BoundingBox, Triangle};

/// Handle of a node inside [`Bvh`](super::Bvh)'s node arena.
pub type BvhNodeId = usize;

/// Number of floats stored per triangle primitive.
pub const TRIANGLE_STRIDE: usize = 9;

/// A BVH node. Children are owned by the arena and referenced by handle;
/// `parent` is a plain back-reference (`None` for the root).
///
/// After construction a node is a leaf exactly when it has no children, and
/// only leaves store primitives.
#[derive(Debug, Clone)]
pub struct BvhNode {
    pub parent: Option<BvhNodeId>,
    pub children: Vec<BvhNodeId>,
    pub bounding_box: BoundingBox,
    /// Flat triangle soup, nine floats per triangle.
    pub primitives: Vec<Real>,
}

impl BvhNode {
    pub(crate) fn new(parent: Option<BvhNodeId>, primitives: Vec<Real>) -> Self {
        Self {
            parent,
            children: Vec::new(),
            bounding_box: BoundingBox::zero(),
            primitives,
        }
    }

    #[inline]
    pub const fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    #[inline]
    pub fn primitive_count(&self) -> usize {
        self.primitives.len() / TRIANGLE_STRIDE
    }

    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.primitives
            .chunks_exact(TRIANGLE_STRIDE)
            .map(Triangle::from_slice)
    }

    /// Recompute the box from the stored primitives. Without primitives the box
    /// collapses onto the origin.
    pub(crate) fn compute_bounding_box(&mut self) {
        if self.primitives.len() < TRIANGLE_STRIDE {
            self.bounding_box = BoundingBox::zero();
            return;
        }
        let mut bb = BoundingBox::empty();
        for vertex in self.primitives.chunks_exact(3) {
            bb.expand_point(&nalgebra::Point3::new(vertex[0], vertex[1], vertex[2]));
        }
        self.bounding_box = bb;
    }
}
