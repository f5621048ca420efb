//! Traits defining BVH split policies

use crate::float_types::Real;
use nalgebra::Point3;

/// Picks the cardinal axis (0 = x, 1 = y, 2 = z) along which a node's
/// primitives are sorted before being distributed to its children.
pub trait SplitAxisStrategy {
    fn split_axis(&self, centroids: &[Point3<Real>]) -> usize;
}

/// Default strategy: the axis with the largest spread of primitive centroids.
/// Ties resolve to the lower axis index.
#[derive(Debug, Clone, Copy, Default)]
pub struct CentroidSpreadAxis;

impl SplitAxisStrategy for CentroidSpreadAxis {
    fn split_axis(&self, centroids: &[Point3<Real>]) -> usize {
        let Some(first) = centroids.first() else {
            return 0;
        };
        let (mins, maxs) = centroids
            .iter()
            .fold((*first, *first), |(lo, hi), c| (lo.inf(c), hi.sup(c)));
        let spread = maxs - mins;

        let mut axis = 0;
        for candidate in 1..3 {
            if spread[candidate] > spread[axis] {
                axis = candidate;
            }
        }
        axis
    }
}
