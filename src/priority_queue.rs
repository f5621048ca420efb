//! Binary min-heap with a pluggable comparator.

use std::cmp::Ordering;

/// A binary heap that pops the smallest element first according to `C`.
///
/// Unlike [`std::collections::BinaryHeap`] the ordering is supplied as a
/// closure, so elements such as `(cost, node)` pairs with float costs can be
/// queued without a newtype.
#[derive(Clone)]
pub struct PriorityQueue<T, C = fn(&T, &T) -> Ordering> {
    data: Vec<T>,
    compare: C,
}

impl<T: Ord> PriorityQueue<T> {
    /// Queue ordered by `T`'s natural ordering.
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            compare: T::cmp,
        }
    }
}

impl<T: Ord> Default for PriorityQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C> PriorityQueue<T, C>
where
    C: Fn(&T, &T) -> Ordering,
{
    pub fn with_comparator(compare: C) -> Self {
        Self {
            data: Vec::new(),
            compare,
        }
    }

    pub fn push(&mut self, item: T) {
        self.data.push(item);
        self.sift_up(self.data.len() - 1);
    }

    /// Remove and return the smallest element.
    pub fn pop(&mut self) -> Option<T> {
        if self.data.is_empty() {
            return None;
        }
        let top = self.data.swap_remove(0);
        if !self.data.is_empty() {
            self.sift_down(0);
        }
        Some(top)
    }

    /// The smallest element, without removing it.
    #[inline]
    pub fn peek(&self) -> Option<&T> {
        self.data.first()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if (self.compare)(&self.data[index], &self.data[parent]) != Ordering::Less {
                break;
            }
            self.data.swap(index, parent);
            index = parent;
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.data.len();
        loop {
            let left = 2 * index + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let mut best = left;
            if right < len
                && (self.compare)(&self.data[right], &self.data[left]) == Ordering::Less
            {
                best = right;
            }
            if (self.compare)(&self.data[best], &self.data[index]) != Ordering::Less {
                break;
            }
            self.data.swap(index, best);
            index = best;
        }
    }
}

impl<T: std::fmt::Debug, C> std::fmt::Debug for PriorityQueue<T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PriorityQueue").field("data", &self.data).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_ascending_order() {
        let mut queue = PriorityQueue::new();
        for v in [5, 1, 4, 1, 9, 2, 6] {
            queue.push(v);
        }
        let mut drained = Vec::new();
        while let Some(v) = queue.pop() {
            drained.push(v);
        }
        assert_eq!(drained, vec![1, 1, 2, 4, 5, 6, 9]);
    }

    #[test]
    fn custom_comparator_reverses_order() {
        let mut queue = PriorityQueue::with_comparator(|a: &i32, b: &i32| b.cmp(a));
        queue.push(3);
        queue.push(7);
        queue.push(5);
        assert_eq!(queue.peek(), Some(&7));
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.pop(), Some(7));
    }

    #[test]
    fn float_costs() {
        let mut queue =
            PriorityQueue::with_comparator(|a: &(f64, usize), b: &(f64, usize)| a.0.total_cmp(&b.0));
        queue.push((2.5, 0));
        queue.push((0.5, 1));
        queue.push((1.5, 2));
        assert_eq!(queue.pop().map(|(_, n)| n), Some(1));
        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(queue.pop(), None);
    }
}
