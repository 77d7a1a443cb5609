#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

use log::{debug, trace};

use crate::{
    error::Error,
    ops::{Commutative, Identity},
    range::{check_index, clamp, mid},
};

/// This data structure allows interval queries and single element modification.
///
/// This tree allocates `4n * sizeof(N)` bytes of memory and uses the same layout as
/// [`LazySegmentTree`], without the pending deltas. It only needs the operation to be
/// commutative and to have an identity, so it also works for operations that cannot
/// absorb interval updates.
///
/// [`LazySegmentTree`]: crate::LazySegmentTree
///
/// # Examples
///
/// ```rust
/// use lazy_segtree::SegmentTree;
/// use lazy_segtree::ops::Min;
///
/// let mut tree = SegmentTree::build(&[4, 3, 2, 8, 5, 1, 2, 1], Min).unwrap();
/// assert_eq!(tree.range_query(0, 3), 2);
/// tree.point_update(2, 9).unwrap();
/// assert_eq!(tree.range_query(0, 3), 3);
/// assert_eq!(tree.range_query(-10, 10), 1);
/// ```
#[derive(Clone, Debug)]
pub struct SegmentTree<N, O> {
    tree: Vec<N>,
    n: usize,
    op: O,
}

#[allow(clippy::len_without_is_empty)]
impl<N: Clone, O: Commutative<N> + Identity<N>> SegmentTree<N, O> {
    /// Builds a tree over a copy of the given values.
    /// Uses `O(len)` time.
    ///
    /// Returns [`Error::Empty`] if `values` is empty.
    pub fn build(values: &[N], op: O) -> Result<Self, Error> {
        Self::from_vec(values.to_vec(), op)
    }
    /// Builds a tree over the values in the vector, moving them into the leaves.
    /// Uses `O(len)` time.
    pub fn from_vec(values: Vec<N>, op: O) -> Result<Self, Error> {
        let n = values.len();
        if n == 0 {
            return Err(Error::Empty);
        }
        let mut tree = SegmentTree {
            tree: vec![op.identity(); 4 * n],
            n,
            op,
        };
        tree.build_node(0, 0, n - 1, &mut values.into_iter());
        debug!("built segment tree over {n} elements");
        Ok(tree)
    }
    /// Builds a tree over the values yielded by the iterator.
    /// Uses `O(len)` time.
    pub fn build_iter<I: IntoIterator<Item = N>>(iter: I, op: O) -> Result<Self, Error> {
        Self::from_vec(iter.into_iter().collect(), op)
    }

    fn build_node(
        &mut self,
        node: usize,
        left: usize,
        right: usize,
        values: &mut impl Iterator<Item = N>,
    ) {
        // leaves are reached in index order
        if left == right {
            if let Some(value) = values.next() {
                self.tree[node] = value;
            }
            return;
        }
        let mid = mid(left, right);
        self.build_node(2 * node + 1, left, mid, values);
        self.build_node(2 * node + 2, mid + 1, right, values);
        self.tree[node] = self
            .op
            .combine(&self.tree[2 * node + 1], &self.tree[2 * node + 2]);
    }

    /// Combines every value in the inclusive interval `[left, right]`.
    /// Uses `O(log(len))` time.
    ///
    /// The bounds are clamped to `[0, len - 1]`. If the clamped interval is empty this
    /// method returns the identity of the operation.
    pub fn range_query(&self, left: isize, right: isize) -> N {
        match clamp(left, right, self.n) {
            Some((ql, qr)) => self.query_node(0, 0, self.n - 1, ql, qr),
            None => {
                trace!("range query [{left}, {right}] is empty, returning identity");
                self.op.identity()
            }
        }
    }

    fn query_node(&self, node: usize, left: usize, right: usize, ql: usize, qr: usize) -> N {
        if qr < left || right < ql {
            return self.op.identity();
        }
        if ql <= left && right <= qr {
            return self.tree[node].clone();
        }
        let mid = mid(left, right);
        let left_result = self.query_node(2 * node + 1, left, mid, ql, qr);
        let right_result = self.query_node(2 * node + 2, mid + 1, right, ql, qr);
        self.op.combine_left(left_result, &right_result)
    }

    /// Sets the value at `index` and returns the old value.
    /// Uses `O(log(len))` time.
    ///
    /// Returns [`Error::IndexOutOfRange`] and leaves the tree untouched if `index` is not
    /// in `[0, len - 1]`.
    pub fn point_update(&mut self, index: isize, value: N) -> Result<N, Error> {
        let index = check_index(index, self.n).inspect_err(|err| {
            debug!("rejected point update: {err}");
        })?;
        Ok(self.point_node(0, 0, self.n - 1, index, value))
    }

    fn point_node(&mut self, node: usize, left: usize, right: usize, index: usize, value: N) -> N {
        if left == right {
            return core::mem::replace(&mut self.tree[node], value);
        }
        let mid = mid(left, right);
        let old = if index <= mid {
            self.point_node(2 * node + 1, left, mid, index, value)
        } else {
            self.point_node(2 * node + 2, mid + 1, right, index, value)
        };
        self.tree[node] = self
            .op
            .combine(&self.tree[2 * node + 1], &self.tree[2 * node + 2]);
        old
    }

    /// Returns the value at `index`.
    /// Uses `O(log(len))` time.
    pub fn get(&self, index: isize) -> Result<N, Error> {
        let index = check_index(index, self.n)?;
        let (mut node, mut left, mut right) = (0, 0, self.n - 1);
        while left != right {
            let mid = mid(left, right);
            if index <= mid {
                node = 2 * node + 1;
                right = mid;
            } else {
                node = 2 * node + 2;
                left = mid + 1;
            }
        }
        Ok(self.tree[node].clone())
    }

    /// Returns the current values in index order.
    /// Uses `O(len)` time.
    pub fn values(&self) -> Vec<N> {
        let mut values = Vec::with_capacity(self.n);
        self.collect_node(0, 0, self.n - 1, &mut values);
        values
    }

    fn collect_node(&self, node: usize, left: usize, right: usize, out: &mut Vec<N>) {
        if left == right {
            out.push(self.tree[node].clone());
            return;
        }
        let mid = mid(left, right);
        self.collect_node(2 * node + 1, left, mid, out);
        self.collect_node(2 * node + 2, mid + 1, right, out);
    }

    /// Returns the number of values in the underlying array.
    /// Uses `O(1)` time.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.n
    }

    /// Returns the operation this tree aggregates with.
    #[inline(always)]
    pub fn op(&self) -> &O {
        &self.op
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::{Add, Max, Min};

    #[test]
    fn max_segtree() {
        let arr = [4u32, 3, 2, 8, 5, 1, 2, 1];
        let mut tree = SegmentTree::build(&arr, Max).unwrap();
        assert_eq!(tree.range_query(1, 7), 8);
        assert_eq!(tree.point_update(2, 9), Ok(2));
        assert_eq!(tree.range_query(1, 3), 9);
        tree.point_update(4, 11).unwrap();
        assert_eq!(tree.range_query(5, 7), 2);
        assert_eq!(tree.values(), vec![4, 3, 9, 8, 11, 1, 2, 1]);
    }

    #[test]
    fn sum_segtree() {
        let arr = [4u32, 3, 2, 8, 5, 1, 2, 1];
        let mut tree = SegmentTree::build_iter(arr, Add).unwrap();
        assert_eq!(tree.range_query(0, 7), 26);
        tree.point_update(2, 9).unwrap();
        assert_eq!(tree.range_query(1, 3), 20);
        assert_eq!(tree.range_query(4, 2), 0);
        assert_eq!(tree.get(2), Ok(9));
    }

    #[test]
    fn bounds() {
        let mut tree = SegmentTree::from_vec(vec![3i8, -4, 5], Min).unwrap();
        assert_eq!(tree.range_query(-100, 100), -4);
        assert_eq!(tree.range_query(2, 1), i8::MAX);
        assert_eq!(
            tree.point_update(3, 0),
            Err(Error::IndexOutOfRange { index: 3, len: 3 })
        );
        assert_eq!(tree.values(), vec![3, -4, 5]);
        assert!(SegmentTree::<i8, _>::build(&[], Min).is_err());
    }
}
