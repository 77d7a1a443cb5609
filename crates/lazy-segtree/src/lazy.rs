use core::mem;

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

use log::{debug, trace};

use crate::{
    error::Error,
    ops::Lazy,
    range::{check_index, clamp, mid},
};

/// This data structure allows interval updates, point updates and interval queries.
///
/// This tree allocates `8n * sizeof(N)` bytes of memory: one aggregate and one pending
/// delta for each of the `4n` node slots.
///
/// The tree is stored implicitly in an array where node `i` has the children `2i + 1`
/// and `2i + 2`, and node `0` owns the whole array. Interval updates stop at the nodes
/// fully covered by the interval and leave a pending delta for their children, which is
/// pushed down the next time a call passes through the node.
///
/// Interval bounds are inclusive and clamped to the array, so no interval operation can
/// fail. Point operations reject indices outside of the array.
///
/// # Examples
///
/// Quickly add something to every value in some interval.
///
/// ```rust
/// use lazy_segtree::LazySegmentTree;
/// use lazy_segtree::ops::Add;
///
/// let mut tree = LazySegmentTree::build(&[0i64; 1000], Add).unwrap();
///
/// // add one to every value between 200 and 499
/// tree.range_update(200, 499, 1);
/// assert_eq!(tree.range_query(0, 999), 300);
/// assert_eq!(tree.range_query(450, 550), 50);
///
/// // overwrite a single value
/// tree.point_update(300, -700).unwrap();
/// assert_eq!(tree.range_query(0, 999), -401);
/// assert_eq!(tree.get(300), Ok(-700));
/// ```
#[derive(Clone, Debug)]
pub struct LazySegmentTree<N, O> {
    tree: Vec<N>,
    pending: Vec<N>,
    n: usize,
    op: O,
}

#[allow(clippy::len_without_is_empty)]
impl<N: Clone, O: Lazy<N>> LazySegmentTree<N, O> {
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
        let mut tree = LazySegmentTree {
            tree: vec![op.identity(); 4 * n],
            pending: vec![op.no_delta(); 4 * n],
            n,
            op,
        };
        tree.build_node(0, 0, n - 1, &mut values.into_iter());
        debug!("built lazy segment tree over {n} elements");
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
        self.pull(node);
    }

    /// Applies the pending delta of `node` to its aggregate and hands it to the children.
    #[inline]
    fn push(&mut self, node: usize, left: usize, right: usize) {
        if self.op.is_no_delta(&self.pending[node]) {
            return;
        }
        let delta = mem::replace(&mut self.pending[node], self.op.no_delta());
        self.tree[node] = self.op.apply_delta(&self.tree[node], &delta, right - left + 1);
        if left != right {
            for child in [2 * node + 1, 2 * node + 2] {
                self.pending[child] = self.op.compose_delta(&self.pending[child], &delta);
            }
        }
    }

    /// Recomputes the aggregate of `node` from its flushed children.
    #[inline]
    fn pull(&mut self, node: usize) {
        self.tree[node] = self
            .op
            .combine(&self.tree[2 * node + 1], &self.tree[2 * node + 2]);
    }

    /// Adds `delta` to every value in the inclusive interval `[left, right]`.
    /// Uses `O(log(len))` time.
    ///
    /// The bounds are clamped to `[0, len - 1]`. If the clamped interval is empty this
    /// method does nothing.
    pub fn range_update(&mut self, left: isize, right: isize, delta: N) {
        match clamp(left, right, self.n) {
            Some((ql, qr)) => self.update_node(0, 0, self.n - 1, ql, qr, &delta),
            None => trace!("range update [{left}, {right}] is empty, ignoring"),
        }
    }

    fn update_node(
        &mut self,
        node: usize,
        left: usize,
        right: usize,
        ql: usize,
        qr: usize,
        delta: &N,
    ) {
        self.push(node, left, right);
        // no overlap
        if qr < left || right < ql {
            return;
        }
        // full overlap
        if ql <= left && right <= qr {
            self.pending[node] = self.op.compose_delta(&self.pending[node], delta);
            self.push(node, left, right);
            return;
        }
        // partial overlap
        let mid = mid(left, right);
        self.update_node(2 * node + 1, left, mid, ql, qr, delta);
        self.update_node(2 * node + 2, mid + 1, right, ql, qr, delta);
        self.pull(node);
    }

    /// Combines every value in the inclusive interval `[left, right]`.
    /// Uses `O(log(len))` time.
    ///
    /// The bounds are clamped to `[0, len - 1]`. If the clamped interval is empty this
    /// method returns the identity of the operation.
    ///
    /// Pending deltas on the visited paths are pushed down, which is why this method
    /// takes `&mut self`.
    pub fn range_query(&mut self, left: isize, right: isize) -> N {
        match clamp(left, right, self.n) {
            Some((ql, qr)) => self.query_node(0, 0, self.n - 1, ql, qr),
            None => {
                trace!("range query [{left}, {right}] is empty, returning identity");
                self.op.identity()
            }
        }
    }

    fn query_node(&mut self, node: usize, left: usize, right: usize, ql: usize, qr: usize) -> N {
        self.push(node, left, right);
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

    /// Sets the value at `index`.
    /// Uses `O(log(len))` time.
    ///
    /// Returns [`Error::IndexOutOfRange`] and leaves the tree untouched if `index` is not
    /// in `[0, len - 1]`.
    pub fn point_update(&mut self, index: isize, value: N) -> Result<(), Error> {
        let index = check_index(index, self.n).inspect_err(|err| {
            debug!("rejected point update: {err}");
        })?;
        self.point_node(0, 0, self.n - 1, index, value);
        Ok(())
    }

    fn point_node(&mut self, node: usize, left: usize, right: usize, index: usize, value: N) {
        self.push(node, left, right);
        if left == right {
            self.tree[node] = value;
            return;
        }
        let mid = mid(left, right);
        if index <= mid {
            self.point_node(2 * node + 1, left, mid, index, value);
            self.push(2 * node + 2, mid + 1, right);
        } else {
            self.point_node(2 * node + 2, mid + 1, right, index, value);
            self.push(2 * node + 1, left, mid);
        }
        self.pull(node);
    }

    /// Computes the value at `index` without pushing any pending delta.
    /// Uses `O(log(len))` time.
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index` is not in `[0, len - 1]`.
    pub fn get(&self, index: isize) -> Result<N, Error> {
        let index = check_index(index, self.n)?;
        let (mut node, mut left, mut right) = (0, 0, self.n - 1);
        let mut delta = self.op.no_delta();
        loop {
            delta = self.op.compose_delta(&delta, &self.pending[node]);
            if left == right {
                return Ok(self.op.apply_delta(&self.tree[node], &delta, 1));
            }
            let mid = mid(left, right);
            if index <= mid {
                node = 2 * node + 1;
                right = mid;
            } else {
                node = 2 * node + 2;
                left = mid + 1;
            }
        }
    }

    /// Pushes every pending delta down to the leaves and returns the current values.
    ///
    /// Uses `O(len)` time. Afterwards no delta is pending anywhere in the tree.
    pub fn propagate(&mut self) -> Vec<N> {
        let mut values = Vec::with_capacity(self.n);
        self.collect_node(0, 0, self.n - 1, &mut values);
        values
    }

    fn collect_node(&mut self, node: usize, left: usize, right: usize, out: &mut Vec<N>) {
        self.push(node, left, right);
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
impl<N: Clone + PartialEq + core::fmt::Debug, O: Lazy<N>> LazySegmentTree<N, O> {
    /// Asserts that every internal aggregate equals the combination of its children with
    /// their pending deltas applied.
    fn assert_consistent(&self) {
        self.assert_node(0, 0, self.n - 1);
    }

    fn assert_node(&self, node: usize, left: usize, right: usize) {
        if left == right {
            return;
        }
        let mid = mid(left, right);
        let (l, r) = (2 * node + 1, 2 * node + 2);
        let l_agg = self.op.apply_delta(&self.tree[l], &self.pending[l], mid - left + 1);
        let r_agg = self.op.apply_delta(&self.tree[r], &self.pending[r], right - mid);
        assert_eq!(
            self.tree[node],
            self.op.combine(&l_agg, &r_agg),
            "node {node} owning [{left}, {right}] is stale"
        );
        self.assert_node(l, left, mid);
        self.assert_node(r, mid + 1, right);
    }

    fn assert_flushed(&self) {
        assert!(self.pending.iter().all(|d| self.op.is_no_delta(d)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::{Add, Aggregation, Max, Min, Operation};
    use std::num::Wrapping;

    #[test]
    fn empty_build_fails() {
        assert_eq!(
            LazySegmentTree::<i32, _>::build(&[], Add).unwrap_err(),
            Error::Empty
        );
        assert!(LazySegmentTree::build_iter(core::iter::empty::<u8>(), Min).is_err());
    }

    #[test]
    fn single_element() {
        let mut tree = LazySegmentTree::build(&[7], Add).unwrap();
        assert_eq!(tree.range_query(0, 0), 7);
        tree.range_update(0, 0, 3);
        assert_eq!(tree.range_query(0, 0), 10);
        tree.point_update(0, -1).unwrap();
        assert_eq!(tree.range_query(0, 0), -1);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn min_shifts_without_scaling() {
        let mut tree = LazySegmentTree::build(&[5, 1, 4, 2, 8], Min).unwrap();
        tree.range_update(0, 4, -3);
        assert_eq!(tree.range_query(0, 4), -2);
        assert_eq!(tree.range_query(1, 3), -2);
        assert_eq!(tree.range_query(2, 2), 1);
        tree.assert_consistent();
    }

    #[test]
    fn max_with_partial_updates() {
        let mut tree = LazySegmentTree::build(&[4, 3, 2, 8, 5, 1, 2, 1], Max).unwrap();
        assert_eq!(tree.range_query(0, 7), 8);
        tree.range_update(4, 7, 10);
        assert_eq!(tree.range_query(0, 7), 15);
        assert_eq!(tree.range_query(0, 3), 8);
        assert_eq!(tree.range_query(5, 7), 12);
        tree.point_update(4, 0).unwrap();
        assert_eq!(tree.range_query(4, 7), 12);
        tree.assert_consistent();
    }

    #[test]
    fn sum_scales_by_length() {
        let mut tree = LazySegmentTree::build(&[1i64, 2, 3, 4, 5, 6], Add).unwrap();
        tree.range_update(1, 4, 10);
        assert_eq!(tree.range_query(0, 5), 61);
        assert_eq!(tree.range_query(2, 3), 27);
        tree.range_update(0, 2, -1);
        assert_eq!(tree.range_query(0, 5), 58);
        assert_eq!(tree.propagate(), vec![0, 11, 12, 14, 15, 6]);
        tree.assert_flushed();
        tree.assert_consistent();
    }

    #[test]
    fn empty_ranges() {
        let mut tree = LazySegmentTree::build(&[1, 2, 3, 4, 5, 6], Add).unwrap();
        tree.range_update(5, 2, 100);
        tree.range_update(6, 9, 100);
        tree.range_update(-9, -1, 100);
        assert_eq!(tree.propagate(), vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(tree.range_query(5, 2), 0);

        let mut tree = LazySegmentTree::build(&[1, 2, 3], Min).unwrap();
        assert_eq!(tree.range_query(5, 2), i32::MAX);
    }

    #[test]
    fn clamped_ranges() {
        let mut tree = LazySegmentTree::build(&[1, 2, 3, 4], Add).unwrap();
        tree.range_update(-5, 1, 1);
        tree.range_update(3, 40, 2);
        assert_eq!(tree.propagate(), vec![2, 3, 3, 6]);
        assert_eq!(tree.range_query(isize::MIN, isize::MAX), 14);
    }

    #[test]
    fn out_of_range_point_update() {
        let mut tree = LazySegmentTree::build(&[1, 2, 3], Add).unwrap();
        tree.range_update(0, 2, 1);
        let before = tree.range_query(0, 2);
        assert_eq!(
            tree.point_update(-1, 10),
            Err(Error::IndexOutOfRange { index: -1, len: 3 })
        );
        assert_eq!(
            tree.point_update(3, 10),
            Err(Error::IndexOutOfRange { index: 3, len: 3 })
        );
        assert_eq!(tree.range_query(0, 2), before);
        assert_eq!(tree.get(3), Err(Error::IndexOutOfRange { index: 3, len: 3 }));
    }

    #[test]
    fn point_update_below_pending_delta() {
        let mut tree = LazySegmentTree::build(&[0; 8], Add).unwrap();
        tree.range_update(0, 7, 5);
        // the root absorbed the update, its children still hold it as pending
        tree.point_update(2, 1).unwrap();
        tree.assert_consistent();
        assert_eq!(tree.range_query(0, 7), 36);
        assert_eq!(tree.range_query(4, 7), 20);
        assert_eq!(tree.propagate(), vec![5, 5, 1, 5, 5, 5, 5, 5]);
    }

    #[test]
    fn get_sees_pending_deltas() {
        let mut tree = LazySegmentTree::build(&[3, 1, 4, 1, 5], Max).unwrap();
        tree.range_update(0, 4, 2);
        tree.range_update(1, 2, -7);
        for (i, expected) in [5, -4, -1, 3, 7].into_iter().enumerate() {
            assert_eq!(tree.get(i as isize), Ok(expected));
        }
    }

    #[test]
    fn repeated_query_is_stable() {
        let mut tree = LazySegmentTree::build(&[2, 7, 1, 8, 2, 8], Aggregation::Min).unwrap();
        tree.range_update(1, 4, 3);
        let first = tree.range_query(0, 3);
        assert_eq!(first, tree.range_query(0, 3));
        assert_eq!(first, 2);
    }

    #[test]
    fn floats() {
        let mut tree = LazySegmentTree::build(&[0.5f64, 1.5, -2.0], Max).unwrap();
        tree.range_update(2, 2, 4.0);
        assert_eq!(tree.range_query(0, 2), 2.0);
        assert_eq!(tree.range_query(3, 1), f64::NEG_INFINITY);
    }

    #[test]
    fn narrow_signed_sums() {
        let ones = core::iter::repeat(1i8).take(64);
        let mut tree = LazySegmentTree::build_iter(ones.chain([0; 64]), Add).unwrap();
        tree.range_update(0, 127, -1);
        assert_eq!(tree.range_query(0, 127), -64);
        assert_eq!(tree.range_query(64, 127), -64);
        tree.assert_consistent();

        let mut values = vec![1i16; 20_000];
        values.resize(40_000, 0);
        let mut tree = LazySegmentTree::from_vec(values, Add).unwrap();
        tree.range_update(0, 39_999, -1);
        assert_eq!(tree.range_query(0, 39_999), -20_000);
        assert_eq!(tree.get(39_999), Ok(-1));
    }

    #[test]
    fn owned_builds_keep_index_order() {
        for n in 1..40i64 {
            let values: Vec<i64> = (0..n).map(|i| i * i - 7).collect();
            let mut from_vec = LazySegmentTree::from_vec(values.clone(), Min).unwrap();
            let mut from_iter = LazySegmentTree::build_iter(values.iter().copied(), Min).unwrap();
            from_vec.assert_consistent();
            assert_eq!(from_vec.propagate(), values);
            assert_eq!(from_iter.propagate(), values);
        }
    }

    #[test]
    fn random_against_naive() {
        let mut rng = fastrand::Rng::with_seed(0x5e9);
        for n in 1..130 {
            let mut buf: Vec<Wrapping<i32>> = (0..n).map(|_| Wrapping(rng.i32(..))).collect();
            let mut tree = match n % 3 {
                0 => LazySegmentTree::build(&buf, Add),
                1 => LazySegmentTree::build_iter(buf.iter().cloned(), Add),
                _ => LazySegmentTree::from_vec(buf.clone(), Add),
            }
            .unwrap();
            for _ in 0..20 {
                let l = rng.isize(-2..n as isize + 2);
                let r = rng.isize(-2..n as isize + 2);
                match rng.u8(..3) {
                    0 => {
                        let delta = Wrapping(rng.i32(..));
                        for i in l.max(0)..=r.min(n as isize - 1) {
                            buf[i as usize] += delta;
                        }
                        tree.range_update(l, r, delta);
                    }
                    1 => {
                        let i = rng.usize(..n);
                        let value = Wrapping(rng.i32(..));
                        buf[i] = value;
                        tree.point_update(i as isize, value).unwrap();
                    }
                    _ => {
                        let expected = (l.max(0)..=r.min(n as isize - 1))
                            .fold(Wrapping(0), |acc, i| Add.combine(&acc, &buf[i as usize]));
                        assert_eq!(tree.range_query(l, r), expected);
                    }
                }
                tree.assert_consistent();
            }
            assert_eq!(tree.propagate(), buf);
            tree.assert_flushed();
        }
    }
}
