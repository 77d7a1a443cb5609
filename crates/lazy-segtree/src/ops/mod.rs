//! A segment tree needs some operation, and this module contains the main [`Operation`]
//! trait, together with the marker trait [`Commutative`], the [`Identity`] trait and the
//! [`Lazy`] trait used by trees that support interval updates.
//!
//! The operations [`Add`], [`Min`] and [`Max`] are implemented for every primitive
//! integer and float type. [`Add`] is additionally implemented for [`Wrapping`] integers,
//! which is the only way to get modular sums without overflow checks in debug builds.
//!
//! Interval updates are additive: every element in the interval is shifted by a delta.
//! For [`Add`] a shifted node grows by `delta * len`, while [`Min`] and [`Max`] move by
//! exactly `delta` since a uniform shift moves the extremum with it.

use core::num::Wrapping;

mod aggregation;

pub use aggregation::{Aggregation, ParseAggregationError};

/// A trait that specifies which associative operator to use in a segment tree.
pub trait Operation<N> {
    /// The operation that is performed to combine two intervals in the segment tree.
    ///
    /// This function must be [associative][1], that is `combine(combine(a, b), c) =
    /// combine(a, combine(b, c))`.
    ///
    /// [1]: https://en.wikipedia.org/wiki/Associative_property
    fn combine(&self, a: &N, b: &N) -> N;
    /// Replace the value in `a` with `combine(a, b)`. By default simply calls `combine`.
    #[inline]
    fn combine_mut(&self, a: &mut N, b: &N) {
        let res = self.combine(&*a, b);
        *a = res;
    }
    /// Must return the same as `combine`. By default simply calls `combine_mut`.
    #[inline]
    fn combine_left(&self, mut a: N, b: &N) -> N {
        self.combine_mut(&mut a, b);
        a
    }
}

/// A marker trait that specifies that an [`Operation`] is [commutative][1], that is:
/// `combine(a, b) = combine(b, a)`.
///
/// [1]: https://en.wikipedia.org/wiki/Commutative_property
pub trait Commutative<N>: Operation<N> {}

/// A trait that specifies that this [`Operation`] has an [identity element][1].
///
/// An identity must satisfy `combine(a, id) = a` and `combine(id, a) = a`, where `id` is
/// something returned by [`identity`].
///
/// [`identity`]: Identity::identity
/// [1]: https://en.wikipedia.org/wiki/Identity_element
pub trait Identity<N> {
    /// Returns an element such that if [combined][1] with any element `a` the result must
    /// be `a`.
    ///
    /// [1]: Operation::combine
    fn identity(&self) -> N;
}

/// A trait for operations whose aggregates can absorb an additive delta that was applied
/// to every element of the aggregated interval.
///
/// For every interval `[l, r]` of length `len` the following must hold:
///
/// ```text
/// apply_delta(combine(a[l], ..., a[r]), d, len) == combine(a[l] + d, ..., a[r] + d)
/// ```
pub trait Lazy<N>: Commutative<N> + Identity<N> {
    /// The delta that changes nothing. Zero for every operation in this module.
    fn no_delta(&self) -> N;
    /// Returns `true` if `delta` is equal to [`no_delta`](Lazy::no_delta).
    fn is_no_delta(&self, delta: &N) -> bool;
    /// Accumulates a new `delta` on top of an already `pending` one.
    fn compose_delta(&self, pending: &N, delta: &N) -> N;
    /// Applies `delta` to an `aggregate` summarizing `len` elements.
    fn apply_delta(&self, aggregate: &N, delta: &N, len: usize) -> N;
}

/// Each node contains the sum of the interval it represents.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct Add;

/// Each node contains the minimum of the interval it represents.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct Min;

/// Each node contains the maximum of the interval it represents.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct Max;

macro_rules! impl_operation_infix {
    ($op:ty, $ty:ty, $combineop:tt, $doc:expr) => {
        impl Operation<$ty> for $op {
            #[doc = $doc]
            #[inline]
            fn combine(&self, a: &$ty, b: &$ty) -> $ty {
                *a $combineop *b
            }
        }
    };
}
macro_rules! impl_operation_prefix {
    ($op:ty, $ty:ty, $combinef:expr, $doc:expr) => {
        impl Operation<$ty> for $op {
            #[doc = $doc]
            #[inline]
            fn combine(&self, a: &$ty, b: &$ty) -> $ty {
                $combinef(*a, *b)
            }
        }
    };
}
macro_rules! impl_identity {
    ($op:ty, $ty:ty, $iden:expr, $doc:expr) => {
        impl Identity<$ty> for $op {
            #[doc = $doc]
            #[inline]
            fn identity(&self) -> $ty {
                $iden
            }
        }
    };
}
macro_rules! impl_lazy {
    ($op:ty, $ty:ty, $zero:expr, |$agg:ident, $delta:ident, $len:ident| $apply:expr) => {
        impl Lazy<$ty> for $op {
            #[inline]
            fn no_delta(&self) -> $ty {
                $zero
            }
            #[inline]
            fn is_no_delta(&self, delta: &$ty) -> bool {
                *delta == $zero
            }
            #[inline]
            fn compose_delta(&self, pending: &$ty, delta: &$ty) -> $ty {
                *pending + *delta
            }
            #[inline]
            #[allow(unused_variables)]
            fn apply_delta(&self, $agg: &$ty, $delta: &$ty, $len: usize) -> $ty {
                $apply
            }
        }
    };
}
macro_rules! impl_ordered {
    ($ty:tt, $zero:expr, $min:expr, $max:expr, $minf:expr, $maxf:expr) => {
        impl_operation_infix!(Add, $ty, +, "Returns the sum.");
        impl_identity!(Add, $ty, $zero, "Returns zero.");
        impl Commutative<$ty> for Add {}

        impl_operation_prefix!(Min, $ty, $minf, "Returns the minimum.");
        impl_identity!(Min, $ty, $max, "Returns the largest possible value.");
        impl Commutative<$ty> for Min {}
        impl_lazy!(Min, $ty, $zero, |agg, delta, len| *agg + *delta);

        impl_operation_prefix!(Max, $ty, $maxf, "Returns the maximum.");
        impl_identity!(Max, $ty, $min, "Returns the smallest possible value.");
        impl Commutative<$ty> for Max {}
        impl_lazy!(Max, $ty, $zero, |agg, delta, len| *agg + *delta);
    };
}
macro_rules! impl_integer {
    ($ty:tt) => {
        impl_ordered!($ty, 0, <$ty>::MIN, <$ty>::MAX, core::cmp::min, core::cmp::max);
        // modular product, exact whenever the shifted sum fits in the type
        impl_lazy!(Add, $ty, 0, |agg, delta, len| {
            agg.wrapping_add(delta.wrapping_mul(len as $ty))
        });

        impl_operation_infix!(Add, Wrapping<$ty>, +, "Returns the wrapping sum.");
        impl_identity!(Add, Wrapping<$ty>, Wrapping(0), "Returns zero.");
        impl Commutative<Wrapping<$ty>> for Add {}
        impl_lazy!(Add, Wrapping<$ty>, Wrapping(0), |agg, delta, len| {
            *agg + *delta * Wrapping(len as $ty)
        });
    };
}
impl_integer!(u8);
impl_integer!(u16);
impl_integer!(u32);
impl_integer!(u64);
impl_integer!(u128);
impl_integer!(usize);
impl_integer!(i8);
impl_integer!(i16);
impl_integer!(i32);
impl_integer!(i64);
impl_integer!(i128);
impl_integer!(isize);

impl_ordered!(f32, 0.0, f32::NEG_INFINITY, f32::INFINITY, f32::min, f32::max);
impl_lazy!(Add, f32, 0.0, |agg, delta, len| *agg + *delta * len as f32);
impl_ordered!(f64, 0.0, f64::NEG_INFINITY, f64::INFINITY, f64::min, f64::max);
impl_lazy!(Add, f64, 0.0, |agg, delta, len| *agg + *delta * len as f64);
