use core::{fmt, str::FromStr};

use super::{Add, Commutative, Identity, Lazy, Max, Min, Operation};

/// Runtime selection of the operation a tree aggregates with.
///
/// Dispatches to [`Add`], [`Min`] or [`Max`] and therefore works for every element type
/// those three are implemented for.
///
/// ```
/// use lazy_segtree::{LazySegmentTree, ops::Aggregation};
///
/// let op: Aggregation = "max".parse().unwrap();
/// let mut tree = LazySegmentTree::build(&[3, 9, 4], op).unwrap();
/// tree.range_update(0, 0, 10);
/// assert_eq!(tree.range_query(0, 2), 13);
/// ```
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq, Hash)]
pub enum Aggregation {
    /// Sum of the interval
    #[default]
    Sum,
    /// Minimum of the interval
    Min,
    /// Maximum of the interval
    Max,
}

impl Aggregation {
    /// Every available aggregation
    pub const ALL: [Aggregation; 3] = [Aggregation::Sum, Aggregation::Min, Aggregation::Max];

    /// Returns the lowercase name of the aggregation
    pub fn name(&self) -> &'static str {
        match self {
            Aggregation::Sum => "sum",
            Aggregation::Min => "min",
            Aggregation::Max => "max",
        }
    }
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown [`Aggregation`] name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseAggregationError;

impl fmt::Display for ParseAggregationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unknown aggregation, expected one of: sum, min, max")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseAggregationError {}

impl FromStr for Aggregation {
    type Err = ParseAggregationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Aggregation::ALL
            .into_iter()
            .find(|agg| agg.name().eq_ignore_ascii_case(s.trim()))
            .ok_or(ParseAggregationError)
    }
}

impl<N> Operation<N> for Aggregation
where
    Add: Operation<N>,
    Min: Operation<N>,
    Max: Operation<N>,
{
    #[inline]
    fn combine(&self, a: &N, b: &N) -> N {
        match self {
            Aggregation::Sum => Add.combine(a, b),
            Aggregation::Min => Min.combine(a, b),
            Aggregation::Max => Max.combine(a, b),
        }
    }
}

impl<N> Commutative<N> for Aggregation
where
    Add: Commutative<N>,
    Min: Commutative<N>,
    Max: Commutative<N>,
{
}

impl<N> Identity<N> for Aggregation
where
    Add: Identity<N>,
    Min: Identity<N>,
    Max: Identity<N>,
{
    #[inline]
    fn identity(&self) -> N {
        match self {
            Aggregation::Sum => Add.identity(),
            Aggregation::Min => Min.identity(),
            Aggregation::Max => Max.identity(),
        }
    }
}

impl<N> Lazy<N> for Aggregation
where
    Add: Lazy<N>,
    Min: Lazy<N>,
    Max: Lazy<N>,
{
    #[inline]
    fn no_delta(&self) -> N {
        match self {
            Aggregation::Sum => Add.no_delta(),
            Aggregation::Min => Min.no_delta(),
            Aggregation::Max => Max.no_delta(),
        }
    }
    #[inline]
    fn is_no_delta(&self, delta: &N) -> bool {
        match self {
            Aggregation::Sum => Add.is_no_delta(delta),
            Aggregation::Min => Min.is_no_delta(delta),
            Aggregation::Max => Max.is_no_delta(delta),
        }
    }
    #[inline]
    fn compose_delta(&self, pending: &N, delta: &N) -> N {
        match self {
            Aggregation::Sum => Add.compose_delta(pending, delta),
            Aggregation::Min => Min.compose_delta(pending, delta),
            Aggregation::Max => Max.compose_delta(pending, delta),
        }
    }
    #[inline]
    fn apply_delta(&self, aggregate: &N, delta: &N, len: usize) -> N {
        match self {
            Aggregation::Sum => Add.apply_delta(aggregate, delta, len),
            Aggregation::Min => Min.apply_delta(aggregate, delta, len),
            Aggregation::Max => Max.apply_delta(aggregate, delta, len),
        }
    }
}
