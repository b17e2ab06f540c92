use std::cmp::Ordering;
use std::fmt;
use std::ops::{Bound, Range, RangeBounds, RangeInclusive};
use num_traits::NumRef;

/// A closed interval `[low, high]`.
///
/// Endpoints are always stored sorted, whichever order they were supplied
/// in. Intervals order lexicographically by `(low, high)`; this is the key
/// order used by the tree and has nothing to do with overlap.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde_derive", derive(serde::Deserialize, serde::Serialize))]
pub struct Interval<N>(RangeInclusive<N>);

impl<N: Ord> From<RangeInclusive<N>> for Interval<N> {
    fn from(range: RangeInclusive<N>) -> Self {
        let (low, high) = range.into_inner();
        Self::new(low, high)
    }
}

impl<N: NumRef + Ord> From<Range<N>> for Interval<N> {
    fn from(range: Range<N>) -> Self {
        if range.end <= range.start {
            panic!("interval: half-open end bound must be > start bound")
        }
        Self(range.start..=range.end - N::one())
    }
}

impl<N: Ord + Clone> From<&'_ Interval<N>> for Interval<N> {
    fn from(interval: &Interval<N>) -> Self {
        interval.clone()
    }
}

impl<N> RangeBounds<N> for Interval<N> {
    fn start_bound(&self) -> Bound<&N> {
        self.0.start_bound()
    }

    fn end_bound(&self) -> Bound<&N> {
        self.0.end_bound()
    }
}

impl<N> Interval<N> {
    pub fn low(&self) -> &N {
        self.0.start()
    }

    pub fn high(&self) -> &N {
        self.0.end()
    }

    pub fn into_inner(self) -> (N, N) {
        self.0.into_inner()
    }
}

impl<N: Clone + Ord> Interval<N> {
    pub fn point(value: N) -> Self {
        Self(value.clone()..=value)
    }
}

impl<N: Ord> Interval<N> {
    /// Builds `[min(a, b), max(a, b)]`.
    pub fn new(a: N, b: N) -> Self {
        if b < a {
            Self(b..=a)
        } else {
            Self(a..=b)
        }
    }

    pub(crate) fn from_sorted(low: N, high: N) -> Self {
        debug_assert!(low <= high);
        Self(low..=high)
    }

    pub fn contains(&self, other: &Interval<N>) -> bool {
        self.contains_bounds(other.low(), other.high())
    }

    pub fn contains_point(&self, point: &N) -> bool {
        self.low() <= point && self.high() >= point
    }

    /// Closed-interval intersection test: the greater low is at most the
    /// lesser high.
    pub fn overlaps(&self, other: &Interval<N>) -> bool {
        self.overlaps_bounds(other.low(), other.high())
    }

    pub(crate) fn contains_bounds(&self, low: &N, high: &N) -> bool {
        self.low() <= low && self.high() >= high
    }

    pub(crate) fn overlaps_bounds(&self, low: &N, high: &N) -> bool {
        self.low() <= high && low <= self.high()
    }

    /// Key-order comparison of `self` against `[low, high]`.
    pub(crate) fn cmp_bounds(&self, low: &N, high: &N) -> Ordering {
        self.low().cmp(low).then_with(|| self.high().cmp(high))
    }
}

impl<N: Ord> PartialOrd for Interval<N> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<N: Ord> Ord for Interval<N> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cmp_bounds(other.low(), other.high())
    }
}

impl<N: fmt::Display> fmt::Display for Interval<N> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}, {}]", self.low(), self.high())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_sorted() {
        let iv = Interval::new(5, -2);
        assert_eq!(iv.low(), &-2);
        assert_eq!(iv.high(), &5);
        assert_eq!(Interval::from(7..=3), Interval::new(3, 7));
        assert_eq!(Interval::new(4, 4), Interval::point(4));
    }

    #[test]
    fn half_open_ranges_close_their_end() {
        assert_eq!(Interval::from(2..5), Interval::new(2, 4));
        assert_eq!(Interval::from(0u8..1), Interval::point(0u8));
    }

    #[test]
    #[should_panic]
    fn empty_half_open_range_is_rejected() {
        let _ = Interval::from(3..3);
    }

    #[test]
    fn overlap_is_closed() {
        let a = Interval::new(1, 3);
        assert!(a.overlaps(&Interval::new(3, 9)));
        assert!(a.overlaps(&Interval::new(-4, 1)));
        assert!(a.overlaps(&Interval::new(2, 2)));
        assert!(a.overlaps(&Interval::new(0, 10)));
        assert!(!a.overlaps(&Interval::new(4, 9)));
        assert!(!a.overlaps(&Interval::new(-4, 0)));
        assert!(Interval::new(0, 10).overlaps(&a));
    }

    #[test]
    fn containment() {
        let a = Interval::new(1, 6);
        assert!(a.contains(&Interval::new(1, 6)));
        assert!(a.contains(&Interval::new(2, 3)));
        assert!(!a.contains(&Interval::new(0, 3)));
        assert!(!a.contains(&Interval::new(5, 7)));
        assert!(a.contains_point(&6));
        assert!(!a.contains_point(&7));
    }

    #[test]
    fn key_order_is_lexicographic() {
        assert!(Interval::new(1, 9) < Interval::new(2, 3));
        assert!(Interval::new(1, 2) < Interval::new(1, 3));
        assert_eq!(Interval::new(1, 2).cmp(&Interval::new(2, 1)), Ordering::Equal);
        // ordering is unrelated to overlap
        assert!(Interval::new(0, 100) < Interval::new(50, 51));
    }

    #[test]
    fn display() {
        assert_eq!(Interval::new(3, -1).to_string(), "[-1, 3]");
    }
}
