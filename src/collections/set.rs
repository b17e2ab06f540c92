use std::borrow::Borrow;
use std::iter::FromIterator;

use num_traits::NumRef;

use crate::interval::Interval;

use super::IntervalTree;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Entry<'a, N>(super::Entry<'a, N, ()>);

impl<'a, N> From<super::Entry<'a, N, ()>> for Entry<'a, N> {
    #[inline(always)]
    fn from(e: super::Entry<'a, N, ()>) -> Self {
        Self(e)
    }
}

impl<'a, N: 'a> Entry<'a, N> {
    #[inline(always)]
    pub fn interval(&self) -> &'a Interval<N> {
        self.0.interval()
    }
}

/// A set of closed intervals: an [`IntervalTree`] without values.
#[derive(Debug, Clone)]
#[repr(transparent)]
pub struct IntervalSet<N>(IntervalTree<N, ()>);

impl<N> Default for IntervalSet<N> {
    #[inline(always)]
    fn default() -> Self {
        Self(IntervalTree::default())
    }
}

impl<N, V> FromIterator<V> for IntervalSet<N>
where
    V: Into<Interval<N>>,
    N: Ord + Clone,
{
    fn from_iter<T: IntoIterator<Item = V>>(iter: T) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<N, V> Extend<V> for IntervalSet<N>
where
    V: Into<Interval<N>>,
    N: Ord + Clone,
{
    #[inline(always)]
    fn extend<I: IntoIterator<Item = V>>(&mut self, intervals: I) {
        self.0.extend(intervals.into_iter().map(|k| (k, ())))
    }
}

impl<N> IntervalSet<N> {
    #[inline(always)]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline(always)]
    pub fn clear(&mut self) {
        self.0.clear()
    }

    #[inline(always)]
    pub fn bounds(&self) -> Option<&Interval<N>> {
        self.0.bounds()
    }

    #[inline(always)]
    pub fn iter(&self) -> impl Iterator<Item = &Interval<N>> {
        self.0.intervals()
    }
}

impl<N: Ord + Clone> IntervalSet<N> {
    /// Returns `false` if exactly this interval is already present.
    #[inline(always)]
    pub fn insert<K: Into<Interval<N>>>(&mut self, interval: K) -> bool {
        self.0.put(interval, ())
    }

    #[inline(always)]
    pub fn remove<M: Borrow<N>, K: Into<Interval<M>>>(&mut self, interval: K) -> bool {
        self.0.delete(interval)
    }

    /// Exact membership, not overlap.
    #[inline(always)]
    pub fn contains<M: Borrow<N>, K: Into<Interval<M>>>(&self, interval: K) -> bool {
        self.0.contains_key(interval)
    }

    #[inline(always)]
    pub fn overlaps<M: Borrow<N>, K: Into<Interval<M>>>(&self, interval: K) -> bool {
        self.0.overlaps(interval)
    }

    #[inline(always)]
    pub fn query<M: Borrow<N>, K: Into<Interval<M>>>(&self, interval: K) -> Option<Entry<N>> {
        self.0.query(interval).map(Entry::from)
    }

    #[inline(always)]
    pub fn query_point<M: Borrow<N>>(&self, point: M) -> Option<Entry<N>> {
        self.0.query_point(point).map(Entry::from)
    }

    #[inline(always)]
    pub fn query_all<M: Borrow<N>, K: Into<Interval<M>>>(&self, interval: K) -> Vec<Entry<N>> {
        self.0.query_all(interval).into_iter().map(Entry::from).collect()
    }
}

impl<N: Ord + Clone + NumRef> IntervalSet<N> {
    #[inline(always)]
    pub fn gaps<K: Into<Interval<N>>>(&self, interval: K) -> Vec<Interval<N>> {
        self.0.gaps(interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn membership_is_exact() {
        let mut set = IntervalSet::new();
        assert!(set.insert(1..=4));
        assert!(!set.insert(4..=1));
        assert!(set.insert(2..=3));

        assert!(set.contains(1..=4));
        assert!(!set.contains(1..=3));
        assert!(set.overlaps(0..=1));
        assert_eq!(set.len(), 2);

        assert!(set.remove(1..=4));
        assert!(!set.remove(1..=4));
        assert!(!set.overlaps(0..=1));
        assert_eq!(set.bounds(), Some(&Interval::new(2, 3)));
    }

    #[test]
    fn queries_forward_to_tree() {
        let set: IntervalSet<u32> = vec![0..10, 20..30, 25..40].into_iter().collect();
        assert_eq!(set.iter().cloned().collect::<Vec<_>>(), vec![
            Interval::new(0, 9),
            Interval::new(20, 29),
            Interval::new(25, 39),
        ]);
        assert_eq!(set.query_all(26..=27).len(), 2);
        assert_eq!(set.query_point(5u32).map(|e| e.interval().clone()), Some(Interval::new(0, 9)));
        assert!(set.query(10..=19).is_none());
        assert_eq!(set.gaps(0..=50), vec![Interval::new(10, 19), Interval::new(40, 50)]);
    }
}
