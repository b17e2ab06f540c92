use crate::interval::Interval;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct InternalEntry<N, D> {
    pub(crate) data: D,
    pub(crate) interval: Interval<N>,
}

impl<N, D> InternalEntry<N, D> {
    pub(crate) fn as_entry(&self) -> Entry<N, D> {
        Entry {
            data: &self.data,
            interval: &self.interval,
        }
    }

    pub(crate) fn into_inner(self) -> (Interval<N>, D) {
        (self.interval, self.data)
    }
}

/// A stored interval and its value, borrowed from a tree.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Entry<'a, N, D> {
    pub(crate) data: &'a D,
    pub(crate) interval: &'a Interval<N>,
}

impl<'a, N, D> Clone for Entry<'a, N, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, N, D> Copy for Entry<'a, N, D> {}

impl<'a, N: 'a, D: 'a> Entry<'a, N, D> {
    pub fn value(&self) -> &'a D {
        self.data
    }

    pub fn interval(&self) -> &'a Interval<N> {
        self.interval
    }
}

/// Sink for query results; `push_entry` returns `true` once the traversal
/// can stop.
pub(crate) trait EntryContainer<'a, N, D> {
    fn push_entry(&mut self, entry: Entry<'a, N, D>) -> bool;
}

impl<'a, N, D> EntryContainer<'a, N, D> for bool {
    fn push_entry(&mut self, _entry: Entry<'a, N, D>) -> bool {
        *self = true;
        true
    }
}

impl<'a, N, D> EntryContainer<'a, N, D> for Option<Entry<'a, N, D>> {
    fn push_entry(&mut self, entry: Entry<'a, N, D>) -> bool {
        *self = Some(entry);
        true
    }
}

impl<'a, N, D> EntryContainer<'a, N, D> for Vec<Entry<'a, N, D>> {
    fn push_entry(&mut self, entry: Entry<'a, N, D>) -> bool {
        self.push(entry);
        false
    }
}
