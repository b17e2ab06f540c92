use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::iter::{FromIterator, FusedIterator};

use num_traits::NumRef;

use crate::Interval;
use super::entry::*;
use super::node::{Arena, Color, Direction, Node, NodeId};

/// Map from closed intervals to values, kept as a red-black tree ordered by
/// `(low, high)`.
///
/// Each node also records the outer bound of every interval stored beneath
/// it. Overlap queries use that bound to skip whole subtrees, and exact-key
/// lookups use it to stop descending early.
///
/// Exact duplicate intervals are rejected; distinct intervals may overlap
/// freely.
#[derive(Debug, Clone)]
pub struct IntervalTree<N, D> {
    nodes: Arena<N, D>,
    root: Option<NodeId>,
    len: usize,
}

impl<N, D> Default for IntervalTree<N, D> {
    fn default() -> Self {
        IntervalTree {
            nodes: Arena::default(),
            root: None,
            len: 0,
        }
    }
}

impl<N, D, K> FromIterator<(K, D)> for IntervalTree<N, D>
where
    K: Into<Interval<N>>,
    N: Ord + Clone,
{
    fn from_iter<T: IntoIterator<Item = (K, D)>>(iter: T) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<N, D, K> Extend<(K, D)> for IntervalTree<N, D>
where
    K: Into<Interval<N>>,
    N: Ord + Clone,
{
    fn extend<T: IntoIterator<Item = (K, D)>>(&mut self, iter: T) {
        for (interval, data) in iter {
            self.put(interval, data);
        }
    }
}

impl<N, D> IntervalTree<N, D> {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.len = 0;
    }

    /// The smallest interval covering every stored interval.
    pub fn bounds(&self) -> Option<&Interval<N>> {
        self.root.map(|root| &self.nodes[root].min_max)
    }

    /// Entries in ascending key order.
    pub fn iter(&self) -> Iter<N, D> {
        Iter::new(self)
    }

    pub fn intervals(&self) -> impl Iterator<Item = &Interval<N>> {
        self.iter().map(|(interval, _)| interval)
    }

    pub fn values(&self) -> impl Iterator<Item = &D> {
        self.iter().map(|(_, data)| data)
    }
}

impl<N: Ord + Clone, D> IntervalTree<N, D> {
    /// Stores `data` under `interval`.
    ///
    /// Returns `false`, leaving the tree untouched, if exactly this interval
    /// is already present.
    ///
    /// # Panics
    ///
    /// Panics if the tree already holds `usize::MAX` entries.
    pub fn put<K: Into<Interval<N>>>(&mut self, interval: K, data: D) -> bool {
        let interval = interval.into();

        let mut cur = match self.root {
            Some(root) => root,
            None => {
                let mut node = Node::new(interval, data);
                node.color = Color::Black;
                self.root = Some(self.nodes.push(node));
                self.len = 1;
                return true;
            }
        };

        let direction = loop {
            let direction = match interval.cmp(&self.nodes[cur].entry.interval) {
                Ordering::Equal => return false,
                Ordering::Less => Direction::Left,
                Ordering::Greater => Direction::Right,
            };
            match self.nodes[cur].child(direction) {
                Some(child) => cur = child,
                None => break direction,
            }
        };

        if self.len == usize::MAX {
            panic!("interval tree: entry count overflow");
        }

        let mut node = Node::new(interval, data);
        node.parent = Some(cur);
        let id = self.nodes.push(node);
        self.nodes[cur].set_child(direction, Some(id));
        self.len += 1;

        self.nodes.update_min_max_from(Some(cur));
        self.rebalance_after_insert(id);
        true
    }

    fn rebalance_after_insert(&mut self, mut cur: NodeId) {
        loop {
            // case 1: reached the root
            let parent = match self.nodes[cur].parent {
                Some(parent) => parent,
                None => {
                    self.nodes[cur].color = Color::Black;
                    return;
                }
            };

            // case 2: black parent, nothing to fix
            if self.nodes[parent].color == Color::Black {
                return;
            }

            // a red parent is never the root
            let grandparent = match self.nodes[parent].parent {
                Some(grandparent) => grandparent,
                None => {
                    self.nodes[parent].color = Color::Black;
                    return;
                }
            };

            // case 3: red uncle, push the violation up two levels
            match self.nodes.uncle(cur) {
                Some(uncle) if self.nodes[uncle].color == Color::Red => {
                    self.nodes[grandparent].color = Color::Red;
                    self.nodes[parent].color = Color::Black;
                    self.nodes[uncle].color = Color::Black;
                    self.nodes.update_min_max(parent);
                    self.nodes.update_min_max(grandparent);
                    cur = grandparent;
                    continue;
                }
                _ => {}
            }

            // case 4: zig-zag. The rotation moves the parent's payload into
            // `cur`'s slot, which now hangs below `parent` on the outer side.
            let mut direction = self.nodes.direction(cur);
            if self.nodes.direction(parent) != direction {
                self.nodes.rotate(parent, direction.opposite());
                direction = self.nodes.direction(cur);
            }

            // case 5: zig-zig
            self.nodes[parent].color = Color::Black;
            self.nodes[grandparent].color = Color::Red;
            self.nodes.rotate(grandparent, direction.opposite());
            return;
        }
    }

    /// Removes exactly `interval`, returning whether it was present.
    pub fn delete<M: Borrow<N>, K: Into<Interval<M>>>(&mut self, interval: K) -> bool {
        self.remove(interval).is_some()
    }

    /// Removes exactly `interval`, handing back the stored interval and its
    /// value.
    pub fn remove<M: Borrow<N>, K: Into<Interval<M>>>(&mut self, interval: K) -> Option<(Interval<N>, D)> {
        let interval = interval.into();
        let mut target = self.locate(interval.low().borrow(), interval.high().borrow())?;

        if self.len == 1 {
            let (node, _) = self.nodes.release(target);
            self.root = None;
            self.len = 0;
            return Some(node.entry.into_inner());
        }

        // reduce to a node with at most one child: the predecessor's entry
        // takes the target's place and the predecessor's slot is removed
        if let (Some(left), Some(_)) = (self.nodes[target].left(), self.nodes[target].right()) {
            let mut predecessor = left;
            while let Some(right) = self.nodes[predecessor].right() {
                predecessor = right;
            }
            self.nodes.swap_entries(target, predecessor);
            target = predecessor;
        }

        // `doomed` is the slot that physically leaves the tree,
        // `replacement` the slot left standing in its position
        let child = self.nodes[target].left().or_else(|| self.nodes[target].right());
        let (doomed, replacement) = match child {
            Some(child) => {
                self.nodes.swap_payload(target, child);
                let grandchildren = self.nodes[child].children;
                self.nodes[target].children = grandchildren;
                for grandchild in grandchildren.iter().flatten() {
                    self.nodes[*grandchild].parent = Some(target);
                }
                (child, target)
            }
            None => (target, target),
        };

        if self.nodes[doomed].color == Color::Red || self.nodes[replacement].color == Color::Red {
            self.nodes[replacement].color = Color::Black;
        } else {
            self.rebalance_after_delete(replacement);
        }

        let mut anchor = if doomed == replacement {
            let parent = self.nodes[doomed].parent;
            if let Some(parent) = parent {
                let direction = self.nodes.direction(doomed);
                self.nodes[parent].set_child(direction, None);
            }
            parent
        } else {
            Some(replacement)
        };

        let (node, moved) = self.nodes.release(doomed);
        if let Some(moved) = moved {
            if self.root == Some(moved) {
                self.root = Some(doomed);
            }
            if anchor == Some(moved) {
                anchor = Some(doomed);
            }
        }
        // rebalancing may have folded the doomed entry into aggregates on
        // its ancestor path
        self.nodes.update_min_max_from(anchor);
        self.len -= 1;

        Some(node.entry.into_inner())
    }

    /// Restores black height after a black leaf is taken out at `cur`.
    /// `cur` is still linked in while this runs.
    fn rebalance_after_delete(&mut self, mut cur: NodeId) {
        loop {
            // case 1: reached the root
            let mut parent = match self.nodes[cur].parent {
                Some(parent) => parent,
                None => return,
            };
            let mut direction = self.nodes.direction(cur);
            // a black non-root node always has a sibling
            let mut sibling = match self.nodes.sibling(cur) {
                Some(sibling) => sibling,
                None => return,
            };

            // case 2: red sibling, rotate it above the parent
            if self.nodes[sibling].color == Color::Red {
                self.nodes[parent].color = Color::Red;
                self.nodes[sibling].color = Color::Black;
                self.nodes.rotate(parent, direction);
                parent = match self.nodes[cur].parent {
                    Some(parent) => parent,
                    None => return,
                };
                sibling = match self.nodes.sibling(cur) {
                    Some(sibling) => sibling,
                    None => return,
                };
                direction = self.nodes.direction(cur);
            }

            let near = self.nodes[sibling].child(direction);
            let far = self.nodes[sibling].child(direction.opposite());
            if !self.nodes.is_red(near) && !self.nodes.is_red(far) {
                if self.nodes[parent].color == Color::Black {
                    // case 3: all black, push the deficit up
                    self.nodes[sibling].color = Color::Red;
                    self.nodes.update_min_max(parent);
                    cur = parent;
                    continue;
                }
                // case 4: red parent absorbs the deficit
                self.nodes[sibling].color = Color::Red;
                self.nodes[parent].color = Color::Black;
                return;
            }

            // case 5: only the near nephew is red, turn it into case 6.
            // The sibling keeps its slot.
            if let (Some(near), false) = (near, self.nodes.is_red(far)) {
                self.nodes[sibling].color = Color::Red;
                self.nodes[near].color = Color::Black;
                self.nodes.rotate(sibling, direction.opposite());
            }

            // case 6: far nephew is red
            let far = self.nodes[sibling].child(direction.opposite());
            self.nodes[sibling].color = self.nodes[parent].color;
            self.nodes[parent].color = Color::Black;
            if let Some(far) = far {
                self.nodes[far].color = Color::Black;
            }
            self.nodes.rotate(parent, direction);
            return;
        }
    }

    /// Finds the node keyed exactly `[low, high]`. A subtree whose aggregate
    /// bound does not contain the target cannot hold it.
    fn locate(&self, low: &N, high: &N) -> Option<NodeId> {
        let mut cur = self.root;
        while let Some(id) = cur {
            let node = &self.nodes[id];
            if !node.min_max.contains_bounds(low, high) {
                return None;
            }
            cur = match node.entry.interval.cmp_bounds(low, high) {
                Ordering::Equal => return Some(id),
                Ordering::Greater => node.left(),
                Ordering::Less => node.right(),
            };
        }
        None
    }

    /// Entry stored under exactly `interval`.
    pub fn get<M: Borrow<N>, K: Into<Interval<M>>>(&self, interval: K) -> Option<Entry<N, D>> {
        let interval = interval.into();
        self.locate(interval.low().borrow(), interval.high().borrow())
            .map(|id| self.nodes[id].entry.as_entry())
    }

    pub fn contains_key<M: Borrow<N>, K: Into<Interval<M>>>(&self, interval: K) -> bool {
        self.get(interval).is_some()
    }

    /// Whether any stored interval overlaps `interval`.
    pub fn overlaps<M: Borrow<N>, K: Into<Interval<M>>>(&self, interval: K) -> bool {
        let mut found = false;
        self.query_aux(interval, &mut found);
        found
    }

    /// Some entry overlapping `interval`. Which one is returned when several
    /// overlap is unspecified.
    pub fn query<M: Borrow<N>, K: Into<Interval<M>>>(&self, interval: K) -> Option<Entry<N, D>> {
        let mut first = None;
        self.query_aux(interval, &mut first);
        first
    }

    pub fn query_point<M: Borrow<N>>(&self, point: M) -> Option<Entry<N, D>> {
        let point = point.borrow();
        self.query(point..=point)
    }

    /// Every entry overlapping `interval`, each exactly once, in pre-order.
    pub fn query_all<M: Borrow<N>, K: Into<Interval<M>>>(&self, interval: K) -> Vec<Entry<N, D>> {
        let mut buf = Vec::new();
        self.query_aux(interval, &mut buf);
        buf
    }

    fn query_aux<'a, M: Borrow<N>, K: Into<Interval<M>>, C>(&'a self, interval: K, results: &mut C)
    where
        C: EntryContainer<'a, N, D>,
    {
        let interval = interval.into();
        let (low, high) = (interval.low().borrow(), interval.high().borrow());

        let root = match self.root {
            Some(root) => root,
            None => return,
        };
        if !self.nodes[root].min_max.overlaps_bounds(low, high) {
            return;
        }

        // pre-order walk; children are pushed only if their aggregate bound
        // reaches the query
        let mut stack = Vec::with_capacity(64);
        stack.push(root);
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id];
            if node.entry.interval.overlaps_bounds(low, high) && results.push_entry(node.entry.as_entry()) {
                return;
            }
            for child in [node.right(), node.left()].iter().flatten() {
                if self.nodes[*child].min_max.overlaps_bounds(low, high) {
                    stack.push(*child);
                }
            }
        }
    }
}

impl<N: Ord + Clone + NumRef, D> IntervalTree<N, D> {
    /// The parts of `interval` not covered by any stored interval, ascending.
    /// Stored intervals that touch (`[1, 2]` and `[3, 4]`) leave no gap.
    pub fn gaps<K: Into<Interval<N>>>(&self, interval: K) -> Vec<Interval<N>> {
        let (mut start, end) = interval.into().into_inner();

        let mut overlaps = self.query_all(&start..=&end)
            .into_iter()
            .map(|e| e.interval().clone())
            .collect::<Vec<_>>();

        // 1) sort by key
        overlaps.sort();

        // 2) merge overlapping and adjacent intervals
        let mut merged: Vec<Interval<N>> = Vec::with_capacity(overlaps.len());
        for iv in overlaps {
            match merged.last_mut() {
                Some(last) if iv.low() <= last.high() || iv.low().clone() - N::one() == *last.high() => {
                    if iv.high() > last.high() {
                        *last = Interval::from_sorted(last.low().clone(), iv.high().clone());
                    }
                }
                _ => merged.push(iv),
            }
        }

        // 3) use the merged intervals as a mask
        let mut gaps = Vec::new();
        for iv in merged {
            let (istart, iend) = iv.into_inner();

            if istart > start {
                gaps.push(Interval::from_sorted(start.clone(), istart - N::one()));
            }
            if iend >= end {
                return gaps;
            }
            start = iend + N::one();
        }
        gaps.push(Interval::from_sorted(start, end));
        gaps
    }
}

/// Level-order dump: one line per depth, `b:`/`r:` color prefixes and `nil`
/// for absent children.
impl<N: fmt::Display, D> fmt::Display for IntervalTree<N, D> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let root = match self.root {
            Some(root) => root,
            None => return Ok(()),
        };
        writeln!(f, "{}", self.nodes[root])?;

        let mut level = vec![root];
        let mut next = Vec::new();
        while !level.is_empty() {
            for id in &level {
                for child in self.nodes[*id].children.iter() {
                    match child {
                        Some(child) => {
                            write!(f, "{} ", self.nodes[*child])?;
                            next.push(*child);
                        }
                        None => f.write_str("nil ")?,
                    }
                }
            }
            writeln!(f)?;
            level.clear();
            std::mem::swap(&mut level, &mut next);
        }
        Ok(())
    }
}

/// In-order iterator over an [`IntervalTree`].
pub struct Iter<'a, N, D> {
    tree: &'a IntervalTree<N, D>,
    stack: Vec<NodeId>,
    remaining: usize,
}

impl<'a, N, D> Iter<'a, N, D> {
    fn new(tree: &'a IntervalTree<N, D>) -> Self {
        let mut iter = Iter {
            tree,
            stack: Vec::new(),
            remaining: tree.len,
        };
        iter.descend(tree.root);
        iter
    }

    fn descend(&mut self, mut cur: Option<NodeId>) {
        while let Some(id) = cur {
            self.stack.push(id);
            cur = self.tree.nodes[id].left();
        }
    }
}

impl<'a, N, D> Iterator for Iter<'a, N, D> {
    type Item = (&'a Interval<N>, &'a D);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let tree = self.tree;
        let node = &tree.nodes[id];
        self.descend(node.right());
        self.remaining -= 1;
        Some((&node.entry.interval, &node.entry.data))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, N, D> ExactSizeIterator for Iter<'a, N, D> {}

impl<'a, N, D> FusedIterator for Iter<'a, N, D> {}

impl<'a, N, D> IntoIterator for &'a IntervalTree<N, D> {
    type Item = (&'a Interval<N>, &'a D);
    type IntoIter = Iter<'a, N, D>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
