use std::fmt;
use std::mem;
use std::ops::{Index, IndexMut};

use crate::interval::Interval;
use super::entry::InternalEntry;

/// Handle of a node slot in an [`Arena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Color {
    Black,
    Red,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Left,
    Right,
}

impl Direction {
    pub(crate) fn opposite(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Node<N, D> {
    pub(crate) entry: InternalEntry<N, D>,
    // outer bound of every entry in this subtree, own entry included
    pub(crate) min_max: Interval<N>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: [Option<NodeId>; 2],
    pub(crate) color: Color,
}

impl<N: Clone, D> Node<N, D> {
    /// A detached red node.
    pub(crate) fn new(interval: Interval<N>, data: D) -> Self {
        Node {
            min_max: interval.clone(),
            entry: InternalEntry { interval, data },
            parent: None,
            children: [None, None],
            color: Color::Red,
        }
    }
}

impl<N, D> Node<N, D> {
    pub(crate) fn child(&self, direction: Direction) -> Option<NodeId> {
        self.children[direction.index()]
    }

    pub(crate) fn set_child(&mut self, direction: Direction, child: Option<NodeId>) {
        self.children[direction.index()] = child;
    }

    pub(crate) fn left(&self) -> Option<NodeId> {
        self.child(Direction::Left)
    }

    pub(crate) fn right(&self) -> Option<NodeId> {
        self.child(Direction::Right)
    }
}

impl<N: fmt::Display, D> fmt::Display for Node<N, D> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let color = match self.color {
            Color::Black => 'b',
            Color::Red => 'r',
        };
        write!(f, "{}:{}", color, self.entry.interval)
    }
}

/// Node storage. Links between nodes are slot handles; a parent link never
/// owns anything, the arena owns every node.
#[derive(Debug, Clone)]
pub(crate) struct Arena<N, D> {
    nodes: Vec<Node<N, D>>,
}

impl<N, D> Default for Arena<N, D> {
    fn default() -> Self {
        Arena { nodes: Vec::new() }
    }
}

impl<N, D> Index<NodeId> for Arena<N, D> {
    type Output = Node<N, D>;

    fn index(&self, id: NodeId) -> &Self::Output {
        &self.nodes[id.0]
    }
}

impl<N, D> IndexMut<NodeId> for Arena<N, D> {
    fn index_mut(&mut self, id: NodeId) -> &mut Self::Output {
        &mut self.nodes[id.0]
    }
}

impl<N, D> Arena<N, D> {
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
    }

    pub(crate) fn push(&mut self, node: Node<N, D>) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    /// Removes a node that nothing links to any more.
    ///
    /// The last slot is moved into the freed one and its neighbours are
    /// re-pointed. When that happens the old handle of the moved node is
    /// returned; the caller must rewrite any copy of it it still holds to
    /// `id`.
    pub(crate) fn release(&mut self, id: NodeId) -> (Node<N, D>, Option<NodeId>) {
        let last = NodeId(self.len() - 1);
        let node = self.nodes.swap_remove(id.0);
        if id == last {
            return (node, None);
        }

        if let Some(parent) = self[id].parent {
            for child in self[parent].children.iter_mut() {
                if *child == Some(last) {
                    *child = Some(id);
                }
            }
        }
        let children = self[id].children;
        for child in children.iter().flatten() {
            self[*child].parent = Some(id);
        }
        (node, Some(last))
    }

    fn pair_mut(&mut self, a: NodeId, b: NodeId) -> (&mut Node<N, D>, &mut Node<N, D>) {
        debug_assert_ne!(a, b);
        if a.0 < b.0 {
            let (head, tail) = self.nodes.split_at_mut(b.0);
            (&mut head[a.0], &mut tail[0])
        } else {
            let (head, tail) = self.nodes.split_at_mut(a.0);
            (&mut tail[0], &mut head[b.0])
        }
    }

    pub(crate) fn swap_entries(&mut self, a: NodeId, b: NodeId) {
        let (a, b) = self.pair_mut(a, b);
        mem::swap(&mut a.entry, &mut b.entry);
    }

    /// Exchanges entry and color, leaving links and aggregate bounds alone.
    pub(crate) fn swap_payload(&mut self, a: NodeId, b: NodeId) {
        let (a, b) = self.pair_mut(a, b);
        mem::swap(&mut a.entry, &mut b.entry);
        mem::swap(&mut a.color, &mut b.color);
    }

    /// Absent nodes count as black.
    pub(crate) fn is_red(&self, id: Option<NodeId>) -> bool {
        match id {
            Some(id) => self[id].color == Color::Red,
            None => false,
        }
    }

    /// Which side of its parent `id` hangs on. Meaningless for the root.
    pub(crate) fn direction(&self, id: NodeId) -> Direction {
        match self[id].parent {
            Some(parent) if self[parent].right() == Some(id) => Direction::Right,
            _ => Direction::Left,
        }
    }

    pub(crate) fn sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self[id].parent?;
        self[parent].child(self.direction(id).opposite())
    }

    pub(crate) fn uncle(&self, id: NodeId) -> Option<NodeId> {
        self.sibling(self[id].parent?)
    }
}

impl<N: Ord + Clone, D> Arena<N, D> {
    /// Recomputes the aggregate bound of `id` from its entry and its
    /// children's aggregates, which must already be current.
    pub(crate) fn update_min_max(&mut self, id: NodeId) {
        let node = &self[id];
        let mut low = node.entry.interval.low();
        let mut high = node.entry.interval.high();
        for child in node.children.iter().flatten() {
            let bound = &self[*child].min_max;
            if bound.low() < low {
                low = bound.low();
            }
            if bound.high() > high {
                high = bound.high();
            }
        }
        let min_max = Interval::from_sorted(low.clone(), high.clone());
        self[id].min_max = min_max;
    }

    /// Recomputes aggregate bounds from `id` up to the root.
    pub(crate) fn update_min_max_from(&mut self, mut id: Option<NodeId>) {
        while let Some(cur) = id {
            self.update_min_max(cur);
            id = self[cur].parent;
        }
    }

    /// Rotates the subtree at `id` towards `direction`, promoting the child on
    /// the other side.
    ///
    /// ```text
    ///      N              N          (rotate left)
    ///     / \            / \
    ///    A   R    =>    R   C
    ///       / \        / \
    ///      B   C      A   B
    /// ```
    ///
    /// `N` and `R` trade entries and colors instead of trading places, so
    /// the slot `id` stays attached to its parent and the parent link needs
    /// no fix-up. Both aggregates are recomputed, lower slot first.
    pub(crate) fn rotate(&mut self, id: NodeId, direction: Direction) {
        let up = direction.opposite();
        let pivot = match self[id].child(up) {
            Some(pivot) => pivot,
            None => return,
        };
        let outer = self[pivot].child(up);
        let inner = self[pivot].child(direction);
        let near = self[id].child(direction);

        self[id].set_child(up, outer);
        self[id].set_child(direction, Some(pivot));
        self[pivot].set_child(direction, near);
        self[pivot].set_child(up, inner);
        if let Some(outer) = outer {
            self[outer].parent = Some(id);
        }
        if let Some(near) = near {
            self[near].parent = Some(pivot);
        }

        self.swap_payload(id, pivot);
        self.update_min_max(pivot);
        self.update_min_max(id);
    }
}
