//! Node arena and the ladder of per-level sentinel pairs.
//!
//! Every [`TowerNode`] lives in a single arena owned by the [`Ladder`] and is
//! addressed by a [`NodeId`]. Slots released by unlinking are recycled by
//! later allocations, so a handle must not be used after its node is
//! unlinked.
//!
//! ```text
//! level 3: -inf -------------------------------------> +inf
//! level 2: -inf -----------------> [4] --------------> +inf
//! level 1: -inf ------> [2] -----> [4] ------> [6] --> +inf
//! level 0: -inf ------> [2] -----> [4] ------> [6] --> +inf
//! ```
//!
//! The ladder starts with two levels and always keeps one sentinel-only level
//! above the tallest tower built so far. Levels are never removed.

use std::ops::{Index, IndexMut};

use crate::skipnode::{Bound, NodeId, TowerNode};

/// The sentinel pair bounding one level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Level {
    /// The `-inf` sentinel.
    pub head: NodeId,
    /// The `+inf` sentinel.
    pub tail: NodeId,
}

/// Owner of all tower nodes and of the level sentinels.
#[derive(Clone, Debug)]
pub struct Ladder {
    nodes: Vec<TowerNode>,
    free: Vec<NodeId>,
    levels: Vec<Level>,
}

impl Ladder {
    /// Create a ladder with a base level and one empty level above it.
    pub fn new() -> Self {
        let mut ladder = Ladder {
            nodes: Vec::new(),
            free: Vec::new(),
            levels: Vec::new(),
        };
        ladder.push_level();
        ladder.push_level();
        ladder
    }

    /// Number of levels, including the sentinel-only top.
    #[inline]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// The sentinels of level `i`, if it exists.
    #[inline]
    pub fn level(&self, i: usize) -> Option<Level> {
        self.levels.get(i).copied()
    }

    /// The base level.
    #[inline]
    #[expect(clippy::indexing_slicing, reason = "The ladder is never empty")]
    pub fn base(&self) -> Level {
        self.levels[0]
    }

    /// The topmost level.
    #[inline]
    #[expect(clippy::indexing_slicing, reason = "The ladder is never empty")]
    pub fn top(&self) -> Level {
        self.levels[self.levels.len() - 1]
    }

    /// Append a new sentinel pair on top of the ladder, linked vertically to
    /// the previous top. Returns the index of the new level.
    pub fn push_level(&mut self) -> usize {
        let head = self.alloc(TowerNode::sentinel(Bound::NegInf));
        let tail = self.alloc(TowerNode::sentinel(Bound::PosInf));
        self[head].next = Some(tail);
        self[tail].prev = Some(head);

        if let Some(&below) = self.levels.last() {
            self.link_vertical(below.head, head);
            self.link_vertical(below.tail, tail);
        }
        self.levels.push(Level { head, tail });

        let index = self.levels.len() - 1;
        tracing::debug!(level = index, "ladder grew");
        index
    }

    /// Place `node` into the arena and splice it into the level of `pred`,
    /// immediately after `pred`.
    ///
    /// `pred` must not be a right sentinel.
    pub fn splice_after(&mut self, pred: NodeId, node: TowerNode) -> NodeId {
        let id = self.alloc(node);
        let next = self[pred].next;
        debug_assert!(next.is_some(), "cannot splice after a right sentinel");

        self[id].prev = Some(pred);
        self[id].next = next;
        if let Some(next) = next {
            self[next].prev = Some(id);
        }
        self[pred].next = Some(id);
        id
    }

    /// Link `lower` and `upper` as vertical neighbours.
    #[inline]
    pub fn link_vertical(&mut self, lower: NodeId, upper: NodeId) {
        self[lower].above = Some(upper);
        self[upper].below = Some(lower);
    }

    /// Remove the node from its level and release its slot.
    ///
    /// The returned node keeps its links so callers can continue walking the
    /// tower through `above`.
    pub fn unlink(&mut self, id: NodeId) -> TowerNode {
        debug_assert!(!self[id].is_sentinel(), "sentinels are never unlinked");
        let prev = self[id].prev;
        let next = self[id].next;
        if let Some(prev) = prev {
            self[prev].next = next;
        }
        if let Some(next) = next {
            self[next].prev = prev;
        }
        self.free.push(id);
        std::mem::replace(&mut self[id], TowerNode::sentinel(Bound::PosInf))
    }

    /// Starting at `from`, walk left until a node with a vertical neighbour
    /// above is found, and return that neighbour.
    ///
    /// Returns `None` only when `from` lies on the top level.
    pub fn ascend(&self, from: NodeId) -> Option<NodeId> {
        let mut current = from;
        loop {
            let node = &self[current];
            if let Some(above) = node.above {
                return Some(above);
            }
            current = node.prev?;
        }
    }

    /// Iterate over the node handles of level `i` from left to right,
    /// sentinels included.
    pub fn walk(&self, i: usize) -> impl Iterator<Item = NodeId> + '_ {
        let mut current = self.level(i).map(|level| level.head);
        std::iter::from_fn(move || {
            let id = current?;
            current = self[id].next;
            Some(id)
        })
    }

    /// Number of node slots currently in use, sentinels included.
    #[inline]
    pub fn live_nodes(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    fn alloc(&mut self, node: TowerNode) -> NodeId {
        match self.free.pop() {
            Some(id) => {
                self[id] = node;
                id
            }
            None => {
                self.nodes.push(node);
                NodeId(self.nodes.len() - 1)
            }
        }
    }
}

impl Default for Ladder {
    #[inline]
    fn default() -> Self {
        Ladder::new()
    }
}

impl Index<NodeId> for Ladder {
    type Output = TowerNode;

    #[inline]
    #[expect(clippy::indexing_slicing, reason = "Handles are only minted by the arena")]
    fn index(&self, id: NodeId) -> &TowerNode {
        &self.nodes[id.0]
    }
}

impl IndexMut<NodeId> for Ladder {
    #[inline]
    #[expect(clippy::indexing_slicing, reason = "Handles are only minted by the arena")]
    fn index_mut(&mut self, id: NodeId) -> &mut TowerNode {
        &mut self.nodes[id.0]
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::Ladder;
    use crate::{
        entry::Entry,
        skipnode::{Bound, TowerNode},
    };

    fn keys(ladder: &Ladder, level: usize) -> Vec<Bound> {
        ladder.walk(level).map(|id| ladder[id].key).collect()
    }

    #[test]
    fn new_has_two_empty_levels() {
        let ladder = Ladder::new();
        assert_eq!(ladder.len(), 2);
        assert_eq!(keys(&ladder, 0), vec![Bound::NegInf, Bound::PosInf]);
        assert_eq!(keys(&ladder, 1), vec![Bound::NegInf, Bound::PosInf]);
        assert_eq!(ladder[ladder.base().head].above, Some(ladder.top().head));
        assert_eq!(ladder[ladder.top().tail].below, Some(ladder.base().tail));
        assert_eq!(ladder.live_nodes(), 4);
    }

    #[test]
    fn splice_and_unlink() {
        let mut ladder = Ladder::new();
        let head = ladder.base().head;
        let b = ladder.splice_after(head, TowerNode::base(Entry::new(2, "b"), 1));
        ladder.splice_after(head, TowerNode::base(Entry::new(1, "a"), 1));
        ladder.splice_after(b, TowerNode::base(Entry::new(3, "c"), 1));
        assert_eq!(
            keys(&ladder, 0),
            vec![
                Bound::NegInf,
                Bound::Key(1),
                Bound::Key(2),
                Bound::Key(3),
                Bound::PosInf
            ]
        );

        let removed = ladder.unlink(b);
        assert_eq!(removed.entry, Some(Entry::new(2, "b")));
        assert_eq!(
            keys(&ladder, 0),
            vec![Bound::NegInf, Bound::Key(1), Bound::Key(3), Bound::PosInf]
        );
        assert_eq!(ladder.live_nodes(), 6);

        // The released slot is recycled.
        let reused = ladder.splice_after(head, TowerNode::base(Entry::new(0, "z"), 1));
        assert_eq!(reused, b);
        assert_eq!(ladder.live_nodes(), 7);
    }

    #[test]
    fn ascend_walks_left_to_the_nearest_tower() {
        let mut ladder = Ladder::new();
        ladder.push_level();
        let head = ladder.base().head;
        let low = ladder.splice_after(head, TowerNode::base(Entry::new(4, "a"), 2));
        let up = ladder.splice_after(ladder.level(1).unwrap().head, TowerNode::upper(4));
        ladder.link_vertical(low, up);
        let after = ladder.splice_after(low, TowerNode::base(Entry::new(5, "b"), 1));

        assert_eq!(ladder.ascend(after), Some(up));
        assert_eq!(ladder.ascend(head), ladder.level(1).map(|l| l.head));
        assert_eq!(ladder.ascend(ladder.top().head), None);
    }
}
