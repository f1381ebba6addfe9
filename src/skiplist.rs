//! The skip list core: ordered insertion, minimum lookup and removal.

use std::{collections::HashMap, fmt, iter};

use crate::{
    entry::Entry,
    ladder::Ladder,
    skipnode::{Bound, NodeId, TowerNode},
};

// ////////////////////////////////////////////////////////////////////////////
// SkipList
// ////////////////////////////////////////////////////////////////////////////

/// A skip list ordered by integer key, supporting the operations of a
/// min-priority-queue.
///
/// Entries with equal keys are kept in insertion order: a new entry is placed
/// after every entry already holding its key.
///
/// The number of levels only ever grows. Removing the tallest tower leaves its
/// levels in place, empty.
#[derive(Clone)]
pub struct SkipList {
    ladder: Ladder,
    len: usize,
}

// ///////////////////////////////////////////////
// Inherent methods
// ///////////////////////////////////////////////

impl SkipList {
    /// Create an empty skip list with a base level and one empty level above
    /// it.
    ///
    /// # Examples
    ///
    /// ```
    /// use skiplist_pq::SkipList;
    ///
    /// let list = SkipList::new();
    /// assert!(list.is_empty());
    /// assert_eq!(list.levels(), 2);
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        SkipList {
            ladder: Ladder::new(),
            len: 0,
        }
    }

    /// Returns the number of entries in the skip list.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the skip list contains no entries.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of levels, including the empty level kept on top.
    #[inline]
    #[must_use]
    pub fn levels(&self) -> usize {
        self.ladder.len()
    }

    /// Insert a new entry whose tower spans `height` levels above the base.
    ///
    /// Returns the number of nodes traversed while searching for the insertion
    /// point, counting the starting sentinel.
    ///
    /// # Examples
    ///
    /// ```
    /// use skiplist_pq::SkipList;
    ///
    /// let mut list = SkipList::new();
    /// assert_eq!(list.insert(4, "a", 2), 2);
    /// assert_eq!(list.insert(2, "b", 1), 4);
    /// assert_eq!(list.levels(), 4);
    /// ```
    pub fn insert(&mut self, key: i64, value: impl Into<String>, height: usize) -> usize {
        let (pred, traversed) = self.locate(key);
        let entry = Entry::new(key, value);
        let base = self
            .ladder
            .splice_after(pred, TowerNode::base(entry, height + 1));

        let mut pred = pred;
        let mut below = base;
        for level in 1..=height {
            // Keep one empty level above every tower.
            if level + 1 == self.ladder.len() {
                self.ladder.push_level();
            }
            pred = self.ascend(pred);
            let node = self.ladder.splice_after(pred, TowerNode::upper(key));
            self.ladder.link_vertical(below, node);
            below = node;
        }

        self.len += 1;
        tracing::trace!(key, height, traversed, "inserted");
        traversed
    }

    /// Provides a reference to the entry with the smallest key, or `None` if
    /// the skip list is empty.
    ///
    /// Among entries sharing the smallest key, the earliest inserted is
    /// returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use skiplist_pq::SkipList;
    ///
    /// let mut list = SkipList::new();
    /// assert!(list.min().is_none());
    /// list.insert(3, "c", 0);
    /// list.insert(1, "a", 0);
    /// assert_eq!(list.min().map(|e| e.key()), Some(1));
    /// ```
    #[inline]
    #[must_use]
    pub fn min(&self) -> Option<&Entry> {
        self.first().and_then(|id| self.ladder[id].entry.as_ref())
    }

    /// Removes the entry with the smallest key and returns it, or `None` if the
    /// skip list is empty.
    ///
    /// The whole tower of the entry is unlinked. Levels left empty are kept.
    ///
    /// # Examples
    ///
    /// ```
    /// use skiplist_pq::SkipList;
    ///
    /// let mut list = SkipList::new();
    /// list.insert(8, "x", 3);
    /// assert_eq!(list.levels(), 5);
    /// assert_eq!(list.remove_min().map(|e| e.key()), Some(8));
    /// assert!(list.is_empty());
    /// assert_eq!(list.levels(), 5);
    /// ```
    pub fn remove_min(&mut self) -> Option<Entry> {
        let first = self.first()?;
        let mut node = self.ladder.unlink(first);
        let entry = node.entry.take();
        while let Some(above) = node.above {
            node = self.ladder.unlink(above);
        }
        self.len -= 1;
        if let Some(ref e) = entry {
            tracing::trace!(key = e.key(), "removed minimum");
        }
        entry
    }

    /// Returns an iterator over the entries in ascending key order, each
    /// paired with the number of levels its tower spans.
    ///
    /// # Examples
    ///
    /// ```
    /// use skiplist_pq::SkipList;
    ///
    /// let mut list = SkipList::new();
    /// list.insert(4, "a", 2);
    /// list.insert(2, "b", 1);
    /// let heights: Vec<_> = list.iter().map(|(e, h)| (e.key(), h)).collect();
    /// assert_eq!(heights, vec![(2, 2), (4, 3)]);
    /// ```
    #[inline]
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            ladder: &self.ladder,
            current: self.ladder[self.ladder.base().head].next,
            remaining: self.len,
        }
    }

    /// The real keys present at `level`, in list order.
    ///
    /// Returns an empty vector for levels that do not exist.
    #[must_use]
    pub fn level_keys(&self, level: usize) -> Vec<i64> {
        self.ladder
            .walk(level)
            .filter_map(|id| self.ladder[id].key.key())
            .collect()
    }

    /// Find the base-level node after which `key` is to be inserted.
    ///
    /// The search starts at the top-left sentinel and moves right while the
    /// next key is at most `key`, dropping a level whenever it cannot. Returns
    /// the last base-level node visited together with the number of nodes
    /// visited, starting node included.
    fn locate(&self, key: i64) -> (NodeId, usize) {
        let mut current = self.ladder.top().head;
        let mut traversed = 1;
        loop {
            while let Some(next) = self.next_at_most(current, key) {
                current = next;
                traversed += 1;
            }
            match self.ladder[current].below {
                Some(below) => {
                    current = below;
                    traversed += 1;
                }
                None => return (current, traversed),
            }
        }
    }

    /// The right neighbour of `id`, if its key is at most `key`.
    #[inline]
    fn next_at_most(&self, id: NodeId, key: i64) -> Option<NodeId> {
        self.ladder[id]
            .next
            .filter(|&next| self.ladder[next].key <= Bound::Key(key))
    }

    /// The node one level above `pred`'s level that precedes a new tower node.
    #[expect(
        clippy::expect_used,
        reason = "The ladder always keeps an empty level above every tower"
    )]
    fn ascend(&self, pred: NodeId) -> NodeId {
        self.ladder
            .ascend(pred)
            .expect("a level exists above every tower")
    }

    /// The first real node of the base level.
    #[inline]
    fn first(&self) -> Option<NodeId> {
        self.ladder[self.ladder.base().head]
            .next
            .filter(|&id| !self.ladder[id].is_sentinel())
    }
}

impl SkipList {
    /// Checks the integrity of the skip list, panicking on the first broken
    /// invariant:
    ///
    /// - every level is bounded by its sentinels and doubly linked;
    /// - keys never decrease along a level;
    /// - every node above the base sits on a node with the same key, and the
    ///   towers of a level appear in the same order as on the base level;
    /// - the recorded height of each tower matches its vertical span;
    /// - the top level is empty and the length matches the base level;
    /// - every live node in the arena is linked into some level.
    #[expect(clippy::panic, reason = "Broken invariants are bugs")]
    pub fn check(&self) {
        let ladder = &self.ladder;
        let mut position: HashMap<NodeId, usize> = HashMap::new();
        let mut linked = 0;

        for level in 0..ladder.len() {
            let Some(bounds) = ladder.level(level) else {
                panic!("level {level} is missing");
            };
            assert_eq!(ladder[bounds.head].key, Bound::NegInf);
            assert_eq!(ladder[bounds.tail].key, Bound::PosInf);
            assert!(ladder[bounds.head].prev.is_none());
            assert!(ladder[bounds.tail].next.is_none());
            if level > 0 {
                let below = ladder.level(level - 1).map(|l| (l.head, l.tail));
                assert_eq!(
                    ladder[bounds.head].below.zip(ladder[bounds.tail].below),
                    below,
                    "sentinels of level {level} are not stacked"
                );
            }

            let mut last_key = Bound::NegInf;
            let mut last_position = None;
            let mut prev = bounds.head;
            let mut count = 0;
            for id in ladder.walk(level).skip(1) {
                let node = &ladder[id];
                assert_eq!(node.prev, Some(prev), "broken back link on level {level}");
                assert!(node.key >= last_key, "keys decrease on level {level}");
                last_key = node.key;
                prev = id;
                if node.is_sentinel() {
                    assert_eq!(id, bounds.tail, "stray sentinel on level {level}");
                    continue;
                }
                count += 1;

                if level == 0 {
                    assert!(node.below.is_none());
                    let Some(ref entry) = node.entry else {
                        panic!("base node {id:?} has no entry");
                    };
                    assert_eq!(node.key, Bound::Key(entry.key()));
                    position.insert(id, count);

                    let span = iter::successors(Some(id), |&n| ladder[n].above).count();
                    assert_eq!(node.height, span, "wrong height for key {}", node.key);
                } else {
                    assert!(node.entry.is_none());
                    let Some(below) = node.below else {
                        panic!("node {} on level {level} has nothing below", node.key);
                    };
                    assert_eq!(ladder[below].key, node.key);
                    assert_eq!(ladder[below].above, Some(id));
                    let base = iter::successors(Some(id), |&n| ladder[n].below)
                        .last()
                        .unwrap_or(id);
                    let Some(&p) = position.get(&base) else {
                        panic!("tower {} does not reach the base level", node.key);
                    };
                    assert!(
                        last_position.is_none_or(|last| last < p),
                        "towers out of order on level {level}"
                    );
                    last_position = Some(p);
                }
            }
            assert_eq!(prev, bounds.tail, "level {level} does not end at its sentinel");
            linked += count + 2;

            if level == 0 {
                assert_eq!(count, self.len, "length does not match the base level");
            }
            if level + 1 == ladder.len() {
                assert_eq!(count, 0, "top level is not empty");
            }
        }
        assert_eq!(position.len(), self.len);
        assert_eq!(ladder.live_nodes(), linked, "unreachable nodes in the arena");
    }
}

// ///////////////////////////////////////////////
// Trait implementations
// ///////////////////////////////////////////////

impl Default for SkipList {
    #[inline]
    fn default() -> Self {
        SkipList::new()
    }
}

impl fmt::Debug for SkipList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter().map(|(e, _)| e)).finish()
    }
}

/// Formats as `key value height` triples separated by `, `.
impl fmt::Display for SkipList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (entry, height)) in self.iter().enumerate() {
            if i != 0 {
                write!(f, ", ")?;
            }
            write!(f, "{entry} {height}")?;
        }
        Ok(())
    }
}

impl<'a> iter::IntoIterator for &'a SkipList {
    type Item = (&'a Entry, usize);
    type IntoIter = Iter<'a>;

    #[inline]
    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

// ////////////////////////////////////////////////////////////////////////////
// Iterator
// ////////////////////////////////////////////////////////////////////////////

/// Iterator over the entries of a [`SkipList`] and their tower heights, in
/// ascending key order.
#[derive(Clone)]
pub struct Iter<'a> {
    ladder: &'a Ladder,
    current: Option<NodeId>,
    remaining: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a Entry, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let node = &self.ladder[self.current?];
        let entry = node.entry.as_ref()?;
        self.current = node.next;
        self.remaining -= 1;
        Some((entry, node.height))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl iter::FusedIterator for Iter<'_> {}

// ////////////////////////////////////////////////////////////////////////////
// Tests
// ////////////////////////////////////////////////////////////////////////////
