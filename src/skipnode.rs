//! Tower nodes and the keys they are ordered by.

use std::{cmp::Ordering, fmt};

use crate::entry::Entry;

// ////////////////////////////////////////////////////////////////////////////
// Bound
// ////////////////////////////////////////////////////////////////////////////

/// The key carried by a tower node.
///
/// Sentinels are not integers, so a real key of `i64::MIN` or `i64::MAX` is
/// still strictly between the two sentinels of its level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Bound {
    /// The left sentinel of a level.
    NegInf,
    /// A real key.
    Key(i64),
    /// The right sentinel of a level.
    PosInf,
}

impl Bound {
    /// Returns `true` if this is one of the two sentinel keys.
    #[inline]
    #[must_use]
    pub fn is_sentinel(self) -> bool {
        !matches!(self, Bound::Key(_))
    }

    /// Returns the real key, if any.
    #[inline]
    #[must_use]
    pub fn key(self) -> Option<i64> {
        match self {
            Bound::Key(k) => Some(k),
            Bound::NegInf | Bound::PosInf => None,
        }
    }
}

impl PartialEq<i64> for Bound {
    #[inline]
    fn eq(&self, other: &i64) -> bool {
        *self == Bound::Key(*other)
    }
}

impl PartialOrd<i64> for Bound {
    #[inline]
    fn partial_cmp(&self, other: &i64) -> Option<Ordering> {
        Some(self.cmp(&Bound::Key(*other)))
    }
}

impl fmt::Display for Bound {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::NegInf => write!(f, "-inf"),
            Bound::Key(k) => write!(f, "{k}"),
            Bound::PosInf => write!(f, "+inf"),
        }
    }
}

// ////////////////////////////////////////////////////////////////////////////
// NodeId
// ////////////////////////////////////////////////////////////////////////////

/// Handle to a [`TowerNode`] inside the ladder's arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

// ////////////////////////////////////////////////////////////////////////////
// TowerNode
// ////////////////////////////////////////////////////////////////////////////

/// One cell of the skip list, belonging to exactly one level.
///
/// Nodes are linked horizontally (`prev`/`next`) within their level and
/// vertically (`below`/`above`) with the other nodes of their tower. Links are
/// arena handles rather than pointers.
///
/// Only the base node of a tower holds the [`Entry`]; the nodes above it carry
/// a copy of the key and reach the entry through `below`.
#[derive(Clone, Debug)]
pub struct TowerNode {
    /// Sentinel or real key.
    pub key: Bound,
    /// The payload, present on base-level real nodes only.
    pub entry: Option<Entry>,
    /// Number of levels spanned by the tower; zero everywhere except on
    /// base-level real nodes.
    pub height: usize,
    pub prev: Option<NodeId>,
    pub next: Option<NodeId>,
    pub above: Option<NodeId>,
    pub below: Option<NodeId>,
}

impl TowerNode {
    /// Create an unlinked sentinel node.
    #[inline]
    pub(crate) fn sentinel(key: Bound) -> Self {
        debug_assert!(key.is_sentinel(), "{key} is not a sentinel key");
        TowerNode {
            key,
            entry: None,
            height: 0,
            prev: None,
            next: None,
            above: None,
            below: None,
        }
    }

    /// Create the unlinked base node of a tower spanning `height` levels.
    #[inline]
    pub(crate) fn base(entry: Entry, height: usize) -> Self {
        TowerNode {
            key: Bound::Key(entry.key()),
            entry: Some(entry),
            height,
            prev: None,
            next: None,
            above: None,
            below: None,
        }
    }

    /// Create an unlinked upper-level node for a tower with the given key.
    #[inline]
    pub(crate) fn upper(key: i64) -> Self {
        TowerNode {
            key: Bound::Key(key),
            entry: None,
            height: 0,
            prev: None,
            next: None,
            above: None,
            below: None,
        }
    }

    /// Returns `true` if the node is a sentinel.
    #[inline]
    #[must_use]
    pub fn is_sentinel(&self) -> bool {
        self.key.is_sentinel()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::{Bound, TowerNode};
    use crate::entry::Entry;

    #[rstest]
    #[case(i64::MIN)]
    #[case(-1)]
    #[case(0)]
    #[case(i64::MAX)]
    fn sentinels_bound_every_key(#[case] key: i64) {
        assert!(Bound::NegInf < key);
        assert!(Bound::PosInf > key);
        assert!(Bound::NegInf < Bound::Key(key));
        assert!(Bound::Key(key) < Bound::PosInf);
    }

    #[test]
    fn keys_compare_as_integers() {
        assert!(Bound::Key(-5) < Bound::Key(3));
        assert!(Bound::Key(3) <= 3);
        assert_eq!(Bound::Key(7), 7);
        assert_eq!(Bound::Key(7).key(), Some(7));
        assert_eq!(Bound::PosInf.key(), None);
    }

    #[test]
    fn node_constructors() {
        let base = TowerNode::base(Entry::new(4, "a"), 3);
        assert!(!base.is_sentinel());
        assert_eq!(base.height, 3);
        assert_eq!(base.entry, Some(Entry::new(4, "a")));

        let upper = TowerNode::upper(4);
        assert_eq!(upper.key, Bound::Key(4));
        assert!(upper.entry.is_none());

        assert!(TowerNode::sentinel(Bound::NegInf).is_sentinel());
        assert_eq!(Bound::NegInf.to_string(), "-inf");
    }
}
