//! A min-priority-queue wrapping a [`SkipList`] with a height policy and
//! search statistics.

use std::fmt;

use thiserror::Error;

use crate::{
    entry::Entry,
    height_policy::{HeightPolicy, Policy},
    skiplist::{Iter, SkipList},
};

/// Errors reported by the statistics of a [`SkipListPq`].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum StatsError {
    /// No insertion has happened yet, so there is nothing to average.
    #[error("no insertions have been recorded.")]
    NoInserts,
}

// ////////////////////////////////////////////////////////////////////////////
// SkipListPq
// ////////////////////////////////////////////////////////////////////////////

/// Min-priority-queue backed by a skip list.
///
/// Every insertion asks the height policy for the height of the new tower and
/// records how many nodes the search for the insertion point visited. The
/// counters live as long as the queue and are never reset.
///
/// # Examples
///
/// ```
/// use skiplist_pq::SkipListPq;
///
/// // Any alpha outside [0, 1) derives tower heights from the keys.
/// let mut pq = SkipListPq::new(2.0);
/// pq.insert(4, "a");
/// pq.insert(2, "b");
/// pq.insert(6, "c");
///
/// assert_eq!(pq.min().map(|e| e.value()), Some("b"));
/// assert_eq!(pq.to_string(), "2 b 2, 4 a 3, 6 c 2");
/// assert_eq!(pq.remove_min().map(|e| e.key()), Some(2));
/// assert_eq!(pq.len(), 2);
/// ```
pub struct SkipListPq<P = Policy> {
    list: SkipList,
    policy: P,
    insert_count: usize,
    total_traversed: u64,
}

impl SkipListPq<Policy> {
    /// Create an empty queue whose height policy is selected by `alpha`.
    ///
    /// Values in `[0, 1)` give randomized heights seeded from the thread-local
    /// generator; any other value, `NaN` included, gives key-derived heights.
    #[inline]
    #[must_use]
    pub fn new(alpha: f64) -> Self {
        Self::with_policy(Policy::from_alpha(alpha))
    }

    /// Create an empty queue whose height policy is selected by `alpha`, with
    /// a fixed seed for randomized heights.
    #[inline]
    #[must_use]
    pub fn with_seed(alpha: f64, seed: u64) -> Self {
        Self::with_policy(Policy::from_alpha_seeded(alpha, seed))
    }
}

impl<P: HeightPolicy> SkipListPq<P> {
    /// Create an empty queue using the given height policy.
    #[inline]
    #[must_use]
    pub fn with_policy(policy: P) -> Self {
        SkipListPq {
            list: SkipList::new(),
            policy,
            insert_count: 0,
            total_traversed: 0,
        }
    }

    /// Insert a new entry, returning the number of nodes visited while
    /// searching for its position.
    #[expect(clippy::as_conversions, reason = "usize always fits in u64")]
    pub fn insert(&mut self, key: i64, value: impl Into<String>) -> usize {
        let height = self.policy.height(key);
        let traversed = self.list.insert(key, value, height);
        self.insert_count += 1;
        self.total_traversed += traversed as u64;
        traversed
    }

    /// Insert every `(key, value)` pair, in order.
    pub fn extend<I, V>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (i64, V)>,
        V: Into<String>,
    {
        for (key, value) in entries {
            self.insert(key, value);
        }
    }

    /// Provides a reference to the entry with the smallest key, or `None` if
    /// the queue is empty.
    #[inline]
    #[must_use]
    pub fn min(&self) -> Option<&Entry> {
        self.list.min()
    }

    /// Removes the entry with the smallest key and returns it, or `None` if
    /// the queue is empty.
    #[inline]
    pub fn remove_min(&mut self) -> Option<Entry> {
        self.list.remove_min()
    }

    /// The height policy.
    #[inline]
    pub fn policy(&self) -> &P {
        &self.policy
    }
}

impl<P> SkipListPq<P> {
    /// Returns the number of entries in the queue.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Returns `true` if the queue contains no entries.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Returns an iterator over the entries in ascending key order, each paired
    /// with the number of levels its tower spans.
    #[inline]
    pub fn iter(&self) -> Iter<'_> {
        self.list.iter()
    }

    /// The underlying skip list.
    #[inline]
    #[must_use]
    pub fn as_skiplist(&self) -> &SkipList {
        &self.list
    }

    /// Number of insertions performed.
    #[inline]
    #[must_use]
    pub fn insert_count(&self) -> usize {
        self.insert_count
    }

    /// Sum of the traversal counts of every insertion.
    #[inline]
    #[must_use]
    pub fn total_traversed(&self) -> u64 {
        self.total_traversed
    }

    /// Average number of nodes visited per insertion, or `None` before the
    /// first insertion.
    #[inline]
    #[must_use]
    pub fn average_traversed(&self) -> Option<f64> {
        self.try_average_traversed().ok()
    }

    /// Average number of nodes visited per insertion.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::NoInserts`] before the first insertion.
    #[expect(clippy::float_arithmetic, reason = "Computing an average")]
    #[expect(
        clippy::as_conversions,
        clippy::cast_precision_loss,
        reason = "Counters stay far below 2^52"
    )]
    pub fn try_average_traversed(&self) -> Result<f64, StatsError> {
        if self.insert_count == 0 {
            return Err(StatsError::NoInserts);
        }
        Ok(self.total_traversed as f64 / self.insert_count as f64)
    }
}

impl Default for SkipListPq<Policy> {
    /// A queue with randomized heights and `alpha = 0.5`.
    #[inline]
    fn default() -> Self {
        SkipListPq::new(0.5)
    }
}

impl<P: fmt::Debug> fmt::Debug for SkipListPq<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SkipListPq")
            .field("list", &self.list)
            .field("policy", &self.policy)
            .field("insert_count", &self.insert_count)
            .field("total_traversed", &self.total_traversed)
            .finish()
    }
}

/// Formats as `key value height` triples separated by `, `.
impl<P> fmt::Display for SkipListPq<P> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.list, f)
    }
}

impl<'a, P> IntoIterator for &'a SkipListPq<P> {
    type Item = (&'a Entry, usize);
    type IntoIter = Iter<'a>;

    #[inline]
    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

// ////////////////////////////////////////////////////////////////////////////
// Tests
// ////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::{SkipListPq, StatsError};
    use crate::{entry::Entry, height_policy::Valuation};

    #[test]
    fn scenario_deterministic() {
        let mut pq = SkipListPq::new(2.0);
        assert!(pq.policy().is_deterministic());
        assert_eq!(pq.insert(4, "a"), 2);
        assert_eq!(pq.insert(2, "b"), 4);
        assert_eq!(pq.insert(6, "c"), 5);
        pq.as_skiplist().check();

        assert_eq!(pq.min(), Some(&Entry::new(2, "b")));
        let listed: Vec<_> = pq.iter().map(|(e, h)| (e.clone(), h)).collect();
        assert_eq!(
            listed,
            vec![
                (Entry::new(2, "b"), 2),
                (Entry::new(4, "a"), 3),
                (Entry::new(6, "c"), 2)
            ]
        );

        assert_eq!(pq.remove_min(), Some(Entry::new(2, "b")));
        assert_eq!(pq.min(), Some(&Entry::new(4, "a")));
        assert_eq!(pq.len(), 2);
        pq.as_skiplist().check();

        assert_eq!(pq.insert_count(), 3);
        assert_eq!(pq.total_traversed(), 11);
        assert_eq!(pq.average_traversed(), Some(11.0 / 3.0));
    }

    #[test]
    fn remove_min_on_empty() {
        let mut pq = SkipListPq::new(0.5);
        assert!(pq.remove_min().is_none());
        assert!(pq.min().is_none());
        assert_eq!(pq.len(), 0);
        assert!(pq.is_empty());
        assert_eq!(pq.to_string(), "");
    }

    #[test]
    fn average_before_insert() {
        let pq = SkipListPq::new(0.5);
        assert_eq!(pq.average_traversed(), None);
        assert_eq!(pq.try_average_traversed(), Err(StatsError::NoInserts));
        assert_eq!(
            StatsError::NoInserts.to_string(),
            "no insertions have been recorded."
        );
    }

    #[rstest]
    #[case(0.0)]
    #[case(0.5)]
    #[case(3.0)]
    fn single_insert_average(#[case] alpha: f64) {
        let mut pq = SkipListPq::with_seed(alpha, 1);
        let traversed = pq.insert(10, "x");
        assert_eq!(pq.average_traversed(), Some(traversed as f64));
        assert_eq!(pq.total_traversed(), traversed as u64);
    }

    #[test]
    fn removals_do_not_touch_counters() -> Result<()> {
        let mut pq = SkipListPq::with_seed(0.5, 99);
        pq.extend((0..100).map(|k| (k, format!("v{k}"))));
        let total = pq.total_traversed();
        for _ in 0..40 {
            pq.remove_min();
        }
        assert_eq!(pq.len(), 60);
        assert_eq!(pq.insert_count(), 100);
        assert_eq!(pq.total_traversed(), total);
        assert_eq!(pq.min().map(Entry::key), Some(40));
        assert!(pq.try_average_traversed()? > 0.0);
        Ok(())
    }

    #[test]
    fn custom_policy() {
        let mut pq = SkipListPq::with_policy(Valuation);
        pq.insert(16, "x");
        assert_eq!(pq.as_skiplist().levels(), 6);
        assert_eq!(pq.iter().next().map(|(_, h)| h), Some(5));
    }

    #[test]
    fn seeded_queues_are_identical() {
        let mut a = SkipListPq::with_seed(0.5, 7);
        let mut b = SkipListPq::with_seed(0.5, 7);
        for key in [5, 3, 9, 1, 7, 3] {
            assert_eq!(a.insert(key, "v"), b.insert(key, "v"));
        }
        assert_eq!(a.to_string(), b.to_string());
        assert_eq!(a.as_skiplist().levels(), b.as_skiplist().levels());
    }
}
