//! A min-priority-queue built on a skip list.
//!
//! A skip list stores its entries in several levels of sorted, doubly linked
//! lists. Level 0 holds every entry, and each entry is replicated upwards into
//! a *tower* whose height is chosen when it is inserted. Every level is
//! bounded by a pair of sentinels, and the stack of sentinel pairs forms a
//! ladder that grows whenever a tower needs more room:
//!
//! ```text
//! -inf ------------------------------------------> +inf
//! -inf ------------------> [4] ------------------> +inf
//! -inf ----------> [2] --> [4] ----------> [6] --> +inf
//! -inf ----------> [2] --> [4] --> [5] --> [6] --> +inf
//! ```
//!
//! Searching starts at the top-left sentinel, moves right while the next key
//! is not larger than the target and drops one level otherwise, so the
//! expected cost of an insertion is logarithmic. The smallest entry is always
//! the first node of the base level.
//!
//! [`SkipListPq`] combines a [`SkipList`] with a [`HeightPolicy`] and keeps
//! track of the average search cost:
//!
//! ```
//! use skiplist_pq::SkipListPq;
//!
//! let mut pq = SkipListPq::new(0.5);
//! pq.insert(3, "three");
//! pq.insert(1, "one");
//! pq.insert(2, "two");
//!
//! assert_eq!(pq.remove_min().map(|e| e.key()), Some(1));
//! assert_eq!(pq.min().map(|e| e.value()), Some("two"));
//! assert!(pq.average_traversed().is_some());
//! ```
//!
//! Tower heights are drawn from a geometric distribution for
//! `0 <= alpha < 1`; any other `alpha` derives them from the key, which makes
//! the layout reproducible.

pub mod command;
mod entry;
pub mod height_policy;
mod ladder;
mod pq;
mod skiplist;
mod skipnode;

pub use entry::Entry;
pub use height_policy::{HeightPolicy, Policy};
pub use pq::{SkipListPq, StatsError};
pub use skiplist::{Iter, SkipList};
