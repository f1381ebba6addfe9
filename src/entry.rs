//! The key/value pair stored in the queue.

use std::fmt;

/// An immutable key/value pair.
///
/// Entries are ordered only by the skip list's physical layout: the key
/// decides the position, and entries sharing a key keep their insertion
/// order.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Entry {
    key: i64,
    value: String,
}

impl Entry {
    /// Create a new entry.
    #[inline]
    #[must_use]
    pub fn new(key: i64, value: impl Into<String>) -> Self {
        Entry {
            key,
            value: value.into(),
        }
    }

    /// The key of this entry.
    #[inline]
    #[must_use]
    pub fn key(&self) -> i64 {
        self.key
    }

    /// The value of this entry.
    #[inline]
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Consumes the entry, returning the key and value.
    #[inline]
    #[must_use]
    pub fn into_parts(self) -> (i64, String) {
        (self.key, self.value)
    }
}

impl fmt::Display for Entry {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.key, self.value)
    }
}
