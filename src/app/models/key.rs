//! Identity tokens used to index every entity map

use std::fmt;
use std::sync::Arc;

/// Immutable identity token wrapping a single comparable value
///
/// Two keys are equal iff their payloads are equal. Ordering is only available
/// when the payload itself is orderable, so comparing keys over non-orderable
/// payloads is rejected at compile time rather than at runtime.
///
/// The default payload is a shared string, which keeps clones cheap on the
/// aggregation hot path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key<T = Arc<str>>(T);

impl Key {
    /// Create a string key
    pub fn new(value: impl AsRef<str>) -> Self {
        Self(Arc::from(value.as_ref()))
    }

    /// The wrapped string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<T> Key<T> {
    /// Create a key over an arbitrary payload
    pub fn from_value(value: T) -> Self {
        Self(value)
    }

    /// The wrapped payload
    pub fn value(&self) -> &T {
        &self.0
    }
}

impl<T: fmt::Display> fmt::Display for Key<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Key::new(value)
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Key::new(value)
    }
}

/// Implemented by every entity that can be indexed by a [`Key`]
pub trait Keyed {
    fn key(&self) -> &Key;
}
