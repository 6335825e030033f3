//! Collections as map keys under set semantics.
//!
//! The std hash containers take their equality from the key type, so a
//! comparer cannot be handed to them directly. [`SetKey`] pairs a collection
//! with a shared [`SetEqualityComparer`] and implements `Hash` and `Eq`
//! through it, which makes any [`Sequence`] usable as a `HashMap` or
//! `HashSet` key compared as a set.
//!
//! Keys that end up in the same container must share one comparer (or
//! equivalent ones); mixing comparers in one container breaks the
//! `Hash`/`Eq` agreement the container relies on.
//!
//! # Examples
//!
//! ```rust
//! use std::collections::HashMap;
//! use std::sync::Arc;
//! use seteq::{SetEqualityComparer, SetKey};
//!
//! let comparer = Arc::new(SetEqualityComparer::new());
//! let mut owners: HashMap<SetKey<Vec<&str>, &str>, &str> = HashMap::new();
//!
//! owners.insert(SetKey::new(vec!["read", "write"], Arc::clone(&comparer)), "alice");
//! owners.insert(SetKey::new(vec!["write", "read", "read"], Arc::clone(&comparer)), "bob");
//!
//! assert_eq!(owners.len(), 1);
//! assert_eq!(owners[&SetKey::new(vec!["read", "write"], comparer)], "bob");
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::comparer::{DefaultComparer, ItemComparer};
use crate::sequence::Sequence;
use crate::set_equality::SetEqualityComparer;

/// A collection keyed by its distinct items.
///
/// `S` is the collection, `T` its item type and `C` the item comparer.
pub struct SetKey<S, T, C = DefaultComparer> {
    collection: S,
    comparer: Arc<SetEqualityComparer<T, C>>,
}

impl<S, T, C> SetKey<S, T, C> {
    /// Wraps `collection`, comparing it with `comparer`.
    #[inline]
    pub const fn new(collection: S, comparer: Arc<SetEqualityComparer<T, C>>) -> Self {
        Self {
            collection,
            comparer,
        }
    }

    /// Returns the wrapped collection.
    #[inline]
    pub const fn collection(&self) -> &S {
        &self.collection
    }

    /// Returns the comparer this key is compared with.
    #[inline]
    pub const fn comparer(&self) -> &Arc<SetEqualityComparer<T, C>> {
        &self.comparer
    }

    /// Unwraps the collection.
    #[inline]
    pub fn into_inner(self) -> S {
        self.collection
    }
}

impl<S, T> SetKey<S, T> {
    /// Wraps `collection`, comparing items with their own `Eq` and `Hash`.
    ///
    /// Every call allocates a new comparer; prefer [`SetKey::new`] with a
    /// shared one when building many keys.
    pub fn natural(collection: S) -> Self {
        Self::new(collection, Arc::new(SetEqualityComparer::new()))
    }
}

impl<S, T, C> Hash for SetKey<S, T, C>
where
    S: Sequence<T>,
    C: ItemComparer<T>,
{
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.comparer.hash_sequence(&self.collection));
    }
}

impl<S, T, C> PartialEq for SetKey<S, T, C>
where
    S: Sequence<T>,
    C: ItemComparer<T>,
{
    fn eq(&self, other: &Self) -> bool {
        self.comparer.equals(Some(&self.collection), Some(&other.collection))
    }
}

impl<S, T, C> Eq for SetKey<S, T, C>
where
    S: Sequence<T>,
    C: ItemComparer<T>,
{
}

impl<S: Clone, T, C> Clone for SetKey<S, T, C> {
    fn clone(&self) -> Self {
        Self::new(self.collection.clone(), Arc::clone(&self.comparer))
    }
}

impl<S: fmt::Debug, T, C> fmt::Debug for SetKey<S, T, C> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_tuple("SetKey")
            .field(&self.collection)
            .finish()
    }
}
