//! Sets of distinct items under a pluggable [`ItemComparer`].
//!
//! [`ItemSet`] is the owned, comparer-aware set this crate materializes
//! collections into. Building one collapses duplicates (as decided by the
//! comparer) and keeps the first occurrence of every distinct item, in
//! insertion order.
//!
//! An `ItemSet` passed to a [`SetEqualityComparer`](crate::SetEqualityComparer)
//! whose item comparer has the same [identity](ItemComparer::identity) is
//! used directly, without being copied or rehashed.
//!
//! # Examples
//!
//! ```rust
//! use seteq::ItemSet;
//! use seteq::comparer::CaseInsensitive;
//!
//! let mut tags = ItemSet::with_comparer(CaseInsensitive);
//! assert!(tags.insert("Rust".to_string()));
//! assert!(!tags.insert("RUST".to_string()));
//! assert!(tags.insert("Haskell".to_string()));
//!
//! assert_eq!(tags.len(), 2);
//! assert!(tags.contains(&"rust".to_string()));
//! ```

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::iter::FromIterator;

use smallvec::SmallVec;

use crate::comparer::{BucketBuildHasher, ComparerIdentity, DefaultComparer, ItemComparer};

// =============================================================================
// Table
// =============================================================================

/// Distinct entries bucketed by the hash their comparer assigns them.
///
/// `E` is either an owned item or a reference to one; lookups go through
/// `E: Borrow<T>` so both shapes share one implementation.
#[derive(Clone)]
pub(crate) struct Table<E> {
    entries: Vec<E>,
    buckets: HashMap<u64, SmallVec<[usize; 2]>, BucketBuildHasher>,
}

impl<E> Table<E> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            buckets: HashMap::with_capacity_and_hasher(capacity, BucketBuildHasher::default()),
        }
    }

    #[inline]
    pub(crate) const fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub(crate) fn entries(&self) -> &[E] {
        &self.entries
    }

    /// Returns the index of the entry equal to `item`, whose hash is `hash`.
    pub(crate) fn position<T, C>(&self, item: &T, hash: u64, comparer: &C) -> Option<usize>
    where
        T: ?Sized,
        E: Borrow<T>,
        C: ItemComparer<T> + ?Sized,
    {
        self.buckets.get(&hash)?.iter().copied().find(|&index| {
            self.entries
                .get(index)
                .is_some_and(|entry| comparer.equals(Borrow::<T>::borrow(entry), item))
        })
    }

    /// Adds `entry` unless an equal entry is already present.
    ///
    /// Returns `true` if the entry was added.
    pub(crate) fn insert<T, C>(&mut self, entry: E, comparer: &C) -> bool
    where
        T: ?Sized,
        E: Borrow<T>,
        C: ItemComparer<T> + ?Sized,
    {
        let hash = comparer.hash(Borrow::<T>::borrow(&entry));
        if self
            .position(Borrow::<T>::borrow(&entry), hash, comparer)
            .is_some()
        {
            return false;
        }
        let index = self.entries.len();
        self.entries.push(entry);
        self.buckets.entry(hash).or_default().push(index);
        true
    }

    pub(crate) fn into_entries(self) -> Vec<E> {
        self.entries
    }
}

// =============================================================================
// DistinctItems
// =============================================================================

/// A borrowed view of a collection that already holds distinct items.
///
/// Returned by [`Sequence::distinct_items`](crate::Sequence::distinct_items)
/// for collections that can be reused without materializing a new set.
/// Only this crate can construct one.
pub struct DistinctItems<'a, T> {
    pub(crate) table: &'a Table<T>,
    pub(crate) identity: Option<ComparerIdentity>,
}

impl<T> DistinctItems<'_, T> {
    /// Returns the number of distinct items.
    #[inline]
    pub const fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if there are no items.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the identity of the comparer the items were deduplicated with.
    #[inline]
    pub const fn identity(&self) -> Option<ComparerIdentity> {
        self.identity
    }
}

impl<T> fmt::Debug for DistinctItems<'_, T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("DistinctItems")
            .field("len", &self.len())
            .field("identity", &self.identity)
            .finish()
    }
}

// =============================================================================
// ItemSet Definition
// =============================================================================

/// An owned set of distinct items, compared with `C`.
///
/// # Time Complexity
///
/// | Operation  | Complexity     |
/// |------------|----------------|
/// | `insert`   | O(1) expected  |
/// | `contains` | O(1) expected  |
/// | `len`      | O(1)           |
/// | `iter`     | O(n)           |
///
/// # Examples
///
/// ```rust
/// use seteq::ItemSet;
///
/// let set: ItemSet<i32> = [3, 1, 3, 2, 1].into_iter().collect();
/// assert_eq!(set.len(), 3);
/// assert_eq!(set.iter().copied().collect::<Vec<_>>(), vec![3, 1, 2]);
/// ```
#[derive(Clone)]
pub struct ItemSet<T, C = DefaultComparer> {
    table: Table<T>,
    comparer: C,
}

impl<T> ItemSet<T> {
    /// Creates an empty set using the items' own `Eq` and `Hash`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use seteq::ItemSet;
    ///
    /// let set: ItemSet<i32> = ItemSet::new();
    /// assert!(set.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_comparer(DefaultComparer)
    }
}

impl<T, C> ItemSet<T, C> {
    /// Creates an empty set that compares items with `comparer`.
    #[inline]
    #[must_use]
    pub fn with_comparer(comparer: C) -> Self {
        Self {
            table: Table::with_capacity(0),
            comparer,
        }
    }

    /// Returns the number of distinct items.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the set holds no items.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the comparer this set deduplicates with.
    #[inline]
    pub const fn comparer(&self) -> &C {
        &self.comparer
    }

    /// Iterates over the items in insertion order.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.table.entries().iter()
    }

    /// Consumes the set, returning its items in insertion order.
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        self.table.into_entries()
    }
}

impl<T, C: ItemComparer<T>> ItemSet<T, C> {
    /// Collects `iter` into a set that compares items with `comparer`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use seteq::ItemSet;
    /// use seteq::comparer::CaseInsensitive;
    ///
    /// let set = ItemSet::from_iter_with(["a", "A", "b"], CaseInsensitive);
    /// assert_eq!(set.len(), 2);
    /// ```
    pub fn from_iter_with<I: IntoIterator<Item = T>>(iter: I, comparer: C) -> Self {
        let iter = iter.into_iter();
        let mut set = Self {
            table: Table::with_capacity(iter.size_hint().0),
            comparer,
        };
        set.extend(iter);
        set
    }

    /// Inserts an item.
    ///
    /// Returns `true` if the item was not present yet. An item equal to one
    /// already in the set is dropped and the original is kept.
    pub fn insert(&mut self, item: T) -> bool {
        self.table.insert::<T, C>(item, &self.comparer)
    }

    /// Returns `true` if the set holds an item equal to `item`.
    #[must_use]
    pub fn contains(&self, item: &T) -> bool {
        let hash = self.comparer.hash(item);
        self.table.position(item, hash, &self.comparer).is_some()
    }

    pub(crate) fn as_distinct_items(&self) -> DistinctItems<'_, T> {
        DistinctItems {
            table: &self.table,
            identity: self.comparer.identity(),
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

impl<T, C: Default> Default for ItemSet<T, C> {
    fn default() -> Self {
        Self::with_comparer(C::default())
    }
}

impl<T, C: ItemComparer<T>> Extend<T> for ItemSet<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.insert(item);
        }
    }
}

impl<T, C: ItemComparer<T> + Default> FromIterator<T> for ItemSet<T, C> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_iter_with(iter, C::default())
    }
}

impl<T, C> IntoIterator for ItemSet<T, C> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_vec().into_iter()
    }
}

impl<'a, T, C> IntoIterator for &'a ItemSet<T, C> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, C: ItemComparer<T>> PartialEq for ItemSet<T, C> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && other.iter().all(|item| self.contains(item))
    }
}

impl<T, C: ItemComparer<T>> Eq for ItemSet<T, C> {}

impl<T: fmt::Debug, C> fmt::Debug for ItemSet<T, C> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_set().entries(self.iter()).finish()
    }
}

impl<T: fmt::Display, C> fmt::Display for ItemSet<T, C> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        for (index, item) in self.iter().enumerate() {
            if index > 0 {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{item}")?;
        }
        write!(formatter, "}}")
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<T: serde::Serialize, C> serde::Serialize for ItemSet<T, C> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeSeq;
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for item in self {
            seq.serialize_element(item)?;
        }
        seq.end()
    }
}

#[cfg(feature = "serde")]
struct ItemSetVisitor<T, C> {
    marker: std::marker::PhantomData<fn() -> (T, C)>,
}

#[cfg(feature = "serde")]
impl<T, C> ItemSetVisitor<T, C> {
    const fn new() -> Self {
        Self {
            marker: std::marker::PhantomData,
        }
    }
}

#[cfg(feature = "serde")]
impl<'de, T, C> serde::de::Visitor<'de> for ItemSetVisitor<T, C>
where
    T: serde::Deserialize<'de>,
    C: ItemComparer<T> + Default,
{
    type Value = ItemSet<T, C>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a sequence")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        let mut set = ItemSet::with_comparer(C::default());
        while let Some(item) = seq.next_element()? {
            set.insert(item);
        }
        Ok(set)
    }
}

#[cfg(feature = "serde")]
impl<'de, T, C> serde::Deserialize<'de> for ItemSet<T, C>
where
    T: serde::Deserialize<'de>,
    C: ItemComparer<T> + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_seq(ItemSetVisitor::new())
    }
}

// =============================================================================
// Tests
// =============================================================================


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;
    use crate::comparer::CaseInsensitive;
    use rstest::rstest;

    #[rstest]
    fn test_serialize_in_insertion_order() {
        let set: ItemSet<i32> = [3, 1, 3, 2].into_iter().collect();
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, "[3,1,2]");
    }

    #[rstest]
    fn test_deserialize_collapses_duplicates() {
        let set: ItemSet<i32> = serde_json::from_str("[1,2,2,1]").unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains(&1));
        assert!(set.contains(&2));
    }

    #[rstest]
    fn test_deserialize_uses_default_comparer_of_type() {
        let set: ItemSet<String, CaseInsensitive> =
            serde_json::from_str(r#"["Tag","TAG","tag","other"]"#).unwrap();
        assert_eq!(set.len(), 2);
    }
}
