//! Set equality for collections.
//!
//! This module provides [`SetEqualityComparer`], which decides whether two
//! collections hold the same distinct items, irrespective of order and of
//! how often each item repeats, and hashes collections consistently with
//! that decision.
//!
//! # Overview
//!
//! - `equals`: two-way distinct membership, at most one materialized set
//! - `hash`: XOR of the item hashes of the distinct items, `0` for `None`
//! - absent (`None`) collections equal only each other
//! - the same collection instance is equal to itself without being read
//!
//! # Examples
//!
//! ```rust
//! use seteq::SetEqualityComparer;
//!
//! let comparer = SetEqualityComparer::new();
//!
//! assert!(comparer.equals(Some(&vec![1, 2, 3]), Some(&vec![3, 2, 1, 1])));
//! assert!(!comparer.equals(Some(&vec![1, 2, 3]), Some(&vec![1, 2])));
//! assert_eq!(
//!     comparer.hash(Some(&vec![1, 2, 3])),
//!     comparer.hash(Some(&vec![2, 3, 1]))
//! );
//! ```

use std::fmt;
use std::marker::PhantomData;

use crate::comparer::{DefaultComparer, ItemComparer};
use crate::error::ComparerError;
use crate::item_set::Table;
use crate::sequence::Sequence;

/// Hash returned for an absent collection.
pub const ABSENT_HASH: u64 = 0;

// =============================================================================
// SetEqualityComparer Definition
// =============================================================================

/// Compares collections of `T` for set equality using the item comparer `C`.
///
/// The comparer is immutable once built and holds nothing besides `C`, so a
/// single instance can be shared between threads whenever `C` can.
///
/// # Examples
///
/// ```rust
/// use seteq::SetEqualityComparer;
/// use seteq::comparer::CaseInsensitive;
///
/// let comparer = SetEqualityComparer::with_comparer(CaseInsensitive);
/// assert!(comparer.equals(Some(&["A", "b"]), Some(&["a", "B"])));
/// ```
pub struct SetEqualityComparer<T, C = DefaultComparer> {
    item_comparer: C,
    marker: PhantomData<fn(&T)>,
}

impl<T> SetEqualityComparer<T> {
    /// Creates a comparer that uses the items' own `Eq` and `Hash`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use seteq::SetEqualityComparer;
    ///
    /// let comparer: SetEqualityComparer<&str> = SetEqualityComparer::new();
    /// assert!(comparer.equals_sequences(&["x", "y"], &vec!["y", "x", "y"]));
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self::with_comparer(DefaultComparer)
    }
}

impl<T, C> SetEqualityComparer<T, C> {
    /// Creates a comparer that compares items with `item_comparer`.
    #[inline]
    #[must_use]
    pub const fn with_comparer(item_comparer: C) -> Self {
        Self {
            item_comparer,
            marker: PhantomData,
        }
    }

    /// Creates a comparer from an item comparer that may be absent.
    ///
    /// # Errors
    ///
    /// Returns [`ComparerError::MissingItemComparer`] if `item_comparer` is
    /// `None`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use seteq::{ComparerError, SetEqualityComparer};
    /// use seteq::comparer::CaseInsensitive;
    ///
    /// let comparer = SetEqualityComparer::<String, _>::try_with_comparer(Some(CaseInsensitive));
    /// assert!(comparer.is_ok());
    ///
    /// let missing = SetEqualityComparer::<String, CaseInsensitive>::try_with_comparer(None);
    /// assert_eq!(
    ///     missing.err(),
    ///     Some(ComparerError::MissingItemComparer { parameter: "item_comparer" })
    /// );
    /// ```
    pub fn try_with_comparer(item_comparer: Option<C>) -> Result<Self, ComparerError> {
        item_comparer
            .map(Self::with_comparer)
            .ok_or(ComparerError::MissingItemComparer {
                parameter: "item_comparer",
            })
    }

    /// Returns the item comparer.
    #[inline]
    pub const fn item_comparer(&self) -> &C {
        &self.item_comparer
    }
}

// =============================================================================
// Comparison and Hashing
// =============================================================================

impl<T, C: ItemComparer<T>> SetEqualityComparer<T, C> {
    /// Returns `true` if `x` and `y` hold the same distinct items.
    ///
    /// - the same instance on both sides is equal without being enumerated
    /// - `None` equals only `None`
    /// - otherwise `x` is materialized into a set and `y` is checked against
    ///   it in both directions
    ///
    /// # Examples
    ///
    /// ```rust
    /// use seteq::SetEqualityComparer;
    ///
    /// let comparer = SetEqualityComparer::new();
    /// let numbers = vec![1, 2];
    ///
    /// assert!(comparer.equals::<Vec<i32>>(None, None));
    /// assert!(!comparer.equals(None, Some(&numbers)));
    /// assert!(!comparer.equals(Some(&numbers), None));
    /// assert!(comparer.equals(Some(&numbers), Some(&numbers)));
    /// ```
    pub fn equals<S>(&self, x: Option<&S>, y: Option<&S>) -> bool
    where
        S: Sequence<T> + ?Sized,
    {
        match (x, y) {
            (Some(x), Some(y)) if std::ptr::eq(x, y) => true,
            (Some(x), Some(y)) => self.equals_sequences(x, y),
            (None, None) => true,
            _ => false,
        }
    }

    /// Returns `true` if two present collections hold the same distinct items.
    ///
    /// Unlike [`equals`](Self::equals) the two sides may be collections of
    /// different types, and both are always enumerated.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::collections::BTreeSet;
    /// use seteq::SetEqualityComparer;
    ///
    /// let comparer = SetEqualityComparer::new();
    /// assert!(comparer.equals_sequences(&vec![3, 1, 3, 2], &BTreeSet::from([1, 2, 3])));
    /// ```
    pub fn equals_sequences<X, Y>(&self, x: &X, y: &Y) -> bool
    where
        X: Sequence<T> + ?Sized,
        Y: Sequence<T> + ?Sized,
    {
        let set = self.materialize(x);
        let mut matched = vec![false; set.len()];
        let mut matched_count = 0;

        for item in y.items() {
            let Some(index) = set.position(item, &self.item_comparer) else {
                return false;
            };
            if let Some(flag) = matched.get_mut(index)
                && !std::mem::replace(flag, true)
            {
                matched_count += 1;
            }
        }

        matched_count == set.len()
    }

    /// Returns the order- and duplicate-independent hash of `collection`.
    ///
    /// `None` hashes to [`ABSENT_HASH`] (`0`). Otherwise the item hashes of
    /// the distinct items are folded together with XOR, starting from `0`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use seteq::SetEqualityComparer;
    ///
    /// let comparer = SetEqualityComparer::new();
    ///
    /// assert_eq!(comparer.hash::<Vec<i32>>(None), 0);
    /// assert_eq!(
    ///     comparer.hash(Some(&vec![1, 1, 2])),
    ///     comparer.hash(Some(&vec![2, 1]))
    /// );
    /// ```
    pub fn hash<S>(&self, collection: Option<&S>) -> u64
    where
        S: Sequence<T> + ?Sized,
    {
        collection.map_or(ABSENT_HASH, |collection| self.hash_sequence(collection))
    }

    /// Returns the order- and duplicate-independent hash of a present collection.
    pub fn hash_sequence<S>(&self, collection: &S) -> u64
    where
        S: Sequence<T> + ?Sized,
    {
        self.materialize(collection)
            .fold_items(ABSENT_HASH, |accumulator, item| {
                accumulator ^ self.item_comparer.hash(item)
            })
    }

    /// Views `collection` as a set of distinct items under the item comparer.
    ///
    /// Collections that already hold items deduplicated by an identical
    /// comparer are borrowed as they are; anything else is copied into a
    /// fresh table of references.
    fn materialize<'a, S>(&self, collection: &'a S) -> Materialized<'a, T>
    where
        S: Sequence<T> + ?Sized,
    {
        if let Some(distinct) = collection.distinct_items() {
            let identity = self.item_comparer.identity();
            if identity.is_some() && distinct.identity() == identity {
                log::trace!("reusing {} distinct items without rebuilding", distinct.len());
                return Materialized::Reused(distinct.table);
            }
        }

        let items = collection.items();
        let mut table = Table::with_capacity(items.size_hint().0);
        for item in items {
            table.insert::<T, C>(item, &self.item_comparer);
        }
        log::trace!("materialized {} distinct items", table.len());
        Materialized::Built(table)
    }
}

// =============================================================================
// Materialized
// =============================================================================

/// The set view of one collection, local to a single call.
enum Materialized<'a, T> {
    Reused(&'a Table<T>),
    Built(Table<&'a T>),
}

impl<T> Materialized<'_, T> {
    const fn len(&self) -> usize {
        match self {
            Self::Reused(table) => table.len(),
            Self::Built(table) => table.len(),
        }
    }

    fn position<C: ItemComparer<T>>(&self, item: &T, comparer: &C) -> Option<usize> {
        let hash = comparer.hash(item);
        match self {
            Self::Reused(table) => table.position(item, hash, comparer),
            Self::Built(table) => table.position(item, hash, comparer),
        }
    }

    fn fold_items<B, F: FnMut(B, &T) -> B>(&self, initial: B, mut function: F) -> B {
        match self {
            Self::Reused(table) => table
                .entries()
                .iter()
                .fold(initial, |accumulator, item| function(accumulator, item)),
            Self::Built(table) => table
                .entries()
                .iter()
                .fold(initial, |accumulator, item| function(accumulator, *item)),
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

impl<T> Default for SetEqualityComparer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C: Clone> Clone for SetEqualityComparer<T, C> {
    fn clone(&self) -> Self {
        Self::with_comparer(self.item_comparer.clone())
    }
}

impl<T, C: Copy> Copy for SetEqualityComparer<T, C> {}

impl<T, C: fmt::Debug> fmt::Debug for SetEqualityComparer<T, C> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("SetEqualityComparer")
            .field("item_comparer", &self.item_comparer)
            .finish()
    }
}

static_assertions::assert_impl_all!(SetEqualityComparer<std::rc::Rc<i32>>: Send, Sync);
static_assertions::assert_impl_all!(
    SetEqualityComparer<String, crate::comparer::CaseInsensitive>: Send, Sync, Copy
);

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ItemSet;
    use crate::comparer::{ByKey, CaseInsensitive, from_fn, hash_one};
    use rstest::rstest;
    use std::cell::Cell;
    use std::collections::{BTreeSet, HashSet};
    use std::sync::Arc;

    /// A sequence that panics when enumerated.
    struct Untouchable;

    impl Sequence<i32> for Untouchable {
        fn items<'a>(&'a self) -> impl Iterator<Item = &'a i32>
        where
            i32: 'a,
        {
            std::iter::from_fn(|| -> Option<&'a i32> {
                panic!("sequence must not be enumerated")
            })
        }
    }

    /// A sequence that counts how often it is enumerated.
    struct Counted {
        items: Vec<i32>,
        enumerations: Cell<usize>,
    }

    impl Counted {
        fn new(items: Vec<i32>) -> Self {
            Self {
                items,
                enumerations: Cell::new(0),
            }
        }
    }

    impl Sequence<i32> for Counted {
        fn items<'a>(&'a self) -> impl Iterator<Item = &'a i32>
        where
            i32: 'a,
        {
            self.enumerations.set(self.enumerations.get() + 1);
            self.items.iter()
        }
    }

    // =========================================================================
    // Construction
    // =========================================================================

    #[rstest]
    fn test_default_matches_new() {
        let comparer: SetEqualityComparer<i32> = SetEqualityComparer::default();
        assert!(comparer.equals(Some(&[1, 2]), Some(&[2, 1])));
    }

    #[rstest]
    fn test_try_with_comparer_rejects_absent_comparer() {
        let result = SetEqualityComparer::<String, CaseInsensitive>::try_with_comparer(None);
        assert!(matches!(
            result,
            Err(ComparerError::MissingItemComparer {
                parameter: "item_comparer"
            })
        ));
    }

    #[rstest]
    fn test_try_with_comparer_accepts_present_comparer() {
        let comparer =
            SetEqualityComparer::<String, _>::try_with_comparer(Some(CaseInsensitive)).unwrap();
        assert_eq!(comparer.item_comparer(), &CaseInsensitive);
    }

    // =========================================================================
    // Equals
    // =========================================================================

    #[rstest]
    #[case(vec![1, 2, 3], vec![3, 2, 1, 1], true)]
    #[case(vec![1, 2, 3], vec![1, 2], false)]
    #[case(vec![1, 2], vec![1, 2, 3], false)]
    #[case(vec![1, 1, 2], vec![2, 1], true)]
    #[case(vec![], vec![], true)]
    #[case(vec![], vec![1], false)]
    #[case(vec![1], vec![], false)]
    #[case(vec![1, 2], vec![1, 3], false)]
    fn test_equals_by_distinct_membership(
        #[case] left: Vec<i32>,
        #[case] right: Vec<i32>,
        #[case] expected: bool,
    ) {
        let comparer = SetEqualityComparer::new();
        assert_eq!(comparer.equals(Some(&left), Some(&right)), expected);
        assert_eq!(comparer.equals(Some(&right), Some(&left)), expected);
    }

    #[rstest]
    fn test_equals_absent_collections() {
        let comparer = SetEqualityComparer::new();
        let present = vec![1, 2];

        assert!(comparer.equals::<Vec<i32>>(None, None));
        assert!(!comparer.equals(None, Some(&present)));
        assert!(!comparer.equals(Some(&present), None));
    }

    #[rstest]
    fn test_equals_same_instance_without_enumeration() {
        let comparer = SetEqualityComparer::new();
        let untouchable = Untouchable;
        assert!(comparer.equals(Some(&untouchable), Some(&untouchable)));
    }

    #[rstest]
    fn test_equals_enumerates_each_side_once() {
        let comparer = SetEqualityComparer::new();
        let left = Counted::new(vec![1, 2, 3]);
        let right = Counted::new(vec![3, 2, 1]);

        assert!(comparer.equals(Some(&left), Some(&right)));
        assert_eq!(left.enumerations.get(), 1);
        assert_eq!(right.enumerations.get(), 1);
    }

    #[rstest]
    fn test_equals_distinct_slices_of_one_buffer() {
        let comparer = SetEqualityComparer::new();
        let buffer = [1, 2, 1, 2];
        assert!(comparer.equals(Some(&buffer[..2]), Some(&buffer[2..])));
        assert!(!comparer.equals(Some(&buffer[..1]), Some(&buffer[..2])));
    }

    #[rstest]
    fn test_equals_with_case_insensitive_comparer() {
        let comparer = SetEqualityComparer::with_comparer(CaseInsensitive);
        assert!(comparer.equals(Some(&["A", "b"]), Some(&["a", "B"])));
        assert!(!comparer.equals(Some(&["A", "b"]), Some(&["a", "C"])));
    }

    #[rstest]
    fn test_equals_with_key_comparer() {
        let comparer = SetEqualityComparer::with_comparer(ByKey::new(|value: &i32| value % 3));
        assert!(comparer.equals_sequences(&[1, 2, 3], &[4, 5, 6, 7]));
        assert!(!comparer.equals_sequences(&[1, 2], &[3]));
    }

    #[rstest]
    fn test_equals_with_colliding_hashes() {
        let comparer = SetEqualityComparer::with_comparer(from_fn(
            |left: &i32, right: &i32| left == right,
            |_: &i32| 42_u64,
        ));
        assert!(comparer.equals_sequences(&[1, 2, 3], &[3, 1, 2, 2]));
        assert!(!comparer.equals_sequences(&[1, 2, 3], &[1, 2, 4]));
    }

    #[rstest]
    fn test_equals_sequences_across_collection_types() {
        let comparer = SetEqualityComparer::new();
        let hashed: HashSet<i32> = [1, 2, 3].into_iter().collect();
        let ordered: BTreeSet<i32> = [3, 2, 1].into_iter().collect();

        assert!(comparer.equals_sequences(&hashed, &ordered));
        assert!(comparer.equals_sequences(&vec![2, 2, 3, 1], &hashed));
        assert!(!comparer.equals_sequences(&ordered, &vec![1, 2]));
    }

    // =========================================================================
    // Hash
    // =========================================================================

    #[rstest]
    fn test_hash_absent_is_zero() {
        let comparer: SetEqualityComparer<i32> = SetEqualityComparer::new();
        assert_eq!(comparer.hash::<[i32]>(None), ABSENT_HASH);
        assert_eq!(ABSENT_HASH, 0);
    }

    #[rstest]
    fn test_hash_empty_is_zero() {
        let comparer: SetEqualityComparer<i32> = SetEqualityComparer::new();
        assert_eq!(comparer.hash_sequence(&Vec::new()), 0);
    }

    #[rstest]
    fn test_hash_is_xor_of_distinct_item_hashes() {
        let comparer = SetEqualityComparer::new();
        let expected = hash_one(&1) ^ hash_one(&2) ^ hash_one(&3);
        assert_eq!(comparer.hash_sequence(&[3, 3, 1, 2, 1]), expected);
    }

    #[rstest]
    #[case(vec![1, 2, 3], vec![3, 1, 2])]
    #[case(vec![1, 1, 2], vec![1, 2])]
    #[case(vec![5], vec![5, 5, 5, 5])]
    fn test_hash_ignores_order_and_duplicates(#[case] left: Vec<i32>, #[case] right: Vec<i32>) {
        let comparer = SetEqualityComparer::new();
        assert_eq!(comparer.hash(Some(&left)), comparer.hash(Some(&right)));
    }

    #[rstest]
    fn test_hash_uses_item_comparer() {
        let comparer = SetEqualityComparer::with_comparer(CaseInsensitive);
        assert_eq!(
            comparer.hash_sequence(&["Alpha", "BETA"]),
            comparer.hash_sequence(&["beta", "ALPHA", "alpha"])
        );
    }

    // =========================================================================
    // Materialization Reuse
    // =========================================================================

    #[rstest]
    fn test_item_set_with_same_identity_is_reused() {
        let comparer = SetEqualityComparer::with_comparer(CaseInsensitive);
        let set = ItemSet::from_iter_with(["a", "b"], CaseInsensitive);

        assert!(matches!(comparer.materialize(&set), Materialized::Reused(_)));
        assert!(comparer.equals_sequences(&set, &["B", "A", "a"]));
    }

    #[rstest]
    fn test_item_set_with_other_identity_is_rebuilt() {
        let comparer = SetEqualityComparer::new();
        let set = ItemSet::from_iter_with(["a", "A"], CaseInsensitive);

        assert!(matches!(comparer.materialize(&set), Materialized::Built(_)));
        assert!(comparer.equals_sequences(&set, &["a"]));
        assert_eq!(comparer.hash_sequence(&set), hash_one(&"a"));
    }

    #[rstest]
    fn test_item_set_with_anonymous_comparer_is_rebuilt() {
        let by_parity = ByKey::new(|value: &i32| value % 2);
        let comparer = SetEqualityComparer::with_comparer(by_parity);
        let set = ItemSet::from_iter_with([1, 2], by_parity);

        assert!(matches!(comparer.materialize(&set), Materialized::Built(_)));
        assert!(comparer.equals_sequences(&set, &[3, 4]));
    }

    #[rstest]
    fn test_item_set_sharing_comparer_instance_is_reused() {
        let shared = Arc::new(ByKey::new(|value: &i32| value % 2));
        let comparer = SetEqualityComparer::with_comparer(Arc::clone(&shared));
        let set = ItemSet::from_iter_with([1, 2, 3], Arc::clone(&shared));

        assert!(matches!(comparer.materialize(&set), Materialized::Reused(_)));
        assert!(comparer.equals_sequences(&set, &[5, 6]));
    }

    #[rstest]
    fn test_item_set_under_other_boxed_closure_is_rebuilt() {
        let parity: Box<dyn ItemComparer<i32>> = Box::new(ByKey::new(|value: &i32| value % 2));
        let exact: Box<dyn ItemComparer<i32>> = Box::new(ByKey::new(|value: &i32| *value));
        let set = ItemSet::from_iter_with([1, 2, 3], parity);
        let comparer = SetEqualityComparer::with_comparer(exact);

        assert_eq!(set.len(), 2);
        assert!(matches!(comparer.materialize(&set), Materialized::Built(_)));
        assert!(comparer.equals_sequences(&set, &[1, 2]));
        assert!(!comparer.equals_sequences(&set, &[1, 3]));
    }

    #[rstest]
    fn test_item_set_under_other_borrowed_comparer_is_rebuilt() {
        let parity = ByKey::new(|value: &i32| value % 2);
        let exact = ByKey::new(|value: &i32| *value);
        let set = ItemSet::from_iter_with([1, 2, 3], &parity as &dyn ItemComparer<i32>);
        let comparer = SetEqualityComparer::with_comparer(&exact as &dyn ItemComparer<i32>);

        assert!(matches!(comparer.materialize(&set), Materialized::Built(_)));
        assert!(comparer.equals_sequences(&set, &[2, 1]));
    }

    #[rstest]
    fn test_item_set_under_other_shared_comparer_is_rebuilt() {
        let parity: Arc<dyn ItemComparer<i32>> = Arc::new(ByKey::new(|value: &i32| value % 2));
        let exact: Arc<dyn ItemComparer<i32>> = Arc::new(ByKey::new(|value: &i32| *value));
        let set = ItemSet::from_iter_with([1, 2, 3], parity);
        let comparer = SetEqualityComparer::with_comparer(exact);

        assert!(matches!(comparer.materialize(&set), Materialized::Built(_)));
        assert!(comparer.equals_sequences(&set, &[1, 2]));
    }

    #[rstest]
    fn test_reused_and_rebuilt_sets_hash_equally() {
        let comparer = SetEqualityComparer::new();
        let set: ItemSet<i32> = [4, 5, 6].into_iter().collect();
        assert_eq!(comparer.hash_sequence(&set), comparer.hash_sequence(&[6, 5, 4]));
    }
}
