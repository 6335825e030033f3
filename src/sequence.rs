//! The "sequence of items" capability consumed by the set comparer.
//!
//! A [`Sequence<T>`] is anything that can be enumerated as `&T` more than
//! once without being consumed. Implementations are provided for slices,
//! arrays, the std collections, [`ItemSet`], and references and boxes of
//! any sequence.
//!
//! # Examples
//!
//! ```rust
//! use std::collections::BTreeSet;
//! use seteq::Sequence;
//!
//! fn count<S: Sequence<i32> + ?Sized>(sequence: &S) -> usize {
//!     sequence.items().count()
//! }
//!
//! assert_eq!(count(&vec![1, 2, 2]), 3);
//! assert_eq!(count(&[1, 2][..]), 2);
//! assert_eq!(count(&BTreeSet::from([1, 2, 2])), 2);
//! ```

use std::collections::{BTreeSet, HashSet, LinkedList, VecDeque};

use crate::comparer::ItemComparer;
use crate::item_set::{DistinctItems, ItemSet};

/// A collection that can be enumerated as a sequence of `&T`.
pub trait Sequence<T> {
    /// Enumerates the items, duplicates included, in the collection's order.
    fn items<'a>(&'a self) -> impl Iterator<Item = &'a T>
    where
        T: 'a;

    /// Returns the collection as a set of already-distinct items, if it is one.
    ///
    /// The set comparer uses this to skip materialization when the items
    /// were deduplicated by a comparer with the same identity as its own.
    /// Only [`ItemSet`] (and references or boxes of one) return `Some`.
    fn distinct_items(&self) -> Option<DistinctItems<'_, T>> {
        None
    }
}

impl<T> Sequence<T> for [T] {
    fn items<'a>(&'a self) -> impl Iterator<Item = &'a T>
    where
        T: 'a,
    {
        self.iter()
    }
}

impl<T, const N: usize> Sequence<T> for [T; N] {
    fn items<'a>(&'a self) -> impl Iterator<Item = &'a T>
    where
        T: 'a,
    {
        self.iter()
    }
}

impl<T> Sequence<T> for Vec<T> {
    fn items<'a>(&'a self) -> impl Iterator<Item = &'a T>
    where
        T: 'a,
    {
        self.iter()
    }
}

impl<T> Sequence<T> for VecDeque<T> {
    fn items<'a>(&'a self) -> impl Iterator<Item = &'a T>
    where
        T: 'a,
    {
        self.iter()
    }
}

impl<T> Sequence<T> for LinkedList<T> {
    fn items<'a>(&'a self) -> impl Iterator<Item = &'a T>
    where
        T: 'a,
    {
        self.iter()
    }
}

impl<T, S> Sequence<T> for HashSet<T, S> {
    fn items<'a>(&'a self) -> impl Iterator<Item = &'a T>
    where
        T: 'a,
    {
        self.iter()
    }
}

impl<T> Sequence<T> for BTreeSet<T> {
    fn items<'a>(&'a self) -> impl Iterator<Item = &'a T>
    where
        T: 'a,
    {
        self.iter()
    }
}

impl<T, C: ItemComparer<T>> Sequence<T> for ItemSet<T, C> {
    fn items<'a>(&'a self) -> impl Iterator<Item = &'a T>
    where
        T: 'a,
    {
        self.iter()
    }

    fn distinct_items(&self) -> Option<DistinctItems<'_, T>> {
        Some(self.as_distinct_items())
    }
}

impl<T, S: Sequence<T> + ?Sized> Sequence<T> for &S {
    fn items<'a>(&'a self) -> impl Iterator<Item = &'a T>
    where
        T: 'a,
    {
        (**self).items()
    }

    fn distinct_items(&self) -> Option<DistinctItems<'_, T>> {
        (**self).distinct_items()
    }
}

impl<T, S: Sequence<T> + ?Sized> Sequence<T> for Box<S> {
    fn items<'a>(&'a self) -> impl Iterator<Item = &'a T>
    where
        T: 'a,
    {
        (**self).items()
    }

    fn distinct_items(&self) -> Option<DistinctItems<'_, T>> {
        (**self).distinct_items()
    }
}
