//! Set comparison over type-erased values.
//!
//! Some hosts hand comparers opaque values instead of typed collections.
//! [`UntypedEqualityComparer`] accepts `&dyn Any` and recognizes the
//! collection types listed below as sequences of `T`:
//!
//! - `Vec<T>`, `VecDeque<T>`, `LinkedList<T>`, `Box<[T]>`
//! - `HashSet<T>` (with the default hasher), `BTreeSet<T>`
//! - `ItemSet<T, C>`, with the comparer type of the set comparer
//!
//! A value of any other type is not an error: it compares unequal to
//! everything and hashes to [`ABSENT_HASH`]. That includes fixed-size arrays
//! `[T; N]` and `HashSet<T, S>` with a non-default hasher, since a `dyn Any`
//! downcasts to one concrete type at a time and `N` and `S` are open-ended.
//! Convert such values to `Vec<T>` or `Box<[T]>` before erasing them, or
//! use the typed methods of [`SetEqualityComparer`], which accept any
//! [`Sequence`].
//!
//! # Examples
//!
//! ```rust
//! use std::any::Any;
//! use seteq::{SetEqualityComparer, UntypedEqualityComparer};
//!
//! let comparer: SetEqualityComparer<i32> = SetEqualityComparer::new();
//! let numbers: Box<dyn Any> = Box::new(vec![1, 2, 2]);
//! let reversed: Box<dyn Any> = Box::new(vec![2, 1]);
//! let text: Box<dyn Any> = Box::new("1, 2");
//!
//! assert!(comparer.equals_any(Some(numbers.as_ref()), Some(reversed.as_ref())));
//! assert!(!comparer.equals_any(Some(numbers.as_ref()), Some(text.as_ref())));
//! assert_eq!(comparer.hash_any(Some(text.as_ref())), 0);
//! ```

use std::any::Any;
use std::collections::{BTreeSet, HashSet, LinkedList, VecDeque};

use crate::comparer::ItemComparer;
use crate::item_set::{DistinctItems, ItemSet};
use crate::sequence::Sequence;
use crate::set_equality::{ABSENT_HASH, SetEqualityComparer};

/// Equality and hashing over type-erased collections.
///
/// `None` stands for an absent collection.
pub trait UntypedEqualityComparer {
    /// Returns `true` if both values are absent, or both are recognized
    /// collections holding the same distinct items.
    ///
    /// Returns `false` if either value is present but not a recognized
    /// collection.
    fn equals_any(&self, x: Option<&dyn Any>, y: Option<&dyn Any>) -> bool;

    /// Returns the set hash of a recognized collection, or [`ABSENT_HASH`]
    /// for an absent or unrecognized value.
    fn hash_any(&self, obj: Option<&dyn Any>) -> u64;
}

impl<T: 'static, C: ItemComparer<T> + 'static> UntypedEqualityComparer
    for SetEqualityComparer<T, C>
{
    fn equals_any(&self, x: Option<&dyn Any>, y: Option<&dyn Any>) -> bool {
        let (Ok(left), Ok(right)) = (downcast::<T, C>(x), downcast::<T, C>(y)) else {
            return false;
        };
        match (x, y, left, right) {
            (Some(x), Some(y), ..) if std::ptr::addr_eq(x, y) => true,
            (_, _, Some(left), Some(right)) => self.equals_sequences(&left, &right),
            (_, _, None, None) => true,
            _ => false,
        }
    }

    fn hash_any(&self, obj: Option<&dyn Any>) -> u64 {
        downcast::<T, C>(obj).map_or(ABSENT_HASH, |sequence| self.hash(sequence.as_ref()))
    }
}

// =============================================================================
// Downcasting
// =============================================================================

/// A recognized collection behind a `&dyn Any`.
enum AnySequence<'a, T, C> {
    Vec(&'a Vec<T>),
    VecDeque(&'a VecDeque<T>),
    LinkedList(&'a LinkedList<T>),
    BoxedSlice(&'a [T]),
    HashSet(&'a HashSet<T>),
    BTreeSet(&'a BTreeSet<T>),
    ItemSet(&'a ItemSet<T, C>),
}

/// Marker for a present value that is not a recognized collection.
struct Unrecognized;

/// Views an optional opaque value as a sequence of `T`.
fn downcast<T: 'static, C: 'static>(
    value: Option<&dyn Any>,
) -> Result<Option<AnySequence<'_, T, C>>, Unrecognized> {
    let Some(value) = value else {
        return Ok(None);
    };
    let sequence = if let Some(vec) = value.downcast_ref::<Vec<T>>() {
        AnySequence::Vec(vec)
    } else if let Some(deque) = value.downcast_ref::<VecDeque<T>>() {
        AnySequence::VecDeque(deque)
    } else if let Some(list) = value.downcast_ref::<LinkedList<T>>() {
        AnySequence::LinkedList(list)
    } else if let Some(boxed) = value.downcast_ref::<Box<[T]>>() {
        AnySequence::BoxedSlice(boxed)
    } else if let Some(set) = value.downcast_ref::<HashSet<T>>() {
        AnySequence::HashSet(set)
    } else if let Some(set) = value.downcast_ref::<BTreeSet<T>>() {
        AnySequence::BTreeSet(set)
    } else if let Some(set) = value.downcast_ref::<ItemSet<T, C>>() {
        AnySequence::ItemSet(set)
    } else {
        log::trace!(
            "value is not a recognized sequence of {}",
            std::any::type_name::<T>()
        );
        return Err(Unrecognized);
    };
    Ok(Some(sequence))
}

impl<T, C: ItemComparer<T>> Sequence<T> for AnySequence<'_, T, C> {
    fn items<'a>(&'a self) -> impl Iterator<Item = &'a T>
    where
        T: 'a,
    {
        let items: Box<dyn Iterator<Item = &'a T> + 'a> = match self {
            Self::Vec(vec) => Box::new(vec.iter()),
            Self::VecDeque(deque) => Box::new(deque.iter()),
            Self::LinkedList(list) => Box::new(list.iter()),
            Self::BoxedSlice(slice) => Box::new(slice.iter()),
            Self::HashSet(set) => Box::new(set.iter()),
            Self::BTreeSet(set) => Box::new(set.iter()),
            Self::ItemSet(set) => Box::new(set.iter()),
        };
        items
    }

    fn distinct_items(&self) -> Option<DistinctItems<'_, T>> {
        match self {
            Self::ItemSet(set) => set.distinct_items(),
            _ => None,
        }
    }
}
