//! Item comparers: pluggable equality and hashing for single items.
//!
//! An [`ItemComparer`] decides when two items are "the same" and produces a
//! hash code that agrees with that decision. The set comparer uses it for
//! every membership test and for the order-independent collection hash.
//!
//! - [`DefaultComparer`]: the item type's own `Eq` and `Hash`
//! - [`CaseInsensitive`]: Unicode case-insensitive comparison of strings
//! - [`ByKey`]: compares items through a key projection
//! - [`FnComparer`]: built from a pair of closures with [`from_fn`]
//!
//! # Examples
//!
//! ```rust
//! use seteq::comparer::{CaseInsensitive, DefaultComparer, ItemComparer};
//!
//! assert!(DefaultComparer.equals(&1, &1));
//! assert!(!DefaultComparer.equals("a", "A"));
//!
//! assert!(CaseInsensitive.equals("Hello", "hELLO"));
//! assert_eq!(CaseInsensitive.hash("Hello"), CaseInsensitive.hash("hELLO"));
//! ```

mod hasher;

use std::hash::{Hash, Hasher};
use std::rc::Rc;
use std::sync::Arc;

pub use hasher::{ItemHasher, hash_one};
pub(crate) use hasher::BucketBuildHasher;

// =============================================================================
// ItemComparer Trait
// =============================================================================

/// An equality and hash strategy for items of type `T`.
///
/// Implementations must keep the two operations consistent: whenever
/// `equals(a, b)` is `true`, `hash(a) == hash(b)` must hold as well.
///
/// # Examples
///
/// ```rust
/// use seteq::comparer::{ItemComparer, hash_one};
///
/// /// Compares integers by their value modulo 10.
/// struct LastDigit;
///
/// impl ItemComparer<i32> for LastDigit {
///     fn equals(&self, left: &i32, right: &i32) -> bool {
///         left.rem_euclid(10) == right.rem_euclid(10)
///     }
///
///     fn hash(&self, item: &i32) -> u64 {
///         hash_one(&item.rem_euclid(10))
///     }
/// }
///
/// assert!(LastDigit.equals(&13, &3));
/// assert_eq!(LastDigit.hash(&13), LastDigit.hash(&3));
/// ```
pub trait ItemComparer<T: ?Sized> {
    /// Returns `true` if `left` and `right` are considered equal.
    fn equals(&self, left: &T, right: &T) -> bool;

    /// Returns the hash code of `item`.
    fn hash(&self, item: &T) -> u64;

    /// Returns an identity shared by every comparer applying exactly the
    /// same equality and hash.
    ///
    /// Two comparers reporting equal identities are interchangeable, which
    /// lets an [`ItemSet`](crate::ItemSet) built with one be reused as-is by
    /// a set comparer configured with the other. The default is `None`: no
    /// comparer is assumed interchangeable with anything.
    ///
    /// References and boxes report the identity of the comparer they hold.
    /// `Rc` and `Arc` additionally fall back to the identity of their
    /// allocation, so clones of one shared comparer are interchangeable.
    fn identity(&self) -> Option<ComparerIdentity> {
        None
    }
}

// =============================================================================
// ComparerIdentity
// =============================================================================

/// Opaque token naming the equality a comparer applies.
///
/// See [`ItemComparer::identity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComparerIdentity(IdentityKind);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum IdentityKind {
    Natural,
    CaseInsensitive,
    SharedAllocation(usize),
}

impl ComparerIdentity {
    /// Identity of the comparer behind one `Rc` or `Arc` allocation.
    ///
    /// Every handle to the allocation shares it. Two allocations alive at the
    /// same time never do, even for zero-sized comparers, because the
    /// allocation also holds the reference counts.
    fn of_shared<C: ?Sized>(comparer: *const C) -> Self {
        Self(IdentityKind::SharedAllocation(comparer.cast::<()>().addr()))
    }
}

// =============================================================================
// DefaultComparer
// =============================================================================

/// Compares items with their own `Eq` and `Hash` implementations.
///
/// This is the comparer used when none is supplied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultComparer;

impl<T: Eq + Hash + ?Sized> ItemComparer<T> for DefaultComparer {
    #[inline]
    fn equals(&self, left: &T, right: &T) -> bool {
        left == right
    }

    #[inline]
    fn hash(&self, item: &T) -> u64 {
        hash_one(item)
    }

    fn identity(&self) -> Option<ComparerIdentity> {
        Some(ComparerIdentity(IdentityKind::Natural))
    }
}

// =============================================================================
// CaseInsensitive
// =============================================================================

/// Compares strings without regard to letter case.
///
/// Both sides are folded with [`char::to_lowercase`] before comparing, and
/// the hash is computed over the folded characters.
///
/// # Examples
///
/// ```rust
/// use seteq::comparer::{CaseInsensitive, ItemComparer};
///
/// assert!(!CaseInsensitive.equals("Straße", "STRASSE"));
/// assert!(CaseInsensitive.equals("ÀB", "àb"));
/// assert!(CaseInsensitive.equals(&"A".to_string(), &"a".to_string()));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaseInsensitive;

impl CaseInsensitive {
    fn folded(text: &str) -> impl Iterator<Item = char> + '_ {
        text.chars().flat_map(char::to_lowercase)
    }
}

impl<T: AsRef<str> + ?Sized> ItemComparer<T> for CaseInsensitive {
    fn equals(&self, left: &T, right: &T) -> bool {
        Self::folded(left.as_ref()).eq(Self::folded(right.as_ref()))
    }

    fn hash(&self, item: &T) -> u64 {
        let mut hasher = ItemHasher::default();
        for character in Self::folded(item.as_ref()) {
            hasher.write_u32(u32::from(character));
        }
        hasher.finish()
    }

    fn identity(&self) -> Option<ComparerIdentity> {
        Some(ComparerIdentity(IdentityKind::CaseInsensitive))
    }
}

// =============================================================================
// ByKey
// =============================================================================

/// Compares items by a key extracted from each of them.
///
/// # Examples
///
/// ```rust
/// use seteq::comparer::{ByKey, ItemComparer};
///
/// let by_length = ByKey::new(|word: &&str| word.len());
/// assert!(by_length.equals(&"cat", &"dog"));
/// assert!(!by_length.equals(&"cat", &"horse"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ByKey<F> {
    key: F,
}

impl<F> ByKey<F> {
    /// Creates a comparer that compares the keys produced by `key`.
    #[inline]
    pub const fn new(key: F) -> Self {
        Self { key }
    }
}

impl<T, K, F> ItemComparer<T> for ByKey<F>
where
    T: ?Sized,
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    fn equals(&self, left: &T, right: &T) -> bool {
        (self.key)(left) == (self.key)(right)
    }

    fn hash(&self, item: &T) -> u64 {
        hash_one(&(self.key)(item))
    }
}

// =============================================================================
// FnComparer
// =============================================================================

/// A comparer assembled from an equality closure and a hash closure.
///
/// Created with [`from_fn`].
#[derive(Clone, Copy)]
pub struct FnComparer<E, H> {
    equals: E,
    hash: H,
}

impl<E, H> std::fmt::Debug for FnComparer<E, H> {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.debug_struct("FnComparer").finish_non_exhaustive()
    }
}

/// Builds a comparer from an equality closure and a hash closure.
///
/// The closures must agree: items reported equal must hash equally.
///
/// # Examples
///
/// ```rust
/// use seteq::comparer::{ItemComparer, from_fn, hash_one};
///
/// let absolute = from_fn(
///     |left: &i32, right: &i32| left.abs() == right.abs(),
///     |item: &i32| hash_one(&item.abs()),
/// );
/// assert!(absolute.equals(&-4, &4));
/// assert_eq!(absolute.hash(&-4), absolute.hash(&4));
/// ```
pub const fn from_fn<E, H>(equals: E, hash: H) -> FnComparer<E, H> {
    FnComparer { equals, hash }
}

impl<T, E, H> ItemComparer<T> for FnComparer<E, H>
where
    T: ?Sized,
    E: Fn(&T, &T) -> bool,
    H: Fn(&T) -> u64,
{
    fn equals(&self, left: &T, right: &T) -> bool {
        (self.equals)(left, right)
    }

    fn hash(&self, item: &T) -> u64 {
        (self.hash)(item)
    }
}

// =============================================================================
// Pointer Implementations
// =============================================================================

// Borrowed and boxed comparers have no identity of their own: zero-sized
// comparers share one address, and so do distinct closures behind a `dyn`.
impl<T: ?Sized, C: ItemComparer<T> + ?Sized> ItemComparer<T> for &C {
    #[inline]
    fn equals(&self, left: &T, right: &T) -> bool {
        (**self).equals(left, right)
    }

    #[inline]
    fn hash(&self, item: &T) -> u64 {
        (**self).hash(item)
    }

    fn identity(&self) -> Option<ComparerIdentity> {
        (**self).identity()
    }
}

impl<T: ?Sized, C: ItemComparer<T> + ?Sized> ItemComparer<T> for Box<C> {
    #[inline]
    fn equals(&self, left: &T, right: &T) -> bool {
        (**self).equals(left, right)
    }

    #[inline]
    fn hash(&self, item: &T) -> u64 {
        (**self).hash(item)
    }

    fn identity(&self) -> Option<ComparerIdentity> {
        (**self).identity()
    }
}

impl<T: ?Sized, C: ItemComparer<T> + ?Sized> ItemComparer<T> for Rc<C> {
    #[inline]
    fn equals(&self, left: &T, right: &T) -> bool {
        (**self).equals(left, right)
    }

    #[inline]
    fn hash(&self, item: &T) -> u64 {
        (**self).hash(item)
    }

    fn identity(&self) -> Option<ComparerIdentity> {
        (**self)
            .identity()
            .or_else(|| Some(ComparerIdentity::of_shared(Rc::as_ptr(self))))
    }
}

impl<T: ?Sized, C: ItemComparer<T> + ?Sized> ItemComparer<T> for Arc<C> {
    #[inline]
    fn equals(&self, left: &T, right: &T) -> bool {
        (**self).equals(left, right)
    }

    #[inline]
    fn hash(&self, item: &T) -> u64 {
        (**self).hash(item)
    }

    fn identity(&self) -> Option<ComparerIdentity> {
        (**self)
            .identity()
            .or_else(|| Some(ComparerIdentity::of_shared(Arc::as_ptr(self))))
    }
}

// =============================================================================
// Tests
// =============================================================================
