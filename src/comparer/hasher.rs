//! Hash function family used by the stock comparers.
//!
//! The concrete hasher is chosen at compile time:
//!
//! - `fxhash` feature: [`rustc_hash::FxHasher`]
//! - `ahash` feature: [`ahash::AHasher`] with fixed keys
//! - otherwise: [`std::collections::hash_map::DefaultHasher`]
//!
//! `fxhash` takes precedence when both features are enabled. Every choice
//! is deterministic for a given build, so hashing the same item twice
//! always yields the same value.

use std::hash::{BuildHasherDefault, Hash, Hasher};

/// The hasher used to turn items into `u64` hash codes.
#[cfg(feature = "fxhash")]
pub type ItemHasher = rustc_hash::FxHasher;

/// The hasher used to turn items into `u64` hash codes.
#[cfg(all(feature = "ahash", not(feature = "fxhash")))]
pub type ItemHasher = ahash::AHasher;

/// The hasher used to turn items into `u64` hash codes.
#[cfg(not(any(feature = "fxhash", feature = "ahash")))]
pub type ItemHasher = std::collections::hash_map::DefaultHasher;

/// Builder for the maps that bucket items by their precomputed hash code.
pub(crate) type BucketBuildHasher = BuildHasherDefault<ItemHasher>;

/// Computes the hash of a value with a fresh [`ItemHasher`].
///
/// # Examples
///
/// ```rust
/// use seteq::comparer::hash_one;
///
/// assert_eq!(hash_one(&42), hash_one(&42));
/// assert_eq!(hash_one("key"), hash_one(&"key".to_string()));
/// ```
#[inline]
pub fn hash_one<Q: Hash + ?Sized>(value: &Q) -> u64 {
    let mut hasher = ItemHasher::default();
    value.hash(&mut hasher);
    hasher.finish()
}
