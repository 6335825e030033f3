//! # seteq
//!
//! Set-equality comparison and order-independent hashing for collections.
//!
//! ## Overview
//!
//! Two collections are *set-equal* when they hold the same distinct items,
//! regardless of order and of how many times each item repeats. This crate
//! provides that comparison as a reusable strategy:
//!
//! - **[`SetEqualityComparer`]**: `equals` and `hash` over any [`Sequence`]
//! - **Item comparers**: pluggable per-item equality and hashing
//!   ([`comparer`] module)
//! - **[`ItemSet`]**: a comparer-aware set, reused as-is when compared
//! - **[`UntypedEqualityComparer`]**: the same comparison over `&dyn Any`
//! - **[`SetKey`]**: collections as `HashMap`/`HashSet` keys under set semantics
//!
//! ## Feature Flags
//!
//! - `fxhash`: hash items with `rustc-hash`
//! - `ahash`: hash items with `ahash`
//! - `serde`: `Serialize`/`Deserialize` for [`ItemSet`]
//! - `full`: Enable all optional features except the alternative hashers
//!
//! ## Example
//!
//! ```rust
//! use seteq::prelude::*;
//!
//! let comparer = SetEqualityComparer::new();
//! assert!(comparer.equals(Some(&vec![1, 2, 3]), Some(&vec![3, 2, 1, 1])));
//! assert!(!comparer.equals(Some(&vec![1, 2, 3]), Some(&vec![1, 2])));
//! assert_eq!(
//!     comparer.hash(Some(&vec![1, 2, 3])),
//!     comparer.hash(Some(&vec![2, 3, 1]))
//! );
//!
//! let case_blind = SetEqualityComparer::with_comparer(CaseInsensitive);
//! assert!(case_blind.equals(Some(&["A", "b"]), Some(&["a", "B"])));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// Re-exports commonly used types and traits.
///
/// # Usage
///
/// ```rust
/// use seteq::prelude::*;
/// ```
pub mod prelude {
    pub use crate::comparer::{ByKey, CaseInsensitive, DefaultComparer, ItemComparer, from_fn};
    pub use crate::{
        ComparerError, ItemSet, Sequence, SetEqualityComparer, SetKey, UntypedEqualityComparer,
    };
}

pub mod comparer;

mod error;
mod item_set;
mod key;
mod sequence;
mod set_equality;
mod untyped;

pub use error::ComparerError;
pub use item_set::{DistinctItems, ItemSet};
pub use key::SetKey;
pub use sequence::Sequence;
pub use set_equality::{ABSENT_HASH, SetEqualityComparer};
pub use untyped::UntypedEqualityComparer;
