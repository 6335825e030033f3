//! Error types for comparer construction.
//!
//! Comparison and hashing never fail. The only fallible operation in this
//! crate is building a [`SetEqualityComparer`](crate::SetEqualityComparer)
//! from an optional item comparer that turns out to be absent.

/// Represents errors that can occur when constructing a comparer.
///
/// # Examples
///
/// ```rust
/// use seteq::ComparerError;
///
/// let error = ComparerError::MissingItemComparer {
///     parameter: "item_comparer",
/// };
/// assert_eq!(
///     format!("{}", error),
///     "invalid argument `item_comparer`: an item comparer must be supplied"
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparerError {
    /// An explicitly requested item comparer was absent.
    MissingItemComparer {
        /// The name of the argument that was absent.
        parameter: &'static str,
    },
}

impl std::fmt::Display for ComparerError {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingItemComparer { parameter } => write!(
                formatter,
                "invalid argument `{parameter}`: an item comparer must be supplied"
            ),
        }
    }
}

impl std::error::Error for ComparerError {}
