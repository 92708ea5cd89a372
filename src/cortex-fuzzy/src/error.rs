//! Error types for finder operations.

/// Result type alias for finder operations.
pub type FinderResult<T> = std::result::Result<T, FinderError>;

/// Errors that can occur during a search.
///
/// Matching itself never fails: a non-matching item is simply absent from
/// the results, and a slab that is too small silently falls back to the
/// greedy matcher.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FinderError {
    /// The search was superseded by a newer `find()` on the same finder.
    #[error("search cancelled")]
    Cancelled,
}

impl FinderError {
    /// Returns true if this error is a cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
