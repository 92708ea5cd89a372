//! Secondary comparators for results with equal scores.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::result::ResultItem;

/// Extracts the searchable string from a corpus item.
pub type Selector<T> = dyn Fn(&T) -> &str + Send + Sync;

/// Orders two equal-score results. Receives the finder's selector so it can
/// re-derive the searchable text.
pub type Tiebreaker<T> =
    Arc<dyn Fn(&ResultItem<&T>, &ResultItem<&T>, &Selector<T>) -> Ordering + Send + Sync>;

/// Shorter searchable text first (counted in code points).
pub fn by_length_asc<T>(
    a: &ResultItem<&T>,
    b: &ResultItem<&T>,
    selector: &Selector<T>,
) -> Ordering {
    let a_len = selector(a.item).chars().count();
    let b_len = selector(b.item).chars().count();
    a_len.cmp(&b_len)
}

/// Earlier match start first.
pub fn by_start_asc<T>(
    a: &ResultItem<&T>,
    b: &ResultItem<&T>,
    _selector: &Selector<T>,
) -> Ordering {
    a.start.cmp(&b.start)
}

/// Compares with each tie-breaker in order until one is decisive.
pub(crate) fn compare<T>(
    tiebreakers: &[Tiebreaker<T>],
    selector: &Selector<T>,
    a: &ResultItem<&T>,
    b: &ResultItem<&T>,
) -> Ordering {
    tiebreakers
        .iter()
        .map(|tiebreaker| tiebreaker(a, b, selector))
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}
