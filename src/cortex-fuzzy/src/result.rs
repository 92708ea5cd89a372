//! Search result types.

use std::collections::BTreeSet;

use crate::algo::MatchSpan;

/// One corpus item's outcome for a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultItem<T> {
    /// The matched corpus item.
    pub item: T,

    /// Relevance score (higher is better).
    pub score: i32,

    /// Start rune index of the match, `-1` when unscored.
    pub start: i32,

    /// End rune index (exclusive) of the match, `-1` when unscored.
    pub end: i32,

    /// Rune indices to highlight.
    pub positions: BTreeSet<usize>,
}

impl<T> ResultItem<T> {
    /// Creates a result from a match span.
    pub fn new(item: T, span: MatchSpan, positions: BTreeSet<usize>) -> Self {
        Self {
            item,
            score: span.score,
            start: span.start,
            end: span.end,
            positions,
        }
    }

    /// A result returned without matching (empty query).
    pub fn unscored(item: T) -> Self {
        Self::new(item, MatchSpan::NONE, BTreeSet::new())
    }

    /// The span this result covers.
    pub fn span(&self) -> MatchSpan {
        MatchSpan::new(self.start, self.end, self.score)
    }

    /// Maps the item, keeping the match data.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ResultItem<U> {
        ResultItem {
            item: f(self.item),
            score: self.score,
            start: self.start,
            end: self.end,
            positions: self.positions,
        }
    }
}

impl<T: Clone> ResultItem<&T> {
    /// Clones the borrowed item into an owned result.
    pub fn cloned(self) -> ResultItem<T> {
        self.map(T::clone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unscored() {
        let result = ResultItem::unscored("foo");
        assert_eq!(result.score, 0);
        assert_eq!(result.start, -1);
        assert_eq!(result.end, -1);
        assert!(result.positions.is_empty());
        assert!(!result.span().is_match());
    }

    #[test]
    fn test_map_and_cloned() {
        let owned = String::from("bar");
        let result = ResultItem::new(&owned, MatchSpan::new(1, 3, 40), BTreeSet::from([1, 2]));
        let cloned = result.clone().cloned();
        assert_eq!(cloned.item, "bar");
        assert_eq!(cloned.span(), MatchSpan::new(1, 3, 40));

        let len = result.map(|s| s.len());
        assert_eq!(len.item, 3);
        assert_eq!(len.positions, BTreeSet::from([1, 2]));
    }
}
