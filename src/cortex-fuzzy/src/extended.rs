//! Evaluation of a parsed extended query against one item.

use std::collections::BTreeSet;

use crate::algo::{MatchOptions, Matcher};
use crate::pattern::Pattern;
use crate::runes::Rune;
use crate::slab::Slab;

/// Outcome of evaluating every term set of a [`Pattern`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtendedMatch {
    /// One `(start, end)` per satisfied term set. A set satisfied by a
    /// negated term contributes `(0, 0)`.
    pub offsets: Vec<(i32, i32)>,

    /// Sum of the satisfied sets' scores.
    pub total_score: i32,

    /// Union of matched rune indices.
    pub positions: BTreeSet<usize>,
}

impl ExtendedMatch {
    /// Every term set of `pattern` was satisfied.
    pub fn is_complete(&self, pattern: &Pattern) -> bool {
        self.offsets.len() == pattern.term_sets.len()
    }

    /// `(min, max + 1)` of the matched positions, `(-1, -1)` when there are
    /// none.
    pub fn span(&self) -> (i32, i32) {
        match (self.positions.first(), self.positions.last()) {
            (Some(&first), Some(&last)) => {
                (crate::runes::offset(first), crate::runes::offset(last + 1))
            }
            _ => (-1, -1),
        }
    }
}

/// Evaluates `pattern` against `text`.
///
/// Fuzzy terms run `fuzzy`; other kinds run their anchored matcher. The
/// caller checks [`ExtendedMatch::is_complete`] to decide acceptance.
pub fn compute_extended_match(
    text: &[Rune],
    pattern: &Pattern,
    fuzzy: Matcher,
    forward: bool,
    mut slab: Option<&mut Slab>,
) -> ExtendedMatch {
    let mut result = ExtendedMatch::default();

    for set in &pattern.term_sets {
        let mut offset = (0, 0);
        let mut score = 0;
        let mut matched = false;

        for term in set {
            let opts = MatchOptions {
                case_sensitive: term.case_sensitive,
                normalize: term.normalize,
                forward,
                with_positions: true,
            };
            let matcher = term.kind.matcher(fuzzy);
            let (span, positions) = matcher.run(opts, text, &term.runes, slab.as_deref_mut());

            if span.is_match() {
                if term.negated {
                    continue;
                }

                offset = (span.start, span.end);
                score = span.score;
                matched = true;
                if matcher.reports_positions() {
                    result.positions.extend(positions.into_iter().flatten());
                } else {
                    result.positions.extend(span.range());
                }
                break;
            } else if term.negated {
                offset = (0, 0);
                score = 0;
                matched = true;
            }
        }

        if matched {
            result.offsets.push(offset);
            result.total_score += score;
        }
    }

    result
}
