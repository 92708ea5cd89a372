//! Character-level alignment algorithms.
//!
//! Every matcher takes the text and an already case-folded (and, when
//! normalization is on, already folded) pattern and returns a [`MatchSpan`]
//! plus, for the fuzzy matchers, the matched rune indices.

mod anchored;
mod fuzzy;
mod score;

pub use anchored::{equal_match, exact_match_naive, prefix_match, suffix_match};
pub use fuzzy::{fuzzy_match_v1, fuzzy_match_v2};
pub(crate) use score::calculate_score;

use crate::char_class::to_lower_non_ascii;
use crate::normalize::normalize_rune;
use crate::runes::Rune;
use crate::slab::Slab;

pub const SCORE_MATCH: i16 = 16;
pub const SCORE_GAP_START: i16 = -3;
pub const SCORE_GAP_EXTENSION: i16 = -1;

/// Bonus for matching right after a non-word character (e.g. `/`, `_`, ` `).
pub const BONUS_BOUNDARY: i16 = SCORE_MATCH / 2;

/// Bonus for matching a non-word character itself.
pub const BONUS_NON_WORD: i16 = SCORE_MATCH / 2;

/// Bonus for an uppercase letter after a lowercase one, or a digit after a
/// non-digit.
pub const BONUS_CAMEL_123: i16 = BONUS_BOUNDARY + SCORE_GAP_EXTENSION;

/// Minimum bonus for every character inside a consecutive run.
pub const BONUS_CONSECUTIVE: i16 = -(SCORE_GAP_START + SCORE_GAP_EXTENSION);

/// The bonus of the first pattern character is multiplied by this.
pub const BONUS_FIRST_CHAR_MULTIPLIER: i16 = 2;

/// Half-open rune range `[start, end)` and its score.
///
/// `start == end == -1` means "no match".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MatchSpan {
    pub start: i32,
    pub end: i32,
    pub score: i32,
}

impl MatchSpan {
    /// The "no match" span.
    pub const NONE: Self = Self {
        start: -1,
        end: -1,
        score: 0,
    };

    pub const fn new(start: i32, end: i32, score: i32) -> Self {
        Self { start, end, score }
    }

    /// Returns `true` when this span represents a match.
    pub fn is_match(&self) -> bool {
        self.start >= 0
    }

    /// The covered rune indices; empty when there is no match.
    pub fn range(&self) -> std::ops::Range<usize> {
        let start = usize::try_from(self.start).unwrap_or(0);
        let end = usize::try_from(self.end).unwrap_or(0);
        start..end.max(start)
    }
}

/// Span plus matched rune indices (ascending), when the matcher reports them.
pub type MatchOutput = (MatchSpan, Option<Vec<usize>>);

/// Flags shared by every matcher call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOptions {
    /// Compare runes as-is instead of lowercasing the text.
    pub case_sensitive: bool,
    /// Fold diacritics in the text before comparing.
    pub normalize: bool,
    /// Scan left to right; `false` prefers the rightmost match.
    pub forward: bool,
    /// Ask the fuzzy matchers for matched indices.
    pub with_positions: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            normalize: false,
            forward: true,
            with_positions: true,
        }
    }
}

/// The matcher to run for one term or one basic query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Matcher {
    FuzzyV1,
    FuzzyV2,
    Exact,
    Prefix,
    Suffix,
    Equal,
}

impl Matcher {
    /// Runs this matcher.
    pub fn run(
        self,
        opts: MatchOptions,
        text: &[Rune],
        pattern: &[Rune],
        slab: Option<&mut Slab>,
    ) -> MatchOutput {
        match self {
            Matcher::FuzzyV1 => fuzzy_match_v1(opts, text, pattern, slab),
            Matcher::FuzzyV2 => fuzzy_match_v2(opts, text, pattern, slab),
            Matcher::Exact => exact_match_naive(opts, text, pattern, slab),
            Matcher::Prefix => prefix_match(opts, text, pattern, slab),
            Matcher::Suffix => suffix_match(opts, text, pattern, slab),
            Matcher::Equal => equal_match(opts, text, pattern, slab),
        }
    }

    /// Whether this matcher reports discrete positions.
    pub fn reports_positions(self) -> bool {
        matches!(self, Matcher::FuzzyV1 | Matcher::FuzzyV2)
    }
}

/// Case-folds a text rune the way every matcher does before comparing.
#[inline]
pub(crate) fn fold_rune(rune: Rune, case_sensitive: bool, normalize: bool) -> Rune {
    let mut rune = rune;
    if !case_sensitive {
        if rune.is_ascii_uppercase() {
            rune = rune.to_ascii_lowercase();
        } else if !rune.is_ascii() {
            rune = to_lower_non_ascii(rune);
        }
    }
    if normalize {
        rune = normalize_rune(rune);
    }
    rune
}

/// Index of the `idx`-th rune when scanning forward or mirrored.
#[inline]
pub(crate) fn index_at(idx: usize, len: usize, forward: bool) -> usize {
    if forward { idx } else { len - idx - 1 }
}

/// Forward search of `needle` in `input[from..]`; with case-insensitive
/// matching also looks for the uppercase form before the first lowercase hit.
fn try_skip(input: &[Rune], case_sensitive: bool, needle: Rune, from: usize) -> Option<usize> {
    let rest = input.get(from..).unwrap_or_default();
    let mut idx = rest.iter().position(|&c| c == needle);
    if idx == Some(0) {
        return Some(from);
    }

    if !case_sensitive && needle.is_ascii_lowercase() {
        let head = match idx {
            Some(i) => &rest[..i],
            None => rest,
        };
        let upper = needle.to_ascii_uppercase();
        if let Some(u) = head.iter().position(|&c| c == upper) {
            idx = Some(u);
        }
    }

    idx.map(|i| from + i)
}

/// Cheap ordered-subsequence check over ASCII text.
///
/// Returns `Some(offset)` where scanning may start, `None` when the pattern
/// cannot occur. Non-ASCII text yields `Some(0)` (no information), a
/// non-ASCII pattern against ASCII text can never match.
pub(crate) fn ascii_fuzzy_index(
    input: &[Rune],
    pattern: &[Rune],
    case_sensitive: bool,
) -> Option<usize> {
    if !crate::runes::is_ascii(input) {
        return Some(0);
    }
    if !crate::runes::is_ascii(pattern) {
        return None;
    }

    let mut first_idx = 0;
    let mut idx = 0;
    for (pidx, &pchar) in pattern.iter().enumerate() {
        idx = try_skip(input, case_sensitive, pchar, idx)?;
        if pidx == 0 && idx > 0 {
            first_idx = idx - 1;
        }
        idx += 1;
    }
    Some(first_idx)
}
