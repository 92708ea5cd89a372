use super::{
    BONUS_BOUNDARY, BONUS_FIRST_CHAR_MULTIPLIER, MatchOptions, MatchOutput, MatchSpan,
    SCORE_MATCH, ascii_fuzzy_index, calculate_score, fold_rune, index_at,
};
use crate::char_class::{bonus_at, is_whitespace, leading_whitespace, trailing_whitespace};
use crate::normalize::normalize_rune;
use crate::runes::{Rune, offset};
use crate::slab::Slab;

/// Contiguous substring search.
///
/// Among all occurrences keeps the one whose first character earns the
/// highest boundary bonus (first found wins ties) and stops early on a
/// word-boundary hit. Never reports positions; the span is the match.
pub fn exact_match_naive(
    opts: MatchOptions,
    text: &[Rune],
    pattern: &[Rune],
    _slab: Option<&mut Slab>,
) -> MatchOutput {
    if pattern.is_empty() {
        return (MatchSpan::new(0, 0, 0), None);
    }

    let len_runes = text.len();
    let len_pattern = pattern.len();
    if len_runes < len_pattern || ascii_fuzzy_index(text, pattern, opts.case_sensitive).is_none() {
        return (MatchSpan::NONE, None);
    }

    let mut pidx = 0;
    let mut best_pos = None;
    let mut bonus: i16 = 0;
    let mut best_bonus: i16 = -1;
    let mut index = 0;

    while index < len_runes {
        let tidx = index_at(index, len_runes, opts.forward);
        let rune = fold_rune(text[tidx], opts.case_sensitive, opts.normalize);
        let ppos = index_at(pidx, len_pattern, opts.forward);

        if pattern[ppos] == rune {
            if ppos == 0 {
                bonus = bonus_at(text, tidx);
            }
            pidx += 1;
            if pidx == len_pattern {
                if bonus > best_bonus {
                    best_pos = Some(index);
                    best_bonus = bonus;
                }
                if bonus == BONUS_BOUNDARY {
                    break;
                }
                index -= pidx - 1;
                pidx = 0;
                bonus = 0;
            }
        } else {
            index -= pidx;
            pidx = 0;
            bonus = 0;
        }
        index += 1;
    }

    let Some(best_pos) = best_pos else {
        return (MatchSpan::NONE, None);
    };
    let (sidx, eidx) = if opts.forward {
        (best_pos + 1 - len_pattern, best_pos + 1)
    } else {
        (
            len_runes - (best_pos + 1),
            len_runes - (best_pos + 1 - len_pattern),
        )
    };

    let (score, _) = calculate_score(
        opts.case_sensitive,
        opts.normalize,
        text,
        pattern,
        sidx,
        eidx,
        false,
    );
    (MatchSpan::new(offset(sidx), offset(eidx), score), None)
}

/// Requires the pattern at the start of the text, ignoring leading
/// whitespace unless the pattern itself starts with whitespace.
pub fn prefix_match(
    opts: MatchOptions,
    text: &[Rune],
    pattern: &[Rune],
    _slab: Option<&mut Slab>,
) -> MatchOutput {
    let Some(&first) = pattern.first() else {
        return (MatchSpan::new(0, 0, 0), None);
    };

    let trimmed = if is_whitespace(first) {
        0
    } else {
        leading_whitespace(text)
    };
    if text.len() - trimmed < pattern.len() {
        return (MatchSpan::NONE, None);
    }

    if !aligned(opts, &text[trimmed..trimmed + pattern.len()], pattern) {
        return (MatchSpan::NONE, None);
    }

    let eidx = trimmed + pattern.len();
    let (score, _) = calculate_score(
        opts.case_sensitive,
        opts.normalize,
        text,
        pattern,
        trimmed,
        eidx,
        false,
    );
    (MatchSpan::new(offset(trimmed), offset(eidx), score), None)
}

/// Requires the pattern at the end of the text, ignoring trailing
/// whitespace unless the pattern itself ends with whitespace.
///
/// An empty pattern matches as a zero-width span at the trimmed end.
pub fn suffix_match(
    opts: MatchOptions,
    text: &[Rune],
    pattern: &[Rune],
    _slab: Option<&mut Slab>,
) -> MatchOutput {
    let trimmed_len = match pattern.last() {
        Some(&last) if is_whitespace(last) => text.len(),
        _ => text.len() - trailing_whitespace(text),
    };

    if pattern.is_empty() {
        return (MatchSpan::new(offset(trimmed_len), offset(trimmed_len), 0), None);
    }
    let Some(sidx) = trimmed_len.checked_sub(pattern.len()) else {
        return (MatchSpan::NONE, None);
    };

    if !aligned(opts, &text[sidx..trimmed_len], pattern) {
        return (MatchSpan::NONE, None);
    }

    let (score, _) = calculate_score(
        opts.case_sensitive,
        opts.normalize,
        text,
        pattern,
        sidx,
        trimmed_len,
        false,
    );
    let span = MatchSpan::new(offset(sidx), offset(trimmed_len), score);
    (span, None)
}

/// Requires the whitespace-trimmed text to equal the pattern.
///
/// Scores as if every character were a word-boundary match.
pub fn equal_match(
    opts: MatchOptions,
    text: &[Rune],
    pattern: &[Rune],
    _slab: Option<&mut Slab>,
) -> MatchOutput {
    let (Some(&first), Some(&last)) = (pattern.first(), pattern.last()) else {
        return (MatchSpan::NONE, None);
    };

    let trimmed = if is_whitespace(first) {
        0
    } else {
        leading_whitespace(text)
    };
    let trimmed_end = if is_whitespace(last) {
        0
    } else {
        trailing_whitespace(text)
    };
    if trimmed + trimmed_end + pattern.len() != text.len() {
        return (MatchSpan::NONE, None);
    }

    let window = &text[trimmed..trimmed + pattern.len()];
    let matched = window.iter().zip(pattern).all(|(&rune, &pchar)| {
        let rune = fold_rune(rune, opts.case_sensitive, false);
        if opts.normalize {
            normalize_rune(pchar) == normalize_rune(rune)
        } else {
            pchar == rune
        }
    });
    if !matched {
        return (MatchSpan::NONE, None);
    }

    let len = i32::try_from(pattern.len()).unwrap_or(i32::MAX);
    let score = i32::from(SCORE_MATCH + BONUS_BOUNDARY).saturating_mul(len)
        + i32::from((BONUS_FIRST_CHAR_MULTIPLIER - 1) * BONUS_BOUNDARY);
    let span = MatchSpan::new(offset(trimmed), offset(trimmed + pattern.len()), score);
    (span, None)
}

fn aligned(opts: MatchOptions, window: &[Rune], pattern: &[Rune]) -> bool {
    window
        .iter()
        .zip(pattern)
        .all(|(&rune, &pchar)| fold_rune(rune, opts.case_sensitive, opts.normalize) == pchar)
}
