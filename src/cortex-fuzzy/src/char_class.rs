//! Character classification, boundary bonuses and whitespace handling.

use crate::algo::{BONUS_BOUNDARY, BONUS_CAMEL_123, BONUS_NON_WORD};
use crate::runes::Rune;

/// Coarse class of a rune used to detect word boundaries and camelCase humps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharClass {
    /// Punctuation, whitespace and anything that is not part of a word.
    NonWord,
    /// Lowercase letter.
    Lower,
    /// Uppercase letter.
    Upper,
    /// Letter without case (e.g. CJK ideographs).
    Letter,
    /// Digit or other numeric character.
    Number,
}

/// Classifies any rune.
pub fn classify(rune: Rune) -> CharClass {
    if rune.is_ascii() {
        classify_ascii(rune)
    } else {
        classify_non_ascii(rune)
    }
}

pub(crate) fn classify_ascii(rune: Rune) -> CharClass {
    match rune {
        'a'..='z' => CharClass::Lower,
        'A'..='Z' => CharClass::Upper,
        '0'..='9' => CharClass::Number,
        _ => CharClass::NonWord,
    }
}

pub(crate) fn classify_non_ascii(rune: Rune) -> CharClass {
    if changes_case(rune.to_uppercase(), rune) {
        CharClass::Lower
    } else if changes_case(rune.to_lowercase(), rune) {
        CharClass::Upper
    } else if rune.is_numeric() {
        CharClass::Number
    } else if rune.is_alphabetic() {
        CharClass::Letter
    } else {
        CharClass::NonWord
    }
}

fn changes_case(mut mapped: impl Iterator<Item = char>, rune: Rune) -> bool {
    !matches!((mapped.next(), mapped.next()), (Some(c), None) if c == rune)
}

/// Lowercases a non-ASCII rune. When the lowercase form spans several code
/// points only the first is kept.
pub(crate) fn to_lower_non_ascii(rune: Rune) -> Rune {
    rune.to_lowercase().next().unwrap_or(rune)
}

/// Bonus earned by a rune of class `curr` following a rune of class `prev`.
pub fn bonus_for(prev: CharClass, curr: CharClass) -> i16 {
    match (prev, curr) {
        (CharClass::NonWord, c) if c != CharClass::NonWord => BONUS_BOUNDARY,
        (CharClass::Lower, CharClass::Upper) => BONUS_CAMEL_123,
        (p, CharClass::Number) if p != CharClass::Number => BONUS_CAMEL_123,
        (_, CharClass::NonWord) => BONUS_NON_WORD,
        _ => 0,
    }
}

/// Bonus of the rune at `idx`; the first rune always counts as a boundary.
pub fn bonus_at(text: &[Rune], idx: usize) -> i16 {
    if idx == 0 {
        return BONUS_BOUNDARY;
    }
    bonus_for(classify(text[idx - 1]), classify(text[idx]))
}

/// Whitespace as understood by the prefix/suffix/equal matchers and the
/// query parser.
pub fn is_whitespace(rune: Rune) -> bool {
    matches!(
        rune,
        ' ' | '\t'
            | '\n'
            | '\u{000b}'
            | '\u{000c}'
            | '\r'
            | '\u{00a0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200a}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202f}'
            | '\u{205f}'
            | '\u{3000}'
            | '\u{feff}'
    )
}

/// Number of whitespace runes at the start of `runes`.
pub fn leading_whitespace(runes: &[Rune]) -> usize {
    runes.iter().take_while(|&&r| is_whitespace(r)).count()
}

/// Number of whitespace runes at the end of `runes`.
pub fn trailing_whitespace(runes: &[Rune]) -> usize {
    runes
        .iter()
        .rev()
        .take_while(|&&r| is_whitespace(r))
        .count()
}
