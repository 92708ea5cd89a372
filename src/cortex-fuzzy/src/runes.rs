//! Code-point sequences.
//!
//! Every matcher indexes text by Unicode scalar value rather than by byte, so
//! corpus items and queries are converted once into `Vec<Rune>` and all
//! reported offsets (`start`, `end`, positions) are rune indices.

use unicode_normalization::UnicodeNormalization;

/// A single Unicode code point.
pub type Rune = char;

/// Splits a string into its code points.
pub fn str_to_runes(s: &str) -> Vec<Rune> {
    s.chars().collect()
}

/// Composes (NFC) a string and splits it into code points.
///
/// Used for every corpus item and query so that `"e\u{301}"` and `"é"`
/// index identically.
pub fn str_to_nfc_runes(s: &str) -> Vec<Rune> {
    s.nfc().collect()
}

/// Joins code points back into a string.
pub fn runes_to_string(runes: &[Rune]) -> String {
    runes.iter().collect()
}

/// Returns `true` when every rune is in the ASCII range.
pub(crate) fn is_ascii(runes: &[Rune]) -> bool {
    runes.iter().all(char::is_ascii)
}

/// Converts a rune index into the `i32` offset type used by [`crate::MatchSpan`].
#[inline]
pub(crate) fn offset(idx: usize) -> i32 {
    i32::try_from(idx).unwrap_or(i32::MAX)
}
