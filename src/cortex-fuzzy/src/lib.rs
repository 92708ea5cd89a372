#![allow(
    clippy::cast_possible_truncation,
    clippy::missing_errors_doc,
    clippy::uninlined_format_args
)]
//! Cortex Fuzzy - fzf-style fuzzy matching and ranking.
//!
//! This crate scores a query against a fixed list of items the way fzf does:
//! an optimal-alignment matcher with word-boundary and camel-case bonuses,
//! a greedy fallback, anchored matchers, and fzf's extended query syntax.
//!
//! # Features
//!
//! - Fuzzy matching (`V2` optimal alignment, `V1` greedy) and exact-only mode
//! - Extended queries: `'exact ^prefix suffix$ ^equal$ !negated a | b`
//! - Smart-case, case-sensitive and case-insensitive matching
//! - Diacritic folding (`cafe` matches `café`)
//! - Score-bucketed ranking with pluggable tie-breakers
//! - Cancellable async search that yields between chunks of items
//!
//! # Example
//!
//! ```no_run
//! use cortex_fuzzy::{Finder, FinderOptions, MatchMode, by_length_asc};
//!
//! let files = vec!["src/main.rs", "src/lib.rs", "Cargo.toml", "Cargo.lock"];
//! let options = FinderOptions::builder()
//!     .match_mode(MatchMode::Extended)
//!     .tiebreaker(by_length_asc::<&str>)
//!     .limit(10)
//!     .build();
//! let finder = Finder::new(files, options);
//!
//! for result in finder.find("cargo !lock") {
//!     println!("{}: {} {:?}", result.score, result.item, result.positions);
//! }
//! ```

mod algo;
mod async_finder;
mod char_class;
mod config;
mod error;
mod extended;
mod finder;
mod normalize;
mod pattern;
mod result;
mod runes;
mod slab;
mod tiebreak;

pub use algo::{
    BONUS_BOUNDARY, BONUS_CAMEL_123, BONUS_CONSECUTIVE, BONUS_FIRST_CHAR_MULTIPLIER, BONUS_NON_WORD,
    MatchOptions, MatchOutput, MatchSpan, Matcher, SCORE_GAP_EXTENSION, SCORE_GAP_START,
    SCORE_MATCH, equal_match, exact_match_naive, fuzzy_match_v1, fuzzy_match_v2, prefix_match,
    suffix_match,
};
pub use async_finder::{ASYNC_CHUNK_SIZE, AsyncFinder};
pub use char_class::{
    CharClass, bonus_at, bonus_for, classify, is_whitespace, leading_whitespace,
    trailing_whitespace,
};
pub use config::{Algorithm, Casing, FinderConfig, FinderOptions, FinderOptionsBuilder, MatchMode};
pub use error::{FinderError, FinderResult};
pub use extended::{ExtendedMatch, compute_extended_match};
pub use finder::Finder;
pub use normalize::{normalize_rune, normalize_runes};
pub use pattern::{BasicQuery, Pattern, Term, TermKind, TermSet};
pub use result::ResultItem;
pub use runes::{Rune, runes_to_string, str_to_nfc_runes, str_to_runes};
pub use slab::{SLAB_16_SIZE, SLAB_32_SIZE, Slab, with_thread_slab};
pub use tiebreak::{Selector, Tiebreaker, by_length_asc, by_start_asc};
