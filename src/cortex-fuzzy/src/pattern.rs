//! Query parsing.
//!
//! A basic query is one implicit term. An extended query is an AND of term
//! sets separated by spaces, each set an OR of terms joined by a bare `|`:
//!
//! | Token     | Kind                 |
//! |-----------|----------------------|
//! | `sbtrkt`  | fuzzy                |
//! | `'wild`   | exact                |
//! | `^music`  | prefix               |
//! | `.mp3$`   | suffix               |
//! | `^README$`| equal                |
//! | `!fire`   | negated exact        |
//! | `!'fire`  | negated fuzzy        |
//!
//! In exact mode the roles of plain and `'`-quoted tokens are swapped.
//! A backslash-escaped space (`\ `) is kept inside its token.

use crate::algo::Matcher;
use crate::char_class::is_whitespace;
use crate::config::Casing;
use crate::normalize::{is_fold_invariant, normalize_runes};
use crate::runes::{Rune, str_to_runes};

/// Stands in for escaped spaces while the query is split on spaces.
const ESCAPED_SPACE: char = '\t';

/// How a single term is matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TermKind {
    Fuzzy,
    Exact,
    Prefix,
    Suffix,
    Equal,
}

impl TermKind {
    /// The matcher for this kind. Fuzzy terms use the finder's fuzzy matcher.
    pub fn matcher(self, fuzzy: Matcher) -> Matcher {
        match self {
            Self::Fuzzy => fuzzy,
            Self::Exact => Matcher::Exact,
            Self::Prefix => Matcher::Prefix,
            Self::Suffix => Matcher::Suffix,
            Self::Equal => Matcher::Equal,
        }
    }
}

/// One parsed token of an extended query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    pub kind: TermKind,

    /// Item must NOT match this term.
    pub negated: bool,

    /// Pattern runes, lowercased unless `case_sensitive`. Never empty.
    pub runes: Vec<Rune>,

    pub case_sensitive: bool,

    /// Fold diacritics of the text while matching this term. Off when the
    /// term itself carries diacritics, so `café` only matches `café`.
    pub normalize: bool,
}

/// Alternatives joined with `|`; one of them has to hold.
pub type TermSet = Vec<Term>;

/// A parsed extended query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    /// The query after whitespace trimming.
    pub text: String,

    /// Every set has to be satisfied.
    pub term_sets: Vec<TermSet>,

    /// Some term is non-negated, so scores are meaningful.
    pub sortable: bool,

    /// A single plain term of the default kind; results could be memoized
    /// per query prefix.
    pub cacheable: bool,

    /// Built in fuzzy mode (plain tokens are fuzzy terms).
    pub fuzzy: bool,
}

impl Pattern {
    /// Parses an extended query.
    pub fn parse(fuzzy: bool, casing: Casing, normalize: bool, query: &str) -> Self {
        let text = trim_query(query);
        let term_sets = parse_terms(fuzzy, casing, normalize, &text);

        let mut sortable = false;
        let mut cacheable = true;
        'sets: for set in &term_sets {
            for (idx, term) in set.iter().enumerate() {
                if !term.negated {
                    sortable = true;
                }
                let default_kind = if fuzzy {
                    TermKind::Fuzzy
                } else {
                    TermKind::Exact
                };
                if !cacheable || idx > 0 || term.negated || term.kind != default_kind {
                    cacheable = false;
                    if sortable {
                        break 'sets;
                    }
                }
            }
        }

        Self {
            text,
            term_sets,
            sortable,
            cacheable,
            fuzzy,
        }
    }

    /// No term sets: every item matches with score 0.
    pub fn is_empty(&self) -> bool {
        self.term_sets.is_empty()
    }
}

/// Trims leading whitespace and trailing whitespace, except that a trailing
/// escaped space survives.
fn trim_query(query: &str) -> String {
    let query = query.trim_start_matches(is_whitespace);
    let right = query.trim_end_matches(is_whitespace);
    if right.ends_with('\\') && query[right.len()..].starts_with(' ') {
        format!("{right} ")
    } else {
        right.to_string()
    }
}

fn parse_terms(fuzzy: bool, casing: Casing, normalize: bool, query: &str) -> Vec<TermSet> {
    let query = query.replace("\\ ", &ESCAPED_SPACE.to_string());

    let mut sets = Vec::new();
    let mut set = TermSet::new();
    let mut switch_set = false;
    let mut after_bar = false;

    for token in query.split(' ').filter(|t| !t.is_empty()) {
        let raw = token.replace(ESCAPED_SPACE, " ");
        let lower = raw.to_lowercase();
        let case_sensitive =
            casing == Casing::CaseSensitive || (casing == Casing::SmartCase && raw != lower);
        let normalize_term = normalize && is_fold_invariant(&lower);

        let mut text = if case_sensitive {
            raw.as_str()
        } else {
            lower.as_str()
        };
        let mut kind = if fuzzy {
            TermKind::Fuzzy
        } else {
            TermKind::Exact
        };
        let mut negated = false;

        if !set.is_empty() && !after_bar && text == "|" {
            switch_set = false;
            after_bar = true;
            continue;
        }
        after_bar = false;

        if let Some(rest) = text.strip_prefix('!') {
            negated = true;
            kind = TermKind::Exact;
            text = rest;
        }

        if text != "$"
            && let Some(rest) = text.strip_suffix('$')
        {
            kind = TermKind::Suffix;
            text = rest;
        }

        if let Some(rest) = text.strip_prefix('\'') {
            kind = if fuzzy && !negated {
                TermKind::Exact
            } else {
                TermKind::Fuzzy
            };
            text = rest;
        } else if let Some(rest) = text.strip_prefix('^') {
            kind = if kind == TermKind::Suffix {
                TermKind::Equal
            } else {
                TermKind::Prefix
            };
            text = rest;
        }

        if text.is_empty() {
            continue;
        }

        if switch_set {
            sets.push(std::mem::take(&mut set));
        }
        let mut runes = str_to_runes(text);
        if normalize_term {
            normalize_runes(&mut runes);
        }
        set.push(Term {
            kind,
            negated,
            runes,
            case_sensitive,
            normalize: normalize_term,
        });
        switch_set = true;
    }

    if !set.is_empty() {
        sets.push(set);
    }
    sets
}

/// A basic-mode query: the whole string is one pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicQuery {
    pub runes: Vec<Rune>,
    pub case_sensitive: bool,
}

impl BasicQuery {
    /// Resolves case sensitivity for the whole query and folds its runes.
    pub fn new(query: &str, casing: Casing, normalize: bool) -> Self {
        let lower = query.to_lowercase();
        let case_sensitive = match casing {
            Casing::CaseSensitive => true,
            Casing::CaseInsensitive => false,
            Casing::SmartCase => lower != query,
        };

        let mut runes = if case_sensitive {
            str_to_runes(query)
        } else {
            str_to_runes(&lower)
        };
        if normalize {
            normalize_runes(&mut runes);
        }

        Self {
            runes,
            case_sensitive,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::{MatchOptions, MatchSpan};
    use pretty_assertions::assert_eq;

    fn kinds(set: &TermSet) -> Vec<(TermKind, bool)> {
        set.iter().map(|t| (t.kind, t.negated)).collect()
    }

    #[test]
    fn test_parse_extended_fuzzy() {
        let pattern = Pattern::parse(
            true,
            Casing::SmartCase,
            false,
            "aaa 'bbb ^ccc ddd$ !eee !'fff !^ggg !hhh$ | ^iii$ ^xxx | 'yyy | zzz$ | !ZZZ |",
        );
        let sets = &pattern.term_sets;
        assert_eq!(sets.len(), 9);

        use TermKind::*;
        assert_eq!(kinds(&sets[0]), vec![(Fuzzy, false)]);
        assert_eq!(kinds(&sets[1]), vec![(Exact, false)]);
        assert_eq!(kinds(&sets[2]), vec![(Prefix, false)]);
        assert_eq!(kinds(&sets[3]), vec![(Suffix, false)]);
        assert_eq!(kinds(&sets[4]), vec![(Exact, true)]);
        assert_eq!(kinds(&sets[5]), vec![(Fuzzy, true)]);
        assert_eq!(kinds(&sets[6]), vec![(Prefix, true)]);
        assert_eq!(kinds(&sets[7]), vec![(Suffix, true), (Equal, false)]);
        assert_eq!(
            kinds(&sets[8]),
            vec![(Prefix, false), (Exact, false), (Suffix, false), (Exact, true)]
        );

        for set in &sets[..8] {
            assert_eq!(set[0].runes.len(), 3);
        }
        assert!(sets[8][3].case_sensitive);
        assert_eq!(sets[8][3].runes, str_to_runes("ZZZ"));
        assert!(pattern.sortable);
        assert!(!pattern.cacheable);
        assert!(pattern.fuzzy);
    }

    #[test]
    fn test_parse_extended_exact() {
        let pattern = Pattern::parse(
            false,
            Casing::SmartCase,
            false,
            "aaa 'bbb ^ccc ddd$ !eee !'fff !^ggg !hhh$",
        );
        let sets = &pattern.term_sets;
        assert_eq!(sets.len(), 8);

        use TermKind::*;
        let expected = [
            (Exact, false),
            (Fuzzy, false),
            (Prefix, false),
            (Suffix, false),
            (Exact, true),
            (Fuzzy, true),
            (Prefix, true),
            (Suffix, true),
        ];
        for (set, expected) in sets.iter().zip(expected) {
            assert_eq!(kinds(set), vec![expected]);
            assert_eq!(set[0].runes.len(), 3);
        }
    }

    #[test]
    fn test_marker_only_tokens_yield_nothing() {
        let pattern = Pattern::parse(true, Casing::SmartCase, false, "' ^ !' !^");
        assert!(pattern.is_empty());
        assert!(!pattern.sortable);
        assert!(pattern.cacheable);
    }

    #[test]
    fn test_cacheable() {
        assert!(Pattern::parse(true, Casing::SmartCase, false, "foo").cacheable);
        assert!(!Pattern::parse(true, Casing::SmartCase, false, "'foo").cacheable);
        assert!(Pattern::parse(false, Casing::SmartCase, false, "foo").cacheable);
        assert!(Pattern::parse(true, Casing::SmartCase, false, "foo bar").cacheable);
        assert!(!Pattern::parse(true, Casing::SmartCase, false, "foo | bar").cacheable);
        assert!(!Pattern::parse(true, Casing::SmartCase, false, "!foo").cacheable);
    }

    #[test]
    fn test_bar_at_start_is_a_term() {
        let pattern = Pattern::parse(true, Casing::SmartCase, false, "| foo");
        assert_eq!(pattern.term_sets.len(), 2);
        assert_eq!(pattern.term_sets[0][0].runes, vec!['|']);
    }

    #[test]
    fn test_bare_dollar_is_literal() {
        let pattern = Pattern::parse(true, Casing::SmartCase, false, "$");
        assert_eq!(pattern.term_sets.len(), 1);
        assert_eq!(pattern.term_sets[0][0].kind, TermKind::Fuzzy);
        assert_eq!(pattern.term_sets[0][0].runes, vec!['$']);
    }

    #[test]
    fn test_transformed_text() {
        let text = |q: &str| Pattern::parse(false, Casing::SmartCase, false, q).text;
        assert_eq!(text(" AA bb       "), "AA bb");
        assert_eq!(text(" AA bb\\       "), "AA bb\\ ");
        assert_eq!(text(" AA bb    \\    \\   "), "AA bb    \\    \\ ");
        assert_eq!(text(" AA \\  bb \\   "), "AA \\  bb \\ ");
    }

    #[test]
    fn test_escaped_space_kept() {
        let pattern = Pattern::parse(false, Casing::SmartCase, false, "a\\ b\\ ");
        assert_eq!(pattern.term_sets.len(), 1);
        assert_eq!(pattern.term_sets[0][0].runes, str_to_runes("a b "));
    }

    #[test]
    fn test_per_term_casing() {
        let pattern = Pattern::parse(true, Casing::SmartCase, false, "foo Bar");
        assert!(!pattern.term_sets[0][0].case_sensitive);
        assert!(pattern.term_sets[1][0].case_sensitive);

        let pattern = Pattern::parse(true, Casing::CaseInsensitive, false, "Bar");
        assert!(!pattern.term_sets[0][0].case_sensitive);
        assert_eq!(pattern.term_sets[0][0].runes, str_to_runes("bar"));

        let pattern = Pattern::parse(true, Casing::CaseSensitive, false, "bar");
        assert!(pattern.term_sets[0][0].case_sensitive);
    }

    #[test]
    fn test_per_term_normalize() {
        let pattern = Pattern::parse(true, Casing::SmartCase, true, "cafe café");
        assert!(pattern.term_sets[0][0].normalize);
        assert!(!pattern.term_sets[1][0].normalize);
        assert_eq!(pattern.term_sets[1][0].runes, str_to_runes("café"));
    }

    #[test]
    fn test_exact_term_match() {
        let pattern = Pattern::parse(true, Casing::SmartCase, false, "abc");
        let opts = MatchOptions {
            case_sensitive: true,
            ..MatchOptions::default()
        };
        let (span, positions) = Matcher::Exact.run(
            opts,
            &str_to_runes("aabbcc abc"),
            &pattern.term_sets[0][0].runes,
            None,
        );
        assert_eq!((span.start, span.end), (7, 10));
        assert_eq!(positions, None);
    }

    #[test]
    fn test_equal_term_match() {
        let pattern = Pattern::parse(true, Casing::SmartCase, false, "^AbC$");
        let term = &pattern.term_sets[0][0];
        assert_eq!(term.kind, TermKind::Equal);

        let opts = MatchOptions {
            case_sensitive: true,
            ..MatchOptions::default()
        };
        let check = |text: &str, start: i32, end: i32| {
            let (span, positions): (MatchSpan, _) =
                Matcher::Equal.run(opts, &str_to_runes(text), &term.runes, None);
            assert_eq!((span.start, span.end), (start, end), "text {text:?}");
            assert_eq!(positions, None);
        };
        check("ABC", -1, -1);
        check("AbC", 0, 3);
        check("AbC  ", 0, 3);
        check(" AbC ", 1, 4);
        check("  AbC", 2, 5);
    }

    #[test]
    fn test_term_kind_matcher() {
        assert_eq!(TermKind::Fuzzy.matcher(Matcher::FuzzyV1), Matcher::FuzzyV1);
        assert_eq!(TermKind::Fuzzy.matcher(Matcher::Exact), Matcher::Exact);
        assert_eq!(TermKind::Suffix.matcher(Matcher::FuzzyV2), Matcher::Suffix);
    }

    #[test]
    fn test_basic_query() {
        let query = BasicQuery::new("FooBar", Casing::SmartCase, false);
        assert!(query.case_sensitive);
        assert_eq!(query.runes, str_to_runes("FooBar"));

        let query = BasicQuery::new("foobar", Casing::SmartCase, false);
        assert!(!query.case_sensitive);

        let query = BasicQuery::new("FooBar", Casing::CaseInsensitive, false);
        assert!(!query.case_sensitive);
        assert_eq!(query.runes, str_to_runes("foobar"));

        let query = BasicQuery::new("foo", Casing::CaseSensitive, false);
        assert!(query.case_sensitive);

        let query = BasicQuery::new("mâché", Casing::SmartCase, true);
        assert_eq!(query.runes, str_to_runes("mache"));
    }
}
