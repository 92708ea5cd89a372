//! Synchronous finder and the matching core it shares with [`crate::AsyncFinder`].

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::ops::Range;

use tracing::{debug, trace};
use unicode_normalization::UnicodeNormalization;

use crate::algo::{MatchOptions, MatchSpan, Matcher};
use crate::config::{FinderOptions, MatchMode};
use crate::extended::compute_extended_match;
use crate::pattern::{BasicQuery, Pattern};
use crate::result::ResultItem;
use crate::runes::{Rune, str_to_nfc_runes};
use crate::slab::{Slab, with_thread_slab};
use crate::tiebreak::{self, Selector};

/// Results grouped by bucket key (the score, or 0 when unsorted).
pub(crate) type Buckets<'a, T> = BTreeMap<i32, Vec<ResultItem<&'a T>>>;

/// A query prepared for the per-item loop.
#[derive(Debug)]
pub(crate) enum Plan {
    Basic(BasicQuery),
    Extended(Pattern),
}

/// The indexed items plus everything needed to search them.
pub(crate) struct Corpus<T> {
    items: Vec<T>,
    runes: Vec<Vec<Rune>>,
    selector: Box<Selector<T>>,
    options: FinderOptions<T>,
    matcher: Matcher,
}

impl<T> Corpus<T> {
    pub(crate) fn new(
        items: Vec<T>,
        selector: Box<Selector<T>>,
        options: FinderOptions<T>,
    ) -> Self {
        let runes = items
            .iter()
            .map(|item| str_to_nfc_runes(selector(item)))
            .collect();
        let matcher = options.config.algorithm.matcher();

        debug!(
            items = items.len(),
            algorithm = ?options.config.algorithm,
            match_mode = ?options.config.match_mode,
            "Indexed finder corpus"
        );

        Self {
            items,
            runes,
            selector,
            options,
            matcher,
        }
    }

    pub(crate) fn items(&self) -> &[T] {
        &self.items
    }

    pub(crate) fn options(&self) -> &FinderOptions<T> {
        &self.options
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    /// Searches that skip matching: empty query or empty corpus.
    pub(crate) fn is_trivial(&self, query: &str) -> bool {
        query.is_empty() || self.items.is_empty()
    }

    /// The first `limit` items, unscored.
    pub(crate) fn unscored(&self) -> Vec<ResultItem<&T>> {
        self.items
            .iter()
            .take(self.options.config.max_results())
            .map(ResultItem::unscored)
            .collect()
    }

    /// Composes the query and parses it for the configured match mode.
    pub(crate) fn plan(&self, query: &str) -> Plan {
        let config = &self.options.config;
        let query: String = query.nfc().collect();
        match config.match_mode {
            MatchMode::Basic => {
                Plan::Basic(BasicQuery::new(&query, config.casing, config.normalize))
            }
            MatchMode::Extended => Plan::Extended(Pattern::parse(
                config.algorithm.is_fuzzy(),
                config.casing,
                config.normalize,
                &query,
            )),
        }
    }

    /// Matches the items in `range` and files the hits into `buckets`.
    pub(crate) fn scan<'a>(
        &'a self,
        plan: &Plan,
        range: Range<usize>,
        buckets: &mut Buckets<'a, T>,
    ) {
        with_thread_slab(|mut slab| {
            for idx in range {
                let hit = match plan {
                    Plan::Basic(query) => self.match_basic(idx, query, slab.as_deref_mut()),
                    Plan::Extended(pattern) => {
                        self.match_extended(idx, pattern, slab.as_deref_mut())
                    }
                };
                if let Some(hit) = hit {
                    let key = if self.options.config.sort {
                        hit.score
                    } else {
                        0
                    };
                    buckets.entry(key).or_default().push(hit);
                }
            }
        });
    }

    fn match_basic(
        &self,
        idx: usize,
        query: &BasicQuery,
        slab: Option<&mut Slab>,
    ) -> Option<ResultItem<&T>> {
        let text = &self.runes[idx];
        if query.runes.len() > text.len() {
            return None;
        }

        let config = &self.options.config;
        let opts = MatchOptions {
            case_sensitive: query.case_sensitive,
            normalize: config.normalize,
            forward: config.forward,
            with_positions: true,
        };
        let (span, positions) = self.matcher.run(opts, text, &query.runes, slab);
        if !span.is_match() {
            return None;
        }

        let positions: BTreeSet<usize> = if self.matcher.reports_positions() {
            positions.into_iter().flatten().collect()
        } else {
            span.range().collect()
        };
        Some(ResultItem::new(&self.items[idx], span, positions))
    }

    fn match_extended(
        &self,
        idx: usize,
        pattern: &Pattern,
        slab: Option<&mut Slab>,
    ) -> Option<ResultItem<&T>> {
        let m = compute_extended_match(
            &self.runes[idx],
            pattern,
            self.matcher,
            self.options.config.forward,
            slab,
        );
        if !m.is_complete(pattern) {
            return None;
        }

        let (start, end) = m.span();
        Some(ResultItem::new(
            &self.items[idx],
            MatchSpan::new(start, end, m.total_score),
            m.positions,
        ))
    }

    /// Concatenates buckets best-first up to the limit, ordering each
    /// bucket with the tie-breakers when sorting.
    pub(crate) fn collect<'a>(&'a self, buckets: Buckets<'a, T>) -> Vec<ResultItem<&'a T>> {
        let config = &self.options.config;
        let limit = config.max_results();
        let tiebreakers = &self.options.tiebreakers;

        let mut results = Vec::new();
        for (_, mut bucket) in buckets.into_iter().rev() {
            if config.sort && !tiebreakers.is_empty() {
                bucket.sort_by(|a, b| tiebreak::compare(tiebreakers, &*self.selector, a, b));
            }
            results.extend(bucket);
            if results.len() >= limit {
                break;
            }
        }
        results.truncate(limit);
        results
    }
}

impl<T> fmt::Debug for Corpus<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Corpus")
            .field("items", &self.items.len())
            .field("options", &self.options)
            .field("matcher", &self.matcher)
            .finish()
    }
}

/// Gives a closure the higher-ranked selector signature.
fn str_selector<T, F>(f: F) -> F
where
    F: Fn(&T) -> &str,
{
    f
}

/// Fuzzy finder over a fixed list of items.
///
/// # Example
///
/// ```no_run
/// use cortex_fuzzy::{Finder, FinderOptions};
///
/// let files = vec!["Cargo.toml", "Cargo.lock", "src/main.rs"];
/// let finder = Finder::new(files, FinderOptions::default());
/// for result in finder.find("cgtml") {
///     println!("{} {:?}", result.score, result.item);
/// }
/// ```
#[derive(Debug)]
pub struct Finder<T> {
    corpus: Corpus<T>,
}

impl<T: AsRef<str>> Finder<T> {
    /// Creates a finder over string-like items.
    pub fn new(items: Vec<T>, options: FinderOptions<T>) -> Self {
        let selector = Box::new(str_selector(|item: &T| item.as_ref()));
        Self {
            corpus: Corpus::new(items, selector, options),
        }
    }
}

impl<T> Finder<T> {
    /// Creates a finder that searches the string `selector` picks out of
    /// each item.
    pub fn with_selector<F>(items: Vec<T>, selector: F, options: FinderOptions<T>) -> Self
    where
        F: Fn(&T) -> &str + Send + Sync + 'static,
    {
        Self {
            corpus: Corpus::new(items, Box::new(selector), options),
        }
    }

    /// Runs `query` against every item.
    ///
    /// An empty query returns the first `limit` items unscored.
    pub fn find(&self, query: &str) -> Vec<ResultItem<&T>> {
        let corpus = &self.corpus;
        if corpus.is_trivial(query) {
            return corpus.unscored();
        }

        let plan = corpus.plan(query);
        let mut buckets: Buckets<'_, T> = BTreeMap::new();
        corpus.scan(&plan, 0..corpus.len(), &mut buckets);
        let results = corpus.collect(buckets);

        trace!(
            query_len = query.chars().count(),
            match_mode = ?corpus.options().config.match_mode,
            results = results.len(),
            "Finder search complete"
        );
        results
    }

    /// The indexed items in corpus order.
    pub fn items(&self) -> &[T] {
        self.corpus.items()
    }

    /// The options this finder was built with.
    pub fn options(&self) -> &FinderOptions<T> {
        self.corpus.options()
    }

    pub fn len(&self) -> usize {
        self.corpus.len()
    }

    pub fn is_empty(&self) -> bool {
        self.corpus.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Algorithm, Casing};
    use pretty_assertions::assert_eq;

    fn names<'a>(results: &[ResultItem<&'a &'static str>]) -> Vec<&'a str> {
        results.iter().map(|r| *r.item).collect()
    }

    #[test]
    fn test_empty_query_returns_items_unscored() {
        let finder = Finder::new(
            vec!["a", "b", "c"],
            FinderOptions::builder().limit(2).build(),
        );
        let results = finder.find("");
        assert_eq!(names(&results), vec!["a", "b"]);
        assert!(results.iter().all(|r| r.score == 0 && r.start == -1 && r.end == -1));
        assert!(results.iter().all(|r| r.positions.is_empty()));
    }

    #[test]
    fn test_empty_corpus() {
        let finder = Finder::<String>::new(Vec::new(), FinderOptions::default());
        assert!(finder.is_empty());
        assert!(finder.find("abc").is_empty());
    }

    #[test]
    fn test_basic_skips_shorter_items() {
        let finder = Finder::new(vec!["ab", "abc", "xabcx"], FinderOptions::default());
        assert_eq!(names(&finder.find("abc")), vec!["abc", "xabcx"]);
    }

    #[test]
    fn test_basic_positions() {
        let finder = Finder::new(vec!["foobar"], FinderOptions::default());
        let results = finder.find("fbr");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].positions, BTreeSet::from([0, 3, 5]));
        assert_eq!((results[0].start, results[0].end), (0, 6));
    }

    #[test]
    fn test_exact_only_positions_are_contiguous() {
        let options = FinderOptions::builder()
            .algorithm(Algorithm::ExactOnly)
            .build();
        let finder = Finder::new(vec!["cadabra", "abacus"], options);
        let results = finder.find("aba");
        assert_eq!(names(&results), vec!["abacus"]);
        assert_eq!(results[0].positions, BTreeSet::from([0, 1, 2]));
    }

    #[test]
    fn test_decomposed_items_are_composed() {
        let options = FinderOptions::builder().normalize(false).build();
        let finder = Finder::new(vec!["cafe\u{301}"], options);
        let results = finder.find("café");
        assert_eq!(results.len(), 1);
        assert_eq!((results[0].start, results[0].end), (0, 4));
    }

    #[test]
    fn test_with_selector() {
        struct Entry {
            name: String,
            id: u32,
        }
        let items = vec![
            Entry {
                name: "alpha".to_string(),
                id: 1,
            },
            Entry {
                name: "beta".to_string(),
                id: 2,
            },
        ];
        let finder =
            Finder::with_selector(items, |e: &Entry| e.name.as_str(), FinderOptions::default());
        let ids: Vec<u32> = finder.find("bt").iter().map(|r| r.item.id).collect();
        assert_eq!(ids, vec![2]);
        assert_eq!(finder.len(), 2);
    }

    #[test]
    fn test_extended_plan() {
        let options = FinderOptions::builder()
            .match_mode(MatchMode::Extended)
            .casing(Casing::CaseInsensitive)
            .build();
        let finder = Finder::new(vec!["Cargo.toml", "Cargo.lock"], options);
        match finder.corpus.plan("ca !lock") {
            Plan::Extended(pattern) => assert_eq!(pattern.term_sets.len(), 2),
            Plan::Basic(_) => panic!("expected extended plan"),
        }
        assert_eq!(names(&finder.find("ca !lock")), vec!["Cargo.toml"]);
    }

    #[test]
    fn test_extended_blank_query_matches_everything() {
        let options = FinderOptions::builder()
            .match_mode(MatchMode::Extended)
            .build();
        let finder = Finder::new(vec!["x", "y"], options);
        let results = finder.find("   ");
        assert_eq!(names(&results), vec!["x", "y"]);
        assert!(results.iter().all(|r| r.score == 0 && r.start == -1));
    }

    #[test]
    fn test_limit_zero() {
        let finder = Finder::new(vec!["abc"], FinderOptions::builder().limit(0).build());
        assert!(finder.find("a").is_empty());
        assert!(finder.find("").is_empty());
    }
}
