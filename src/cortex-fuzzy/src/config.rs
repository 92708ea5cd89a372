//! Configuration types for the finders.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::algo::Matcher;
use crate::result::ResultItem;
use crate::tiebreak::{Selector, Tiebreaker};

/// Case sensitivity policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Casing {
    /// Case-sensitive only when the query (or, in extended mode, the term)
    /// contains an uppercase letter.
    #[default]
    SmartCase,

    /// Always case-sensitive.
    CaseSensitive,

    /// Never case-sensitive.
    CaseInsensitive,
}

/// Matching algorithm used for basic queries and fuzzy extended terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    /// Greedy matcher. Fast, may miss the best-scoring alignment.
    V1,

    /// Optimal alignment matcher.
    #[default]
    V2,

    /// Contiguous substring matching only.
    ExactOnly,
}

impl Algorithm {
    /// The matcher that runs for this algorithm.
    pub fn matcher(self) -> Matcher {
        match self {
            Self::V1 => Matcher::FuzzyV1,
            Self::V2 => Matcher::FuzzyV2,
            Self::ExactOnly => Matcher::Exact,
        }
    }

    /// Whether this is one of the fuzzy algorithms.
    pub fn is_fuzzy(self) -> bool {
        !matches!(self, Self::ExactOnly)
    }
}

/// How the query string is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchMode {
    /// The whole query is one pattern.
    #[default]
    Basic,

    /// Space-separated terms with `'`, `^`, `$`, `!` and `|` operators.
    Extended,
}

/// Plain-data finder options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinderConfig {
    /// Maximum number of results. `None` means unlimited.
    pub limit: Option<usize>,

    /// Case sensitivity policy.
    pub casing: Casing,

    /// Fold diacritics so `cafe` matches `café`.
    pub normalize: bool,

    /// Matching algorithm.
    pub algorithm: Algorithm,

    /// Query grammar.
    pub match_mode: MatchMode,

    /// Prefer leftmost matches; `false` prefers rightmost (useful for paths).
    pub forward: bool,

    /// Rank by score. When `false` results keep corpus order.
    pub sort: bool,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            limit: None,
            casing: Casing::SmartCase,
            normalize: true,
            algorithm: Algorithm::V2,
            match_mode: MatchMode::Basic,
            forward: true,
            sort: true,
        }
    }
}

impl FinderConfig {
    /// Effective result limit.
    pub fn max_results(&self) -> usize {
        self.limit.unwrap_or(usize::MAX)
    }
}

/// Finder options: [`FinderConfig`] plus the ordered tie-breakers.
pub struct FinderOptions<T> {
    pub config: FinderConfig,
    pub tiebreakers: Vec<Tiebreaker<T>>,
}

impl<T> FinderOptions<T> {
    /// Creates a builder for constructing options.
    pub fn builder() -> FinderOptionsBuilder<T> {
        FinderOptionsBuilder::new()
    }
}

impl<T> Default for FinderOptions<T> {
    fn default() -> Self {
        Self {
            config: FinderConfig::default(),
            tiebreakers: Vec::new(),
        }
    }
}

impl<T> Clone for FinderOptions<T> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            tiebreakers: self.tiebreakers.clone(),
        }
    }
}

impl<T> fmt::Debug for FinderOptions<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FinderOptions")
            .field("config", &self.config)
            .field("tiebreakers", &self.tiebreakers.len())
            .finish()
    }
}

impl<T> From<FinderConfig> for FinderOptions<T> {
    fn from(config: FinderConfig) -> Self {
        Self {
            config,
            tiebreakers: Vec::new(),
        }
    }
}

/// Builder for creating `FinderOptions` instances.
pub struct FinderOptionsBuilder<T> {
    options: FinderOptions<T>,
}

impl<T> Default for FinderOptionsBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FinderOptionsBuilder<T> {
    /// Creates a builder with default options.
    pub fn new() -> Self {
        Self {
            options: FinderOptions::default(),
        }
    }

    /// Replaces every plain-data option at once.
    pub fn config(mut self, config: FinderConfig) -> Self {
        self.options.config = config;
        self
    }

    /// Sets the maximum number of results.
    pub fn limit(mut self, limit: usize) -> Self {
        self.options.config.limit = Some(limit);
        self
    }

    /// Sets the case sensitivity policy.
    pub fn casing(mut self, casing: Casing) -> Self {
        self.options.config.casing = casing;
        self
    }

    /// Sets whether diacritics are folded.
    pub fn normalize(mut self, normalize: bool) -> Self {
        self.options.config.normalize = normalize;
        self
    }

    /// Sets the matching algorithm.
    pub fn algorithm(mut self, algorithm: Algorithm) -> Self {
        self.options.config.algorithm = algorithm;
        self
    }

    /// Sets the query grammar.
    pub fn match_mode(mut self, match_mode: MatchMode) -> Self {
        self.options.config.match_mode = match_mode;
        self
    }

    /// Sets the scan direction.
    pub fn forward(mut self, forward: bool) -> Self {
        self.options.config.forward = forward;
        self
    }

    /// Sets whether results are ranked by score.
    pub fn sort(mut self, sort: bool) -> Self {
        self.options.config.sort = sort;
        self
    }

    /// Appends a tie-breaker. Tie-breakers run in insertion order.
    pub fn tiebreaker<F>(mut self, tiebreaker: F) -> Self
    where
        F: Fn(&ResultItem<&T>, &ResultItem<&T>, &Selector<T>) -> Ordering + Send + Sync + 'static,
    {
        self.options.tiebreakers.push(Arc::new(tiebreaker));
        self
    }

    /// Builds the options.
    pub fn build(self) -> FinderOptions<T> {
        self.options
    }
}
