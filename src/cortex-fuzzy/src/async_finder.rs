//! Cancellable finder that yields to the runtime between chunks of items.

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::config::FinderOptions;
use crate::error::{FinderError, FinderResult};
use crate::finder::{Buckets, Corpus};
use crate::result::ResultItem;

/// Items matched between two cancellation checks.
pub const ASYNC_CHUNK_SIZE: usize = 1000;

/// Finder whose searches run in chunks and can be superseded.
///
/// Starting a new search cancels the one in flight: its future resolves to
/// [`FinderError::Cancelled`] at its next chunk boundary. Clones share the
/// corpus and the in-flight token, so a search on one clone supersedes a
/// search on another.
pub struct AsyncFinder<T> {
    corpus: Arc<Corpus<T>>,
    token: Arc<Mutex<CancellationToken>>,
}

impl<T: AsRef<str>> AsyncFinder<T> {
    /// Creates a finder over string-like items.
    pub fn new(items: Vec<T>, options: FinderOptions<T>) -> Self {
        Self::with_selector(items, |item: &T| item.as_ref(), options)
    }
}

impl<T> AsyncFinder<T> {
    /// Creates a finder that searches the string `selector` picks out of
    /// each item.
    pub fn with_selector<F>(items: Vec<T>, selector: F, options: FinderOptions<T>) -> Self
    where
        F: Fn(&T) -> &str + Send + Sync + 'static,
    {
        Self {
            corpus: Arc::new(Corpus::new(items, Box::new(selector), options)),
            token: Arc::new(Mutex::new(CancellationToken::new())),
        }
    }

    /// Starts a search for `query`, cancelling any search still in flight.
    ///
    /// Cancellation happens when `find` is called, not when the returned
    /// future is first polled.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use cortex_fuzzy::{AsyncFinder, FinderOptions};
    ///
    /// # async fn run() -> cortex_fuzzy::FinderResult<()> {
    /// let finder = AsyncFinder::new(vec!["alpha", "beta"], FinderOptions::default());
    /// let results = finder.find("bt").await?;
    /// assert_eq!(*results[0].item, "beta");
    /// # Ok(())
    /// # }
    /// ```
    pub fn find<'a>(
        &'a self,
        query: &str,
    ) -> impl Future<Output = FinderResult<Vec<ResultItem<&'a T>>>> + use<'a, T> {
        let token = self.renew_token();
        let query = query.to_owned();
        let corpus = &*self.corpus;

        async move {
            if token.is_cancelled() {
                debug!("Search cancelled before start");
                return Err(FinderError::Cancelled);
            }
            if corpus.is_trivial(&query) {
                return Ok(corpus.unscored());
            }

            let plan = corpus.plan(&query);
            let mut buckets: Buckets<'a, T> = BTreeMap::new();
            let len = corpus.len();
            let mut start = 0;
            loop {
                if token.is_cancelled() {
                    debug!(scanned = start, total = len, "Search cancelled");
                    return Err(FinderError::Cancelled);
                }

                let end = len.min(start + ASYNC_CHUNK_SIZE);
                corpus.scan(&plan, start..end, &mut buckets);
                if end == len {
                    break;
                }
                start = end;
                tokio::task::yield_now().await;
            }

            let results = corpus.collect(buckets);
            trace!(
                query_len = query.chars().count(),
                results = results.len(),
                "Async search complete"
            );
            Ok(results)
        }
    }

    /// Cancels the search in flight, if any.
    pub fn cancel(&self) {
        self.current_token().cancel();
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

    fn current_token(&self) -> CancellationToken {
        self.token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Cancels the current token and installs a fresh one.
    fn renew_token(&self) -> CancellationToken {
        let mut current = self.token.lock().unwrap_or_else(PoisonError::into_inner);
        current.cancel();
        *current = CancellationToken::new();
        current.clone()
    }
}

impl<T> Clone for AsyncFinder<T> {
    fn clone(&self) -> Self {
        Self {
            corpus: Arc::clone(&self.corpus),
            token: Arc::clone(&self.token),
        }
    }
}

impl<T> fmt::Debug for AsyncFinder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncFinder")
            .field("corpus", &self.corpus)
            .finish_non_exhaustive()
    }
}
