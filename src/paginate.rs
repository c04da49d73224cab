//! Exhaustive cursor pagination
//!
//! Turns a cursor-paginated listing endpoint into one fully materialized
//! collection:
//! - pages are requested strictly one after another
//! - items keep page-arrival order, then in-page order
//! - a failed page discards everything fetched so far
//!
//! A fresh accumulator is created for every fetch, so a [`Paginator`] can be
//! reused across invocations without results leaking between them.

use async_trait::async_trait;
use std::collections::HashSet;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, warn};

/// Pagination errors
#[derive(Debug, Error)]
pub enum PaginateError<E> {
    /// The page source failed; partial results were discarded
    #[error("Page source error: {0}")]
    Source(#[source] E),

    /// More pages were required than the configured budget allows
    #[error("Page limit exceeded: more than {limit} pages required")]
    PageLimitExceeded {
        /// Configured maximum number of pages
        limit: usize,
    },

    /// The fetch was cancelled between pages
    #[error("Fetch cancelled")]
    Cancelled,
}

/// One response from a paginated listing call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Items in the order the remote source returned them
    pub items: Vec<T>,
    /// Continuation token for the next page
    pub cursor: Option<String>,
    /// Whether the remote source reports more items after this page
    pub remaining: bool,
}

impl<T> Page<T> {
    /// Create a page
    pub fn new(items: Vec<T>, cursor: Option<String>, remaining: bool) -> Self {
        Self {
            items,
            cursor,
            remaining,
        }
    }

    /// Create a terminal page with no continuation
    pub fn last(items: Vec<T>) -> Self {
        Self::new(items, None, false)
    }

    /// Cursor to continue with, if this page asks for continuation and
    /// carries a usable token
    pub fn next_cursor(&self) -> Option<&str> {
        if !self.remaining {
            return None;
        }
        self.cursor.as_deref().filter(|cursor| !cursor.is_empty())
    }
}

/// Request parameters for a single page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Ordering key, forwarded to the remote source uninterpreted
    pub order_by: String,
    /// Cursor returned by the previous page; absent on the first call
    pub cursor: Option<String>,
}

impl PageRequest {
    /// Request for the first page
    pub fn first(order_by: impl Into<String>) -> Self {
        Self {
            order_by: order_by.into(),
            cursor: None,
        }
    }
}

/// A remote listing capability that returns one page per call
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Record type listed by this source
    type Item: Send;
    /// Failure type of a single page request
    type Error: Send;

    /// Fetch the page identified by `request`
    async fn fetch_page(&self, request: &PageRequest) -> Result<Page<Self::Item>, Self::Error>;
}

/// Fetch options
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    /// Maximum number of pages to request; `None` means unbounded
    pub max_pages: Option<usize>,
}

/// Drains a [`PageSource`] into a single ordered collection
#[derive(Debug, Clone, Default)]
pub struct Paginator {
    options: FetchOptions,
    cancel: Option<watch::Receiver<bool>>,
}

impl Paginator {
    /// Create a paginator with default options (no page budget)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a paginator with custom options
    pub fn with_options(options: FetchOptions) -> Self {
        Self {
            options,
            cancel: None,
        }
    }

    /// Bound the number of pages a single fetch may request
    pub fn max_pages(mut self, max_pages: usize) -> Self {
        self.options.max_pages = Some(max_pages);
        self
    }

    /// Abort fetches once `cancel` observes `true`
    ///
    /// The signal is checked before every page request; a page already in
    /// flight is allowed to complete.
    pub fn cancel_on(mut self, cancel: watch::Receiver<bool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Get the fetch options
    pub fn options(&self) -> &FetchOptions {
        &self.options
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().map_or(false, |cancel| *cancel.borrow())
    }

    /// Fetch every page of `source` and return all items in order
    ///
    /// Terminates when a page reports nothing remaining, or when a page asks
    /// for continuation but gives nothing new to continue with: no cursor, an
    /// empty page, or a cursor this fetch has already sent.
    pub async fn fetch_all<S>(
        &self,
        source: &S,
        order_by: &str,
    ) -> Result<Vec<S::Item>, PaginateError<S::Error>>
    where
        S: PageSource + ?Sized,
    {
        let mut items = Vec::new();
        let mut request = PageRequest::first(order_by);
        let mut pages = 0usize;
        let mut sent: HashSet<String> = HashSet::new();

        loop {
            if self.is_cancelled() {
                debug!(pages, "fetch cancelled");
                return Err(PaginateError::Cancelled);
            }
            if let Some(limit) = self.options.max_pages {
                if pages >= limit {
                    return Err(PaginateError::PageLimitExceeded { limit });
                }
            }

            let page = source
                .fetch_page(&request)
                .await
                .map_err(PaginateError::Source)?;
            pages += 1;

            debug!(
                page = pages,
                items = page.items.len(),
                remaining = page.remaining,
                total = items.len() + page.items.len(),
                "fetched page"
            );

            let next = match page.next_cursor() {
                Some(cursor) if page.items.is_empty() => {
                    warn!(page = pages, cursor, "empty page claims more items remain; stopping");
                    None
                }
                Some(cursor) if sent.contains(cursor) => {
                    warn!(page = pages, cursor, "page returned an already requested cursor; stopping");
                    None
                }
                Some(cursor) => Some(cursor.to_string()),
                None => {
                    if page.remaining {
                        warn!(page = pages, "page claims more items remain without a cursor; stopping");
                    }
                    None
                }
            };

            items.extend(page.items);

            match next {
                Some(cursor) => {
                    sent.insert(cursor.clone());
                    request.cursor = Some(cursor);
                }
                None => break,
            }
        }

        debug!(pages, total = items.len(), "pagination complete");
        Ok(items)
    }
}

/// Fetch every page of `source` with default options
pub async fn fetch_all<S>(
    source: &S,
    order_by: &str,
) -> Result<Vec<S::Item>, PaginateError<S::Error>>
where
    S: PageSource + ?Sized,
{
    Paginator::new().fetch_all(source, order_by).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, Error, PartialEq)]
    #[error("remote failure")]
    struct RemoteFailure;

    /// Serves pages keyed by the cursor that requests them
    struct ScriptedSource {
        pages: Vec<(Option<&'static str>, Page<&'static str>)>,
        failing: Option<&'static str>,
        calls: Mutex<Vec<PageRequest>>,
    }

    impl ScriptedSource {
        fn new(pages: Vec<(Option<&'static str>, Page<&'static str>)>) -> Self {
            Self {
                pages,
                failing: None,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn failing_at(mut self, cursor: &'static str) -> Self {
            self.failing = Some(cursor);
            self
        }

        fn calls(&self) -> Vec<PageRequest> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PageSource for ScriptedSource {
        type Item = &'static str;
        type Error = RemoteFailure;

        async fn fetch_page(&self, request: &PageRequest) -> Result<Page<&'static str>, RemoteFailure> {
            self.calls.lock().unwrap().push(request.clone());

            if self.failing.is_some() && request.cursor.as_deref() == self.failing {
                return Err(RemoteFailure);
            }

            self.pages
                .iter()
                .find(|(cursor, _)| *cursor == request.cursor.as_deref())
                .map(|(_, page)| page.clone())
                .ok_or(RemoteFailure)
        }
    }

    fn page(items: &[&'static str], cursor: Option<&str>, remaining: bool) -> Page<&'static str> {
        Page::new(items.to_vec(), cursor.map(str::to_string), remaining)
    }

    fn two_page_source() -> ScriptedSource {
        ScriptedSource::new(vec![
            (None, page(&["a", "b"], Some("c1"), true)),
            (Some("c1"), page(&["c"], None, false)),
        ])
    }

    #[tokio::test]
    async fn test_two_pages_concatenate_in_order() {
        let source = two_page_source();

        let items = fetch_all(&source, "created_at").await.unwrap();

        assert_eq!(items, vec!["a", "b", "c"]);
        let calls = source.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].cursor, None);
        assert_eq!(calls[1].cursor.as_deref(), Some("c1"));
        assert!(calls.iter().all(|call| call.order_by == "created_at"));
    }

    #[tokio::test]
    async fn test_single_terminal_page() {
        let source = ScriptedSource::new(vec![(None, Page::last(vec!["x", "y"]))]);

        let items = fetch_all(&source, "created_at").await.unwrap();

        assert_eq!(items, vec!["x", "y"]);
        assert_eq!(source.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_n_pages_make_n_calls() {
        const CURSORS: [&str; 5] = ["p1", "p2", "p3", "p4", "p5"];
        const ITEMS: [&str; 5] = ["i0", "i1", "i2", "i3", "i4"];

        for n in 1..=5 {
            let pages = (0..n)
                .map(|i| {
                    let requested_by = if i == 0 { None } else { Some(CURSORS[i - 1]) };
                    let remaining = i < n - 1;
                    let cursor = remaining.then(|| CURSORS[i]);
                    (requested_by, page(&[ITEMS[i]], cursor, remaining))
                })
                .collect();
            let source = ScriptedSource::new(pages);

            let items = fetch_all(&source, "created_at").await.unwrap();

            assert_eq!(items, ITEMS[..n].to_vec());
            assert_eq!(source.calls().len(), n);
        }
    }

    #[tokio::test]
    async fn test_remaining_without_cursor_terminates() {
        let source = ScriptedSource::new(vec![(None, page(&["a"], None, true))]);

        let items = fetch_all(&source, "created_at").await.unwrap();

        assert_eq!(items, vec!["a"]);
        assert_eq!(source.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_cursor_is_treated_as_absent() {
        let source = ScriptedSource::new(vec![(None, page(&["a"], Some(""), true))]);

        let items = fetch_all(&source, "created_at").await.unwrap();

        assert_eq!(items, vec!["a"]);
        assert_eq!(source.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_page_claiming_more_terminates() {
        let source = ScriptedSource::new(vec![
            (None, page(&["a"], Some("c1"), true)),
            (Some("c1"), page(&[], Some("c2"), true)),
        ]);

        let items = fetch_all(&source, "created_at").await.unwrap();

        assert_eq!(items, vec!["a"]);
        assert_eq!(source.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_repeated_cursor_terminates() {
        let source = ScriptedSource::new(vec![
            (None, page(&["a"], Some("c1"), true)),
            (Some("c1"), page(&["b"], Some("c1"), true)),
        ]);

        let items = fetch_all(&source, "created_at").await.unwrap();

        assert_eq!(items, vec!["a", "b"]);
        assert_eq!(source.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_cursor_cycle_terminates() {
        let source = ScriptedSource::new(vec![
            (None, page(&["a"], Some("c1"), true)),
            (Some("c1"), page(&["b"], Some("c2"), true)),
            (Some("c2"), page(&["c"], Some("c1"), true)),
        ]);

        let items = Paginator::new()
            .max_pages(50)
            .fetch_all(&source, "created_at")
            .await
            .unwrap();

        assert_eq!(items, vec!["a", "b", "c"]);
        let cursors: Vec<_> = source.calls().into_iter().map(|call| call.cursor).collect();
        assert_eq!(cursors, vec![None, Some("c1".to_string()), Some("c2".to_string())]);
    }

    #[tokio::test]
    async fn test_failure_discards_partial_results() {
        let source = two_page_source().failing_at("c1");

        let result = fetch_all(&source, "created_at").await;

        assert!(matches!(result, Err(PaginateError::Source(RemoteFailure))));
        assert_eq!(source.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_repeated_fetches_are_identical() {
        let source = two_page_source();
        let paginator = Paginator::new();

        let first = paginator.fetch_all(&source, "created_at").await.unwrap();
        let second = paginator.fetch_all(&source, "created_at").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(second, vec!["a", "b", "c"]);
        assert_eq!(source.calls().len(), 4);
    }

    #[tokio::test]
    async fn test_page_limit_exceeded() {
        let source = ScriptedSource::new(vec![
            (None, page(&["a"], Some("c1"), true)),
            (Some("c1"), page(&["b"], Some("c2"), true)),
            (Some("c2"), page(&["c"], None, false)),
        ]);

        let result = Paginator::new().max_pages(2).fetch_all(&source, "created_at").await;

        assert!(matches!(result, Err(PaginateError::PageLimitExceeded { limit: 2 })));
        assert_eq!(source.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_page_limit_exactly_met() {
        let source = two_page_source();

        let items = Paginator::new()
            .max_pages(2)
            .fetch_all(&source, "created_at")
            .await
            .unwrap();

        assert_eq!(items, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_cancelled_before_first_page() {
        let source = two_page_source();
        let (cancel, cancelled) = watch::channel(false);
        cancel.send(true).unwrap();

        let result = Paginator::new()
            .cancel_on(cancelled)
            .fetch_all(&source, "created_at")
            .await;

        assert!(matches!(result, Err(PaginateError::Cancelled)));
        assert!(source.calls().is_empty());
    }

    /// Flips the cancellation signal once a page has been served
    struct CancellingSource {
        inner: ScriptedSource,
        cancel: watch::Sender<bool>,
    }

    #[async_trait]
    impl PageSource for CancellingSource {
        type Item = &'static str;
        type Error = RemoteFailure;

        async fn fetch_page(&self, request: &PageRequest) -> Result<Page<&'static str>, RemoteFailure> {
            let page = self.inner.fetch_page(request).await;
            self.cancel.send_replace(true);
            page
        }
    }

    #[tokio::test]
    async fn test_cancelled_between_pages() {
        let (cancel, cancelled) = watch::channel(false);
        let source = CancellingSource {
            inner: two_page_source(),
            cancel,
        };

        let result = Paginator::new()
            .cancel_on(cancelled)
            .fetch_all(&source, "created_at")
            .await;

        assert!(matches!(result, Err(PaginateError::Cancelled)));
        assert_eq!(source.inner.calls().len(), 1);
    }
}
