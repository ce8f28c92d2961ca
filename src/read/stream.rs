use crate::error::QueryError;

use async_trait::async_trait;
use aws_sdk_dynamodb::types;
use futures::{Stream, stream};
use std::collections;
use tracing::{debug, warn};

/// Item as returned by the store, before decoding.
pub type RawItem = collections::HashMap<String, types::AttributeValue>;

/// Page-at-a-time access to query or scan results.
///
/// Each fetcher owns its own cursor; a fresh fetcher starts a fresh
/// server-side iteration.
#[async_trait]
pub trait PageFetcher {
    /// Whether another page can be requested.
    fn has_more_pages(&self) -> bool;

    /// Fetch the next page of items.
    async fn fetch_page(&mut self) -> Result<Vec<RawItem>, QueryError>;
}

/// Pagination state for store-backed fetchers.
///
/// A failed page exhausts the cursor: the start key of the page after it is
/// unknown, and asking for the same page again would be a retry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Cursor {
    exclusive_start_key: Option<RawItem>,
    pages: usize,
    exhausted: bool,
}

impl Cursor {
    /// Whether the store signalled more pages.
    pub fn has_more_pages(&self) -> bool {
        !self.exhausted
    }

    /// Start key for the next request.
    pub fn exclusive_start_key(&self) -> Option<RawItem> {
        self.exclusive_start_key.clone()
    }

    /// 1-based number of the page about to be fetched.
    pub fn next_page(&self) -> usize {
        self.pages + 1
    }

    /// Record a successful page and return its items.
    pub fn advance(
        &mut self,
        last_evaluated_key: Option<RawItem>,
        items: Option<Vec<RawItem>>,
    ) -> Vec<RawItem> {
        self.pages += 1;
        self.exhausted = last_evaluated_key.as_ref().is_none_or(|key| key.is_empty());
        self.exclusive_start_key = last_evaluated_key;
        items.unwrap_or_default()
    }

    /// Record a failed page; no further pages are requested.
    pub fn fail(&mut self) {
        self.exhausted = true;
    }
}

/// Lazy, pull-driven sequence of items over a [`PageFetcher`].
///
/// Pages are fetched only when the consumer asks for an item past the end of
/// the current page. A failed page is yielded as an error element and the
/// sequence carries on for as long as the fetcher reports more pages;
/// consumers that want to stop at the first error simply stop pulling.
#[derive(Debug)]
pub struct ItemStream<F> {
    fetcher: F,
    buffered: collections::VecDeque<RawItem>,
}

impl<F: PageFetcher + Send> ItemStream<F> {
    /// Wrap a fetcher; nothing is fetched until the first pull.
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            buffered: collections::VecDeque::new(),
        }
    }

    /// Pull the next item, fetching a page if the buffer is empty.
    pub async fn next(&mut self) -> Option<Result<RawItem, QueryError>> {
        loop {
            if let Some(item) = self.buffered.pop_front() {
                return Some(Ok(item));
            }
            if !self.fetcher.has_more_pages() {
                return None;
            }
            match self.fetcher.fetch_page().await {
                Ok(items) => {
                    debug!(items = items.len(), "fetched page");
                    self.buffered.extend(items);
                }
                Err(error) => {
                    warn!(%error, "page fetch failed");
                    return Some(Err(error));
                }
            }
        }
    }

    /// Adapt into a [`Stream`], keeping the same pull-driven behaviour.
    pub fn into_stream(self) -> impl Stream<Item = Result<RawItem, QueryError>> + Send {
        stream::unfold(self, |mut items| async move {
            items.next().await.map(|item| (item, items))
        })
    }
}
