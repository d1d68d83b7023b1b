//! Page-number pagination support.

use std::collections::VecDeque;
use std::sync::Arc;

use http::Method;
use serde::de::DeserializeOwned;

use crate::client::ClientInner;
use crate::error::GiteaError;
use crate::http_client::HttpClient;

/// Query parameters for endpoints that paginate by page number.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageParams {
    /// 1-based page number.
    pub page: Option<u32>,
    /// Maximum number of results per page.
    pub limit: Option<u32>,
}

/// Page size [`PageStream`] requests when walking every page.
const STREAM_PAGE_LIMIT: u32 = 50;

/// An async page stream that lazily fetches pages from a paginated endpoint.
///
/// Owns all its state (via `Arc`) so there are no lifetime parameters. The
/// API does not echo a total count, so a page shorter than the requested
/// limit is what ends the stream.
pub struct PageStream<C: HttpClient, T> {
    inner: Arc<ClientInner<C>>,
    path: String,
    extra_query: Vec<(String, String)>,
    next_page: u32,
    buffer: VecDeque<T>,
    done: bool,
}

impl<C: HttpClient, T: DeserializeOwned> PageStream<C, T> {
    /// Create a new page stream.
    pub(crate) fn new(
        inner: Arc<ClientInner<C>>,
        path: String,
        extra_query: Vec<(String, String)>,
    ) -> Self {
        Self {
            inner,
            path,
            extra_query,
            next_page: 1,
            buffer: VecDeque::new(),
            done: false,
        }
    }

    /// Fetch the next individual item, requesting new pages as needed.
    ///
    /// Returns `Ok(None)` when all pages have been exhausted.
    pub async fn next(&mut self) -> Result<Option<T>, GiteaError> {
        if let Some(item) = self.buffer.pop_front() {
            return Ok(Some(item));
        }

        if self.done {
            return Ok(None);
        }

        let page = self.fetch_page().await?;
        self.done = (page.len() as u32) < STREAM_PAGE_LIMIT;
        self.next_page += 1;
        self.buffer = VecDeque::from(page);
        Ok(self.buffer.pop_front())
    }

    /// Collect all remaining items into a `Vec`.
    pub async fn collect(mut self) -> Result<Vec<T>, GiteaError> {
        let mut all = Vec::new();
        while let Some(item) = self.next().await? {
            all.push(item);
        }
        Ok(all)
    }

    /// Internal: fetch a single page from the API.
    async fn fetch_page(&self) -> Result<Vec<T>, GiteaError> {
        let page = self.next_page.to_string();
        let limit = STREAM_PAGE_LIMIT.to_string();

        let mut query: Vec<(&str, &str)> = self
            .extra_query
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        query.push(("page", &page));
        query.push(("limit", &limit));

        self.inner
            .request(Method::GET, &self.path, &query, None)
            .await
    }
}
