//! The remote data gateway.
//!
//! Translates navigation intents into API requests and normalizes every
//! failure into an [`ApiError`] before it reaches state code, so callers
//! never see transport-level error types. Each operation memoizes its
//! outcomes per input tuple through a [`FetchCache`], which also collapses
//! concurrent identical requests onto one wire call. Markdown rendering is
//! the exception on both counts: it never fails and is never cached.

use gitea_api::models::{Branch, Commit, ContentItem, Repository};
use gitea_api::{GiteaClient, HttpClient, ListCommitsParams};
use thiserror::Error;
use tracing::{instrument, warn};

use crate::fetch::dedup::FetchCache;

const MSG_REPOSITORY: &str = "Failed to fetch repository";
const MSG_CONTENTS: &str = "Failed to fetch repository contents";
const MSG_FILE: &str = "Failed to fetch file content";
const MSG_README: &str = "Failed to fetch repository README";
const MSG_BRANCHES: &str = "Failed to fetch repository branches";
const MSG_COMMITS: &str = "Failed to fetch repository commits";

/// A normalized fetch failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} ({code})")]
pub struct ApiError {
    /// HTTP status code, or 500 when the failure produced none.
    pub code: u16,
    /// Human-readable summary: the status line's reason when the server
    /// answered, otherwise the operation's default message.
    pub message: String,
    /// Raw diagnostic detail, not meant for display.
    pub details: Option<String>,
}

impl ApiError {
    fn normalize(error: gitea_api::GiteaError, default_message: &str) -> Self {
        match error {
            gitea_api::GiteaError::Status { status, body } => Self {
                code: status.as_u16(),
                message: status
                    .canonical_reason()
                    .unwrap_or(default_message)
                    .to_owned(),
                details: (!body.is_empty()).then_some(body),
            },
            other => Self {
                code: 500,
                message: default_message.to_owned(),
                details: Some(detail_chain(&other)),
            },
        }
    }
}

/// Flatten an error and its sources into one diagnostic string.
fn detail_chain(error: &dyn std::error::Error) -> String {
    let mut out = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}

/// Result alias for gateway operations.
pub type FetchResult<T> = Result<T, ApiError>;

/// Cache key for listing and file fetches: owner, repo, path, ref.
type ContentKey = (String, String, String, Option<String>);

/// Cache key for commit fetches: owner, repo, ref, limit.
type CommitsKey = (String, String, Option<String>, Option<u32>);

/// Cache key for README fetches: owner, repo, file name.
type ReadmeKey = (String, String, String);

/// Typed fetch surface over one API host.
pub struct Gateway<C: HttpClient> {
    client: GiteaClient<C>,
    repos: FetchCache<(String, String), FetchResult<Repository>>,
    listings: FetchCache<ContentKey, FetchResult<Vec<ContentItem>>>,
    files: FetchCache<ContentKey, FetchResult<ContentItem>>,
    readmes: FetchCache<ReadmeKey, FetchResult<String>>,
    branches: FetchCache<(String, String), FetchResult<Vec<Branch>>>,
    commits: FetchCache<CommitsKey, FetchResult<Vec<Commit>>>,
}

impl<C: HttpClient + 'static> Gateway<C> {
    /// Create a gateway over `client`.
    #[must_use]
    pub fn new(client: GiteaClient<C>) -> Self {
        Self {
            client,
            repos: FetchCache::new(),
            listings: FetchCache::new(),
            files: FetchCache::new(),
            readmes: FetchCache::new(),
            branches: FetchCache::new(),
            commits: FetchCache::new(),
        }
    }

    /// Repository metadata.
    #[instrument(skip(self))]
    pub async fn fetch_repository(&self, owner: &str, repo: &str) -> FetchResult<Repository> {
        let key = (owner.to_owned(), repo.to_owned());
        let client = self.client.clone();
        self.repos
            .get_or_fetch(key.clone(), move || async move {
                client
                    .repos(&key.0)
                    .get(&key.1)
                    .await
                    .map_err(|e| ApiError::normalize(e, MSG_REPOSITORY))
            })
            .await
    }

    /// Listing of one directory. `path` empty means the repository root;
    /// `reference` `None` means the repository's default branch.
    #[instrument(skip(self))]
    pub async fn fetch_contents(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        reference: Option<&str>,
    ) -> FetchResult<Vec<ContentItem>> {
        let key = content_key(owner, repo, path, reference);
        let client = self.client.clone();
        self.listings
            .get_or_fetch(key.clone(), move || async move {
                client
                    .contents(&key.0, &key.1)
                    .list(&key.2, key.3.as_deref())
                    .await
                    .map_err(|e| ApiError::normalize(e, MSG_CONTENTS))
            })
            .await
    }

    /// A single file with its encoded payload.
    #[instrument(skip(self))]
    pub async fn fetch_file_content(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        reference: Option<&str>,
    ) -> FetchResult<ContentItem> {
        let key = content_key(owner, repo, path, reference);
        let client = self.client.clone();
        self.files
            .get_or_fetch(key.clone(), move || async move {
                client
                    .contents(&key.0, &key.1)
                    .file(&key.2, key.3.as_deref())
                    .await
                    .map_err(|e| ApiError::normalize(e, MSG_FILE))
            })
            .await
    }

    /// The raw text of a README file, from the repository's default branch.
    #[instrument(skip(self))]
    pub async fn fetch_readme(&self, owner: &str, repo: &str, name: &str) -> FetchResult<String> {
        let key = (owner.to_owned(), repo.to_owned(), name.to_owned());
        let client = self.client.clone();
        self.readmes
            .get_or_fetch(key.clone(), move || async move {
                client
                    .contents(&key.0, &key.1)
                    .raw(&key.2)
                    .await
                    .map_err(|e| ApiError::normalize(e, MSG_README))
            })
            .await
    }

    /// The full branch set, walking every page.
    #[instrument(skip(self))]
    pub async fn fetch_branches(&self, owner: &str, repo: &str) -> FetchResult<Vec<Branch>> {
        let key = (owner.to_owned(), repo.to_owned());
        let client = self.client.clone();
        self.branches
            .get_or_fetch(key.clone(), move || async move {
                client
                    .branches(&key.0, &key.1)
                    .list_all()
                    .collect()
                    .await
                    .map_err(|e| ApiError::normalize(e, MSG_BRANCHES))
            })
            .await
    }

    /// Commit history, most recent first.
    #[instrument(skip(self))]
    pub async fn fetch_commits(
        &self,
        owner: &str,
        repo: &str,
        limit: Option<u32>,
        reference: Option<&str>,
    ) -> FetchResult<Vec<Commit>> {
        let key = (
            owner.to_owned(),
            repo.to_owned(),
            reference.map(ToOwned::to_owned),
            limit,
        );
        let client = self.client.clone();
        self.commits
            .get_or_fetch(key.clone(), move || async move {
                let params = ListCommitsParams {
                    limit: key.3,
                    ref_: key.2.clone(),
                };
                client
                    .commits(&key.0, &key.1)
                    .list(&params)
                    .await
                    .map_err(|e| ApiError::normalize(e, MSG_COMMITS))
            })
            .await
    }

    /// Render markdown to HTML through the remote endpoint.
    ///
    /// Best-effort: on any failure the input text comes back unchanged so
    /// the caller can fall back to showing raw markdown. Not cached.
    #[instrument(skip_all)]
    pub async fn render_markdown(&self, text: &str) -> String {
        match self.client.markdown().render(text).await {
            Ok(html) => html,
            Err(error) => {
                warn!(%error, "markdown rendering unavailable, falling back to raw text");
                text.to_owned()
            }
        }
    }
}

fn content_key(owner: &str, repo: &str, path: &str, reference: Option<&str>) -> ContentKey {
    (
        owner.to_owned(),
        repo.to_owned(),
        path.to_owned(),
        reference.map(ToOwned::to_owned),
    )
}
