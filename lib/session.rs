//! Session-scoped page resolution.
//!
//! A [`Session`] owns the store for one repository view and drives every
//! fetch cycle: repository metadata first (its failure is fatal), then the
//! directory listing and latest commit concurrently (each degrades the page
//! instead of failing it), then the selected file's content if the
//! navigation names one. Every resolution takes a ticket from a monotonic
//! epoch; a resolution that has been superseded by a newer one can no
//! longer write to the store, so a slow stale fetch never overwrites the
//! state of the view the user actually navigated to.

use std::sync::atomic::{AtomicU64, Ordering};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use gitea_api::HttpClient;
use gitea_api::models::{ContentItem, ContentKind};
use parking_lot::{RwLock, RwLockReadGuard};
use thiserror::Error;
use tracing::{instrument, trace, warn};

use crate::classify::{ClassifyTable, FileKind};
use crate::fetch::{ApiError, Gateway};
use crate::locator::RepoLocator;
use crate::nav::NavState;
use crate::store::{FileView, RepoStore};

/// Fatal resolution failures.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The repository itself could not be fetched. The view has nothing to
    /// show; callers render a not-found page from the carried error.
    #[error("repository unavailable: {0}")]
    NotFound(ApiError),
}

/// Non-fatal outcomes of one resolution. The page rendered, but any
/// resource named here degraded to its empty state.
#[derive(Debug, Default)]
pub struct Resolution {
    /// The listing fetch failed; the store holds an empty listing.
    pub contents_error: Option<ApiError>,
    /// The latest-commit fetch failed; the store holds no commit.
    pub commit_error: Option<ApiError>,
    /// The file content fetch failed; the store holds no file view.
    pub file_error: Option<ApiError>,
}

impl Resolution {
    /// Whether every fetch of the resolution succeeded.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.contents_error.is_none() && self.commit_error.is_none() && self.file_error.is_none()
    }
}

/// A README located in the current listing, with its body.
#[derive(Debug, Clone)]
pub struct Readme {
    /// File name as it appears in the listing.
    pub name: String,
    /// Raw text, or HTML when `rendered` is set.
    pub body: String,
    /// Whether `body` is HTML from the remote renderer. Stays unset when
    /// rendering fell back to raw text.
    pub rendered: bool,
}

/// One repository view: gateway, store and the epoch that orders writes.
pub struct Session<C: HttpClient> {
    gateway: Gateway<C>,
    locator: RepoLocator,
    classify: ClassifyTable,
    store: RwLock<RepoStore>,
    epoch: AtomicU64,
}

impl<C: HttpClient + 'static> Session<C> {
    /// Create a session for one repository.
    #[must_use]
    pub fn new(gateway: Gateway<C>, locator: RepoLocator) -> Self {
        Self {
            gateway,
            locator,
            classify: ClassifyTable::default(),
            store: RwLock::new(RepoStore::default()),
            epoch: AtomicU64::new(0),
        }
    }

    /// Replace the default classification table.
    #[must_use]
    pub fn with_classify_table(mut self, table: ClassifyTable) -> Self {
        self.classify = table;
        self
    }

    /// The repository this session views.
    #[must_use]
    pub fn locator(&self) -> &RepoLocator {
        &self.locator
    }

    /// Read access to the store for rendering.
    pub fn store(&self) -> RwLockReadGuard<'_, RepoStore> {
        self.store.read()
    }

    /// Take a ticket for a new resolution, superseding all earlier ones.
    fn begin(&self) -> u64 {
        self.epoch.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Run `write` against the store unless `ticket` has been superseded.
    fn commit<R>(&self, ticket: u64, write: impl FnOnce(&mut RepoStore) -> R) -> Option<R> {
        let mut store = self.store.write();
        if self.epoch.load(Ordering::SeqCst) == ticket {
            Some(write(&mut store))
        } else {
            trace!(ticket, "dropping store write from a superseded resolution");
            None
        }
    }

    /// Resolve a navigation state into a populated store.
    ///
    /// On success the store reflects `nav` completely: repository metadata,
    /// the sorted listing of `nav.path`, the latest commit on the resolved
    /// reference, and the selected file's content when `nav.file` is set.
    /// Listing, commit and file failures degrade the page and are reported
    /// in the returned [`Resolution`]; only a repository failure is fatal.
    #[instrument(
        skip(self, nav),
        fields(
            repo = %self.locator,
            reference = ?nav.reference,
            path = %nav.path,
            file = ?nav.file,
        )
    )]
    pub async fn resolve(&self, nav: &NavState) -> Result<Resolution, ResolveError> {
        let ticket = self.begin();
        self.commit(ticket, |store| {
            store.set_loading_page(true);
            store.set_loading_contents(true);
        });

        let owner = self.locator.owner.as_str();
        let repo = self.locator.repo.as_str();

        let repository = match self.gateway.fetch_repository(owner, repo).await {
            Ok(repository) => repository,
            Err(error) => {
                self.commit(ticket, |store| {
                    store.set_loading_page(false);
                    store.set_loading_contents(false);
                });
                return Err(ResolveError::NotFound(error));
            }
        };

        // An explicit reference wins; otherwise follow the repository's
        // default branch rather than assuming anything about its name.
        let reference = nav
            .reference
            .clone()
            .unwrap_or_else(|| repository.default_branch.clone());

        let (contents, commits) = tokio::join!(
            self.gateway
                .fetch_contents(owner, repo, &nav.path, Some(&reference)),
            self.gateway
                .fetch_commits(owner, repo, Some(1), Some(&reference)),
        );

        let mut outcome = Resolution::default();

        let listing = match contents {
            Ok(mut listing) => {
                sort_listing(&mut listing);
                listing
            }
            Err(error) => {
                warn!(%error, "directory listing unavailable, rendering without it");
                outcome.contents_error = Some(error);
                Vec::new()
            }
        };

        let latest_commit = match commits {
            Ok(mut commits) => {
                if commits.is_empty() {
                    None
                } else {
                    Some(commits.remove(0))
                }
            }
            Err(error) => {
                warn!(%error, "latest commit unavailable, rendering without it");
                outcome.commit_error = Some(error);
                None
            }
        };

        self.commit(ticket, |store| {
            store.set_repository(repository);
            store.set_contents(listing);
            store.set_latest_commit(latest_commit);
            store.set_current_ref(reference.clone());
            store.set_current_path(nav.path.clone());
            store.set_selected_file(nav.file.clone());
            store.set_loading_contents(false);
        });

        if let Some(file) = nav.file.as_deref() {
            if let Err(error) = self.load_file(ticket, file, &nav.path, &reference).await {
                outcome.file_error = Some(error);
            }
        } else {
            self.commit(ticket, |store| store.set_file(None));
        }

        self.commit(ticket, |store| store.set_loading_page(false));
        Ok(outcome)
    }

    /// Fetch, decode and classify one file's content into the store.
    async fn load_file(
        &self,
        ticket: u64,
        file: &str,
        dir: &str,
        reference: &str,
    ) -> Result<(), ApiError> {
        self.commit(ticket, |store| store.set_loading_file(true));

        let file_path = join_path(dir, file);
        let result = self
            .gateway
            .fetch_file_content(
                &self.locator.owner,
                &self.locator.repo,
                &file_path,
                Some(reference),
            )
            .await;

        match result {
            Ok(item) => {
                let view = self.file_view(file, &file_path, &item);
                self.commit(ticket, |store| {
                    store.set_file(Some(view));
                    store.set_loading_file(false);
                });
                Ok(())
            }
            Err(error) => {
                warn!(%error, "file content unavailable");
                self.commit(ticket, |store| {
                    store.set_file(None);
                    store.set_loading_file(false);
                });
                Err(error)
            }
        }
    }

    fn file_view(&self, name: &str, path: &str, item: &ContentItem) -> FileView {
        let classification = self.classify.classify(name);

        // Only text is decoded; images and binaries are linked by URL.
        let content = if classification.kind == FileKind::Text {
            item.content.as_deref().map(decode_base64_text).unwrap_or_default()
        } else {
            String::new()
        };

        FileView {
            name: name.to_owned(),
            path: path.to_owned(),
            content,
            encoding: item.encoding.clone().unwrap_or_else(|| "base64".to_owned()),
            size: item.size,
            kind: classification.kind,
            language: classification.language,
            sha: item.sha.clone(),
            html_url: item.html_url.clone(),
            download_url: item.download_url.clone(),
        }
    }

    /// Fetch the full branch set into the store.
    ///
    /// Branch names are valid for the whole repository view regardless of
    /// what the user navigates to meanwhile, so this takes no epoch ticket.
    /// On failure the store keeps an empty branch set and the error is
    /// returned for inline display.
    #[instrument(skip(self), fields(repo = %self.locator))]
    pub async fn load_branches(&self) -> Result<(), ApiError> {
        self.store.write().set_loading_branches(true);

        let result = self
            .gateway
            .fetch_branches(&self.locator.owner, &self.locator.repo)
            .await;

        let mut store = self.store.write();
        store.set_loading_branches(false);
        match result {
            Ok(branches) => {
                store.set_branches(branches);
                Ok(())
            }
            Err(error) => {
                store.set_branches(Vec::new());
                Err(error)
            }
        }
    }

    /// Locate a README in the current listing and fetch its body from the
    /// repository's default branch. With `render`, markdown bodies go
    /// through the remote renderer, falling back to raw text on failure.
    ///
    /// `Ok(None)` when the listing has no README.
    #[instrument(skip(self), fields(repo = %self.locator))]
    pub async fn load_readme(&self, render: bool) -> Result<Option<Readme>, ApiError> {
        let name = {
            let store = self.store.read();
            store
                .contents()
                .iter()
                .find(|item| item.kind == ContentKind::File && is_readme_name(&item.name))
                .map(|item| item.name.clone())
        };
        let Some(name) = name else {
            return Ok(None);
        };

        let body = self
            .gateway
            .fetch_readme(&self.locator.owner, &self.locator.repo, &name)
            .await?;

        if render && name.to_ascii_lowercase().ends_with(".md") {
            let html = self.gateway.render_markdown(&body).await;
            // The renderer falls back to returning its input unchanged, in
            // which case the body is still raw markdown.
            let rendered = html != body;
            return Ok(Some(Readme {
                name,
                body: html,
                rendered,
            }));
        }

        Ok(Some(Readme {
            name,
            body,
            rendered: false,
        }))
    }

    /// Render markdown through the gateway. Never fails; falls back to the
    /// input text.
    pub async fn render_markdown(&self, text: &str) -> String {
        self.gateway.render_markdown(text).await
    }

    /// Tear down the view state, as when leaving the repository entirely.
    /// Supersedes any resolution still in flight.
    pub fn reset(&self) {
        self.begin();
        self.store.write().reset();
    }
}

/// Order a listing for display: directories first, then files, names
/// lexicographic within each group.
pub fn sort_listing(items: &mut [ContentItem]) {
    items.sort_by(|a, b| {
        let a_dir = a.kind.is_dir();
        let b_dir = b.kind.is_dir();
        b_dir.cmp(&a_dir).then_with(|| a.name.cmp(&b.name))
    });
}

/// Join a directory path and a file name. An empty directory means the
/// repository root, where the file name stands alone.
fn join_path(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_owned()
    } else {
        format!("{dir}/{name}")
    }
}

/// Decode a base64 payload into text. The API wraps long payloads with
/// newlines, so whitespace is stripped first; undecodable bytes are
/// replaced rather than failing the whole file.
fn decode_base64_text(payload: &str) -> String {
    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    match BASE64.decode(compact.as_bytes()) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(error) => {
            warn!(%error, "file payload is not valid base64");
            String::new()
        }
    }
}

/// Case-insensitive README match: `readme.md`, `readme.txt` or `readme.rst`.
fn is_readme_name(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    matches!(lower.as_str(), "readme.md" | "readme.txt" | "readme.rst")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, kind: ContentKind) -> ContentItem {
        ContentItem {
            name: name.to_owned(),
            path: name.to_owned(),
            sha: "0000".to_owned(),
            size: 0,
            kind,
            html_url: String::new(),
            download_url: None,
            content: None,
            encoding: None,
            target: None,
        }
    }

    #[test]
    fn listings_sort_directories_before_files() {
        let mut items = vec![
            item("zeta.rs", ContentKind::File),
            item("alpha", ContentKind::Dir),
            item("beta.rs", ContentKind::File),
            item("omega", ContentKind::Dir),
        ];
        sort_listing(&mut items);
        let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "omega", "beta.rs", "zeta.rs"]);
    }

    #[test]
    fn symlinks_sort_with_files() {
        let mut items = vec![
            item("link", ContentKind::Symlink),
            item("dir", ContentKind::Dir),
        ];
        sort_listing(&mut items);
        assert_eq!(items[0].name, "dir");
    }

    #[test]
    fn file_paths_join_under_the_current_directory() {
        assert_eq!(join_path("", "README.md"), "README.md");
        assert_eq!(join_path("src/app", "main.rs"), "src/app/main.rs");
    }

    #[test]
    fn base64_payloads_decode_despite_wrapping() {
        // "hello world" wrapped the way the API wraps long payloads.
        assert_eq!(decode_base64_text("aGVsbG8g\nd29ybGQ=\n"), "hello world");
    }

    #[test]
    fn invalid_base64_decodes_to_empty() {
        assert_eq!(decode_base64_text("!!not-base64!!"), "");
    }

    #[test]
    fn readme_names_match_case_insensitively() {
        for name in ["README.md", "readme.MD", "Readme.txt", "readme.rst"] {
            assert!(is_readme_name(name), "{name}");
        }
        for name in ["README", "readme.doc", "a-readme.md", "readme.md.bak"] {
            assert!(!is_readme_name(name), "{name}");
        }
    }
}
