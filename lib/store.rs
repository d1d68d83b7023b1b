//! The client state store: the single source of truth for one repository view.

use gitea_api::models::{Branch, Commit, ContentItem, Repository};

use crate::classify::FileKind;

/// Materialized view of one selected file, ready for display.
#[derive(Debug, Clone)]
pub struct FileView {
    /// File name within the current directory.
    pub name: String,
    /// Full path from the repository root.
    pub path: String,
    /// Decoded text payload. Empty for image and binary files, which are
    /// linked by URL instead of decoded.
    pub content: String,
    /// Payload encoding reported by the API.
    pub encoding: String,
    /// Size in bytes.
    pub size: u64,
    /// Content classification.
    pub kind: FileKind,
    /// Syntax-language label derived from the file name.
    pub language: String,
    /// Object SHA.
    pub sha: String,
    /// Browser URL.
    pub html_url: String,
    /// Direct download URL.
    pub download_url: Option<String>,
}

/// Per-resource loading flags, each spanning exactly one fetch window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadingFlags {
    /// Whole-page resolution in progress.
    pub page: bool,
    /// Directory listing fetch in progress.
    pub contents: bool,
    /// File content fetch in progress.
    pub file: bool,
    /// Branch set fetch in progress.
    pub branches: bool,
}

/// Everything a repository view renders, held in one place.
///
/// Each slice is replaced wholesale through its named setter; setters are
/// the only mutation path and do no cross-slice validation. In particular
/// [`set_selected_file`](Self::set_selected_file) does not check the name
/// against the current listing — keeping the selection consistent with the
/// path and reference is the navigation layer's job, which clears it on
/// every path or branch change.
#[derive(Debug, Clone)]
pub struct RepoStore {
    repository: Option<Repository>,
    contents: Vec<ContentItem>,
    latest_commit: Option<Commit>,
    branches: Vec<Branch>,
    file: Option<FileView>,
    current_path: String,
    current_ref: String,
    selected_file: Option<String>,
    loading: LoadingFlags,
}

/// Reference shown before the repository's real default branch is known.
const INITIAL_REF: &str = "main";

impl Default for RepoStore {
    fn default() -> Self {
        Self {
            repository: None,
            contents: Vec::new(),
            latest_commit: None,
            branches: Vec::new(),
            file: None,
            current_path: String::new(),
            current_ref: INITIAL_REF.to_owned(),
            selected_file: None,
            loading: LoadingFlags::default(),
        }
    }
}

impl RepoStore {
    /// Repository metadata, once fetched.
    #[must_use]
    pub fn repository(&self) -> Option<&Repository> {
        self.repository.as_ref()
    }

    /// Listing of the current directory.
    #[must_use]
    pub fn contents(&self) -> &[ContentItem] {
        &self.contents
    }

    /// Most recent commit on the current reference, if known.
    #[must_use]
    pub fn latest_commit(&self) -> Option<&Commit> {
        self.latest_commit.as_ref()
    }

    /// Branches of the repository, once fetched.
    #[must_use]
    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    /// Content of the selected file, once fetched.
    #[must_use]
    pub fn file(&self) -> Option<&FileView> {
        self.file.as_ref()
    }

    /// Directory the view is showing.
    #[must_use]
    pub fn current_path(&self) -> &str {
        &self.current_path
    }

    /// Reference the view is showing.
    #[must_use]
    pub fn current_ref(&self) -> &str {
        &self.current_ref
    }

    /// Name of the selected file, if any.
    #[must_use]
    pub fn selected_file(&self) -> Option<&str> {
        self.selected_file.as_deref()
    }

    /// Current loading flags.
    #[must_use]
    pub fn loading(&self) -> LoadingFlags {
        self.loading
    }

    pub fn set_repository(&mut self, repository: Repository) {
        self.repository = Some(repository);
    }

    pub fn set_contents(&mut self, contents: Vec<ContentItem>) {
        self.contents = contents;
    }

    pub fn set_latest_commit(&mut self, commit: Option<Commit>) {
        self.latest_commit = commit;
    }

    pub fn set_branches(&mut self, branches: Vec<Branch>) {
        self.branches = branches;
    }

    pub fn set_file(&mut self, file: Option<FileView>) {
        self.file = file;
    }

    pub fn set_current_path(&mut self, path: String) {
        self.current_path = path;
    }

    pub fn set_current_ref(&mut self, reference: String) {
        self.current_ref = reference;
    }

    pub fn set_selected_file(&mut self, file: Option<String>) {
        self.selected_file = file;
    }

    pub fn set_loading_page(&mut self, loading: bool) {
        self.loading.page = loading;
    }

    pub fn set_loading_contents(&mut self, loading: bool) {
        self.loading.contents = loading;
    }

    pub fn set_loading_file(&mut self, loading: bool) {
        self.loading.file = loading;
    }

    pub fn set_loading_branches(&mut self, loading: bool) {
        self.loading.branches = loading;
    }

    /// Restore every slice to its initial value, as when leaving the
    /// repository entirely.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
