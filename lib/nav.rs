//! Navigation state and its URL query representation.
//!
//! The query string is the durable encoding of where the user is inside a
//! repository: `ref` holds the branch or tag, `path` the directory, `file`
//! the selected file within that directory. [`NavState`] is the in-memory
//! form of the same thing. Transitions are pure: each returns the successor
//! state, and the caller rewrites the whole query string in one step, so no
//! observer ever sees a half-applied combination such as a stale file
//! selection against a new path.

use url::form_urlencoded;

const PARAM_REF: &str = "ref";
const PARAM_PATH: &str = "path";
const PARAM_FILE: &str = "file";

/// Where the user is inside a repository view.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NavState {
    /// Branch or tag; `None` means the repository's default branch.
    pub reference: Option<String>,
    /// Slash-delimited directory path relative to the repository root.
    /// Empty means the root.
    pub path: String,
    /// Selected file within `path`, if any.
    pub file: Option<String>,
}

impl NavState {
    /// Parse a query string, with or without its leading `?`.
    ///
    /// Missing fields take their defaults. An empty value counts as missing,
    /// matching how [`to_query`](Self::to_query) omits default fields.
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut state = Self::default();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            if value.is_empty() {
                continue;
            }
            match key.as_ref() {
                PARAM_REF => state.reference = Some(value.into_owned()),
                PARAM_PATH => state.path = value.into_owned(),
                PARAM_FILE => state.file = Some(value.into_owned()),
                _ => {}
            }
        }
        state
    }

    /// Encode as a query string, without a leading `?`.
    ///
    /// Fields at their defaults are omitted, so parsing the result yields a
    /// state equal to `self`.
    #[must_use]
    pub fn to_query(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        if let Some(reference) = self.reference.as_deref() {
            serializer.append_pair(PARAM_REF, reference);
        }
        if !self.path.is_empty() {
            serializer.append_pair(PARAM_PATH, &self.path);
        }
        if let Some(file) = self.file.as_deref() {
            serializer.append_pair(PARAM_FILE, file);
        }
        serializer.finish()
    }

    /// Enter a directory. Any open file is deselected; the reference is kept.
    #[must_use]
    pub fn navigate_to_path(&self, path: impl Into<String>) -> Self {
        Self {
            reference: self.reference.clone(),
            path: path.into(),
            file: None,
        }
    }

    /// Select a file within the current directory, or clear the selection.
    /// The path and reference are kept.
    #[must_use]
    pub fn select_file(&self, file: Option<String>) -> Self {
        Self {
            reference: self.reference.clone(),
            path: self.path.clone(),
            file: file.filter(|f| !f.is_empty()),
        }
    }

    /// Switch to another branch or tag. Any open file is deselected. The
    /// path is kept even though it may not exist on the new reference; the
    /// next resolution reports that as it would any missing directory.
    #[must_use]
    pub fn switch_branch(&self, reference: impl Into<String>) -> Self {
        Self {
            reference: Some(reference.into()),
            path: self.path.clone(),
            file: None,
        }
    }

    /// Move one directory up. At the root this is the identity and the file
    /// selection survives.
    #[must_use]
    pub fn navigate_to_parent(&self) -> Self {
        let segments = self.segments();
        if segments.is_empty() {
            return self.clone();
        }
        self.navigate_to_path(segments[..segments.len() - 1].join("/"))
    }

    /// Return to the repository root.
    #[must_use]
    pub fn navigate_to_root(&self) -> Self {
        self.navigate_to_path("")
    }

    /// The path split into breadcrumb segments. Empty segments from leading,
    /// trailing or doubled slashes are discarded.
    #[must_use]
    pub fn segments(&self) -> Vec<&str> {
        path_segments(&self.path)
    }

    /// The path formed by the first `index + 1` segments: the target of a
    /// breadcrumb click on segment `index`.
    #[must_use]
    pub fn path_to_segment(&self, index: usize) -> String {
        let segments = self.segments();
        let end = index.saturating_add(1).min(segments.len());
        segments[..end].join("/")
    }
}

/// Split a directory path into its non-empty segments.
#[must_use]
pub fn path_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(reference: Option<&str>, path: &str, file: Option<&str>) -> NavState {
        NavState {
            reference: reference.map(ToOwned::to_owned),
            path: path.to_owned(),
            file: file.map(ToOwned::to_owned),
        }
    }

    #[test]
    fn empty_query_parses_to_defaults() {
        let nav = NavState::from_query("");
        assert_eq!(nav.reference, None);
        assert_eq!(nav.path, "");
        assert_eq!(nav.file, None);
    }

    #[test]
    fn empty_values_count_as_missing() {
        let nav = NavState::from_query("?ref=&path=&file=");
        assert_eq!(nav, NavState::default());
    }

    #[test]
    fn unknown_params_are_ignored() {
        let nav = NavState::from_query("ref=dev&tab=issues");
        assert_eq!(nav, state(Some("dev"), "", None));
    }

    #[test]
    fn query_round_trips() {
        let nav = state(Some("feature/x"), "src/app", Some("main.rs"));
        assert_eq!(NavState::from_query(&nav.to_query()), nav);
    }

    #[test]
    fn default_state_encodes_to_empty_query() {
        assert_eq!(NavState::default().to_query(), "");
    }

    #[test]
    fn query_escapes_reserved_characters() {
        let nav = state(None, "dir with space", Some("a&b.txt"));
        let query = nav.to_query();
        assert!(!query.contains(' '), "space must be escaped: {query}");
        assert_eq!(NavState::from_query(&query), nav);
    }

    #[test]
    fn navigate_to_path_clears_file() {
        let nav = state(Some("dev"), "src", Some("lib.rs"));
        let next = nav.navigate_to_path("src/app");
        assert_eq!(next, state(Some("dev"), "src/app", None));
    }

    #[test]
    fn switch_branch_keeps_path_and_clears_file() {
        let nav = state(Some("main"), "docs", Some("README.md"));
        let next = nav.switch_branch("dev");
        assert_eq!(next, state(Some("dev"), "docs", None));
    }

    #[test]
    fn select_file_keeps_path_and_reference() {
        let nav = state(Some("main"), "docs", None);
        let next = nav.select_file(Some("guide.md".to_owned()));
        assert_eq!(next, state(Some("main"), "docs", Some("guide.md")));
    }

    #[test]
    fn select_empty_file_clears_selection() {
        let nav = state(None, "docs", Some("guide.md"));
        assert_eq!(nav.select_file(Some(String::new())).file, None);
        assert_eq!(nav.select_file(None).file, None);
    }

    #[test]
    fn parent_drops_the_last_segment() {
        let nav = state(None, "a/b/c", None);
        assert_eq!(nav.navigate_to_parent().path, "a/b");
    }

    #[test]
    fn parent_at_root_is_identity() {
        let nav = state(Some("dev"), "", Some("README.md"));
        assert_eq!(nav.navigate_to_parent(), nav);
    }

    #[test]
    fn parent_of_single_segment_is_root() {
        let nav = state(None, "src", None);
        assert_eq!(nav.navigate_to_parent().path, "");
    }

    #[test]
    fn navigate_to_root_clears_path_and_file() {
        let nav = state(Some("dev"), "a/b", Some("x.rs"));
        let next = nav.navigate_to_root();
        assert_eq!(next, state(Some("dev"), "", None));
    }

    #[test]
    fn segments_discard_empty_pieces() {
        let nav = state(None, "a//b/", None);
        assert_eq!(nav.segments(), vec!["a", "b"]);
    }

    #[test]
    fn path_to_segment_builds_breadcrumb_targets() {
        let nav = state(None, "a/b/c", None);
        assert_eq!(nav.path_to_segment(0), "a");
        assert_eq!(nav.path_to_segment(1), "a/b");
        assert_eq!(nav.path_to_segment(2), "a/b/c");
        assert_eq!(nav.path_to_segment(9), "a/b/c");
    }
}
