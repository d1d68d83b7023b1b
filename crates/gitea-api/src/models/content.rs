//! Content models.

use serde::Deserialize;

/// The kind of entry a content item represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    /// A regular file.
    File,
    /// A directory.
    Dir,
    /// A symbolic link.
    Symlink,
    /// A git submodule.
    Submodule,
}

impl ContentKind {
    /// Whether this entry is a directory.
    #[must_use]
    pub fn is_dir(self) -> bool {
        matches!(self, Self::Dir)
    }
}

/// One entry of a directory listing, or a single fetched file.
///
/// The `content` payload is only present when the item was fetched as a
/// single file; directory listings carry metadata only.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentItem {
    /// Entry name within its directory.
    pub name: String,
    /// Full path from the repository root.
    pub path: String,
    /// Object SHA.
    pub sha: String,
    /// Size in bytes (files only).
    #[serde(default)]
    pub size: u64,
    /// Entry kind.
    #[serde(rename = "type")]
    pub kind: ContentKind,
    /// Browser URL.
    #[serde(default)]
    pub html_url: String,
    /// Direct download URL (files only).
    #[serde(default)]
    pub download_url: Option<String>,
    /// Encoded payload (single-file fetches only).
    #[serde(default)]
    pub content: Option<String>,
    /// Payload encoding, e.g. `"base64"`.
    #[serde(default)]
    pub encoding: Option<String>,
    /// Link target (symlinks only).
    #[serde(default)]
    pub target: Option<String>,
}
