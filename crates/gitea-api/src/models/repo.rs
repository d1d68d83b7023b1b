//! Repository models.

use serde::Deserialize;

/// The account that owns a repository.
#[derive(Debug, Clone, Deserialize)]
pub struct Owner {
    /// Numeric account id.
    pub id: i64,
    /// Login name.
    pub login: String,
    /// Display name, often empty.
    #[serde(default)]
    pub full_name: String,
    /// Avatar image URL.
    #[serde(default)]
    pub avatar_url: String,
    /// Profile page URL.
    #[serde(default)]
    pub html_url: String,
}

/// Repository metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
    /// Numeric repository id.
    pub id: i64,
    /// Repository name.
    pub name: String,
    /// `owner/name`.
    pub full_name: String,
    /// Repository description.
    #[serde(default)]
    pub description: String,
    /// Whether the repository is private.
    #[serde(default)]
    pub private: bool,
    /// Whether the repository is a fork.
    #[serde(default)]
    pub fork: bool,
    /// Browser URL.
    #[serde(default)]
    pub html_url: String,
    /// HTTP clone URL.
    #[serde(default)]
    pub clone_url: String,
    /// SSH clone URL.
    #[serde(default)]
    pub ssh_url: String,
    /// Name of the default branch.
    pub default_branch: String,
    /// Star count.
    #[serde(default)]
    pub stars_count: i64,
    /// Watcher count.
    #[serde(default)]
    pub watchers_count: i64,
    /// Fork count.
    #[serde(default)]
    pub forks_count: i64,
    /// Open issue count.
    #[serde(default)]
    pub open_issues_count: i64,
    /// Size in kilobytes.
    #[serde(default)]
    pub size: i64,
    /// Dominant language, empty when not detected.
    #[serde(default)]
    pub language: String,
    /// Creation timestamp, RFC 3339.
    #[serde(default)]
    pub created_at: String,
    /// Last-update timestamp, RFC 3339.
    #[serde(default)]
    pub updated_at: String,
    /// Owning account.
    pub owner: Owner,
}
