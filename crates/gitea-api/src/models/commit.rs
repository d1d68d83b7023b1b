//! Commit models.

use serde::Deserialize;

/// A git-level identity, taken from the commit object itself.
#[derive(Debug, Clone, Deserialize)]
pub struct Signature {
    /// Name as recorded in the commit.
    pub name: String,
    /// Email as recorded in the commit.
    #[serde(default)]
    pub email: String,
    /// Timestamp, RFC 3339.
    #[serde(default)]
    pub date: String,
}

/// The git commit payload.
#[derive(Debug, Clone, Deserialize)]
pub struct CommitDetail {
    /// Full commit message.
    pub message: String,
    /// Git author identity.
    pub author: Signature,
    /// Git committer identity.
    #[serde(default)]
    pub committer: Option<Signature>,
}

/// A platform account linked to a commit identity.
#[derive(Debug, Clone, Deserialize)]
pub struct UserSummary {
    /// Numeric account id.
    pub id: i64,
    /// Login name.
    pub login: String,
    /// Avatar image URL.
    #[serde(default)]
    pub avatar_url: String,
}

/// One commit of a repository's history.
#[derive(Debug, Clone, Deserialize)]
pub struct Commit {
    /// Commit SHA.
    pub sha: String,
    /// The underlying git commit.
    pub commit: CommitDetail,
    /// Platform account of the author. Absent when the git identity is not
    /// linked to an account, so display falls back to the git name.
    #[serde(default)]
    pub author: Option<UserSummary>,
    /// Platform account of the committer.
    #[serde(default)]
    pub committer: Option<UserSummary>,
    /// Browser URL.
    #[serde(default)]
    pub html_url: String,
}

impl Commit {
    /// Best display name for the author: platform login when linked,
    /// otherwise the git author name.
    #[must_use]
    pub fn author_name(&self) -> &str {
        self.author
            .as_ref()
            .map_or(self.commit.author.name.as_str(), |user| user.login.as_str())
    }

    /// First line of the commit message.
    #[must_use]
    pub fn summary(&self) -> &str {
        self.commit.message.lines().next().unwrap_or_default()
    }
}
