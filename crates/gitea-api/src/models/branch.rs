//! Branch models.

use serde::Deserialize;

/// Identity attached to a branch head commit.
#[derive(Debug, Clone, Deserialize)]
pub struct CommitIdentity {
    /// Git author or committer name.
    pub name: String,
    /// Email address.
    #[serde(default)]
    pub email: String,
    /// Platform login, empty when the identity has no account.
    #[serde(default)]
    pub username: String,
}

/// Head commit descriptor of a branch.
#[derive(Debug, Clone, Deserialize)]
pub struct BranchCommit {
    /// Commit SHA.
    pub id: String,
    /// Commit message.
    #[serde(default)]
    pub message: String,
    /// API URL of the commit.
    #[serde(default)]
    pub url: String,
    /// Author identity.
    #[serde(default)]
    pub author: Option<CommitIdentity>,
    /// Committer identity.
    #[serde(default)]
    pub committer: Option<CommitIdentity>,
    /// Commit timestamp, RFC 3339.
    #[serde(default)]
    pub timestamp: String,
}

/// A branch and its head commit.
#[derive(Debug, Clone, Deserialize)]
pub struct Branch {
    /// Branch name.
    pub name: String,
    /// Head commit.
    pub commit: BranchCommit,
    /// Whether the branch is protected.
    #[serde(default)]
    pub protected: bool,
}
