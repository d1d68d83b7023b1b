//! Data models for the Gitea API.

mod branch;
mod commit;
mod content;
mod repo;

pub use branch::{Branch, BranchCommit, CommitIdentity};
pub use commit::{Commit, CommitDetail, Signature, UserSummary};
pub use content::{ContentItem, ContentKind};
pub use repo::{Owner, Repository};
