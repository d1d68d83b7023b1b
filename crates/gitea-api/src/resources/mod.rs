//! Resource namespaces for the Gitea API.

mod branches;
mod commits;
mod contents;
mod markdown;
mod repos;

pub use branches::BranchesResource;
pub use commits::{CommitsResource, ListCommitsParams};
pub use contents::ContentsResource;
pub use markdown::MarkdownResource;
pub use repos::ReposResource;
