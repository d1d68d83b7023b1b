//! gitscope shared library.
//!
//! The navigation and state core for browsing Gitea-compatible
//! repositories: a typed fetch gateway with per-session de-duplication, a
//! single-source-of-truth store, and pure navigation transitions over the
//! URL query encoding that ties the two together.

/// Extension-based file classification policy.
pub mod classify;
/// Remote data gateway and request de-duplication.
pub mod fetch;
/// Repository locator parsing.
pub mod locator;
/// Navigation state and URL query codec.
pub mod nav;
/// Session-scoped page resolution.
pub mod session;
/// The client state store.
pub mod store;
pub mod util;

pub use locator::RepoLocator;
pub use nav::NavState;
pub use session::{Readme, Resolution, ResolveError, Session};
pub use store::RepoStore;
