//! Rust client for the Gitea REST API, scoped to repository browsing.

mod backends;
mod client;
pub mod error;
mod http_client;
pub mod models;
mod pagination;
mod resources;

pub use backends::ReqwestClient;
pub use client::{ClientBuilder, ClientConfig, DEFAULT_BASE_URL, Gitea, GiteaClient};
pub use error::{GiteaError, HttpClientError};
pub use http_client::{HttpClient, HttpRequest, HttpResponse};
pub use pagination::{PageParams, PageStream};
pub use resources::{
    BranchesResource, CommitsResource, ContentsResource, ListCommitsParams, MarkdownResource,
    ReposResource,
};
