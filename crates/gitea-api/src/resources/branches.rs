//! Branch resource.

use std::sync::Arc;

use http::Method;

use crate::client::GiteaClient;
use crate::error::GiteaError;
use crate::http_client::HttpClient;
use crate::models::Branch;
use crate::pagination::{PageParams, PageStream};

/// Operations on the branches of one repository.
pub struct BranchesResource<'c, C: HttpClient> {
    client: &'c GiteaClient<C>,
    owner: String,
    repo: String,
}

impl<'c, C: HttpClient> BranchesResource<'c, C> {
    pub(crate) fn new(client: &'c GiteaClient<C>, owner: String, repo: String) -> Self {
        Self {
            client,
            owner,
            repo,
        }
    }

    /// List one page of branches.
    pub async fn list(&self, params: &PageParams) -> Result<Vec<Branch>, GiteaError> {
        let path = format!("/repos/{}/{}/branches", self.owner, self.repo);
        let page = params.page.map(|p| p.to_string());
        let limit = params.limit.map(|l| l.to_string());
        let mut query: Vec<(&str, &str)> = Vec::new();
        if let Some(ref p) = page {
            query.push(("page", p));
        }
        if let Some(ref l) = limit {
            query.push(("limit", l));
        }
        self.client
            .request(Method::GET, &path, &query, None::<&()>)
            .await
    }

    /// Return a [`PageStream`] that iterates over all branches.
    #[must_use]
    pub fn list_all(&self) -> PageStream<C, Branch> {
        let path = format!("/repos/{}/{}/branches", self.owner, self.repo);
        PageStream::new(Arc::clone(&self.client.inner), path, Vec::new())
    }
}
