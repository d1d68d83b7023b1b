//! Commit resource.

use http::Method;

use crate::client::GiteaClient;
use crate::error::GiteaError;
use crate::http_client::HttpClient;
use crate::models::Commit;

/// Query parameters for listing commits.
#[derive(Debug, Clone, Default)]
pub struct ListCommitsParams {
    /// Maximum number of commits to return.
    pub limit: Option<u32>,
    /// Branch, tag or commit SHA to walk back from. Defaults to the default
    /// branch on the remote side.
    pub ref_: Option<String>,
}

/// Operations on the commit history of one repository.
pub struct CommitsResource<'c, C: HttpClient> {
    client: &'c GiteaClient<C>,
    owner: String,
    repo: String,
}

impl<'c, C: HttpClient> CommitsResource<'c, C> {
    pub(crate) fn new(client: &'c GiteaClient<C>, owner: String, repo: String) -> Self {
        Self {
            client,
            owner,
            repo,
        }
    }

    /// List commits, most recent first.
    pub async fn list(&self, params: &ListCommitsParams) -> Result<Vec<Commit>, GiteaError> {
        let path = format!("/repos/{}/{}/commits", self.owner, self.repo);
        let limit = params.limit.map(|l| l.to_string());
        let mut query: Vec<(&str, &str)> = Vec::new();
        if let Some(ref l) = limit {
            query.push(("limit", l));
        }
        if let Some(ref r) = params.ref_ {
            query.push(("sha", r.as_str()));
        }
        self.client
            .request(Method::GET, &path, &query, None::<&()>)
            .await
    }
}
