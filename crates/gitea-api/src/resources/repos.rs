//! Repository resource.

use http::Method;

use crate::client::GiteaClient;
use crate::error::GiteaError;
use crate::http_client::HttpClient;
use crate::models::Repository;

/// Operations on the repositories of one owner.
pub struct ReposResource<'c, C: HttpClient> {
    client: &'c GiteaClient<C>,
    owner: String,
}

impl<'c, C: HttpClient> ReposResource<'c, C> {
    pub(crate) fn new(client: &'c GiteaClient<C>, owner: String) -> Self {
        Self { client, owner }
    }

    /// Get a single repository by name.
    pub async fn get(&self, repo: &str) -> Result<Repository, GiteaError> {
        let path = format!("/repos/{}/{repo}", self.owner);
        self.client
            .request(Method::GET, &path, &[], None::<&()>)
            .await
    }
}
