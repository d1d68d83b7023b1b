//! Contents resource.

use http::Method;

use crate::client::GiteaClient;
use crate::error::GiteaError;
use crate::http_client::HttpClient;
use crate::models::ContentItem;

/// Operations on the content of one repository.
pub struct ContentsResource<'c, C: HttpClient> {
    client: &'c GiteaClient<C>,
    owner: String,
    repo: String,
}

impl<'c, C: HttpClient> ContentsResource<'c, C> {
    pub(crate) fn new(client: &'c GiteaClient<C>, owner: String, repo: String) -> Self {
        Self {
            client,
            owner,
            repo,
        }
    }

    /// List a directory.
    ///
    /// - `path`: directory path within the repo; empty lists the root.
    /// - `ref_`: branch, tag or commit SHA (optional, defaults to the default
    ///   branch).
    pub async fn list(
        &self,
        path: &str,
        ref_: Option<&str>,
    ) -> Result<Vec<ContentItem>, GiteaError> {
        let url_path = self.contents_path(path);
        let mut query = Vec::new();
        if let Some(r) = ref_ {
            query.push(("ref", r));
        }
        self.client
            .request(Method::GET, &url_path, &query, None::<&()>)
            .await
    }

    /// Get a single file, including its encoded payload.
    pub async fn file(&self, path: &str, ref_: Option<&str>) -> Result<ContentItem, GiteaError> {
        let url_path = self.contents_path(path);
        let mut query = Vec::new();
        if let Some(r) = ref_ {
            query.push(("ref", r));
        }
        self.client
            .request(Method::GET, &url_path, &query, None::<&()>)
            .await
    }

    /// Get a raw file as text from the repository's default branch.
    pub async fn raw(&self, path: &str) -> Result<String, GiteaError> {
        let url_path = format!("/repos/{}/{}/raw/{path}", self.owner, self.repo);
        self.client.request_text(Method::GET, &url_path, &[]).await
    }

    fn contents_path(&self, path: &str) -> String {
        if path.is_empty() {
            format!("/repos/{}/{}/contents", self.owner, self.repo)
        } else {
            format!("/repos/{}/{}/contents/{path}", self.owner, self.repo)
        }
    }
}
