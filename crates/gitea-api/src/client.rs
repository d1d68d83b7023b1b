//! The Gitea API client.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderMap, HeaderValue, Method};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::trace;

use crate::backends::ReqwestClient;
use crate::error::GiteaError;
use crate::http_client::{HttpClient, HttpRequest, HttpResponse};
use crate::resources::{
    BranchesResource, CommitsResource, ContentsResource, MarkdownResource, ReposResource,
};

/// Base URL of the public demo instance, used when no host is configured.
pub const DEFAULT_BASE_URL: &str = "https://demo.gitea.com/api/v1";

/// Default ceiling for content, listing and metadata requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default ceiling for markdown rendering. Tighter than the general one:
/// rendering has a safe fallback and must not stall a page.
const DEFAULT_MARKDOWN_TIMEOUT: Duration = Duration::from_secs(5);

const ACCEPT_JSON: &str = "application/json";
const ACCEPT_HTML: &str = "text/html";

/// Configuration for a [`GiteaClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the API, without a trailing slash.
    pub base_url: String,
    /// Optional access token, sent as `Authorization: token …`.
    pub token: Option<String>,
    /// Deadline for standard requests.
    pub timeout: Duration,
    /// Deadline for markdown rendering requests.
    pub markdown_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            token: None,
            timeout: DEFAULT_TIMEOUT,
            markdown_timeout: DEFAULT_MARKDOWN_TIMEOUT,
        }
    }
}

/// Builder for a [`Gitea`] client over the default reqwest backend.
#[derive(Debug, Default)]
pub struct ClientBuilder {
    config: ClientConfig,
}

impl ClientBuilder {
    /// Override the API base URL.
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    /// Set the access token.
    #[must_use]
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.config.token = Some(token.into());
        self
    }

    /// Override the standard and markdown request deadlines.
    #[must_use]
    pub fn timeouts(mut self, request: Duration, markdown: Duration) -> Self {
        self.config.timeout = request;
        self.config.markdown_timeout = markdown;
        self
    }

    /// Build the client.
    #[must_use]
    pub fn build(self) -> Gitea {
        GiteaClient::with_http_client(ReqwestClient::new(), self.config)
    }
}

/// A [`GiteaClient`] over the default reqwest backend.
pub type Gitea = GiteaClient<ReqwestClient>;

/// A client for one Gitea-compatible API host.
///
/// Cheap to clone; clones share the underlying HTTP client and configuration.
pub struct GiteaClient<C: HttpClient> {
    pub(crate) inner: Arc<ClientInner<C>>,
}

impl<C: HttpClient> Clone for GiteaClient<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Gitea {
    /// Start building a client. Defaults target the public demo instance.
    #[must_use]
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }
}

impl<C: HttpClient> GiteaClient<C> {
    /// Create a client over a custom [`HttpClient`] backend.
    pub fn with_http_client(http: C, config: ClientConfig) -> Self {
        Self {
            inner: Arc::new(ClientInner { http, config }),
        }
    }

    /// Operations on the repositories of `owner`.
    pub fn repos(&self, owner: &str) -> ReposResource<'_, C> {
        ReposResource::new(self, owner.to_owned())
    }

    /// Operations on the content of one repository.
    pub fn contents(&self, owner: &str, repo: &str) -> ContentsResource<'_, C> {
        ContentsResource::new(self, owner.to_owned(), repo.to_owned())
    }

    /// Operations on the branches of one repository.
    pub fn branches(&self, owner: &str, repo: &str) -> BranchesResource<'_, C> {
        BranchesResource::new(self, owner.to_owned(), repo.to_owned())
    }

    /// Operations on the commit history of one repository.
    pub fn commits(&self, owner: &str, repo: &str) -> CommitsResource<'_, C> {
        CommitsResource::new(self, owner.to_owned(), repo.to_owned())
    }

    /// Server-side markdown rendering.
    pub fn markdown(&self) -> MarkdownResource<'_, C> {
        MarkdownResource::new(self)
    }

    /// Send a JSON request and decode a JSON response.
    pub(crate) async fn request<T, B>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&B>,
    ) -> Result<T, GiteaError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = encode_body(body)?;
        self.inner.request(method, path, query, body).await
    }

    /// Send a request and return the response body as text.
    pub(crate) async fn request_text(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<String, GiteaError> {
        let timeout = self.inner.config.timeout;
        self.inner
            .request_text(method, path, query, None, ACCEPT_JSON, timeout)
            .await
    }

    /// Send a JSON request and return the response body as HTML text, under
    /// the markdown deadline.
    pub(crate) async fn request_html<B>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<String, GiteaError>
    where
        B: Serialize + ?Sized,
    {
        let body = encode_body(Some(body))?;
        let timeout = self.inner.config.markdown_timeout;
        self.inner
            .request_text(method, path, &[], body, ACCEPT_HTML, timeout)
            .await
    }
}

fn encode_body<B>(body: Option<&B>) -> Result<Option<Bytes>, GiteaError>
where
    B: Serialize + ?Sized,
{
    match body {
        Some(body) => {
            let encoded = serde_json::to_vec(body).map_err(GiteaError::Encode)?;
            Ok(Some(Bytes::from(encoded)))
        }
        None => Ok(None),
    }
}

/// Shared state behind a [`GiteaClient`].
pub(crate) struct ClientInner<C: HttpClient> {
    http: C,
    config: ClientConfig,
}

impl<C: HttpClient> ClientInner<C> {
    /// Send a request under the standard deadline and decode the JSON body.
    pub(crate) async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<Bytes>,
    ) -> Result<T, GiteaError> {
        let timeout = self.config.timeout;
        let response = self
            .send(method, path, query, body, ACCEPT_JSON, timeout)
            .await?;
        serde_json::from_slice(&response.body).map_err(GiteaError::Decode)
    }

    /// Send a request and return the body as text, replacing invalid UTF-8.
    async fn request_text(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<Bytes>,
        accept: &str,
        timeout: Duration,
    ) -> Result<String, GiteaError> {
        let response = self.send(method, path, query, body, accept, timeout).await?;
        Ok(String::from_utf8_lossy(&response.body).into_owned())
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<Bytes>,
        accept: &str,
        timeout: Duration,
    ) -> Result<HttpResponse, GiteaError> {
        let url = self.endpoint(path, query)?;
        trace!(%method, %url, "sending API request");

        let request = HttpRequest {
            method,
            url,
            headers: self.base_headers(accept)?,
            body,
            timeout: Some(timeout),
        };

        let response = self.http.send(request).await?;
        trace!(status = %response.status, "API response received");

        if !response.is_success() {
            return Err(GiteaError::Status {
                status: response.status,
                body: String::from_utf8_lossy(&response.body).into_owned(),
            });
        }

        Ok(response)
    }

    /// Build the full request URL. `path` segments are percent-encoded
    /// individually, so repository paths with spaces or unicode survive.
    fn endpoint(&self, path: &str, query: &[(&str, &str)]) -> Result<String, GiteaError> {
        let mut url = url::Url::parse(&self.config.base_url)
            .map_err(|err| GiteaError::InvalidRequest(format!("bad base URL: {err}")))?;

        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| GiteaError::InvalidRequest("base URL cannot be a base".to_owned()))?;
            segments.pop_if_empty();
            for segment in path.split('/').filter(|s| !s.is_empty()) {
                segments.push(segment);
            }
        }

        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }

        Ok(url.into())
    }

    fn base_headers(&self, accept: &str) -> Result<HeaderMap, GiteaError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(ACCEPT_JSON));

        let accept = HeaderValue::from_str(accept)
            .map_err(|err| GiteaError::InvalidRequest(format!("bad accept header: {err}")))?;
        headers.insert(ACCEPT, accept);

        if let Some(token) = &self.config.token {
            let value = HeaderValue::from_str(&format!("token {token}"))
                .map_err(|err| GiteaError::InvalidRequest(format!("bad token: {err}")))?;
            headers.insert(AUTHORIZATION, value);
        }

        Ok(headers)
    }
}
