//! Markdown rendering resource.

use http::Method;
use serde::Serialize;

use crate::client::GiteaClient;
use crate::error::GiteaError;
use crate::http_client::HttpClient;

/// Request body for the markdown endpoint. Field names follow the wire
/// format, which capitalizes them.
#[derive(Debug, Serialize)]
struct RenderRequest<'a> {
    #[serde(rename = "Text")]
    text: &'a str,
    #[serde(rename = "Mode")]
    mode: &'a str,
    #[serde(rename = "Context")]
    context: &'a str,
}

/// Server-side markdown rendering.
pub struct MarkdownResource<'c, C: HttpClient> {
    client: &'c GiteaClient<C>,
}

impl<'c, C: HttpClient> MarkdownResource<'c, C> {
    pub(crate) fn new(client: &'c GiteaClient<C>) -> Self {
        Self { client }
    }

    /// Render `text` as GitHub-flavored markdown, returning HTML.
    ///
    /// Runs under the markdown deadline, which is tighter than the standard
    /// one.
    pub async fn render(&self, text: &str) -> Result<String, GiteaError> {
        let body = RenderRequest {
            text,
            mode: "gfm",
            context: "",
        };
        self.client
            .request_html(Method::POST, "/markdown", &body)
            .await
    }
}
