//! Error types for the Gitea API client.

use thiserror::Error;

/// Errors produced by [`HttpClient`](crate::HttpClient) backends.
#[derive(Debug, Error)]
pub enum HttpClientError {
    /// The request did not complete within its deadline.
    #[error("request timed out")]
    Timeout,

    /// The remote host could not be reached.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Any other backend failure.
    #[error("http client error: {0}")]
    Other(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Errors produced by API operations.
#[derive(Debug, Error)]
pub enum GiteaError {
    /// The request could not be sent or produced no response.
    #[error("transport error")]
    Transport(#[from] HttpClientError),

    /// The server answered with a non-success status.
    #[error("API returned HTTP {status}")]
    Status {
        /// The HTTP status code of the response.
        status: http::StatusCode,
        /// The raw response body, for diagnostics.
        body: String,
    },

    /// The request body could not be encoded.
    #[error("failed to encode request body")]
    Encode(#[source] serde_json::Error),

    /// The response body could not be decoded.
    #[error("failed to decode response body")]
    Decode(#[source] serde_json::Error),

    /// The request itself could not be constructed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl GiteaError {
    /// The HTTP status code the server answered with, if any.
    #[must_use]
    pub fn status(&self) -> Option<http::StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
