//! AI-specific error types.

use thiserror::Error;

/// Errors specific to AI operations.
///
/// Request URLs are stripped from every wrapped `reqwest::Error` so the
/// message is safe to log and to show in diagnostics.
#[derive(Debug, Error)]
pub enum AiError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Response parsing failed.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// The API answered but produced no text.
    #[error("No content generated")]
    EmptyResponse,
}

impl From<reqwest::Error> for AiError {
    fn from(e: reqwest::Error) -> Self {
        AiError::HttpError(e.without_url())
    }
}

impl AiError {
    /// Build an API error from a non-success response, consuming its body.
    pub(crate) async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status().as_u16();
        let message = response.text().await.unwrap_or_default();
        AiError::ApiError { status, message }
    }

    /// A body that could not be decoded into the expected reply.
    pub(crate) fn parse(e: reqwest::Error) -> Self {
        AiError::ParseError(e.without_url().to_string())
    }
}

impl From<AiError> for genesite_core::GenesiteError {
    fn from(e: AiError) -> Self {
        match e {
            AiError::HttpError(err) => genesite_core::GenesiteError::NetworkError(err.to_string()),
            other => genesite_core::GenesiteError::ProviderError(other.to_string()),
        }
    }
}
