//! Error types for Genesite Core.

use crate::form::FieldError;
use thiserror::Error;

/// Result type alias for Genesite operations.
pub type Result<T> = std::result::Result<T, GenesiteError>;

/// Message shown to the user whenever the generation pipeline fails.
pub const GENERATION_FAILED_MESSAGE: &str =
    "Failed to generate website from AI. Please try again.";

/// Main error type for the Genesite pipeline.
#[derive(Debug, Error)]
pub enum GenesiteError {
    /// Form input rejected before the pipeline runs.
    #[error("Invalid input: {}", join_field_errors(.0))]
    Validation(Vec<FieldError>),

    /// Either pipeline step failed. The cause is kept for diagnostics only.
    #[error("Failed to generate website from AI. Please try again.")]
    Generation {
        #[source]
        source: Box<GenesiteError>,
    },

    /// AI provider returned an error.
    #[error("AI provider error: {0}")]
    ProviderError(String),

    /// Network request failed.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// A prompt template failed to compile or render.
    #[error("Prompt render error: {0}")]
    PromptRender(String),

    /// A structured reply lacked a required field.
    #[error("Model response is missing required field '{0}'")]
    MissingField(String),

    /// A structured reply did not match the expected shape.
    #[error("Model response does not match schema: {0}")]
    SchemaMismatch(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl GenesiteError {
    /// Wrap a step failure into the single user-facing generation error.
    pub fn generation(cause: GenesiteError) -> Self {
        Self::Generation {
            source: Box::new(cause),
        }
    }

    /// The underlying step failure, if this is a generation error.
    pub fn cause(&self) -> Option<&GenesiteError> {
        match self {
            Self::Generation { source } => Some(source),
            _ => None,
        }
    }

    /// Whether this error was raised at the form boundary.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

fn join_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
