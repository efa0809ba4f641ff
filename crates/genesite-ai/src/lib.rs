//! # Genesite AI
//!
//! Model backends for the genesite pipeline. Every provider asks its API
//! for a JSON reply and hands the raw text back to core for schema checks.
//!
//! - **Gemini**: the default backend
//! - **OpenAI**: chat completions, or any compatible endpoint
//! - **Anthropic**: Claude models
//! - **Ollama**: local models
//!
//! ## Example
//!
//! ```rust,ignore
//! use genesite_core::SitePipeline;
//!
//! // One-line initialization from environment
//! let provider = genesite_ai::gemini("gemini-2.0-flash")?;
//! let site = SitePipeline::new(provider).generate(&request).await?;
//! ```

pub mod anthropic;
pub mod error;
pub mod gemini;
pub mod ollama;
pub mod openai;

pub use anthropic::AnthropicProvider;
pub use error::AiError;
pub use gemini::GeminiProvider;
pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;

/// Re-export core types for convenience.
pub use genesite_core::{AiProvider, GenesiteError, ProviderConfig, ProviderKind, Result};

use tracing::info;

/// Create a Google Gemini provider with a single line.
///
/// ```rust,ignore
/// let provider = genesite_ai::gemini("gemini-2.0-flash")?;
/// ```
pub fn gemini(model: &str) -> Result<GeminiProvider> {
    GeminiProvider::from_env_with_model(model)
}

/// Create an OpenAI provider with a single line.
pub fn openai(model: &str) -> Result<OpenAiProvider> {
    OpenAiProvider::from_env_with_model(model)
}

/// Create an Anthropic provider with a single line.
pub fn anthropic(model: &str) -> Result<AnthropicProvider> {
    AnthropicProvider::from_env_with_model(model)
}

/// Create an Ollama provider with a single line.
pub fn ollama(model: &str) -> Result<OllamaProvider> {
    OllamaProvider::from_env_with_model(model)
}

/// Build the provider selected at runtime.
///
/// Without an explicit model each backend falls back to its own
/// environment variable and then its built-in default.
pub fn from_kind(kind: ProviderKind, model: Option<&str>) -> Result<Box<dyn AiProvider>> {
    let provider: Box<dyn AiProvider> = match (kind, model) {
        (ProviderKind::Gemini, Some(m)) => Box::new(gemini(m)?),
        (ProviderKind::Gemini, None) => Box::new(GeminiProvider::from_env()?),
        (ProviderKind::OpenAi, Some(m)) => Box::new(openai(m)?),
        (ProviderKind::OpenAi, None) => Box::new(OpenAiProvider::from_env()?),
        (ProviderKind::Anthropic, Some(m)) => Box::new(anthropic(m)?),
        (ProviderKind::Anthropic, None) => Box::new(AnthropicProvider::from_env()?),
        (ProviderKind::Ollama, Some(m)) => Box::new(ollama(m)?),
        (ProviderKind::Ollama, None) => Box::new(OllamaProvider::from_env()?),
    };

    info!(provider = provider.name(), "AI provider ready");
    Ok(provider)
}
