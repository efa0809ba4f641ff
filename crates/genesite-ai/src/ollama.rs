//! Ollama local provider implementation.
//!
//! Supports local models through Ollama with `format: "json"`.

use crate::error::AiError;
use async_trait::async_trait;
use genesite_core::{AiProvider, GenesiteError, PromptRequest, PromptResponse, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// Model used when `OLLAMA_MODEL` is not set.
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3.1";

/// Local models can be slow.
const OLLAMA_TIMEOUT_SECS: u64 = 300;

/// Ollama provider for local generation.
#[derive(Debug, Clone)]
pub struct OllamaProvider {
    client: Client,
    model: String,
    base_url: String,
}

/// Ollama generate request.
#[derive(Debug, Serialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    system: String,
    format: &'static str,
    stream: bool,
}

/// Ollama generate response.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
    #[serde(default)]
    eval_count: Option<u32>,
}

impl OllamaProvider {
    /// Create a new Ollama provider with the given model.
    pub fn new(model: impl Into<String>) -> Result<Self> {
        Self::with_options(model, DEFAULT_OLLAMA_URL)
    }

    /// Create a provider against a custom Ollama host.
    pub fn with_options(model: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(OLLAMA_TIMEOUT_SECS))
            .build()
            .map_err(|e| GenesiteError::NetworkError(e.to_string()))?;

        Ok(Self {
            client,
            model: model.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Create from environment variables.
    ///
    /// Reads `OLLAMA_MODEL` and optionally `OLLAMA_URL`.
    pub fn from_env() -> Result<Self> {
        let model =
            std::env::var("OLLAMA_MODEL").unwrap_or_else(|_| DEFAULT_OLLAMA_MODEL.to_string());
        Self::from_env_with_model(&model)
    }

    /// Create from environment with a specific model.
    pub fn from_env_with_model(model: &str) -> Result<Self> {
        let url = std::env::var("OLLAMA_URL").unwrap_or_else(|_| DEFAULT_OLLAMA_URL.to_string());
        Self::with_options(model, url)
    }
}

#[async_trait]
impl AiProvider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    #[instrument(skip(self, request), fields(prompt = %request.name, model = %self.model))]
    async fn generate(&self, request: PromptRequest) -> Result<PromptResponse> {
        debug!("Submitting prompt to Ollama");

        let api_request = GenerateRequest {
            model: self.model.clone(),
            system: request.effective_system_prompt(),
            prompt: request.prompt,
            format: "json",
            stream: false,
        };

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&api_request)
            .send()
            .await
            .map_err(AiError::from)?;

        if !response.status().is_success() {
            return Err(AiError::from_response(response).await.into());
        }

        let gen_response: GenerateResponse = response
            .json()
            .await
            .map_err(AiError::parse)?;

        if gen_response.response.trim().is_empty() {
            return Err(AiError::EmptyResponse.into());
        }

        Ok(PromptResponse {
            text: gen_response.response,
            tokens_used: gen_response.eval_count,
        })
    }

    async fn health_check(&self) -> Result<bool> {
        let response = self
            .client
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .await
            .map_err(AiError::from)?;

        Ok(response.status().is_success())
    }
}
