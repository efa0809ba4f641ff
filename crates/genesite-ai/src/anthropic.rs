//! Anthropic Claude provider implementation.
//!
//! The Messages API has no JSON mode, so the schema instruction goes into
//! the system prompt and core extracts the object from the reply.

use crate::error::AiError;
use async_trait::async_trait;
use genesite_core::{AiProvider, GenesiteError, PromptRequest, PromptResponse, ProviderConfig, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Model used when `ANTHROPIC_MODEL` is not set.
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-sonnet-4-5";

/// The Messages API requires `max_tokens`; page markup needs room.
const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Anthropic Claude provider.
#[derive(Debug, Clone)]
pub struct AnthropicProvider {
    client: Client,
    config: ProviderConfig,
}

#[derive(Debug, Serialize)]
struct MessageRequest {
    model: String,
    max_tokens: u32,
    system: String,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
}

impl AnthropicProvider {
    /// Create a new Anthropic provider with the given configuration.
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| GenesiteError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Create a provider from environment variables.
    ///
    /// Reads `ANTHROPIC_API_KEY` and optionally `ANTHROPIC_MODEL`.
    pub fn from_env() -> Result<Self> {
        let model = std::env::var("ANTHROPIC_MODEL")
            .unwrap_or_else(|_| DEFAULT_ANTHROPIC_MODEL.to_string());
        Self::from_env_with_model(&model)
    }

    /// Create a provider from environment with a specific model.
    pub fn from_env_with_model(model: &str) -> Result<Self> {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .map_err(|_| GenesiteError::ConfigError("ANTHROPIC_API_KEY not set".to_string()))?;

        Self::new(ProviderConfig::new(api_key, model))
    }

    fn build_request(&self, request: &PromptRequest) -> MessageRequest {
        MessageRequest {
            model: self.config.model.clone(),
            max_tokens: self.config.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            system: request.effective_system_prompt(),
            messages: vec![Message {
                role: "user",
                content: request.prompt.clone(),
            }],
            temperature: self.config.temperature,
        }
    }
}

#[async_trait]
impl AiProvider for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    #[instrument(skip(self, request), fields(prompt = %request.name, model = %self.config.model))]
    async fn generate(&self, request: PromptRequest) -> Result<PromptResponse> {
        debug!("Submitting prompt to Anthropic");

        let api_request = self.build_request(&request);
        let url = self.config.base_url.as_deref().unwrap_or(ANTHROPIC_API_URL);

        let response = self
            .client
            .post(url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&api_request)
            .send()
            .await
            .map_err(AiError::from)?;

        if !response.status().is_success() {
            return Err(AiError::from_response(response).await.into());
        }

        let message: MessageResponse = response
            .json()
            .await
            .map_err(AiError::parse)?;

        let text: String = message
            .content
            .iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text.as_deref())
            .collect();

        if text.trim().is_empty() {
            return Err(AiError::EmptyResponse.into());
        }

        Ok(PromptResponse {
            text,
            tokens_used: message.usage.map(|u| u.input_tokens + u.output_tokens),
        })
    }
}
