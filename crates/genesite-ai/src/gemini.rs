//! Google Gemini provider implementation.
//!
//! The default backend. Uses `generateContent` with JSON response mode.

use crate::error::AiError;
use async_trait::async_trait;
use genesite_core::{AiProvider, GenesiteError, PromptRequest, PromptResponse, ProviderConfig, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// The key travels in a header so it never appears in request URLs.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Model used when `GEMINI_MODEL` is not set.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

/// Google Gemini provider.
#[derive(Debug, Clone)]
pub struct GeminiProvider {
    client: Client,
    config: ProviderConfig,
}

// Request structures
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
    role: String,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    response_mime_type: String,
}

// Response structures
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    candidates: Option<Vec<Candidate>>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Debug, Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Debug, Deserialize)]
struct PartResponse {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    total_token_count: u32,
}

impl GeminiProvider {
    /// Create a new Gemini provider with the given configuration.
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| GenesiteError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Create a provider from environment variables.
    ///
    /// Reads `GOOGLE_API_KEY` (or `GEMINI_API_KEY`) and optionally `GEMINI_MODEL`.
    pub fn from_env() -> Result<Self> {
        let model =
            std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string());
        Self::from_env_with_model(&model)
    }

    /// Create a provider from environment with a specific model.
    pub fn from_env_with_model(model: &str) -> Result<Self> {
        let api_key = std::env::var("GOOGLE_API_KEY")
            .or_else(|_| std::env::var("GEMINI_API_KEY"))
            .map_err(|_| GenesiteError::ConfigError("GOOGLE_API_KEY not set".to_string()))?;

        Self::new(ProviderConfig::new(api_key, model))
    }

    /// Gemini takes a single user turn, so the schema instruction rides along
    /// with the prompt.
    fn build_prompt(&self, request: &PromptRequest) -> String {
        format!("{}\n\n{}", request.prompt, request.effective_system_prompt())
    }

    fn endpoint(&self) -> String {
        let base = self.config.base_url.as_deref().unwrap_or(GEMINI_API_BASE);
        format!("{}/{}:generateContent", base.trim_end_matches('/'), self.config.model)
    }
}

#[async_trait]
impl AiProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    #[instrument(skip(self, request), fields(prompt = %request.name, model = %self.config.model))]
    async fn generate(&self, request: PromptRequest) -> Result<PromptResponse> {
        debug!("Submitting prompt to Gemini");

        let api_request = GeminiRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: self.build_prompt(&request),
                }],
            }],
            generation_config: Some(GenerationConfig {
                temperature: self.config.temperature,
                max_output_tokens: self.config.max_tokens,
                response_mime_type: "application/json".to_string(),
            }),
        };

        let response = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(&api_request)
            .send()
            .await
            .map_err(AiError::from)?;

        if !response.status().is_success() {
            return Err(AiError::from_response(response).await.into());
        }

        let gemini_response: GeminiResponse = response
            .json()
            .await
            .map_err(AiError::parse)?;

        let text = gemini_response
            .candidates
            .as_ref()
            .and_then(|c| c.first())
            .and_then(|c| c.content.as_ref())
            .map(|c| c.parts.iter().map(|p| p.text.as_str()).collect::<String>())
            .filter(|t| !t.trim().is_empty())
            .ok_or(AiError::EmptyResponse)?;

        Ok(PromptResponse {
            text,
            tokens_used: gemini_response.usage_metadata.map(|u| u.total_token_count),
        })
    }

    async fn health_check(&self) -> Result<bool> {
        let base = self.config.base_url.as_deref().unwrap_or(GEMINI_API_BASE);
        let url = format!("{}/{}", base.trim_end_matches('/'), self.config.model);

        let response = self
            .client
            .get(&url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .send()
            .await
            .map_err(AiError::from)?;

        Ok(response.status().is_success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use genesite_core::schema::OutputSchema;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> PromptRequest {
        PromptRequest::new(
            "pagePrompt",
            "Build a page",
            OutputSchema::new("Page").field("html", "markup").field("css", "styles"),
        )
    }

    fn provider(server: &MockServer) -> GeminiProvider {
        let config = ProviderConfig::new("test-key", "gemini-2.0-flash").with_base_url(server.uri());
        GeminiProvider::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_generate_uses_json_mode() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/gemini-2.0-flash:generateContent"))
            .and(header(API_KEY_HEADER, "test-key"))
            .and(query_param_is_missing("key"))
            .and(body_partial_json(json!({
                "generationConfig": { "responseMimeType": "application/json" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": { "parts": [{ "text": "{\"html\": \"<p>" }, { "text": "</p>\", \"css\": \"p{}\"}" }] }
                }],
                "usageMetadata": { "totalTokenCount": 42 }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = provider(&server).generate(request()).await.unwrap();
        assert_eq!(response.text, "{\"html\": \"<p></p>\", \"css\": \"p{}\"}");
        assert_eq!(response.tokens_used, Some(42));
    }

    #[test]
    fn test_prompt_carries_schema_instruction() {
        let p = GeminiProvider::new(ProviderConfig::new("k", "m")).unwrap();
        let prompt = p.build_prompt(&request());
        assert!(prompt.starts_with("Build a page"));
        assert!(prompt.contains("\"css\" (string)"));
    }

    #[tokio::test]
    async fn test_api_error_becomes_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("RESOURCE_EXHAUSTED"))
            .mount(&server)
            .await;

        let err = provider(&server).generate(request()).await.unwrap_err();
        match err {
            GenesiteError::ProviderError(message) => {
                assert!(message.contains("429"));
                assert!(message.contains("RESOURCE_EXHAUSTED"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_blocked_reply_is_empty_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
            .mount(&server)
            .await;

        let err = provider(&server).generate(request()).await.unwrap_err();
        assert!(matches!(err, GenesiteError::ProviderError(ref m) if m == "No content generated"));
    }

    #[tokio::test]
    async fn test_connection_failure_hides_api_key() {
        let config = ProviderConfig::new("SECRET-KEY-123", "gemini-2.0-flash")
            .with_base_url("http://127.0.0.1:1");
        let provider = GeminiProvider::new(config).unwrap();

        let err = provider.generate(request()).await.unwrap_err();
        assert!(matches!(err, GenesiteError::NetworkError(_)));
        assert!(!err.to_string().contains("SECRET-KEY-123"));

        let err = provider.health_check().await.unwrap_err();
        assert!(!err.to_string().contains("SECRET-KEY-123"));
    }
}
