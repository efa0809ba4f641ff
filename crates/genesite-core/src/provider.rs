//! AI Provider trait and configuration.
//!
//! Defines the interface that AI backends must implement. A provider takes a
//! rendered prompt plus its output schema and returns the model's raw reply;
//! parsing into typed results happens in [`crate::schema`].

use crate::schema::OutputSchema;
use crate::{GenesiteError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Default request timeout for hosted providers.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Configuration for an AI provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API key for authentication.
    pub api_key: String,

    /// Model identifier (e.g., "gemini-2.0-flash", "gpt-4o").
    pub model: String,

    /// Base URL for the API.
    pub base_url: Option<String>,

    /// Maximum tokens to generate.
    pub max_tokens: Option<u32>,

    /// Temperature for generation (0.0 - 2.0).
    pub temperature: Option<f32>,

    /// Request timeout in seconds.
    pub timeout_seconds: Option<u64>,
}

impl ProviderConfig {
    /// Create a new provider config with API key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: None,
            max_tokens: None,
            temperature: None,
            timeout_seconds: None,
        }
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set max tokens.
    pub fn with_max_tokens(mut self, tokens: u32) -> Self {
        self.max_tokens = Some(tokens);
        self
    }

    /// Set temperature.
    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp.clamp(0.0, 2.0));
        self
    }

    /// Set timeout.
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = Some(seconds);
        self
    }

    /// Effective request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }
}

/// A rendered prompt submitted to a provider.
#[derive(Debug, Clone)]
pub struct PromptRequest {
    /// Name of the prompt template that produced this request.
    pub name: String,

    /// The rendered instruction text.
    pub prompt: String,

    /// The structured reply the caller expects.
    pub schema: OutputSchema,

    /// System prompt override.
    pub system_prompt: Option<String>,
}

impl PromptRequest {
    /// Create a request for a rendered prompt.
    pub fn new(name: impl Into<String>, prompt: impl Into<String>, schema: OutputSchema) -> Self {
        Self {
            name: name.into(),
            prompt: prompt.into(),
            schema,
            system_prompt: None,
        }
    }

    /// Override the system prompt.
    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    /// System prompt to send: the override, or the schema's JSON instruction.
    pub fn effective_system_prompt(&self) -> String {
        self.system_prompt
            .clone()
            .unwrap_or_else(|| self.schema.to_instruction())
    }
}

/// Raw reply from a provider.
#[derive(Debug, Clone)]
pub struct PromptResponse {
    /// The model's reply text, expected to hold a JSON object.
    pub text: String,

    /// Tokens used for the request.
    pub tokens_used: Option<u32>,
}

impl PromptResponse {
    /// Create a response carrying only text.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tokens_used: None,
        }
    }
}

/// Trait that AI providers must implement.
#[async_trait]
pub trait AiProvider: Send + Sync {
    /// Get the provider name.
    fn name(&self) -> &str;

    /// Submit a prompt and return the model's raw reply.
    async fn generate(&self, request: PromptRequest) -> Result<PromptResponse>;

    /// Check if the provider is available and configured correctly.
    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }
}

#[async_trait]
impl<P: AiProvider + ?Sized> AiProvider for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn generate(&self, request: PromptRequest) -> Result<PromptResponse> {
        (**self).generate(request).await
    }

    async fn health_check(&self) -> Result<bool> {
        (**self).health_check().await
    }
}

/// A mock provider for testing.
///
/// Replies are keyed by prompt name. Every request is recorded so tests can
/// assert on call order and prompt contents.
#[derive(Debug, Default)]
pub struct MockProvider {
    /// Replies to return (prompt name -> reply text).
    pub responses: HashMap<String, String>,

    /// Prompts that fail (prompt name -> error message).
    pub failures: HashMap<String, String>,

    calls: Mutex<Vec<PromptRequest>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockProvider {
    /// Create a new mock provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mock reply.
    pub fn with_response(mut self, prompt: impl Into<String>, reply: impl Into<String>) -> Self {
        self.responses.insert(prompt.into(), reply.into());
        self
    }

    /// Make a prompt fail with a provider error.
    pub fn with_failure(mut self, prompt: impl Into<String>, message: impl Into<String>) -> Self {
        self.failures.insert(prompt.into(), message.into());
        self
    }

    /// All requests received so far, in order.
    pub fn calls(&self) -> Vec<PromptRequest> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    /// Names of the prompts received so far, in order.
    pub fn call_names(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.name).collect()
    }

    /// Highest number of requests that were ever in flight at once.
    pub fn max_concurrency(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AiProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, request: PromptRequest) -> Result<PromptResponse> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::task::yield_now().await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if let Ok(mut calls) = self.calls.lock() {
            calls.push(request.clone());
        }

        if let Some(message) = self.failures.get(&request.name) {
            return Err(GenesiteError::ProviderError(message.clone()));
        }

        let text = self.responses.get(&request.name).cloned().ok_or_else(|| {
            GenesiteError::ProviderError(format!("no mock reply for prompt '{}'", request.name))
        })?;

        Ok(PromptResponse {
            text,
            tokens_used: Some(10),
        })
    }
}
