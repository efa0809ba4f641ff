//! # Genesite Configuration
//!
//! Server and provider selection settings. Values come from programmatic
//! defaults, then `GENESITE_*` environment variables, then builder overrides.
//! Nothing in the pipeline reads the environment itself; the binary builds a
//! config once and passes it down.

use crate::{GenesiteError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;

/// Which AI backend serves the pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Gemini,
    OpenAi,
    Anthropic,
    Ollama,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini",
            ProviderKind::OpenAi => "openai",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Ollama => "ollama",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = GenesiteError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "gemini" | "google" | "googleai" => Ok(ProviderKind::Gemini),
            "openai" => Ok(ProviderKind::OpenAi),
            "anthropic" | "claude" => Ok(ProviderKind::Anthropic),
            "ollama" => Ok(ProviderKind::Ollama),
            other => Err(GenesiteError::ConfigError(format!(
                "unknown provider '{}'",
                other
            ))),
        }
    }
}

/// Global configuration for the Genesite server.
///
/// # Example
/// ```rust
/// use genesite_core::{GenesiteConfig, ProviderKind};
///
/// let config = GenesiteConfig::default()
///     .with_port(8080)
///     .with_provider(ProviderKind::Ollama);
/// assert_eq!(config.bind_address(), "127.0.0.1:8080");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenesiteConfig {
    /// Interface to bind.
    /// Default: 127.0.0.1, Env: GENESITE_HOST
    pub host: String,

    /// Port for the web UI and API.
    /// Default: 3000, Env: GENESITE_PORT
    pub port: u16,

    /// AI backend.
    /// Default: gemini, Env: GENESITE_PROVIDER
    pub provider: ProviderKind,

    /// Model override; `None` uses the provider's own default.
    /// Env: GENESITE_MODEL
    pub model: Option<String>,
}

impl Default for GenesiteConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            provider: ProviderKind::default(),
            model: None,
        }
    }
}

impl GenesiteConfig {
    /// Create a config from environment variables.
    /// Falls back to defaults for missing variables.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(v) = env::var("GENESITE_HOST") {
            config.host = v;
        }
        if let Ok(v) = env::var("GENESITE_PORT") {
            config.port = v
                .parse()
                .map_err(|_| GenesiteError::ConfigError(format!("invalid GENESITE_PORT '{}'", v)))?;
        }
        if let Ok(v) = env::var("GENESITE_PROVIDER") {
            config.provider = v.parse()?;
        }
        if let Ok(v) = env::var("GENESITE_MODEL") {
            if !v.is_empty() {
                config.model = Some(v);
            }
        }

        Ok(config)
    }

    /// Builder: Set bind host.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Builder: Set port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Builder: Set provider.
    pub fn with_provider(mut self, provider: ProviderKind) -> Self {
        self.provider = provider;
        self
    }

    /// Builder: Set model override.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// `host:port` for the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
