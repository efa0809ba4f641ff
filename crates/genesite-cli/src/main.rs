use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use dotenvy::dotenv;
use genesite_core::{AiProvider, GenesiteConfig, ProviderKind};
use genesite_server::GenesiteServer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the generator page and API
    Serve {
        /// Port to listen on (overrides GENESITE_PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// Interface to bind (overrides GENESITE_HOST)
        #[arg(long)]
        host: Option<String>,

        /// AI Provider to use (overrides GENESITE_PROVIDER)
        #[arg(long, value_enum)]
        provider: Option<ProviderType>,

        /// Model name (optional, uses provider default if not specified)
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Check that the configured provider is reachable
    Check {
        /// AI Provider to use (overrides GENESITE_PROVIDER)
        #[arg(long, value_enum)]
        provider: Option<ProviderType>,

        /// Model name
        #[arg(short, long)]
        model: Option<String>,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
enum ProviderType {
    Gemini,
    Openai,
    Anthropic,
    Ollama,
}

impl From<ProviderType> for ProviderKind {
    fn from(p: ProviderType) -> Self {
        match p {
            ProviderType::Gemini => ProviderKind::Gemini,
            ProviderType::Openai => ProviderKind::OpenAi,
            ProviderType::Anthropic => ProviderKind::Anthropic,
            ProviderType::Ollama => ProviderKind::Ollama,
        }
    }
}

/// Environment first, then command line flags on top.
fn resolve_config(provider: Option<ProviderType>, model: Option<String>) -> Result<GenesiteConfig> {
    let mut config = GenesiteConfig::from_env().context("Invalid GENESITE_* environment")?;
    if let Some(p) = provider {
        config = config.with_provider(p.into());
    }
    if let Some(m) = model {
        config = config.with_model(m);
    }
    Ok(config)
}

fn build_provider(config: &GenesiteConfig) -> Result<Box<dyn AiProvider>> {
    genesite_ai::from_kind(config.provider, config.model.as_deref())
        .with_context(|| format!("Failed to initialize {} provider", config.provider))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port, host, provider, model } => {
            let mut config = resolve_config(provider, model)?;
            if let Some(p) = port {
                config = config.with_port(p);
            }
            if let Some(h) = host {
                config = config.with_host(h);
            }

            let provider = build_provider(&config)?;
            info!(provider = %config.provider, "Starting genesite");

            GenesiteServer::new(provider)
                .start(&config.bind_address())
                .await
                .with_context(|| format!("Server failed on {}", config.bind_address()))?;
        }
        Commands::Check { provider, model } => {
            let config = resolve_config(provider, model)?;
            let provider = build_provider(&config)?;

            match provider.health_check().await {
                Ok(true) => info!("{} is reachable", provider.name()),
                Ok(false) => {
                    error!("{} answered with an error status", provider.name());
                    anyhow::bail!("provider health check failed");
                }
                Err(e) => return Err(e).context("Provider health check failed"),
            }
        }
    }

    Ok(())
}
