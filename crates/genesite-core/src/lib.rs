//! # Genesite Core
//!
//! Core library for generating a website from a short form with a
//! generative text model.
//!
//! A [`SitePipeline`] runs two prompt-backed steps in sequence:
//!
//! 1. **Theme suggestion**: website metadata in, [`ThemeSuggestion`] out.
//! 2. **Page structure**: metadata plus the theme in, HTML and CSS out.
//!
//! The result is a [`GeneratedSite`] that composes into a single preview
//! document. Model backends plug in through the [`AiProvider`] trait.
//!
//! ## Example
//!
//! ```rust,ignore
//! use genesite_core::{SiteForm, SitePipeline};
//!
//! let request = form.validate()?;
//! let site = SitePipeline::new(provider).generate(&request).await?;
//! let html = site.document();
//! ```

pub mod config;
pub mod error;
pub mod flows;
pub mod form;
pub mod gallery;
pub mod model;
pub mod observer;
pub mod pipeline;
pub mod preview;
pub mod prompt;
pub mod provider;
pub mod schema;

pub use config::{GenesiteConfig, ProviderKind};
pub use error::{GenesiteError, Result, GENERATION_FAILED_MESSAGE};
pub use form::{FieldError, SiteForm};
pub use gallery::TemplateEntry;
pub use model::{ContentStyle, GeneratedSite, GenerationRequest, PageStructure, ThemeSuggestion};
pub use observer::{PipelineObserver, PipelineStep};
pub use pipeline::SitePipeline;
pub use provider::{AiProvider, MockProvider, PromptRequest, PromptResponse, ProviderConfig};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::{
        AiProvider, ContentStyle, GeneratedSite, GenerationRequest, GenesiteError,
        ProviderConfig, Result, SiteForm, SitePipeline,
    };
}
