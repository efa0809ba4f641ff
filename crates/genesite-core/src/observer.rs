use crate::model::{GeneratedSite, GenerationRequest, ThemeSuggestion};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A completed pipeline step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStep {
    ThemeSuggestion,
    PageStructure,
}

/// Trait for observing pipeline events (logging, diagnostics, UI).
pub trait PipelineObserver: Send + Sync {
    /// Called when a generation starts.
    fn on_start(&self, id: &str, request: &GenerationRequest);

    /// Called after each step completes.
    fn on_step(&self, _id: &str, _step: PipelineStep) {}

    /// Called with the theme returned by the first step.
    fn on_theme(&self, _id: &str, _theme: &ThemeSuggestion) {}

    /// Called when a generation succeeds.
    fn on_success(&self, id: &str, site: &GeneratedSite);

    /// Called when a generation fails. `error` is the underlying cause.
    fn on_failure(&self, id: &str, error: &str);
}

pub type ObserverPtr = Arc<dyn PipelineObserver>;
