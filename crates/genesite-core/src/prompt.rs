//! Prompt templates.
//!
//! Instructions are Handlebars templates with triple-stash fields, e.g.
//! `{{{websiteName}}}`. Rendering runs in strict mode so a missing input field
//! is an error rather than an empty string in the prompt.

use crate::{GenesiteError, Result};
use handlebars::Handlebars;
use serde::Serialize;

/// A named, compiled prompt template.
pub struct PromptTemplate {
    name: &'static str,
    registry: Handlebars<'static>,
}

impl PromptTemplate {
    /// Compile a template.
    ///
    /// # Example
    ///
    /// ```
    /// use genesite_core::prompt::PromptTemplate;
    /// use serde_json::json;
    ///
    /// let template = PromptTemplate::new("greet", "Hello {{{name}}}!").unwrap();
    /// let text = template.render(&json!({ "name": "<Nova>" })).unwrap();
    /// assert_eq!(text, "Hello <Nova>!");
    /// ```
    pub fn new(name: &'static str, source: &str) -> Result<Self> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_escape_fn(handlebars::no_escape);
        registry
            .register_template_string(name, source)
            .map_err(|e| GenesiteError::PromptRender(e.to_string()))?;

        Ok(Self { name, registry })
    }

    /// Template name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Render the template with the given input.
    pub fn render<T: Serialize>(&self, data: &T) -> Result<String> {
        self.registry
            .render(self.name, data)
            .map_err(|e| GenesiteError::PromptRender(format!("{}: {}", self.name, e)))
    }
}

impl std::fmt::Debug for PromptTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptTemplate")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
