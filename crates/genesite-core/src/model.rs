//! Request and result types flowing through the pipeline.

use crate::preview;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Template label used in the description when no template was chosen.
pub const CUSTOM_TEMPLATE_LABEL: &str = "custom";

/// Tone of the generated content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentStyle {
    Professional,
    Casual,
    #[default]
    Techy,
    Playful,
}

impl ContentStyle {
    /// Every accepted style, in display order.
    pub const ALL: [ContentStyle; 4] = [
        ContentStyle::Professional,
        ContentStyle::Casual,
        ContentStyle::Techy,
        ContentStyle::Playful,
    ];

    /// Wire name of the style.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentStyle::Professional => "professional",
            ContentStyle::Casual => "casual",
            ContentStyle::Techy => "techy",
            ContentStyle::Playful => "playful",
        }
    }
}

impl fmt::Display for ContentStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a content style name is not one of [`ContentStyle::ALL`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown content style '{0}' (expected professional, casual, techy or playful)")]
pub struct UnknownContentStyle(pub String);

impl FromStr for ContentStyle {
    type Err = UnknownContentStyle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContentStyle::ALL
            .into_iter()
            .find(|style| style.as_str() == s)
            .ok_or_else(|| UnknownContentStyle(s.to_string()))
    }
}

/// A validated request to generate one website.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub website_name: String,
    pub sections: String,
    pub color_preferences: String,
    pub content_style: ContentStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
}

impl GenerationRequest {
    pub fn new(
        website_name: impl Into<String>,
        sections: impl Into<String>,
        color_preferences: impl Into<String>,
        content_style: ContentStyle,
    ) -> Self {
        Self {
            website_name: website_name.into(),
            sections: sections.into(),
            color_preferences: color_preferences.into(),
            content_style,
            template: None,
        }
    }

    /// Set the chosen gallery template.
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    /// The template label, falling back to `custom` when absent or empty.
    pub fn template_label(&self) -> &str {
        self.template
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(CUSTOM_TEMPLATE_LABEL)
    }

    /// Free-text description handed to the theme step.
    pub fn website_description(&self) -> String {
        format!(
            "Using a {} template, create a website with these sections: {}",
            self.template_label(),
            self.sections
        )
    }
}

/// Theme suggested by the first pipeline step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeSuggestion {
    pub color_palette: String,
    pub typography: String,
    pub iconography: String,
    pub visual_effects: String,
    pub overall_theme: String,
}

/// Markup and styles produced by the second pipeline step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageStructure {
    pub html: String,
    pub css: String,
}

/// The finished site shown in the preview.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedSite {
    pub html: String,
    pub css: String,
    pub js: String,
}

impl GeneratedSite {
    /// Assemble the single HTML document rendered in the preview frame.
    pub fn document(&self) -> String {
        preview::compose_document(&self.html, &self.css, &self.js)
    }
}

impl From<PageStructure> for GeneratedSite {
    fn from(page: PageStructure) -> Self {
        Self {
            html: page.html,
            css: page.css,
            js: String::new(),
        }
    }
}
