//! Form input and validation.
//!
//! The page posts a [`SiteForm`]; [`SiteForm::validate`] is the only way to get
//! a [`GenerationRequest`] from it, so rejected input never reaches the
//! pipeline.

use crate::gallery::DEFAULT_TEMPLATE_ID;
use crate::model::{ContentStyle, GenerationRequest};
use crate::{GenesiteError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MIN_WEBSITE_NAME_CHARS: usize = 2;
pub const MIN_SECTIONS_CHARS: usize = 10;
pub const MIN_COLOR_PREFERENCES_CHARS: usize = 5;

/// A rejected form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Raw, unvalidated form payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteForm {
    #[serde(default)]
    pub website_name: String,
    #[serde(default)]
    pub sections: String,
    #[serde(default)]
    pub color_preferences: String,
    #[serde(default)]
    pub content_style: String,
    #[serde(default = "default_template")]
    pub template: Option<String>,
}

fn default_template() -> Option<String> {
    Some(DEFAULT_TEMPLATE_ID.to_string())
}

impl Default for SiteForm {
    /// The values the page starts with.
    fn default() -> Self {
        Self {
            website_name: String::new(),
            sections: "Hero, Features, About Us, Contact Form".to_string(),
            color_preferences: "Futuristic purple and black theme with cyan accents".to_string(),
            content_style: ContentStyle::Techy.to_string(),
            template: default_template(),
        }
    }
}

impl SiteForm {
    /// Check every field and build the request.
    ///
    /// All field errors are collected before returning.
    pub fn validate(&self) -> Result<GenerationRequest> {
        let mut errors = Vec::new();

        let website_name = self.website_name.trim();
        if website_name.chars().count() < MIN_WEBSITE_NAME_CHARS {
            errors.push(FieldError::new(
                "websiteName",
                "Website name must be at least 2 characters.",
            ));
        }

        let sections = self.sections.trim();
        if sections.chars().count() < MIN_SECTIONS_CHARS {
            errors.push(FieldError::new(
                "sections",
                "Please describe the sections you want (e.g., hero, features, contact).",
            ));
        }

        let color_preferences = self.color_preferences.trim();
        if color_preferences.chars().count() < MIN_COLOR_PREFERENCES_CHARS {
            errors.push(FieldError::new(
                "colorPreferences",
                "Please describe your color preferences (e.g., dark theme with blue accents).",
            ));
        }

        let content_style = match self.content_style.trim().parse::<ContentStyle>() {
            Ok(style) => Some(style),
            Err(e) => {
                errors.push(FieldError::new("contentStyle", e.to_string()));
                None
            }
        };

        match content_style {
            Some(content_style) if errors.is_empty() => Ok(GenerationRequest {
                website_name: website_name.to_string(),
                sections: sections.to_string(),
                color_preferences: color_preferences.to_string(),
                content_style,
                template: self.template.clone(),
            }),
            _ => Err(GenesiteError::Validation(errors)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> SiteForm {
        SiteForm {
            website_name: "Nova Solutions".into(),
            sections: "Hero, Features, Contact".into(),
            color_preferences: "purple and black".into(),
            content_style: "techy".into(),
            template: Some("template-startup".into()),
        }
    }

    #[test]
    fn test_valid_form_builds_request() {
        let request = valid_form().validate().unwrap();
        assert_eq!(request.website_name, "Nova Solutions");
        assert_eq!(request.content_style, ContentStyle::Techy);
        assert_eq!(request.template.as_deref(), Some("template-startup"));
    }

    #[test]
    fn test_all_errors_are_collected() {
        let form = SiteForm {
            website_name: "N".into(),
            sections: "Hero".into(),
            color_preferences: "red".into(),
            content_style: "formal".into(),
            template: None,
        };

        match form.validate() {
            Err(GenesiteError::Validation(errors)) => {
                let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
                assert_eq!(
                    fields,
                    vec!["websiteName", "sections", "colorPreferences", "contentStyle"]
                );
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_whitespace_does_not_count() {
        let form = SiteForm {
            website_name: "  N  ".into(),
            ..valid_form()
        };
        assert!(form.validate().unwrap_err().is_validation());
    }

    #[test]
    fn test_missing_template_defaults_to_startup() {
        let form: SiteForm = serde_json::from_str(
            r#"{"websiteName": "Nova", "sections": "Hero, Features", "colorPreferences": "purple", "contentStyle": "casual"}"#,
        )
        .unwrap();
        assert_eq!(form.template.as_deref(), Some(DEFAULT_TEMPLATE_ID));
    }

    #[test]
    fn test_null_template_is_kept_absent() {
        let form: SiteForm = serde_json::from_str(
            r#"{"websiteName": "Nova", "sections": "Hero, Features", "colorPreferences": "purple", "contentStyle": "casual", "template": null}"#,
        )
        .unwrap();
        let request = form.validate().unwrap();
        assert_eq!(request.template_label(), "custom");
    }
}
