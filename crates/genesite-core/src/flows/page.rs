//! Page structure step.

use crate::model::{ContentStyle, GenerationRequest, PageStructure, ThemeSuggestion};
use crate::prompt::PromptTemplate;
use crate::provider::{AiProvider, PromptRequest};
use crate::schema::{parse_structured, OutputSchema, StructuredOutput};
use crate::{GenesiteError, Result};
use serde::Serialize;
use std::sync::OnceLock;
use tracing::{debug, instrument};

/// Name under which the page prompt is submitted.
pub const PAGE_PROMPT_NAME: &str = "automatePageStructurePrompt";

// The numbered directives are fixed; only the five fields vary per request.
const PAGE_PROMPT: &str = r#"You are an expert web developer who specializes in semantic HTML and modular CSS.

Based on the user's input, generate a well-structured HTML page and the matching CSS styles.
The HTML must be semantic and the CSS modular so both are easy to maintain.

Website Name: {{{websiteName}}}
Sections: {{{sections}}}
Color Preferences: {{{colorPreferences}}}
Content Style: {{{contentStyle}}}
Theme: {{{theme}}}

Instructions:
1. Create a basic HTML structure with the specified sections.
2. Use semantic HTML5 tags (e.g., <header>, <nav>, <main>, <article>, <footer>) where appropriate.
3. Generate CSS classes that are modular and reusable.
4. Incorporate the specified color preferences into the CSS.
5. Consider the content style when generating both HTML and CSS, tailoring the design to the desired tone (professional, casual, techy, playful).
6. Keep the code clean and readable.
7. Add futuristic visual effects, gradient animated backgrounds, neon border glow and smooth transitions.

Output:
Provide the complete HTML and CSS code.
"#;

static PAGE_TEMPLATE: OnceLock<PromptTemplate> = OnceLock::new();

fn page_template() -> &'static PromptTemplate {
    PAGE_TEMPLATE.get_or_init(|| {
        PromptTemplate::new(PAGE_PROMPT_NAME, PAGE_PROMPT).expect("Invalid page prompt template")
    })
}

/// Input to the page step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInput {
    pub website_name: String,
    pub sections: String,
    pub color_preferences: String,
    pub content_style: ContentStyle,
    pub theme: String,
}

impl PageInput {
    /// Build the step input from the request and the suggested theme.
    ///
    /// Colors come from the theme's palette, never from the user's raw
    /// color preferences.
    pub fn from_theme(request: &GenerationRequest, theme: &ThemeSuggestion) -> Self {
        Self {
            website_name: request.website_name.clone(),
            sections: request.sections.clone(),
            color_preferences: theme.color_palette.clone(),
            content_style: request.content_style,
            theme: theme.overall_theme.clone(),
        }
    }
}

impl StructuredOutput for PageStructure {
    fn schema() -> OutputSchema {
        OutputSchema::new("PageStructure")
            .field("html", "Generated HTML structure for the website.")
            .field("css", "Generated CSS styles for the website.")
    }

    fn verify(&self) -> Result<()> {
        if self.html.trim().is_empty() {
            return Err(GenesiteError::MissingField("html".to_string()));
        }
        if self.css.trim().is_empty() {
            return Err(GenesiteError::MissingField("css".to_string()));
        }
        Ok(())
    }
}

/// Render the page prompt for `input`.
pub fn render_page_prompt(input: &PageInput) -> Result<String> {
    page_template().render(input)
}

/// Ask the model for the page markup and styles.
#[instrument(skip(provider, input), fields(provider = provider.name(), website = %input.website_name))]
pub async fn automate_page_structure<P: AiProvider + ?Sized>(
    provider: &P,
    input: &PageInput,
) -> Result<PageStructure> {
    let template = page_template();
    let prompt = template.render(input)?;
    let request = PromptRequest::new(template.name(), prompt, PageStructure::schema());

    let response = provider.generate(request).await?;
    debug!(tokens = ?response.tokens_used, "Page structure received");

    parse_structured(&response.text)
}
