//! Theme suggestion step.

use crate::model::{ContentStyle, GenerationRequest, ThemeSuggestion};
use crate::prompt::PromptTemplate;
use crate::provider::{AiProvider, PromptRequest};
use crate::schema::{parse_structured, OutputSchema, StructuredOutput};
use crate::Result;
use serde::Serialize;
use std::sync::OnceLock;
use tracing::{debug, instrument};

/// Name under which the theme prompt is submitted.
pub const THEME_PROMPT_NAME: &str = "suggestThemeCustomizationsPrompt";

const THEME_PROMPT: &str = r#"You are an AI theme customization expert. Suggest theme customizations for a website based on the user's input and branding preferences.

Website Name: {{{websiteName}}}
Website Description: {{{websiteDescription}}}
Branding Preferences: {{{brandingPreferences}}}
Content Style: {{{contentStyle}}}

Based on the information above, suggest the following:

- colorPalette: A color palette for the website.
- typography: Typography for the website, including headline and body fonts.
- iconography: Iconography to use on the website.
- visualEffects: Visual effects to enhance the website's UI.
- overallTheme: The overall theme of the website.

Make sure the suggestions align with the branding preferences and content style. Keep the output concise and easy to understand.
The website should be futuristic and use a purple and black theme.
The colorPalette should contain hex codes.
The typography should contain the font names.
"#;

static THEME_TEMPLATE: OnceLock<PromptTemplate> = OnceLock::new();

fn theme_template() -> &'static PromptTemplate {
    THEME_TEMPLATE.get_or_init(|| {
        PromptTemplate::new(THEME_PROMPT_NAME, THEME_PROMPT).expect("Invalid theme prompt template")
    })
}

/// Input to the theme step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeInput {
    pub website_name: String,
    pub website_description: String,
    pub branding_preferences: String,
    pub content_style: ContentStyle,
}

impl From<&GenerationRequest> for ThemeInput {
    fn from(request: &GenerationRequest) -> Self {
        Self {
            website_name: request.website_name.clone(),
            website_description: request.website_description(),
            branding_preferences: request.color_preferences.clone(),
            content_style: request.content_style,
        }
    }
}

impl StructuredOutput for ThemeSuggestion {
    fn schema() -> OutputSchema {
        OutputSchema::new("ThemeSuggestion")
            .field("colorPalette", "A suggested color palette for the website, with hex codes.")
            .field("typography", "Suggested typography, including headline and body font names.")
            .field("iconography", "Suggestions for iconography to use on the website.")
            .field("visualEffects", "Suggested visual effects to enhance the website's UI.")
            .field("overallTheme", "An overall theme suggestion based on the input.")
    }
}

/// Render the theme prompt for `input`.
pub fn render_theme_prompt(input: &ThemeInput) -> Result<String> {
    theme_template().render(input)
}

/// Ask the model for a theme.
#[instrument(skip(provider, input), fields(provider = provider.name(), website = %input.website_name))]
pub async fn suggest_theme<P: AiProvider + ?Sized>(
    provider: &P,
    input: &ThemeInput,
) -> Result<ThemeSuggestion> {
    let template = theme_template();
    let prompt = template.render(input)?;
    let request = PromptRequest::new(template.name(), prompt, ThemeSuggestion::schema());

    let response = provider.generate(request).await?;
    debug!(tokens = ?response.tokens_used, "Theme suggestion received");

    parse_structured(&response.text)
}
