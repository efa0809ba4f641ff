//! Site Pipeline - the orchestrator for the two generation steps.
//!
//! A run suggests a theme, feeds the theme's palette and overall theme into
//! the page step, and returns the finished site. Steps always run one after
//! the other; a failure in either aborts the run with
//! [`GenesiteError::Generation`].

use crate::flows::{automate_page_structure, suggest_theme, PageInput, ThemeInput};
use crate::observer::{ObserverPtr, PipelineObserver, PipelineStep};
use crate::{AiProvider, GeneratedSite, GenerationRequest, GenesiteError, Result};
use std::sync::Arc;
use tracing::{error, field, info, instrument, Span};
use uuid::Uuid;

/// The two-step website generation pipeline.
///
/// # Example
///
/// ```rust,ignore
/// use genesite_core::{GenerationRequest, ContentStyle, SitePipeline};
/// use genesite_ai::GeminiProvider;
///
/// let pipeline = SitePipeline::new(GeminiProvider::from_env()?);
/// let request = GenerationRequest::new(
///     "Nova Solutions",
///     "Hero, Features, Contact",
///     "purple and black",
///     ContentStyle::Techy,
/// );
///
/// let site = pipeline.generate(&request).await?;
/// println!("{}", site.document());
/// ```
pub struct SitePipeline<P: AiProvider> {
    /// The AI provider backing both steps.
    provider: Arc<P>,

    /// Optional observer for diagnostics.
    observer: Option<ObserverPtr>,
}

impl<P: AiProvider> SitePipeline<P> {
    /// Create a new pipeline with the given provider.
    pub fn new(provider: P) -> Self {
        Self::from_arc(Arc::new(provider))
    }

    /// Create a pipeline sharing an existing provider.
    pub fn from_arc(provider: Arc<P>) -> Self {
        Self {
            provider,
            observer: None,
        }
    }

    /// Attach an observer.
    pub fn with_observer(mut self, observer: impl PipelineObserver + 'static) -> Self {
        self.observer = Some(Arc::new(observer));
        self
    }

    /// The provider backing this pipeline.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Generate a site for a validated request.
    ///
    /// Issues exactly one theme call followed by exactly one page call.
    /// `js` on the result is always empty.
    #[instrument(
        skip(self, request),
        fields(generation_id = field::Empty, provider = self.provider.name(), website = %request.website_name)
    )]
    pub async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedSite> {
        let id = Uuid::new_v4().to_string();
        Span::current().record("generation_id", id.as_str());
        info!(template = request.template_label(), style = %request.content_style, "Generating website");

        self.notify(|o| o.on_start(&id, request));

        match self.run(&id, request).await {
            Ok(site) => {
                info!(html_bytes = site.html.len(), css_bytes = site.css.len(), "Website generated");
                self.notify(|o| o.on_success(&id, &site));
                Ok(site)
            }
            Err(cause) => {
                error!(error = %cause, "AI generation failed");
                self.notify(|o| o.on_failure(&id, &cause.to_string()));
                Err(GenesiteError::generation(cause))
            }
        }
    }

    async fn run(&self, id: &str, request: &GenerationRequest) -> Result<GeneratedSite> {
        let theme_input = ThemeInput::from(request);
        let theme = suggest_theme(self.provider.as_ref(), &theme_input).await?;
        self.notify(|o| {
            o.on_theme(id, &theme);
            o.on_step(id, PipelineStep::ThemeSuggestion);
        });

        let page_input = PageInput::from_theme(request, &theme);
        let page = automate_page_structure(self.provider.as_ref(), &page_input).await?;
        self.notify(|o| o.on_step(id, PipelineStep::PageStructure));

        Ok(GeneratedSite::from(page))
    }

    fn notify(&self, f: impl FnOnce(&dyn PipelineObserver)) {
        if let Some(observer) = &self.observer {
            f(observer.as_ref());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flows::{PAGE_PROMPT_NAME, THEME_PROMPT_NAME};
    use crate::provider::MockProvider;
    use crate::{ContentStyle, ThemeSuggestion, GENERATION_FAILED_MESSAGE};
    use std::sync::Mutex;

    const THEME_REPLY: &str = r##"{
        "colorPalette": "#0d0221, #7b2cbf, #00f5d4",
        "typography": "Orbitron, Inter",
        "iconography": "Outlined geometric icons",
        "visualEffects": "Glassmorphism with neon edges",
        "overallTheme": "Deep space command center"
    }"##;

    const PAGE_REPLY: &str =
        r#"{"html": "<header>Nova</header><main></main>", "css": "header { color: #7b2cbf; }"}"#;

    fn nova_request() -> GenerationRequest {
        GenerationRequest::new(
            "Nova Solutions",
            "Hero, Features, Contact",
            "purple and black",
            ContentStyle::Techy,
        )
        .with_template("template-startup")
    }

    fn working_provider() -> MockProvider {
        MockProvider::new()
            .with_response(THEME_PROMPT_NAME, THEME_REPLY)
            .with_response(PAGE_PROMPT_NAME, PAGE_REPLY)
    }

    #[tokio::test]
    async fn test_steps_run_once_in_order() {
        let pipeline = SitePipeline::new(working_provider());

        let site = pipeline.generate(&nova_request()).await.unwrap();

        assert_eq!(site.html, "<header>Nova</header><main></main>");
        assert_eq!(site.css, "header { color: #7b2cbf; }");
        assert_eq!(
            pipeline.provider().call_names(),
            vec![THEME_PROMPT_NAME, PAGE_PROMPT_NAME]
        );
        assert_eq!(pipeline.provider().max_concurrency(), 1);
    }

    #[tokio::test]
    async fn test_nova_example_wiring() {
        let pipeline = SitePipeline::new(working_provider());
        pipeline.generate(&nova_request()).await.unwrap();

        let calls = pipeline.provider().calls();
        assert!(calls[0].prompt.contains(
            "Website Description: Using a template-startup template, create a website with these sections: Hero, Features, Contact"
        ));
        assert!(calls[0].prompt.contains("Branding Preferences: purple and black"));

        assert!(calls[1]
            .prompt
            .contains("Color Preferences: #0d0221, #7b2cbf, #00f5d4"));
        assert!(!calls[1].prompt.contains("purple and black"));
        assert!(calls[1].prompt.contains("Theme: Deep space command center"));
        assert!(calls[1].prompt.contains("Sections: Hero, Features, Contact"));
    }

    #[tokio::test]
    async fn test_missing_template_uses_custom_label() {
        let pipeline = SitePipeline::new(working_provider());
        let request = GenerationRequest::new("Nova", "Hero and pricing", "teal", ContentStyle::Casual);

        pipeline.generate(&request).await.unwrap();

        let calls = pipeline.provider().calls();
        assert!(calls[0].prompt.contains(
            "Using a custom template, create a website with these sections: Hero and pricing"
        ));
    }

    #[tokio::test]
    async fn test_js_is_always_empty() {
        let provider = MockProvider::new()
            .with_response(THEME_PROMPT_NAME, THEME_REPLY)
            .with_response(
                PAGE_PROMPT_NAME,
                r#"{"html": "<p>x</p>", "css": "p {}", "js": "alert(1)"}"#,
            );
        let pipeline = SitePipeline::new(provider);

        let site = pipeline.generate(&nova_request()).await.unwrap();
        assert_eq!(site.js, "");
        assert!(!site.document().contains("<script>"));
    }

    #[tokio::test]
    async fn test_theme_failure_skips_page_step() {
        let provider = MockProvider::new()
            .with_failure(THEME_PROMPT_NAME, "upstream unavailable")
            .with_response(PAGE_PROMPT_NAME, PAGE_REPLY);
        let pipeline = SitePipeline::new(provider);

        let err = pipeline.generate(&nova_request()).await.unwrap_err();

        assert_eq!(err.to_string(), GENERATION_FAILED_MESSAGE);
        assert!(matches!(err.cause(), Some(GenesiteError::ProviderError(_))));
        assert_eq!(pipeline.provider().call_names(), vec![THEME_PROMPT_NAME]);
    }

    #[tokio::test]
    async fn test_page_missing_html_is_generation_error() {
        let provider = MockProvider::new()
            .with_response(THEME_PROMPT_NAME, THEME_REPLY)
            .with_response(PAGE_PROMPT_NAME, r#"{"css": "body {}"}"#);
        let pipeline = SitePipeline::new(provider);

        let err = pipeline.generate(&nova_request()).await.unwrap_err();

        assert!(matches!(err, GenesiteError::Generation { .. }));
        assert!(matches!(err.cause(), Some(GenesiteError::MissingField(ref f)) if f == "html"));
    }

    #[tokio::test]
    async fn test_page_missing_css_is_generation_error() {
        let provider = MockProvider::new()
            .with_response(THEME_PROMPT_NAME, THEME_REPLY)
            .with_response(PAGE_PROMPT_NAME, r#"{"html": "<main></main>"}"#);
        let pipeline = SitePipeline::new(provider);

        let err = pipeline.generate(&nova_request()).await.unwrap_err();
        assert!(matches!(err.cause(), Some(GenesiteError::MissingField(ref f)) if f == "css"));
    }

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
    }

    impl Recorder {
        fn push(&self, event: String) {
            self.events.lock().unwrap().push(event);
        }
    }

    impl PipelineObserver for Arc<Recorder> {
        fn on_start(&self, _id: &str, request: &GenerationRequest) {
            self.push(format!("start:{}", request.website_name));
        }

        fn on_step(&self, _id: &str, step: PipelineStep) {
            self.push(format!("step:{:?}", step));
        }

        fn on_theme(&self, _id: &str, theme: &ThemeSuggestion) {
            self.push(format!("theme:{}", theme.overall_theme));
        }

        fn on_success(&self, _id: &str, _site: &GeneratedSite) {
            self.push("success".to_string());
        }

        fn on_failure(&self, _id: &str, error: &str) {
            self.push(format!("failure:{}", error));
        }
    }

    #[tokio::test]
    async fn test_observer_sees_each_stage() {
        let recorder = Arc::new(Recorder::default());
        let pipeline = SitePipeline::new(working_provider()).with_observer(Arc::clone(&recorder));

        pipeline.generate(&nova_request()).await.unwrap();

        let events = recorder.events.lock().unwrap().clone();
        assert_eq!(
            events,
            vec![
                "start:Nova Solutions",
                "theme:Deep space command center",
                "step:ThemeSuggestion",
                "step:PageStructure",
                "success",
            ]
        );
    }

    #[tokio::test]
    async fn test_observer_gets_underlying_cause() {
        let recorder = Arc::new(Recorder::default());
        let provider = MockProvider::new().with_failure(THEME_PROMPT_NAME, "quota exceeded");
        let pipeline = SitePipeline::new(provider).with_observer(Arc::clone(&recorder));

        pipeline.generate(&nova_request()).await.unwrap_err();

        let events = recorder.events.lock().unwrap().clone();
        assert_eq!(events.last().unwrap(), "failure:AI provider error: quota exceeded");
    }
}
