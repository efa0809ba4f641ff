//! Run the full pipeline against the mock provider and print the preview
//! document. Useful for checking prompt wiring without an API key.
//!
//! ```bash
//! cargo run -p genesite-core --example mock_pipeline
//! ```

use genesite_core::flows::{PAGE_PROMPT_NAME, THEME_PROMPT_NAME};
use genesite_core::{MockProvider, SiteForm, SitePipeline};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let provider = MockProvider::new()
        .with_response(
            THEME_PROMPT_NAME,
            r##"{"colorPalette": "#0d0221, #7b2cbf", "typography": "Orbitron", "iconography": "Line icons", "visualEffects": "Neon glow", "overallTheme": "Night city"}"##,
        )
        .with_response(
            PAGE_PROMPT_NAME,
            r#"{"html": "<header><h1>Nova Solutions</h1></header>", "css": "h1 { color: #7b2cbf; }"}"#,
        );

    let form = SiteForm {
        website_name: "Nova Solutions".to_string(),
        ..SiteForm::default()
    };

    let pipeline = SitePipeline::new(provider);
    let site = pipeline.generate(&form.validate()?).await?;

    for call in pipeline.provider().calls() {
        println!("--- {} ---\n{}", call.name, call.prompt);
    }
    println!("--- preview ---\n{}", site.document());

    Ok(())
}
