use crate::events::{EventLog, EventStatus, GenerationEvent};
use chrono::Utc;
use genesite_core::{GeneratedSite, GenerationRequest, PipelineObserver, PipelineStep, ThemeSuggestion};

impl PipelineObserver for EventLog {
    fn on_start(&self, id: &str, request: &GenerationRequest) {
        self.record(GenerationEvent {
            id: id.to_string(),
            timestamp: Utc::now(),
            finished_at: None,
            website_name: request.website_name.clone(),
            template: request.template_label().to_string(),
            content_style: request.content_style.to_string(),
            steps: Vec::new(),
            theme: None,
            html_bytes: None,
            css_bytes: None,
            error: None,
            status: EventStatus::Generating,
        });
    }

    fn on_step(&self, id: &str, step: PipelineStep) {
        self.update(id, |event| event.steps.push(step));
    }

    fn on_theme(&self, id: &str, theme: &ThemeSuggestion) {
        self.update(id, |event| event.theme = Some(theme.clone()));
    }

    fn on_success(&self, id: &str, site: &GeneratedSite) {
        self.update(id, |event| {
            event.html_bytes = Some(site.html.len());
            event.css_bytes = Some(site.css.len());
            event.finished_at = Some(Utc::now());
            event.status = EventStatus::Success;
        });
    }

    fn on_failure(&self, id: &str, error: &str) {
        self.update(id, |event| {
            event.error = Some(error.to_string());
            event.finished_at = Some(Utc::now());
            event.status = EventStatus::Failed;
        });
    }
}
