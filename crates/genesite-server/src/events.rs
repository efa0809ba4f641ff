use chrono::{DateTime, Utc};
use dashmap::DashMap;
use genesite_core::{PipelineStep, ThemeSuggestion};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    Generating,
    Success,
    Failed,
}

/// Diagnostics for one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationEvent {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub website_name: String,
    pub template: String,
    pub content_style: String,
    pub steps: Vec<PipelineStep>,
    pub theme: Option<ThemeSuggestion>,
    pub html_bytes: Option<usize>,
    pub css_bytes: Option<usize>,
    /// Underlying cause; never shown on the form.
    pub error: Option<String>,
    pub status: EventStatus,
}

/// Events kept by [`EventLog::new`].
pub const DEFAULT_EVENT_CAPACITY: usize = 200;

/// In-memory generation log, shared between the pipeline and the API.
///
/// Holds at most `capacity` events; recording past that evicts the oldest.
#[derive(Clone)]
pub struct EventLog {
    events: Arc<DashMap<String, GenerationEvent>>,
    order: Arc<Mutex<VecDeque<String>>>,
    capacity: usize,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_EVENT_CAPACITY)
    }
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: Arc::new(DashMap::new()),
            order: Arc::new(Mutex::new(VecDeque::new())),
            capacity: capacity.max(1),
        }
    }

    pub fn record(&self, event: GenerationEvent) {
        let mut order = self.order.lock().unwrap_or_else(|e| e.into_inner());
        let id = event.id.clone();
        if self.events.insert(id.clone(), event).is_none() {
            order.push_back(id);
        }
        while order.len() > self.capacity {
            if let Some(oldest) = order.pop_front() {
                self.events.remove(&oldest);
            }
        }
    }

    /// Apply `f` to the event with `id`, if it is still in the log.
    pub fn update(&self, id: &str, f: impl FnOnce(&mut GenerationEvent)) {
        if let Some(mut event) = self.events.get_mut(id) {
            f(event.value_mut());
        }
    }

    pub fn get(&self, id: &str) -> Option<GenerationEvent> {
        self.events.get(id).map(|e| e.value().clone())
    }

    /// All events, newest first.
    pub fn list(&self) -> Vec<GenerationEvent> {
        let mut events: Vec<_> = self.events.iter().map(|e| e.value().clone()).collect();
        events.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn event(id: &str, age_secs: i64) -> GenerationEvent {
        GenerationEvent {
            id: id.to_string(),
            timestamp: Utc::now() - Duration::seconds(age_secs),
            finished_at: None,
            website_name: "Nova".to_string(),
            template: "custom".to_string(),
            content_style: "techy".to_string(),
            steps: Vec::new(),
            theme: None,
            html_bytes: None,
            css_bytes: None,
            error: None,
            status: EventStatus::Generating,
        }
    }

    #[test]
    fn test_list_is_newest_first() {
        let log = EventLog::new();
        log.record(event("old", 60));
        log.record(event("new", 0));
        log.record(event("mid", 30));

        let ids: Vec<_> = log.list().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
    }

    #[test]
    fn test_update_missing_id_is_noop() {
        let log = EventLog::new();
        log.update("nope", |e| e.status = EventStatus::Failed);
        assert!(log.is_empty());

        log.record(event("a", 0));
        log.update("a", |e| e.status = EventStatus::Success);
        assert_eq!(log.get("a").unwrap().status, EventStatus::Success);
    }

    #[test]
    fn test_record_evicts_oldest_past_capacity() {
        let log = EventLog::with_capacity(2);
        log.record(event("first", 30));
        log.record(event("second", 20));
        log.record(event("second", 20));
        assert_eq!(log.len(), 2);

        log.record(event("third", 10));
        assert_eq!(log.len(), 2);
        assert!(log.get("first").is_none());

        let ids: Vec<_> = log.list().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["third", "second"]);
    }
}
