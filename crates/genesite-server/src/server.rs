use crate::events::{EventLog, GenerationEvent};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use genesite_core::gallery::{self, TemplateEntry};
use genesite_core::preview::PREVIEW_SANDBOX;
use genesite_core::{
    AiProvider, FieldError, GenesiteError, SiteForm, SitePipeline, GENERATION_FAILED_MESSAGE,
};
use rust_embed::RustEmbed;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, instrument, warn};

#[derive(RustEmbed)]
#[folder = "assets/"]
struct Assets;

/// Shared handler state.
pub struct AppState<P: AiProvider> {
    pub pipeline: Arc<SitePipeline<P>>,
    pub events: EventLog,
}

impl<P: AiProvider> Clone for AppState<P> {
    fn clone(&self) -> Self {
        Self {
            pipeline: Arc::clone(&self.pipeline),
            events: self.events.clone(),
        }
    }
}

/// Successful generation payload.
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub html: String,
    pub css: String,
    pub js: String,
    /// Ready-to-render preview document.
    pub document: String,
    /// `sandbox` attribute for the frame that renders `document`.
    pub sandbox: &'static str,
}

/// Errors surfaced to the page.
#[derive(Debug)]
pub enum ApiError {
    /// The body was not a JSON form.
    InvalidRequest { status: StatusCode, message: String },
    /// The form was rejected; nothing reached the model.
    Validation(Vec<FieldError>),
    /// The pipeline failed. The cause stays in the logs and the event log.
    Generation,
}

impl From<GenesiteError> for ApiError {
    fn from(e: GenesiteError) -> Self {
        match e {
            GenesiteError::Validation(fields) => ApiError::Validation(fields),
            _ => ApiError::Generation,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidRequest {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::InvalidRequest { status, message } => (
                status,
                Json(json!({ "error": "invalid_request", "message": message })),
            )
                .into_response(),
            ApiError::Validation(fields) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "error": "validation", "fields": fields })),
            )
                .into_response(),
            ApiError::Generation => (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": "generation", "message": GENERATION_FAILED_MESSAGE })),
            )
                .into_response(),
        }
    }
}

/// HTTP front end for a [`SitePipeline`].
pub struct GenesiteServer<P: AiProvider> {
    state: AppState<P>,
}

impl<P: AiProvider + 'static> GenesiteServer<P> {
    /// Wire a pipeline over `provider`, reporting into a fresh event log.
    pub fn new(provider: P) -> Self {
        let events = EventLog::new();
        let pipeline = SitePipeline::new(provider).with_observer(events.clone());

        Self {
            state: AppState {
                pipeline: Arc::new(pipeline),
                events,
            },
        }
    }

    pub fn events(&self) -> &EventLog {
        &self.state.events
    }

    pub fn router(&self) -> Router {
        create_router(self.state.clone())
    }

    /// Serve until Ctrl+C.
    pub async fn start(self, addr: &str) -> std::io::Result<()> {
        let app = self.router();

        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("Genesite available at http://{}", listener.local_addr()?);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

/// Build the router: API routes, then the embedded page as fallback.
pub fn create_router<P: AiProvider + 'static>(state: AppState<P>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/templates", get(list_templates))
        .route("/api/generate", post(generate::<P>))
        .route("/api/export", post(export))
        .route("/api/events", get(list_events::<P>))
        .route("/api/events/:id", get(get_event::<P>))
        .fallback(static_handler)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

#[instrument(skip_all)]
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

async fn list_templates() -> Json<&'static [TemplateEntry]> {
    Json(gallery::templates())
}

async fn generate<P: AiProvider + 'static>(
    State(state): State<AppState<P>>,
    payload: Result<Json<SiteForm>, JsonRejection>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let Json(form) = payload.map_err(|rejection| {
        warn!("Rejected body: {}", rejection.body_text());
        ApiError::from(rejection)
    })?;

    let request = form.validate().map_err(|e| {
        warn!("Rejected form: {}", e);
        ApiError::from(e)
    })?;

    let site = state.pipeline.generate(&request).await?;
    let document = site.document();

    Ok(Json(GenerateResponse {
        html: site.html,
        css: site.css,
        js: site.js,
        document,
        sandbox: PREVIEW_SANDBOX,
    }))
}

async fn export() -> impl IntoResponse {
    (
        StatusCode::NOT_IMPLEMENTED,
        Json(json!({
            "title": "Coming Soon!",
            "description": "Zip download is not yet implemented."
        })),
    )
}

async fn list_events<P: AiProvider + 'static>(
    State(state): State<AppState<P>>,
) -> Json<Vec<GenerationEvent>> {
    Json(state.events.list())
}

async fn get_event<P: AiProvider + 'static>(
    Path(id): Path<String>,
    State(state): State<AppState<P>>,
) -> Result<Json<GenerationEvent>, StatusCode> {
    state.events.get(&id).map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn static_handler(uri: Uri) -> impl IntoResponse {
    let path = uri.path().trim_start_matches('/');

    if path.is_empty() || path == "index.html" {
        return index_html().await;
    }

    match Assets::get(path) {
        Some(content) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            ([(header::CONTENT_TYPE, mime.as_ref())], content.data).into_response()
        }
        None => (StatusCode::NOT_FOUND, "Not Found").into_response(),
    }
}

async fn index_html() -> Response {
    match Assets::get("index.html") {
        Some(content) => Html(content.data).into_response(),
        None => (StatusCode::NOT_FOUND, "Not Found").into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventStatus;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use genesite_core::flows::{PAGE_PROMPT_NAME, THEME_PROMPT_NAME};
    use genesite_core::MockProvider;
    use serde_json::Value;
    use tower::ServiceExt;

    const THEME_REPLY: &str = r##"{"colorPalette": "#0d0221, #7b2cbf", "typography": "Orbitron", "iconography": "Line icons", "visualEffects": "Neon glow", "overallTheme": "Night city"}"##;
    const PAGE_REPLY: &str = r#"{"html": "<h1>Nova Solutions</h1>", "css": "h1 { color: #7b2cbf; }"}"#;

    fn working_provider() -> MockProvider {
        MockProvider::new()
            .with_response(THEME_PROMPT_NAME, THEME_REPLY)
            .with_response(PAGE_PROMPT_NAME, PAGE_REPLY)
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn nova_form() -> Value {
        json!({
            "websiteName": "Nova Solutions",
            "sections": "Hero, Features, Contact",
            "colorPreferences": "purple and black",
            "contentStyle": "techy",
            "template": "template-startup"
        })
    }

    #[tokio::test]
    async fn test_health() {
        let server = GenesiteServer::new(MockProvider::new());
        let (status, body) = send(server.router(), get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "healthy" }));
    }

    #[tokio::test]
    async fn test_templates_lists_gallery() {
        let server = GenesiteServer::new(MockProvider::new());
        let (status, body) = send(server.router(), get("/api/templates")).await;
        assert_eq!(status, StatusCode::OK);

        let entries = body.as_array().unwrap();
        assert_eq!(entries.len(), gallery::templates().len());
        assert_eq!(entries[0]["id"], "template-startup");
        assert!(entries[0]["imageUrl"].is_string());
    }

    #[tokio::test]
    async fn test_generate_returns_site_and_document() {
        let server = GenesiteServer::new(working_provider());
        let (status, body) = send(server.router(), post_json("/api/generate", nova_form())).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["html"], "<h1>Nova Solutions</h1>");
        assert_eq!(body["css"], "h1 { color: #7b2cbf; }");
        assert_eq!(body["js"], "");
        assert_eq!(body["sandbox"], "allow-scripts");
        assert_eq!(
            body["document"],
            "<html><head><style>h1 { color: #7b2cbf; }</style></head><body><h1>Nova Solutions</h1></body></html>"
        );

        let events = server.events().list();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].status, EventStatus::Success);
        assert_eq!(events[0].template, "template-startup");
    }

    #[tokio::test]
    async fn test_invalid_form_is_422_and_never_calls_provider() {
        let server = GenesiteServer::new(working_provider());
        let form = json!({
            "websiteName": "N",
            "sections": "Hero",
            "colorPreferences": "red",
            "contentStyle": "techy"
        });

        let (status, body) = send(server.router(), post_json("/api/generate", form)).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "validation");
        let fields: Vec<_> = body["fields"]
            .as_array()
            .unwrap()
            .iter()
            .map(|f| f["field"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(fields, vec!["websiteName", "sections", "colorPreferences"]);
        assert!(server.state.pipeline.provider().calls().is_empty());
        assert!(server.events().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_body_is_json_error() {
        let server = GenesiteServer::new(working_provider());
        let request = Request::builder()
            .method("POST")
            .uri("/api/generate")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"websiteName\": "))
            .unwrap();

        let (status, body) = send(server.router(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid_request");
        assert!(body["message"].is_string());

        let request = Request::builder()
            .method("POST")
            .uri("/api/generate")
            .body(Body::from(nova_form().to_string()))
            .unwrap();

        let (status, body) = send(server.router(), request).await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(body["error"], "invalid_request");
        assert!(server.state.pipeline.provider().calls().is_empty());
    }

    #[tokio::test]
    async fn test_provider_failure_is_502_with_fixed_message() {
        let provider = MockProvider::new().with_failure(THEME_PROMPT_NAME, "quota exceeded");
        let server = GenesiteServer::new(provider);

        let (status, body) = send(server.router(), post_json("/api/generate", nova_form())).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(
            body,
            json!({ "error": "generation", "message": GENERATION_FAILED_MESSAGE })
        );

        let event = &server.events().list()[0];
        assert_eq!(event.status, EventStatus::Failed);
        assert!(event.error.as_deref().unwrap().contains("quota exceeded"));
    }

    #[tokio::test]
    async fn test_export_is_not_implemented() {
        let server = GenesiteServer::new(MockProvider::new());
        let (status, body) = send(server.router(), post_json("/api/export", json!({}))).await;
        assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
        assert_eq!(body["title"], "Coming Soon!");
        assert_eq!(body["description"], "Zip download is not yet implemented.");
    }

    #[tokio::test]
    async fn test_event_lookup() {
        let server = GenesiteServer::new(working_provider());
        send(server.router(), post_json("/api/generate", nova_form())).await;

        let id = server.events().list()[0].id.clone();
        let (status, body) = send(server.router(), get(&format!("/api/events/{}", id))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["websiteName"], "Nova Solutions");
        assert_eq!(body["steps"], json!(["theme_suggestion", "page_structure"]));

        let (status, _) = send(server.router(), get("/api/events/missing")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_index_page_is_served() {
        let server = GenesiteServer::new(MockProvider::new());
        let response = server.router().oneshot(get("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let page = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(page.contains("id=\"site-form\""));
    }
}
