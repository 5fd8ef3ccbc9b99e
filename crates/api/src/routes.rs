use std::sync::Arc;

use axum::{
    extract::{
        rejection::{FormRejection, JsonRejection},
        State,
    },
    http::StatusCode,
    response::Html,
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use verify::Report;

use crate::error::ApiError;
use crate::metrics::{Metrics, MetricsSnapshot};
use crate::pipeline::FactCheckPipeline;
use crate::render::{self, FormInput, Outcome};

pub struct AppState {
    pub pipeline: FactCheckPipeline,
    pub metrics: Arc<Metrics>,
    pub model_name: String,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    llm: String,
    scraper: &'static str,
    search: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct CheckForm {
    #[serde(default)]
    mode: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
pub struct CheckRequest {
    url: Option<String>,
    text: Option<String>,
}

enum Input {
    Url(String),
    Text(String),
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/check", post(check_form))
        .route("/api/check", post(check_json))
        .route("/health", get(health_check))
        .route("/metrics", get(get_metrics))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn index() -> Html<String> {
    Html(render::page(&FormInput::default(), None))
}

async fn check_form(
    State(state): State<Arc<AppState>>,
    form: Result<Form<CheckForm>, FormRejection>,
) -> (StatusCode, Html<String>) {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => return error_page(&FormInput::default(), ApiError::from(rejection)),
    };
    let text_mode = form.mode == "text";
    let input = FormInput {
        text_mode,
        url: form.url,
        text: form.text,
    };

    let requested = if text_mode {
        non_blank(&input.text).map(Input::Text).ok_or(ApiError::BadInput("Please enter some text"))
    } else {
        non_blank(&input.url).map(Input::Url).ok_or(ApiError::BadInput("Please enter a URL"))
    };

    let result = match requested {
        Ok(requested) => run(&state, requested).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(report) => (StatusCode::OK, Html(render::page(&input, Some(Outcome::Report(&report))))),
        Err(e) => error_page(&input, e),
    }
}

fn error_page(input: &FormInput, e: ApiError) -> (StatusCode, Html<String>) {
    e.log();
    let message = e.user_message();
    (e.status(), Html(render::page(input, Some(Outcome::Error(&message)))))
}

async fn check_json(
    State(state): State<Arc<AppState>>,
    req: Result<Json<CheckRequest>, JsonRejection>,
) -> Result<Json<Report>, ApiError> {
    let Json(req) = req?;
    let url = req.url.as_deref().and_then(non_blank);
    let text = req.text.as_deref().and_then(non_blank);

    let requested = match (url, text) {
        (Some(url), None) => Input::Url(url),
        (None, Some(text)) => Input::Text(text),
        (Some(_), Some(_)) => return Err(ApiError::BadInput("Provide either a URL or text, not both")),
        (None, None) => return Err(ApiError::BadInput("Please enter a URL or some text")),
    };

    run(&state, requested).await.map(Json)
}

async fn run(state: &AppState, input: Input) -> Result<Report, ApiError> {
    let result = match input {
        Input::Url(url) => state.pipeline.check_url(&url).await,
        Input::Text(text) => state.pipeline.check_text(&text).await,
    };
    state.metrics.record_request(result.is_ok());
    Ok(result?)
}

fn non_blank(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        llm: state.model_name.clone(),
        scraper: if state.pipeline.has_scraper() { "firecrawl" } else { "html" },
        search: state.pipeline.search_provider(),
    })
}

async fn get_metrics(State(state): State<Arc<AppState>>) -> Json<MetricsSnapshot> {
    Json(state.metrics.snapshot())
}
