use crate::error::ApiError;
use crate::pipeline::{AnswerBundle, Pipeline};
use axum::error_handling::HandleErrorLayer;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{BoxError, Json, Router};
use presence_web::{ExtractedContent, SearchResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower::timeout::TimeoutLayer;
use tower::timeout::error::Elapsed;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
}

impl AppState {
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SummarizeRequest {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub question: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryResult {
    pub summary: String,
}

pub fn build_router(state: AppState, request_timeout: Duration) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health))
        .route("/api/search", post(search))
        .route("/api/fetch-and-extract", post(fetch_and_extract))
        .route("/api/summarize", post(summarize))
        .route("/api/daily-history", get(daily_history))
        .route("/api/answer", post(answer))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(request_failed))
                .layer(TimeoutLayer::new(request_timeout)),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Errors from the outer request limit still leave as an `{error}` body.
async fn request_failed(err: BoxError) -> ApiError {
    if err.is::<Elapsed>() {
        tracing::error!("request timed out");
        ApiError::Upstream {
            stage: None,
            message: "Request timed out".to_string(),
        }
    } else {
        tracing::error!(error = %err, "request failed");
        ApiError::Upstream {
            stage: None,
            message: "Request failed".to_string(),
        }
    }
}

/// A missing, null, non-string or blank field all count as missing, as does
/// a body that does not parse.
fn required<T>(
    body: Result<Json<T>, JsonRejection>,
    field: impl FnOnce(T) -> Option<String>,
    missing: &'static str,
) -> Result<String, ApiError> {
    let Json(body) = body.map_err(|rejection| {
        tracing::debug!(error = %rejection, "request body rejected");
        ApiError::Validation(missing)
    })?;
    match field(body) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ApiError::Validation(missing)),
    }
}

async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
    })
}

async fn search(
    State(state): State<AppState>,
    body: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResult>, ApiError> {
    const MISSING: &str = "Missing query";
    let query = required(body, |b| b.query, MISSING)?;
    let result = state
        .pipeline
        .search(&query)
        .await
        .map_err(|e| ApiError::from_pipeline(e, MISSING, |_| "Search failed".to_string()))?;
    Ok(Json(result))
}

async fn fetch_and_extract(
    State(state): State<AppState>,
    body: Result<Json<ExtractRequest>, JsonRejection>,
) -> Result<Json<ExtractedContent>, ApiError> {
    const MISSING: &str = "Missing url";
    let url = required(body, |b| b.url, MISSING)?;
    let content = state.pipeline.extract(&url).await.map_err(|e| {
        ApiError::from_pipeline(e, MISSING, |e| {
            format!("Fetch and extract failed: {}", e.reason())
        })
    })?;
    Ok(Json(content))
}

async fn summarize(
    State(state): State<AppState>,
    body: Result<Json<SummarizeRequest>, JsonRejection>,
) -> Result<Json<SummaryResult>, ApiError> {
    const MISSING: &str = "Missing text";
    let text = required(body, |b| b.text, MISSING)?;
    let summary = state.pipeline.summarize(&text).await.map_err(|e| {
        ApiError::from_pipeline(e, MISSING, |_| "Summarization failed".to_string())
    })?;
    Ok(Json(SummaryResult { summary }))
}

async fn daily_history(State(state): State<AppState>) -> Result<Json<AnswerBundle>, ApiError> {
    let bundle = state.pipeline.daily_history().await.map_err(|e| {
        let message = "Failed to load daily history.";
        match ApiError::from_pipeline(e, message, |_| message.to_string()) {
            ApiError::Validation(msg) => ApiError::Upstream {
                stage: None,
                message: msg.to_string(),
            },
            other => other,
        }
    })?;
    Ok(Json(bundle))
}

async fn answer(
    State(state): State<AppState>,
    body: Result<Json<AnswerRequest>, JsonRejection>,
) -> Result<Json<AnswerBundle>, ApiError> {
    const MISSING: &str = "Missing question";
    let question = required(body, |b| b.question, MISSING)?;
    let bundle = state.pipeline.answer(&question).await.map_err(|e| {
        ApiError::from_pipeline(e, MISSING, |e| match e.stage() {
            Some(stage) => format!("{stage} failed: {}", e.reason()),
            None => e.to_string(),
        })
    })?;
    Ok(Json(bundle))
}
