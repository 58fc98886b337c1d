//! HTTP route handlers for the shopping assistant API.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::services::ServeDir;

use crate::llm::GenerationError;
use crate::orchestrator::{self, RecommendationBundle};

use super::state::AppState;

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Create the API router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    let static_files = ServeDir::new(&state.static_dir);
    Router::new()
        .route("/health", get(health_check))
        .route("/get_recommendations", post(get_recommendations))
        .route("/ask_product_ai", post(ask_product_ai))
        .fallback_service(static_files)
        .with_state(state)
}

/// Health check endpoint.
async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "shopping-assistant",
        "model": state.model_name,
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Error body returned on every failure.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable message.
    pub error: String,
}

impl ErrorResponse {
    fn reply(status: StatusCode, error: impl Into<String>) -> ApiError {
        (status, Json(Self { error: error.into() }))
    }
}

impl From<GenerationError> for ErrorResponse {
    fn from(err: GenerationError) -> Self {
        Self {
            error: err.to_string(),
        }
    }
}

/// Recommendation request.
#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    /// What the user is shopping for.
    pub shopping_query: Option<Value>,
    /// Free-form budget level.
    pub budget: Option<Value>,
}

/// Follow-up question request.
#[derive(Debug, Deserialize)]
pub struct FollowUpRequest {
    /// Product markdown the question refers to.
    pub context: Option<Value>,
    /// The question.
    pub query: Option<Value>,
}

/// Follow-up answer response.
#[derive(Debug, Serialize)]
pub struct FollowUpResponse {
    /// Markdown answer.
    pub answer_markdown: String,
}

/// Text of a form field, or `None` when it is absent or empty.
///
/// `null`, `false`, `0`, `""`, `[]` and `{}` count as empty. Strings pass
/// through untouched; other values are rendered as they would be in a prompt.
fn form_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null | Value::Bool(false) => None,
        Value::Bool(true) => Some("True".to_string()),
        Value::String(s) => (!s.is_empty()).then(|| s.clone()),
        Value::Number(n) => (n.as_f64() != Some(0.0)).then(|| n.to_string()),
        Value::Array(items) if items.is_empty() => None,
        Value::Object(fields) if fields.is_empty() => None,
        other => Some(other.to_string()),
    }
}

/// Both fields present and non-empty.
fn required_pair(a: Option<&Value>, b: Option<&Value>) -> Option<(String, String)> {
    Some((form_text(a)?, form_text(b)?))
}

fn bad_body(rejection: &JsonRejection) -> ApiError {
    ErrorResponse::reply(StatusCode::BAD_REQUEST, rejection.body_text())
}

/// Handle the five-stage recommendation flow.
async fn get_recommendations(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RecommendationRequest>, JsonRejection>,
) -> Result<Json<RecommendationBundle>, ApiError> {
    let Json(request) = payload.map_err(|e| bad_body(&e))?;
    let (query, budget) =
        required_pair(request.shopping_query.as_ref(), request.budget.as_ref())
            .ok_or_else(|| ErrorResponse::reply(StatusCode::BAD_REQUEST, "Missing form data"))?;

    orchestrator::recommend(state.backend.as_ref(), &query, &budget)
        .await
        .map(Json)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse::from(e))))
}

/// Handle follow-up questions.
async fn ask_product_ai(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<FollowUpRequest>, JsonRejection>,
) -> Result<Json<FollowUpResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| bad_body(&e))?;
    let (context, query) = required_pair(request.context.as_ref(), request.query.as_ref())
        .ok_or_else(|| {
            ErrorResponse::reply(StatusCode::BAD_REQUEST, "Missing context or query.")
        })?;

    let answer_markdown = orchestrator::answer_follow_up(state.backend.as_ref(), &context, &query)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse::from(e))))?;

    Ok(Json(FollowUpResponse { answer_markdown }))
}
