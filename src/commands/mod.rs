//! HTTP routes for the workout generator

pub mod generate;
pub mod rules;

use crate::llm::GatewayError;
use crate::state::AppState;
use axum::{
  extract::rejection::JsonRejection,
  http::StatusCode,
  response::{Html, IntoResponse, Response},
  routing::{get, post},
  Json, Router,
};
use serde_json::json;
use std::any::Any;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

const INDEX_HTML: &str = include_str!("../../static/index.html");

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

/// Errors returned to HTTP callers as `{"error": "<message>"}`
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
  #[error("Invalid request body: {0}")]
  MalformedRequestBody(String),

  #[error(transparent)]
  Gateway(#[from] GatewayError),

  #[error("Internal server error")]
  Internal,
}

impl ApiError {
  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::MalformedRequestBody(_) => StatusCode::BAD_REQUEST,
      ApiError::Gateway(GatewayError::MissingCredential) => StatusCode::INTERNAL_SERVER_ERROR,
      ApiError::Gateway(_) => StatusCode::BAD_GATEWAY,
      ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self {
    ApiError::MalformedRequestBody(rejection.body_text())
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
  }
}

/// ---------------------------------------------------------------------------
/// Router
/// ---------------------------------------------------------------------------

pub fn router(state: Arc<AppState>) -> Router {
  with_boundary(
    Router::new()
      .route("/", get(index))
      .route("/health", get(health))
      .route("/generate", post(generate::generate_workout))
      .route("/generate/rules", post(rules::generate_rule_plan))
      .with_state(state),
  )
}

/// Outermost layers: request tracing and conversion of panics into a 500
pub fn with_boundary(router: Router) -> Router {
  router
    .layer(CatchPanicLayer::custom(handle_panic))
    .layer(TraceLayer::new_for_http())
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
  let detail = if let Some(message) = err.downcast_ref::<String>() {
    message.clone()
  } else if let Some(message) = err.downcast_ref::<&str>() {
    message.to_string()
  } else {
    "unknown panic payload".to_string()
  };

  error!(panic = %detail, "Request handler panicked");
  ApiError::Internal.into_response()
}

async fn index() -> Html<&'static str> {
  Html(INDEX_HTML)
}

async fn health() -> Json<serde_json::Value> {
  Json(json!({ "status": "ok" }))
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
