//! Test utilities and helpers for unit and router testing
//!
//! This module provides common test infrastructure including:
//! - Mock data factories
//! - Canned model responses
//! - In-process HTTP helpers for the router

use crate::config::InferenceConfig;
use crate::models::UserFitnessProfile;
use crate::state::AppState;
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub const TEST_MODEL_ID: &str = "test-org/test-model";

/// ---------------------------------------------------------------------------
/// Model Responses
/// ---------------------------------------------------------------------------

/// A well-formed two-day plan, compact so it re-serializes byte for byte
pub const SAMPLE_PLAN_JSON: &str = r#"{"day_1":{"name":"Legs","exercises":[{"name":"Squat","sets":4,"reps":8,"weight":60},{"name":"Lunges","sets":3,"reps":12,"weight":20}]},"day_2":{"name":"Push","exercises":[{"name":"Bench press","sets":4,"reps":8,"weight":50}]}}"#;

/// Prose answer with more exercise lines than the extractor keeps
pub const SAMPLE_PROSE_WITH_EXERCISES: &str = "Here is a simple routine you can follow:\n\
Squat: 4 sets x 8 reps\n\
Bench press: 3 sets x 10 reps\n\
Barbell row: 3 sets x 10 reps\n\
Overhead press: 3 sets x 8 reps\n\
Deadlift: 3 sets x 5 reps\n\
Lunges: 3 sets x 12 reps\n\
Plank: 3 sets x 45 reps\n\
Dips: 3 sets x 12 reps\n\
Rest 90 seconds between sets.";

/// ---------------------------------------------------------------------------
/// Mock Data Factories
/// ---------------------------------------------------------------------------

/// Create a mock profile with every field populated
pub fn mock_profile() -> UserFitnessProfile {
  UserFitnessProfile {
    age: 30,
    weight_kg: 80.0,
    goal: "hypertrophy".to_string(),
    level: "intermediate".to_string(),
    days_per_week: 3,
    preferences: "squat, push-up".to_string(),
    injuries: "knee".to_string(),
  }
}

/// Inference config pointed at a mock server
pub fn mock_inference_config(base_url: &str, token: Option<&str>) -> InferenceConfig {
  InferenceConfig {
    api_token: token.map(str::to_string),
    model_id: TEST_MODEL_ID.to_string(),
    base_url: base_url.to_string(),
  }
}

pub fn test_state(base_url: &str, token: Option<&str>) -> Arc<AppState> {
  Arc::new(AppState::new(mock_inference_config(base_url, token)))
}

/// ---------------------------------------------------------------------------
/// Router Helpers
/// ---------------------------------------------------------------------------

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
  let response = app.oneshot(request).await.expect("router response");
  let status = response.status();
  let bytes = to_bytes(response.into_body(), usize::MAX)
    .await
    .expect("response body");
  (status, bytes.to_vec())
}

/// POST a raw JSON body; the response body is parsed as JSON (`Null` if it isn't)
pub async fn post_json(app: Router, uri: &str, body: &str) -> (StatusCode, Value) {
  let request = Request::builder()
    .method(Method::POST)
    .uri(uri)
    .header(header::CONTENT_TYPE, "application/json")
    .body(Body::from(body.to_string()))
    .expect("request");
  let (status, bytes) = send(app, request).await;
  (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

pub async fn get_text(app: Router, uri: &str) -> (StatusCode, String) {
  let request = Request::builder()
    .method(Method::GET)
    .uri(uri)
    .body(Body::empty())
    .expect("request");
  let (status, bytes) = send(app, request).await;
  (status, String::from_utf8_lossy(&bytes).into_owned())
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_sample_plan_is_valid_json_object() {
    let value: Value = serde_json::from_str(SAMPLE_PLAN_JSON).unwrap();
    let object = value.as_object().unwrap();
    assert_eq!(object.len(), 2);
    assert!(object.contains_key("day_1"));
    assert!(object.contains_key("day_2"));
  }

  #[test]
  fn test_mock_inference_config_has_credential_only_with_token() {
    assert!(mock_inference_config("http://localhost", Some("t")).has_credential());
    assert!(!mock_inference_config("http://localhost", None).has_credential());
  }
}
