//! AI workout generation: prompt, inference, recovery

use super::ApiError;
use crate::models::{GenerateRequest, UserFitnessProfile, WorkoutPlan};
use crate::prompt::build_workout_prompt;
use crate::recovery::RecoveryTier;
use crate::state::AppState;
use axum::extract::{rejection::JsonRejection, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

const PROMPT_PREVIEW_CHARS: usize = 500;

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
  pub success: bool,
  pub workout: WorkoutPlan,
  pub debug_info: DebugInfo,
}

/// Diagnostics returned alongside every generated plan
#[derive(Debug, Serialize)]
pub struct DebugInfo {
  pub prompt_preview: String,
  pub raw_response: String,
  pub model: String,
  pub recovery_tier: RecoveryTier,
  pub generated_at: DateTime<Utc>,
}

/// `POST /generate`
///
/// Gateway failures are returned as-is and recovery is skipped.
pub async fn generate_workout(
  State(state): State<Arc<AppState>>,
  payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, ApiError> {
  let Json(request) = payload?;

  let profile = UserFitnessProfile::from(&request);
  let prompt = build_workout_prompt(&profile);

  let raw_response = state.gateway.generate(&prompt).await.map_err(|e| {
    warn!(error = %e, "Inference gateway failed");
    e
  })?;

  let recovery = state.recovery.recover(&raw_response);
  info!(
    tier = ?recovery.tier,
    days = recovery.plan.len(),
    goal = %profile.goal,
    "Workout plan generated"
  );

  Ok(Json(GenerateResponse {
    success: true,
    workout: recovery.plan,
    debug_info: DebugInfo {
      prompt_preview: prompt_preview(&prompt),
      raw_response,
      model: state.gateway.model_id().to_string(),
      recovery_tier: recovery.tier,
      generated_at: Utc::now(),
    },
  }))
}

/// First characters of the prompt, with `...` appended when cut
pub fn prompt_preview(prompt: &str) -> String {
  let mut chars = prompt.chars();
  let preview: String = chars.by_ref().take(PROMPT_PREVIEW_CHARS).collect();
  if chars.next().is_some() {
    format!("{}...", preview)
  } else {
    preview
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::commands::router;
  use crate::test_utils::{post_json, test_state, SAMPLE_PLAN_JSON, TEST_MODEL_ID};
  use axum::http::StatusCode;
  use mockito::Matcher;
  use serde_json::{json, Value};

  const MODEL_PATH: &str = "/models/test-org/test-model";

  fn generated(text: &str) -> String {
    json!([{ "generated_text": text }]).to_string()
  }

  #[test]
  fn test_prompt_preview_truncates_on_char_boundary() {
    let short = "short prompt";
    assert_eq!(prompt_preview(short), short);

    let long = "è".repeat(PROMPT_PREVIEW_CHARS + 10);
    let preview = prompt_preview(&long);
    assert!(preview.ends_with("..."));
    assert_eq!(preview.chars().count(), PROMPT_PREVIEW_CHARS + 3);
  }

  #[tokio::test]
  async fn test_missing_credential_bypasses_recovery() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
      .mock("POST", Matcher::Any)
      .expect(0)
      .create_async()
      .await;

    let app = router(test_state(&server.url(), None));
    let (status, body) = post_json(app, "/generate", r#"{"goal": "strength"}"#).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Inference API token not configured"}));
    mock.assert_async().await;
  }

  #[tokio::test]
  async fn test_structured_plan_round_trip() {
    let mut server = mockito::Server::new_async().await;
    server
      .mock("POST", MODEL_PATH)
      .match_body(Matcher::Regex("6-8".to_string()))
      .with_status(200)
      .with_body(generated(SAMPLE_PLAN_JSON))
      .create_async()
      .await;

    let app = router(test_state(&server.url(), Some("test-token")));
    let (status, body) = post_json(
      app,
      "/generate",
      r#"{"age": 28, "weight": 75, "goal": "strength", "livello": "intermediate", "giorni": "2"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));

    let expected: Value = serde_json::from_str(SAMPLE_PLAN_JSON).unwrap();
    assert_eq!(body["workout"], expected);
    assert_eq!(body["debug_info"]["recovery_tier"], json!("structured"));
    assert_eq!(body["debug_info"]["model"], json!(TEST_MODEL_ID));
    assert_eq!(body["debug_info"]["raw_response"], json!(SAMPLE_PLAN_JSON));
    assert!(body["debug_info"]["prompt_preview"]
      .as_str()
      .unwrap()
      .starts_with("You are an expert personal trainer"));
  }

  #[tokio::test]
  async fn test_prose_response_is_salvaged() {
    let mut server = mockito::Server::new_async().await;
    server
      .mock("POST", MODEL_PATH)
      .with_status(200)
      .with_body(json!({"generated_text": "Try this. Squat: 4 sets x 8 reps"}).to_string())
      .create_async()
      .await;

    let app = router(test_state(&server.url(), Some("test-token")));
    let (status, body) = post_json(app, "/generate", "{}").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["debug_info"]["recovery_tier"], json!("extracted"));
    assert_eq!(
      body["workout"]["day_1"]["exercises"][0],
      json!({"name": "Squat", "sets": 4, "reps": 8, "weight": 0.0})
    );
  }

  #[tokio::test]
  async fn test_refusal_is_passed_through_raw() {
    let mut server = mockito::Server::new_async().await;
    server
      .mock("POST", MODEL_PATH)
      .with_status(200)
      .with_body(generated("I cannot help with that."))
      .create_async()
      .await;

    let app = router(test_state(&server.url(), Some("test-token")));
    let (status, body) = post_json(app, "/generate", "{}").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["debug_info"]["recovery_tier"], json!("raw"));
    assert_eq!(
      body["workout"]["raw_response"]["raw_text"],
      json!("I cannot help with that.")
    );
    assert_eq!(body["workout"]["raw_response"]["exercises"], json!([]));
  }

  #[tokio::test]
  async fn test_provider_failure_is_bad_gateway() {
    let mut server = mockito::Server::new_async().await;
    server
      .mock("POST", MODEL_PATH)
      .with_status(401)
      .with_body(r#"{"error": "Invalid credentials in Authorization header"}"#)
      .create_async()
      .await;

    let app = router(test_state(&server.url(), Some("bad-token")));
    let (status, body) = post_json(app, "/generate", "{}").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("401"));
    assert!(message.contains("Invalid credentials"));
    assert!(body.get("workout").is_none());
  }

  #[tokio::test]
  async fn test_malformed_body_is_rejected() {
    let app = router(test_state("http://127.0.0.1:9", Some("test-token")));
    let (status, body) = post_json(app, "/generate", "{not json").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
      .as_str()
      .unwrap()
      .starts_with("Invalid request body"));
  }
}
