use super::ApiError;
use crate::models::GenerateRequest;
use crate::rules::generate_rule_based_plan;
use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Serialize)]
pub struct RulePlanResponse {
  pub workout_plan: Vec<String>,
}

/// `POST /generate/rules`
pub async fn generate_rule_plan(
  payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<RulePlanResponse>, ApiError> {
  let Json(request) = payload?;
  let workout_plan = generate_rule_based_plan(&request);
  debug!(lines = workout_plan.len(), "Rule-based plan generated");
  Ok(Json(RulePlanResponse { workout_plan }))
}

#[cfg(test)]
mod tests {
  use crate::commands::router;
  use crate::test_utils::{post_json, test_state};
  use axum::http::StatusCode;
  use serde_json::json;

  #[tokio::test]
  async fn test_rule_plan_endpoint() {
    let app = router(test_state("http://127.0.0.1:9", None));
    let (status, body) = post_json(
      app,
      "/generate/rules",
      r#"{"goal": "perdere peso", "livello": "intermedio", "giorni": "5", "injuries": "spalla"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
      body,
      json!({"workout_plan": [
        "Cardio: 30 minuti a intensità moderata",
        "Esercizi di forza: 3 set di squat, affondi, push-up",
        "Esercizi con pesi leggeri: deadlift, panca, squat",
        "Allenamento 5 giorni a settimana: giorni alternati di forza e cardio",
        "Aggiustamenti: Evitare esercizi che causano spalla"
      ]})
    );
  }

  #[tokio::test]
  async fn test_rule_plan_needs_no_credential() {
    let app = router(test_state("http://127.0.0.1:9", None));
    let (status, body) = post_json(app, "/generate/rules", "{}").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"workout_plan": []}));
  }

  #[tokio::test]
  async fn test_rule_plan_rejects_malformed_body() {
    let app = router(test_state("http://127.0.0.1:9", None));
    let (status, body) = post_json(app, "/generate/rules", "[1, 2").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
  }
}
