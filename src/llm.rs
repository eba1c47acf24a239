//! Inference gateway for AI-generated workout plans
//!
//! This module handles communication with the Hugging Face Inference API
//! (text-generation task). It performs one best-effort call per request and
//! flattens the provider's response envelopes into plain text.

use crate::config::InferenceConfig;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

/// ---------------------------------------------------------------------------
/// Generation Parameters
/// ---------------------------------------------------------------------------

const MAX_NEW_TOKENS: u32 = 1500;
const TEMPERATURE: f64 = 0.3;
const TOP_P: f64 = 0.9;
const REPETITION_PENALTY: f64 = 1.1;
const STOP_SEQUENCES: [&str; 2] = ["</s>", "[INST]"];

/// ---------------------------------------------------------------------------
/// Error Types
/// ---------------------------------------------------------------------------

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
  #[error("Inference API token not configured")]
  MissingCredential,

  #[error("Inference request failed: {0}")]
  Transport(String),

  #[error("Unexpected inference error: {0}")]
  Unknown(String),
}

impl Serialize for GatewayError {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    serializer.serialize_str(&self.to_string())
  }
}

/// ---------------------------------------------------------------------------
/// Inference API Types
/// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
  inputs: &'a str,
  parameters: GenerationParameters,
  options: RequestOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationParameters {
  pub max_new_tokens: u32,
  pub temperature: f64,
  pub top_p: f64,
  pub repetition_penalty: f64,
  pub return_full_text: bool,
  pub stop: Vec<String>,
}

impl Default for GenerationParameters {
  fn default() -> Self {
    Self {
      max_new_tokens: MAX_NEW_TOKENS,
      temperature: TEMPERATURE,
      top_p: TOP_P,
      repetition_penalty: REPETITION_PENALTY,
      return_full_text: false,
      stop: STOP_SEQUENCES.iter().map(|s| s.to_string()).collect(),
    }
  }
}

#[derive(Debug, Serialize)]
struct RequestOptions {
  wait_for_model: bool,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorResponse {
  error: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeneratedText {
  pub generated_text: String,
}

/// Response shapes returned by text-generation endpoints
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum InferenceEnvelope {
  /// `[{"generated_text": "..."}, ...]`
  Batch(Vec<GeneratedText>),
  /// `{"generated_text": "..."}`
  Single(GeneratedText),
  /// Anything else, surfaced in its string form
  Opaque(Value),
}

impl InferenceEnvelope {
  pub fn from_value(value: Value) -> Self {
    serde_json::from_value(value.clone()).unwrap_or(InferenceEnvelope::Opaque(value))
  }

  /// Flatten to the generated text
  pub fn into_text(self) -> String {
    match self {
      InferenceEnvelope::Batch(items) => match items.into_iter().next() {
        Some(first) => first.generated_text,
        None => "[]".to_string(),
      },
      InferenceEnvelope::Single(item) => item.generated_text,
      InferenceEnvelope::Opaque(Value::String(text)) => text,
      InferenceEnvelope::Opaque(other) => other.to_string(),
    }
  }
}

/// ---------------------------------------------------------------------------
/// Inference Gateway
/// ---------------------------------------------------------------------------

pub struct InferenceGateway {
  client: Client,
  config: InferenceConfig,
  parameters: GenerationParameters,
}

impl InferenceGateway {
  pub fn new(config: InferenceConfig) -> Self {
    Self {
      client: Client::new(),
      config,
      parameters: GenerationParameters::default(),
    }
  }

  pub fn model_id(&self) -> &str {
    &self.config.model_id
  }

  /// Model endpoint: `{base_url}/models/{model_id}`
  pub fn endpoint(&self) -> Result<Url, GatewayError> {
    let mut base = self.config.base_url.trim().to_string();
    if !base.ends_with('/') {
      base.push('/');
    }

    Url::parse(&base)
      .and_then(|url| url.join(&format!("models/{}", self.config.model_id)))
      .map_err(|e| GatewayError::Unknown(format!("invalid endpoint {}: {}", base, e)))
  }

  /// Send a prompt and return the generated text
  ///
  /// No network call is made when the credential is missing.
  pub async fn generate(&self, prompt: &str) -> Result<String, GatewayError> {
    let token = self
      .config
      .api_token
      .as_deref()
      .ok_or(GatewayError::MissingCredential)?;

    let endpoint = self.endpoint()?;

    let request = GenerationRequest {
      inputs: prompt,
      parameters: self.parameters.clone(),
      options: RequestOptions {
        wait_for_model: true,
      },
    };

    info!(
      model = %self.config.model_id,
      prompt_chars = prompt.chars().count(),
      "Calling inference endpoint"
    );

    let response = self
      .client
      .post(endpoint)
      .bearer_auth(token)
      .json(&request)
      .send()
      .await
      .map_err(|e| GatewayError::Transport(e.to_string()))?;

    let status = response.status();
    let body = response
      .text()
      .await
      .map_err(|e| GatewayError::Transport(e.to_string()))?;

    if !status.is_success() {
      warn!(status = %status, "Inference endpoint returned an error status");
      if let Ok(error_resp) = serde_json::from_str::<ProviderErrorResponse>(&body) {
        return Err(GatewayError::Transport(format!(
          "HTTP {}: {}",
          status, error_resp.error
        )));
      }
      return Err(GatewayError::Transport(format!("HTTP {}: {}", status, body)));
    }

    let value: Value = serde_json::from_str(&body)
      .map_err(|e| GatewayError::Unknown(format!("response is not JSON: {}", e)))?;

    let text = InferenceEnvelope::from_value(value).into_text();
    debug!(response_chars = text.chars().count(), "Inference response received");

    Ok(text)
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
