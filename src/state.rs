use crate::config::InferenceConfig;
use crate::llm::InferenceGateway;
use crate::recovery::RecoveryEngine;

/// Application state shared by the request handlers
///
/// Read-only after startup: every request builds its own profile, prompt
/// and plan.
pub struct AppState {
  pub gateway: InferenceGateway,
  pub recovery: RecoveryEngine,
}

impl AppState {
  pub fn new(config: InferenceConfig) -> Self {
    Self {
      gateway: InferenceGateway::new(config),
      recovery: RecoveryEngine::default(),
    }
  }
}
