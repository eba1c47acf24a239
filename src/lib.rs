pub mod commands;
pub mod config;
pub mod llm;
pub mod logging;
pub mod models;
pub mod prompt;
pub mod recovery;
pub mod rules;
pub mod state;

#[cfg(test)]
mod test_utils;

use config::{InferenceConfig, ServerConfig};
use logging::LoggingConfig;
use state::AppState;
use std::sync::Arc;
use tracing::{info, warn};

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
  // Load environment variables from .env file
  dotenvy::dotenv().ok();

  LoggingConfig::from_env().init()?;

  let server = ServerConfig::from_env()?;
  let inference = InferenceConfig::from_env();
  if !inference.has_credential() {
    warn!("No inference API token set (HF_API_TOKEN); /generate will answer with an error");
  }
  info!(model = %inference.model_id, base_url = %inference.base_url, "Inference provider configured");

  let app = commands::router(Arc::new(AppState::new(inference)));

  let listener = tokio::net::TcpListener::bind(server.bind_address()).await?;
  info!(address = %listener.local_addr()?, "Workout coach listening");

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;

  info!("Server stopped");
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    warn!(error = %e, "Failed to listen for shutdown signal");
    std::future::pending::<()>().await;
  }
  info!("Shutdown signal received");
}
