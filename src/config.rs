//! Environment-driven configuration
//!
//! Values are read once at startup (after `.env` is loaded) and passed
//! explicitly to the components that need them.

use std::env;
use std::fmt;

/// ---------------------------------------------------------------------------
/// Configuration Constants
/// ---------------------------------------------------------------------------

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_API_BASE_URL: &str = "https://api-inference.huggingface.co";
pub const DEFAULT_MODEL_ID: &str = "mistralai/Mistral-7B-Instruct-v0.2";

const TOKEN_VARS: [&str; 2] = ["HF_API_TOKEN", "HUGGINGFACE_API_KEY"];

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("Invalid value for {name}: {value}")]
  InvalidValue { name: String, value: String },
}

/// ---------------------------------------------------------------------------
/// HTTP Server
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
  pub host: String,
  pub port: u16,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host: DEFAULT_HOST.to_string(),
      port: DEFAULT_PORT,
    }
  }
}

impl ServerConfig {
  pub fn from_env() -> Result<Self, ConfigError> {
    let host = non_empty_var("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

    let port = match non_empty_var("PORT") {
      Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::InvalidValue {
        name: "PORT".into(),
        value: raw,
      })?,
      None => DEFAULT_PORT,
    };

    Ok(Self { host, port })
  }

  pub fn bind_address(&self) -> String {
    format!("{}:{}", self.host, self.port)
  }
}

/// ---------------------------------------------------------------------------
/// Inference Provider
/// ---------------------------------------------------------------------------

/// Credential and endpoint for the text-generation provider
///
/// A missing token is not a startup error: the gateway reports it on each
/// request instead.
#[derive(Clone, PartialEq)]
pub struct InferenceConfig {
  pub api_token: Option<String>,
  pub model_id: String,
  pub base_url: String,
}

impl Default for InferenceConfig {
  fn default() -> Self {
    Self {
      api_token: None,
      model_id: DEFAULT_MODEL_ID.to_string(),
      base_url: DEFAULT_API_BASE_URL.to_string(),
    }
  }
}

impl InferenceConfig {
  pub fn from_env() -> Self {
    Self {
      api_token: TOKEN_VARS.iter().find_map(|name| non_empty_var(name)),
      model_id: non_empty_var("HF_MODEL_ID").unwrap_or_else(|| DEFAULT_MODEL_ID.to_string()),
      base_url: non_empty_var("HF_API_BASE_URL")
        .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
    }
  }

  pub fn has_credential(&self) -> bool {
    self.api_token.is_some()
  }
}

// The token must never reach the logs
impl fmt::Debug for InferenceConfig {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("InferenceConfig")
      .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
      .field("model_id", &self.model_id)
      .field("base_url", &self.base_url)
      .finish()
  }
}

fn non_empty_var(name: &str) -> Option<String> {
  env::var(name)
    .ok()
    .map(|value| value.trim().to_string())
    .filter(|value| !value.is_empty())
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;

  const ALL_VARS: [&str; 6] = [
    "HOST",
    "PORT",
    "HF_API_TOKEN",
    "HUGGINGFACE_API_KEY",
    "HF_MODEL_ID",
    "HF_API_BASE_URL",
  ];

  fn cleared() -> Vec<(&'static str, Option<&'static str>)> {
    ALL_VARS.iter().map(|name| (*name, None)).collect()
  }

  #[test]
  #[serial]
  fn test_defaults_without_environment() {
    temp_env::with_vars(cleared(), || {
      assert_eq!(ServerConfig::from_env().unwrap(), ServerConfig::default());

      let inference = InferenceConfig::from_env();
      assert!(!inference.has_credential());
      assert_eq!(inference.model_id, DEFAULT_MODEL_ID);
      assert_eq!(inference.base_url, DEFAULT_API_BASE_URL);
    });
  }

  #[test]
  #[serial]
  fn test_server_config_from_env() {
    temp_env::with_vars(
      [("HOST", Some("0.0.0.0")), ("PORT", Some("8080"))],
      || {
        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
      },
    );
  }

  #[test]
  #[serial]
  fn test_invalid_port_is_rejected() {
    temp_env::with_var("PORT", Some("not-a-port"), || {
      let err = ServerConfig::from_env().unwrap_err();
      assert!(err.to_string().contains("PORT"));
    });
  }

  #[test]
  #[serial]
  fn test_token_fallback_variable() {
    temp_env::with_vars(
      [
        ("HF_API_TOKEN", None),
        ("HUGGINGFACE_API_KEY", Some("hf_fallback")),
      ],
      || {
        let config = InferenceConfig::from_env();
        assert_eq!(config.api_token.as_deref(), Some("hf_fallback"));
      },
    );
  }

  #[test]
  #[serial]
  fn test_blank_token_counts_as_missing() {
    temp_env::with_vars(
      [("HF_API_TOKEN", Some("   ")), ("HUGGINGFACE_API_KEY", None)],
      || {
        assert!(!InferenceConfig::from_env().has_credential());
      },
    );
  }

  #[test]
  fn test_debug_redacts_token() {
    let config = InferenceConfig {
      api_token: Some("hf_secret".into()),
      ..InferenceConfig::default()
    };
    let debug = format!("{:?}", config);
    assert!(!debug.contains("hf_secret"));
    assert!(debug.contains("<redacted>"));
  }
}
