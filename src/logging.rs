//! Structured logging setup
//!
//! `RUST_LOG` selects the filter and `LOG_FORMAT` (`pretty`, `compact`,
//! `json`) the output layout. Noisy client/server internals are capped at
//! `warn` whatever the filter says.

use std::env;
use std::io;
use tracing::info;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{
  fmt, layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError, EnvFilter,
};

pub const DEFAULT_LOG_FILTER: &str = "info,workout_coach=debug,tower_http=info";

const NOISE_DIRECTIVES: [&str; 3] = ["hyper=warn", "hyper_util=warn", "reqwest=warn"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
  Pretty,
  Compact,
  Json,
}

impl LogFormat {
  /// Unknown values fall back to `Pretty`
  pub fn parse(value: &str) -> Self {
    match value.trim().to_lowercase().as_str() {
      "json" => LogFormat::Json,
      "compact" => LogFormat::Compact,
      _ => LogFormat::Pretty,
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
  pub filter: String,
  pub format: LogFormat,
}

impl Default for LoggingConfig {
  fn default() -> Self {
    Self {
      filter: DEFAULT_LOG_FILTER.to_string(),
      format: LogFormat::Pretty,
    }
  }
}

impl LoggingConfig {
  pub fn from_env() -> Self {
    let filter = env::var("RUST_LOG")
      .ok()
      .filter(|value| !value.trim().is_empty())
      .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

    let format = env::var("LOG_FORMAT")
      .map(|value| LogFormat::parse(&value))
      .unwrap_or(LogFormat::Pretty);

    Self { filter, format }
  }

  pub fn env_filter(&self) -> EnvFilter {
    let base =
      EnvFilter::try_new(&self.filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    NOISE_DIRECTIVES
      .iter()
      .filter_map(|directive| directive.parse::<Directive>().ok())
      .fold(base, |filter, directive| filter.add_directive(directive))
  }

  /// Install the global subscriber
  ///
  /// # Errors
  ///
  /// Fails if a global subscriber is already installed.
  pub fn init(&self) -> Result<(), TryInitError> {
    let registry = tracing_subscriber::registry().with(self.env_filter());

    match self.format {
      LogFormat::Json => registry
        .with(fmt::layer().with_target(true).with_writer(io::stdout).json())
        .try_init()?,
      LogFormat::Pretty => registry
        .with(fmt::layer().with_target(true).with_writer(io::stdout))
        .try_init()?,
      LogFormat::Compact => registry
        .with(
          fmt::layer()
            .compact()
            .with_target(false)
            .with_writer(io::stdout),
        )
        .try_init()?,
    }

    info!(
      log.filter = %self.filter,
      log.format = ?self.format,
      version = env!("CARGO_PKG_VERSION"),
      "Logging initialized"
    );
    Ok(())
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
