//! HTTP front end for the review-log analyzer.
//!
//! Exposes an axum [`Router`] that accepts an uploaded export and answers with
//! the computed [`revlog_core::Analysis`] as JSON. Rendering is left to the
//! client.

pub mod error;
pub mod handlers;

pub use error::ApiError;

use std::sync::Arc;

use axum::{
  Router,
  extract::DefaultBodyLimit,
  routing::{get, post},
};
use revlog_core::{Tz, parse_timezone};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `REVLOG_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:             String,
  pub port:             u16,
  /// Used when a request does not name a time zone.
  pub default_timezone: String,
  pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:             "127.0.0.1".to_string(),
      port:             8050,
      default_timezone: "UTC".to_string(),
      max_upload_bytes: 64 * 1024 * 1024,
    }
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState {
  pub config:           Arc<ServerConfig>,
  pub default_timezone: Tz,
}

impl AppState {
  /// Fails if the configured default zone is not a known IANA name.
  pub fn new(config: ServerConfig) -> revlog_core::Result<Self> {
    let default_timezone = parse_timezone(&config.default_timezone)?;
    Ok(Self {
      config: Arc::new(config),
      default_timezone,
    })
  }

  pub(crate) fn resolve_timezone(
    &self,
    requested: Option<&str>,
  ) -> revlog_core::Result<Tz> {
    match requested {
      Some(name) if !name.trim().is_empty() => parse_timezone(name),
      _ => Ok(self.default_timezone),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the application [`Router`].
pub fn router(state: AppState) -> Router {
  let limit = state.config.max_upload_bytes;
  Router::new()
    .route("/health",  get(handlers::health))
    .route("/analyze", post(handlers::analyze))
    .route("/upload",  post(handlers::upload))
    .layer(DefaultBodyLimit::max(limit))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
