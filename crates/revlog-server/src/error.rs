//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by a handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("{0}")]
  Export(#[from] revlog_export::Error),

  #[error("{0}")]
  Core(#[from] revlog_core::Error),
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = match &self {
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::Export(revlog_export::Error::Io(_)) => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
      ApiError::Export(_) => StatusCode::BAD_REQUEST,
      ApiError::Core(revlog_core::Error::UnknownTimeZone(_)) => {
        StatusCode::BAD_REQUEST
      }
      ApiError::Core(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
      tracing::error!(error = %self, "request failed");
    } else {
      tracing::debug!(error = %self, "rejected request");
    }
    (status, Json(json!({ "error": self.to_string() }))).into_response()
  }
}
