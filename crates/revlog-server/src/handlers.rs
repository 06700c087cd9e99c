//! Handlers for the analysis endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/health` | Liveness probe |
//! | `POST` | `/analyze` | Body: raw export JSON; optional `?timezone=` |
//! | `POST` | `/upload` | Body: [`UploadBody`] carrying a base64 data URL |

use axum::{
  Json,
  extract::{Query, State},
};
use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use bytes::Bytes;
use revlog_core::{Analysis, analyze as run_analysis};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{AppState, error::ApiError};

// ─── Health ───────────────────────────────────────────────────────────────────

/// `GET /health`
pub async fn health() -> Json<Value> { Json(json!({ "status": "ok" })) }

// ─── Analyze ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct AnalyzeParams {
  /// IANA zone for day boundaries. Defaults to the configured zone.
  pub timezone: Option<String>,
}

/// `POST /analyze[?timezone=Asia/Tokyo]`
pub async fn analyze(
  State(state): State<AppState>,
  Query(params): Query<AnalyzeParams>,
  body: Bytes,
) -> Result<Json<Analysis>, ApiError> {
  analyze_bytes(&state, params.timezone.as_deref(), &body).map(Json)
}

// ─── Upload ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /upload`, matching what a browser file input
/// produces via `FileReader.readAsDataURL`.
#[derive(Debug, Deserialize)]
pub struct UploadBody {
  pub filename: Option<String>,
  /// `data:<mime>;base64,<payload>`, or a bare base64 payload.
  pub contents: String,
  pub timezone: Option<String>,
}

/// `POST /upload`
pub async fn upload(
  State(state): State<AppState>,
  Json(body): Json<UploadBody>,
) -> Result<Json<Analysis>, ApiError> {
  let bytes = decode_data_url(&body.contents)?;
  tracing::info!(
    filename = body.filename.as_deref().unwrap_or("<unnamed>"),
    size = bytes.len(),
    "received upload"
  );
  analyze_bytes(&state, body.timezone.as_deref(), &bytes).map(Json)
}

// ─── Helpers ──────────────────────────────────────────────────────────────────

fn analyze_bytes(
  state: &AppState,
  timezone: Option<&str>,
  body: &[u8],
) -> Result<Analysis, ApiError> {
  let tz = state.resolve_timezone(timezone)?;
  let log = revlog_export::parse_bytes(body)?;
  tracing::info!(
    items = log.items.len(),
    unreviewed = log.unreviewed,
    timezone = tz.name(),
    "analyzing review log"
  );
  Ok(run_analysis(&log.items, tz))
}

/// Strip an optional `data:...;base64,` prefix and decode the payload.
pub(crate) fn decode_data_url(contents: &str) -> Result<Vec<u8>, ApiError> {
  let payload = match contents.split_once(',') {
    Some((header, data)) if header.starts_with("data:") => data,
    _ => contents,
  };
  B64
    .decode(payload.trim())
    .map_err(|e| ApiError::BadRequest(format!("upload is not valid base64: {e}")))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn decodes_data_url() {
    let bytes =
      decode_data_url("data:application/json;base64,eyJhIjoxfQ==").unwrap();
    assert_eq!(bytes, br#"{"a":1}"#);
  }

  #[test]
  fn decodes_bare_payload() {
    assert_eq!(decode_data_url("eyJhIjoxfQ==").unwrap(), br#"{"a":1}"#);
  }

  #[test]
  fn rejects_garbage() {
    assert!(matches!(
      decode_data_url("data:application/json;base64,@@@"),
      Err(ApiError::BadRequest(_))
    ));
  }
}
