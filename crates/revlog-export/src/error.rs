//! Error types for the review-log codec.

use revlog_core::Category;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("malformed review log: {0}")]
  Json(#[from] serde_json::Error),

  #[error("review log contains no cards")]
  EmptyLog,

  #[error("{category} card #{index} has neither a spelling nor a character")]
  MissingLabel { category: Category, index: usize },

  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
