//! Codec for vocabulary review exports.
//!
//! Reads the JSON review log downloaded from the study site's settings page
//! and converts it into [`revlog_core`] items. Pure synchronous; no HTTP
//! dependencies.
//!
//! # Quick start
//!
//! ```no_run
//! use revlog_export::parse;
//!
//! let json = std::fs::read_to_string("vocabulary-reviews.json").unwrap();
//! let log = parse(&json).unwrap();
//! println!("{} reviewed cards", log.items.len());
//! ```

pub mod error;
mod parse;

use std::path::Path;

pub use error::{Error, Result};
use revlog_core::Item;

/// The result of parsing one export.
#[derive(Debug, Default)]
pub struct ParsedLog {
  /// Reviewed cards from every deck, in file order.
  pub items:      Vec<Item>,
  /// Cards present in the export that have never been reviewed.
  pub unreviewed: usize,
}

/// Parse an export held in memory.
///
/// The whole document is rejected if any collection is missing, any review
/// is malformed, or no cards are present at all.
pub fn parse(input: &str) -> Result<ParsedLog> {
  parse::parse_slice(input.as_bytes())
}

/// Like [`parse`], for raw bytes such as a decoded upload.
pub fn parse_bytes(input: &[u8]) -> Result<ParsedLog> {
  parse::parse_slice(input)
}

/// Read and parse the export at `path`.
pub fn read_file(path: impl AsRef<Path>) -> Result<ParsedLog> {
  let bytes = std::fs::read(path)?;
  parse::parse_slice(&bytes)
}

// ─── End-to-end ──────────────────────────────────────────────────────────────
