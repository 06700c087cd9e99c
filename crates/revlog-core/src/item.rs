//! Items under study and their review events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::grade::Grade;

/// Which deck of the export an item was listed under.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display,
  EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Category {
  /// Japanese vocabulary, prompted in Japanese.
  Vocabulary,
  /// Kanji, prompted with the character and answered with its keyword.
  KanjiCharKeyword,
  /// Kanji, prompted with the keyword and answered with its character.
  KanjiKeywordChar,
}

/// One recorded study event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewEvent {
  /// Encoded as Unix epoch seconds on the wire.
  #[serde(with = "chrono::serde::ts_seconds")]
  pub timestamp: DateTime<Utc>,
  pub grade:     Grade,
}

impl ReviewEvent {
  pub fn new(timestamp: DateTime<Utc>, grade: impl Into<Grade>) -> Self {
    Self {
      timestamp,
      grade: grade.into(),
    }
  }
}

/// A word or kanji with its full review history, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
  pub label:    String,
  pub category: Category,
  pub reviews:  Vec<ReviewEvent>,
}
