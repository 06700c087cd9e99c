//! Deserialisation of the review export.
//!
//! Pipeline:
//!   raw bytes
//!     └─ serde_json        → RawExport (three card collections)
//!          └─ into_items() → Vec<Item>, unreviewed cards counted and dropped

use revlog_core::{Category, Item, ReviewEvent};
use serde::Deserialize;

use crate::{
  ParsedLog,
  error::{Error, Result},
};

// ─── Wire representation ─────────────────────────────────────────────────────

/// Top level of the export. All three collections must be present; any other
/// keys are ignored.
#[derive(Deserialize)]
struct RawExport {
  cards_vocabulary_jp_en:   Vec<RawCard>,
  cards_kanji_char_keyword: Vec<RawCard>,
  cards_kanji_keyword_char: Vec<RawCard>,
}

#[derive(Deserialize)]
struct RawCard {
  #[serde(default)]
  spelling:  Option<String>,
  #[serde(default)]
  character: Option<String>,
  reviews:   Vec<ReviewEvent>,
}

impl RawCard {
  /// Vocabulary shows its spelling; kanji cards only carry a character.
  fn label(&self) -> Option<String> {
    match (&self.spelling, &self.character) {
      (Some(s), _) if !s.is_empty() => Some(s.clone()),
      (_, Some(c)) => Some(format!("Kanji: {c}")),
      _ => None,
    }
  }
}

// ─── Conversion ──────────────────────────────────────────────────────────────

pub(crate) fn parse_slice(input: &[u8]) -> Result<ParsedLog> {
  let raw: RawExport = serde_json::from_slice(input)?;
  into_items(raw)
}

fn into_items(raw: RawExport) -> Result<ParsedLog> {
  let decks = [
    (Category::Vocabulary, raw.cards_vocabulary_jp_en),
    (Category::KanjiCharKeyword, raw.cards_kanji_char_keyword),
    (Category::KanjiKeywordChar, raw.cards_kanji_keyword_char),
  ];

  if decks.iter().all(|(_, cards)| cards.is_empty()) {
    return Err(Error::EmptyLog);
  }

  let mut log = ParsedLog::default();
  for (category, cards) in decks {
    for (index, card) in cards.into_iter().enumerate() {
      if card.reviews.is_empty() {
        log.unreviewed += 1;
        continue;
      }
      let label = card
        .label()
        .ok_or(Error::MissingLabel { category, index })?;
      log.items.push(Item {
        label,
        category,
        reviews: card.reviews,
      });
    }
  }

  tracing::debug!(
    items = log.items.len(),
    unreviewed = log.unreviewed,
    "parsed review log"
  );
  Ok(log)
}
