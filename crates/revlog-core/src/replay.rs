//! Per-item replay of review history.
//!
//! An item's reviews are replayed oldest first through a small state machine
//! ([`LearningState`]). Each event may emit one [`DailyHistoryRow`]; once the
//! history is exhausted the final state is folded into an [`ItemSummary`].
//!
//! Only the first review of an item on a given calendar day produces a
//! pass/fail row. Introductions and abandonments always produce a row.
//!
//! Day boundaries are mixed: a review continues the previous review's day
//! when its UTC date equals the previous review's local date. Introduction
//! and abandonment rows carry the UTC date; pass/fail rows carry the local
//! date. With `UTC` as the zone both views coincide.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::{
  grade::{Grade, Outcome},
  item::{Category, Item, ReviewEvent},
};

/// Successive successes required before an item graduates to known, or
/// returns to known after a relapse.
pub const GRADUATION_STREAK: u32 = 2;

/// Calendar date of `timestamp` in `tz`.
pub fn local_date(timestamp: DateTime<Utc>, tz: Tz) -> NaiveDate {
  timestamp.with_timezone(&tz).date_naive()
}

// ─── State machine ───────────────────────────────────────────────────────────

/// Knowledge state of one item during replay. Never shared between items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LearningState {
  pub ever_known:            bool,
  pub is_known:              bool,
  /// Only meaningful while the item is not currently known.
  pub consecutive_successes: u32,
  /// Reviews spent before the item first became known.
  pub time_to_learn:         u32,
  pub relapses:              u32,
  pub abandoned:             u32,
}

impl LearningState {
  /// Apply the transition for a single graded review.
  pub fn apply(&mut self, grade: &Grade) {
    match grade.outcome() {
      Outcome::Success => self.succeed(),
      Outcome::Abandoned => {
        self.consecutive_successes = 0;
        self.is_known = false;
        self.ever_known = false;
        self.abandoned += 1;
      }
      Outcome::Failure => {
        self.consecutive_successes = 0;
        if self.is_known {
          self.is_known = false;
          self.relapses += 1;
        }
        if !self.ever_known {
          self.time_to_learn += 1;
        }
      }
    }
  }

  fn succeed(&mut self) {
    if !self.ever_known {
      if self.time_to_learn == 0 {
        // Known on sight.
        self.graduate();
      } else if self.consecutive_successes == GRADUATION_STREAK {
        self.graduate();
        self.time_to_learn += 1;
      } else {
        self.consecutive_successes += 1;
        self.time_to_learn += 1;
      }
    } else if !self.is_known {
      if self.consecutive_successes == GRADUATION_STREAK {
        self.is_known = true;
      } else {
        self.consecutive_successes += 1;
      }
    }
  }

  fn graduate(&mut self) {
    self.ever_known = true;
    self.is_known = true;
  }
}

// ─── Emitted records ─────────────────────────────────────────────────────────

/// One dated observation emitted during replay. Each flag is 0 or 1 and at
/// most one of them is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyHistoryRow {
  pub date:                   NaiveDate,
  pub failed:                 u8,
  pub passed:                 u8,
  pub is_new:                 u8,
  pub abandoned:              u8,
  /// Whether the item was known immediately before this review.
  pub known_at_time_of_event: bool,
}

impl DailyHistoryRow {
  pub fn introduced(date: NaiveDate) -> Self {
    Self {
      date,
      failed: 0,
      passed: 0,
      is_new: 1,
      abandoned: 0,
      known_at_time_of_event: false,
    }
  }

  pub fn abandoned(date: NaiveDate) -> Self {
    Self {
      abandoned: 1,
      is_new: 0,
      ..Self::introduced(date)
    }
  }

  pub fn graded(date: NaiveDate, grade: &Grade, known_before: bool) -> Self {
    Self {
      date,
      failed: grade.is_failure().into(),
      passed: grade.is_successful().into(),
      is_new: 0,
      abandoned: 0,
      known_at_time_of_event: known_before,
    }
  }
}

/// The row shown in the problem-word table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSummary {
  pub label:             String,
  pub category:          Category,
  pub total_reviews:     usize,
  pub time_to_learn:     u32,
  pub relapses:          u32,
  pub abandoned:         u32,
  /// First review, in the analysis time zone.
  pub first_reviewed_at: DateTime<FixedOffset>,
}

// ─── Replay driver ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
struct Previous {
  local_date: NaiveDate,
  abandoned:  bool,
}

/// Event-by-event replay of a single item's history.
#[derive(Debug, Clone)]
pub struct ItemReplay {
  tz:       Tz,
  state:    LearningState,
  previous: Option<Previous>,
}

impl ItemReplay {
  pub fn new(tz: Tz) -> Self {
    Self {
      tz,
      state: LearningState::default(),
      previous: None,
    }
  }

  pub fn state(&self) -> &LearningState { &self.state }

  /// Feed the next review. Returns the row this review contributes to the
  /// daily history, if any.
  pub fn step(&mut self, event: &ReviewEvent) -> Option<DailyHistoryRow> {
    let utc_date = event.timestamp.date_naive();
    let local = local_date(event.timestamp, self.tz);
    let is_abandon = event.grade.is_abandoned();

    let row = match self.previous {
      None => Some(DailyHistoryRow::introduced(utc_date)),
      Some(prev) if prev.abandoned && !is_abandon => {
        Some(DailyHistoryRow::introduced(utc_date))
      }
      Some(_) if is_abandon => Some(DailyHistoryRow::abandoned(utc_date)),
      Some(prev) if prev.local_date == utc_date => None,
      Some(_) => Some(DailyHistoryRow::graded(
        local,
        &event.grade,
        self.state.is_known,
      )),
    };

    self.previous = Some(Previous {
      local_date: local,
      abandoned:  is_abandon,
    });
    self.state.apply(&event.grade);
    row
  }
}

/// Everything one item contributes to an analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemReport {
  pub history: Vec<DailyHistoryRow>,
  pub summary: ItemSummary,
  pub state:   LearningState,
}

/// Replay `item` in time zone `tz`. Items without reviews yield `None`.
pub fn replay_item(item: &Item, tz: Tz) -> Option<ItemReport> {
  let first = item.reviews.first()?;

  let mut replay = ItemReplay::new(tz);
  let history: Vec<DailyHistoryRow> = item
    .reviews
    .iter()
    .filter_map(|event| replay.step(event))
    .collect();
  let state = *replay.state();

  Some(ItemReport {
    history,
    summary: ItemSummary {
      label: item.label.clone(),
      category: item.category,
      total_reviews: item.reviews.len(),
      time_to_learn: state.time_to_learn,
      relapses: state.relapses,
      abandoned: state.abandoned,
      first_reviewed_at: first.timestamp.with_timezone(&tz).fixed_offset(),
    },
    state,
  })
}
