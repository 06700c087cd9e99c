//! Ordering of the problem-word table.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::replay::ItemSummary;

/// A sortable column of the problem-word table.
#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  Display,
  EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum SummaryColumn {
  Word,
  Reviews,
  TimeToLearn,
  #[default]
  Relapses,
  Abandoned,
  FirstReviewed,
}

impl SummaryColumn {
  fn compare(self, a: &ItemSummary, b: &ItemSummary) -> Ordering {
    match self {
      Self::Word => a.label.cmp(&b.label),
      Self::Reviews => a.total_reviews.cmp(&b.total_reviews),
      Self::TimeToLearn => a.time_to_learn.cmp(&b.time_to_learn),
      Self::Relapses => a.relapses.cmp(&b.relapses),
      Self::Abandoned => a.abandoned.cmp(&b.abandoned),
      Self::FirstReviewed => a.first_reviewed_at.cmp(&b.first_reviewed_at),
    }
  }
}

/// Stable sort of `rows` by `column`; equal rows keep their input order.
pub fn sort_summaries(
  rows: &mut [ItemSummary],
  column: SummaryColumn,
  descending: bool,
) {
  rows.sort_by(|a, b| {
    let ord = column.compare(a, b);
    if descending { ord.reverse() } else { ord }
  });
}

#[cfg(test)]
mod tests {
  use std::str::FromStr;

  use chrono::{TimeZone, Utc};

  use super::*;
  use crate::item::Category;

  fn row(label: &str, reviews: usize, relapses: u32, day: u32) -> ItemSummary {
    ItemSummary {
      label: label.to_string(),
      category: Category::Vocabulary,
      total_reviews: reviews,
      time_to_learn: 0,
      relapses,
      abandoned: 0,
      first_reviewed_at: Utc
        .with_ymd_and_hms(2023, 1, day, 0, 0, 0)
        .unwrap()
        .fixed_offset(),
    }
  }

  fn labels(rows: &[ItemSummary]) -> Vec<&str> {
    rows.iter().map(|r| r.label.as_str()).collect()
  }

  #[test]
  fn worst_relapses_first() {
    let mut rows = vec![
      row("a", 3, 1, 1),
      row("b", 9, 4, 2),
      row("c", 1, 1, 3),
      row("d", 5, 0, 4),
    ];
    sort_summaries(&mut rows, SummaryColumn::default(), true);
    assert_eq!(labels(&rows), vec!["b", "a", "c", "d"]);
  }

  #[test]
  fn ascending_by_first_review() {
    let mut rows = vec![row("x", 1, 0, 9), row("y", 1, 0, 2)];
    sort_summaries(&mut rows, SummaryColumn::FirstReviewed, false);
    assert_eq!(labels(&rows), vec!["y", "x"]);
  }

  #[test]
  fn column_names_are_kebab_case() {
    assert_eq!(
      SummaryColumn::from_str("time-to-learn").unwrap(),
      SummaryColumn::TimeToLearn
    );
    assert_eq!(SummaryColumn::FirstReviewed.to_string(), "first-reviewed");
    assert!(SummaryColumn::from_str("bogus").is_err());
  }
}
