//! Whole-log analysis: one replay pass over every item, then aggregation into
//! the dense daily series consumed by charts and the problem-word table.

use std::{collections::BTreeMap, ops::AddAssign};

use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::{
  Result,
  item::Item,
  replay::{DailyHistoryRow, ItemSummary, replay_item},
  series::DailySeries,
};

/// Length of every trailing window, in days.
pub const ROLLING_WINDOW: usize = 7;

// ─── Ingestion ───────────────────────────────────────────────────────────────

/// Raw per-event output of replaying every item, before any bucketing.
#[derive(Debug, Clone, Default)]
pub struct Ingest {
  /// Local date of each item's first review.
  pub new_cards:   Vec<NaiveDate>,
  /// Local instant of every review that was not an abandonment.
  pub repetitions: Vec<DateTime<Tz>>,
  pub history:     Vec<DailyHistoryRow>,
  pub summaries:   Vec<ItemSummary>,
}

/// Replay every item in `tz`. Items without reviews contribute nothing.
pub fn ingest(items: &[Item], tz: Tz) -> Ingest {
  let mut out = Ingest::default();

  for item in items {
    let Some(report) = replay_item(item, tz) else {
      tracing::debug!(label = %item.label, "skipping item with no reviews");
      continue;
    };

    out
      .new_cards
      .push(report.summary.first_reviewed_at.date_naive());
    out.repetitions.extend(
      item
        .reviews
        .iter()
        .filter(|r| !r.grade.is_abandoned())
        .map(|r| r.timestamp.with_timezone(&tz)),
    );
    out.history.extend(report.history);
    out.summaries.push(report.summary);
  }

  out
}

// ─── Tallies ─────────────────────────────────────────────────────────────────

/// Summed history flags for one day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateTally {
  pub failed:    u32,
  pub passed:    u32,
  pub new:       u32,
  pub abandoned: u32,
}

impl StateTally {
  /// `100 * passed / (passed + failed)`, or `None` when nothing was graded.
  pub fn retention(&self) -> Option<f64> {
    retention_ratio(self.passed, self.failed)
  }
}

impl From<&DailyHistoryRow> for StateTally {
  fn from(row: &DailyHistoryRow) -> Self {
    Self {
      failed:    row.failed.into(),
      passed:    row.passed.into(),
      new:       row.is_new.into(),
      abandoned: row.abandoned.into(),
    }
  }
}

impl AddAssign for StateTally {
  fn add_assign(&mut self, rhs: Self) {
    self.failed += rhs.failed;
    self.passed += rhs.passed;
    self.new += rhs.new;
    self.abandoned += rhs.abandoned;
  }
}

fn retention_ratio(passed: u32, failed: u32) -> Option<f64> {
  let graded = passed + failed;
  (graded > 0).then(|| 100.0 * f64::from(passed) / f64::from(graded))
}

// ─── Output points ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountPoint {
  pub date:            NaiveDate,
  pub count:           u32,
  pub cumulative:      u32,
  /// Mean over the trailing window; absent until the window is full.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub rolling_average: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardStatesPoint {
  pub date:  NaiveDate,
  #[serde(flatten)]
  pub tally: StateTally,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetentionPoint {
  pub date:              NaiveDate,
  pub passed:            u32,
  pub failed:            u32,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub retention:         Option<f64>,
  /// Ratio of the window's summed passes to its summed grades.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub rolling_retention: Option<f64>,
}

/// Everything derived from one review log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
  /// IANA name of the zone used for day boundaries.
  pub timezone:           String,
  pub new_cards:          Vec<CountPoint>,
  pub repetitions:        Vec<CountPoint>,
  pub minutes_spent:      Vec<CountPoint>,
  pub card_states:        Vec<CardStatesPoint>,
  /// Reviews of items that were known at the time.
  pub retention_known:    Vec<RetentionPoint>,
  /// Reviews of items still being learned.
  pub retention_learning: Vec<RetentionPoint>,
  pub items:              Vec<ItemSummary>,
}

impl Analysis {
  pub fn to_json_pretty(&self) -> Result<String> {
    Ok(serde_json::to_string_pretty(self)?)
  }
}

// ─── Aggregation ─────────────────────────────────────────────────────────────

/// Analyze `items` with day boundaries taken in `tz`.
pub fn analyze(items: &[Item], tz: Tz) -> Analysis {
  let ingest = ingest(items, tz);
  tracing::debug!(
    items = ingest.summaries.len(),
    rows = ingest.history.len(),
    repetitions = ingest.repetitions.len(),
    "replayed review log"
  );
  aggregate(ingest, tz)
}

/// Bucket an [`Ingest`] into dense daily series.
pub fn aggregate(ingest: Ingest, tz: Tz) -> Analysis {
  let minutes = minutes_per_day(&ingest.repetitions);

  Analysis {
    timezone:           tz.name().to_string(),
    new_cards:          count_series(ingest.new_cards.iter().copied()),
    repetitions:        count_series(
      ingest.repetitions.iter().map(DateTime::date_naive),
    ),
    minutes_spent:      count_series(minutes),
    card_states:        card_states(&ingest.history),
    retention_known:    retention_series(
      ingest.history.iter().filter(|r| r.known_at_time_of_event),
    ),
    retention_learning: retention_series(
      ingest.history.iter().filter(|r| !r.known_at_time_of_event),
    ),
    items:              ingest.summaries,
  }
}

/// One occurrence per distinct real minute that saw a review, dated locally.
/// Keyed on the absolute minute so a repeated wall-clock hour is not merged.
fn minutes_per_day(reviews: &[DateTime<Tz>]) -> Vec<NaiveDate> {
  reviews
    .iter()
    .map(|t| (t.timestamp().div_euclid(60), t.date_naive()))
    .collect::<BTreeMap<_, _>>()
    .into_values()
    .collect()
}

fn count_series<I>(dates: I) -> Vec<CountPoint>
where
  I: IntoIterator<Item = NaiveDate>,
{
  let series =
    DailySeries::bucket(dates.into_iter().map(|d| (d, 1u32)), |acc, n| {
      *acc += n
    });
  let cumulative = series.cumulative();
  let rolling = series.trailing(ROLLING_WINDOW, |window| {
    Some(f64::from(window.iter().sum::<u32>()) / window.len() as f64)
  });

  series
    .iter()
    .zip(cumulative)
    .zip(rolling)
    .map(|(((date, &count), cumulative), rolling_average)| CountPoint {
      date,
      count,
      cumulative,
      rolling_average,
    })
    .collect()
}

fn card_states(history: &[DailyHistoryRow]) -> Vec<CardStatesPoint> {
  DailySeries::bucket(
    history.iter().map(|r| (r.date, StateTally::from(r))),
    |acc, t| *acc += t,
  )
  .iter()
  .map(|(date, &tally)| CardStatesPoint { date, tally })
  .collect()
}

fn retention_series<'a, I>(rows: I) -> Vec<RetentionPoint>
where
  I: IntoIterator<Item = &'a DailyHistoryRow>,
{
  let series = DailySeries::bucket(
    rows.into_iter().map(|r| (r.date, StateTally::from(r))),
    |acc, t| *acc += t,
  );
  let rolling = series.trailing(ROLLING_WINDOW, |window| {
    let mut sum = StateTally::default();
    for t in window {
      sum += *t;
    }
    sum.retention()
  });

  series
    .iter()
    .zip(rolling)
    .map(|((date, tally), rolling_retention)| RetentionPoint {
      date,
      passed: tally.passed,
      failed: tally.failed,
      retention: tally.retention(),
      rolling_retention,
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use chrono::{TimeZone, Utc};

  use super::*;
  use crate::item::{Category, ReviewEvent};

  fn at(day: u32, hour: u32, min: u32, sec: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, day, hour, min, sec).unwrap()
  }

  fn date(day: u32) -> NaiveDate { NaiveDate::from_ymd_opt(2024, 5, day).unwrap() }

  fn item(label: &str, reviews: Vec<ReviewEvent>) -> Item {
    Item {
      label: label.to_string(),
      category: Category::Vocabulary,
      reviews,
    }
  }

  fn small_log() -> Vec<Item> {
    vec![
      item("猫", vec![
        ReviewEvent::new(at(1, 10, 0, 0), "pass"),
        ReviewEvent::new(at(1, 10, 0, 30), "pass"),
        ReviewEvent::new(at(1, 10, 5, 0), "fail"),
        ReviewEvent::new(at(2, 9, 0, 0), "pass"),
        ReviewEvent::new(at(3, 9, 0, 0), "abandoned"),
      ]),
      item("犬", vec![ReviewEvent::new(at(3, 20, 0, 0), "nothing")]),
      item("鳥", vec![]),
    ]
  }

  fn eight_days(grades: &[&str]) -> Item {
    item(
      "勉強",
      grades
        .iter()
        .enumerate()
        .map(|(i, g)| ReviewEvent::new(at(i as u32 + 1, 12, 0, 0), *g))
        .collect(),
    )
  }

  fn counts(points: &[CountPoint]) -> Vec<u32> {
    points.iter().map(|p| p.count).collect()
  }

  #[test]
  fn ingest_skips_empty_items() {
    let ingest = ingest(&small_log(), Tz::UTC);
    assert_eq!(ingest.summaries.len(), 2);
    assert_eq!(ingest.new_cards, vec![date(1), date(3)]);
    assert_eq!(ingest.repetitions.len(), 5);
  }

  #[test]
  fn count_series_are_dense() {
    let a = analyze(&small_log(), Tz::UTC);

    assert_eq!(counts(&a.new_cards), vec![1, 0, 1]);
    assert_eq!(
      a.new_cards.iter().map(|p| p.cumulative).collect::<Vec<_>>(),
      vec![1, 1, 2]
    );
    assert_eq!(counts(&a.repetitions), vec![3, 1, 1]);
    // Two reviews in the same minute count once.
    assert_eq!(counts(&a.minutes_spent), vec![2, 1, 1]);
    assert!(a.repetitions.iter().all(|p| p.rolling_average.is_none()));
  }

  #[test]
  fn card_states_sum_across_items() {
    let a = analyze(&small_log(), Tz::UTC);
    let tallies: Vec<StateTally> =
      a.card_states.iter().map(|p| p.tally).collect();
    assert_eq!(tallies, vec![
      StateTally {
        new: 1,
        ..Default::default()
      },
      StateTally {
        passed: 1,
        ..Default::default()
      },
      StateTally {
        new: 1,
        abandoned: 1,
        ..Default::default()
      },
    ]);
    assert_eq!(a.card_states[0].date, date(1));
  }

  #[test]
  fn flag_total_matches_day_counted_events() {
    let ingest = ingest(&small_log(), Tz::UTC);
    let total: u32 = ingest
      .history
      .iter()
      .map(|r| u32::from(r.failed + r.passed + r.is_new + r.abandoned))
      .sum();
    // 猫: day 1 intro, day 2 pass, day 3 abandon; 犬: intro.
    assert_eq!(total, 4);
    assert_eq!(total as usize, ingest.history.len());
  }

  #[test]
  fn retention_omits_ungraded_days() {
    let a = analyze(&small_log(), Tz::UTC);
    assert!(a.retention_known.is_empty());

    let learning = &a.retention_learning;
    assert_eq!(learning.len(), 3);
    assert_eq!(learning[0].retention, None);
    assert_eq!(learning[1].retention, Some(100.0));
    assert_eq!(learning[2].retention, None);
    assert!(learning.iter().all(|p| p.rolling_retention.is_none()));
  }

  #[test]
  fn rolling_retention_is_a_ratio_of_sums() {
    let log = vec![eight_days(&[
      "pass", "pass", "pass", "fail", "pass", "pass", "pass", "pass",
    ])];
    let a = analyze(&log, Tz::UTC);

    let known = &a.retention_known;
    assert_eq!(known.first().map(|p| p.date), Some(date(2)));
    assert_eq!(known.len(), 7);
    let daily: Vec<Option<f64>> = known.iter().map(|p| p.retention).collect();
    assert_eq!(daily, vec![
      Some(100.0),
      Some(100.0),
      Some(0.0),
      None,
      None,
      None,
      Some(100.0)
    ]);
    assert!(known[..6].iter().all(|p| p.rolling_retention.is_none()));
    assert_eq!(known[6].rolling_retention, Some(75.0));

    let learning = &a.retention_learning;
    assert_eq!(learning.len(), 7);
    assert_eq!(learning[6].date, date(7));
    assert_eq!(learning[6].rolling_retention, Some(100.0));
  }

  #[test]
  fn rolling_average_after_a_full_week() {
    let log = vec![eight_days(&["pass"; 8])];
    let a = analyze(&log, Tz::UTC);
    let rolling: Vec<Option<f64>> =
      a.repetitions.iter().map(|p| p.rolling_average).collect();
    assert_eq!(rolling[..6], [None; 6]);
    assert_eq!(rolling[6..], [Some(1.0), Some(1.0)]);
  }

  #[test]
  fn new_cards_use_the_local_date_of_the_first_review() {
    // 22:00 UTC on the 1st is the 2nd in Tokyo.
    let log = vec![item("月", vec![ReviewEvent::new(at(1, 22, 0, 0), "pass")])];
    let ingest = ingest(&log, Tz::Asia__Tokyo);
    assert_eq!(ingest.new_cards, vec![date(2)]);
  }

  #[test]
  fn repeated_wall_clock_hour_counts_both_minutes() {
    // New York falls back on 2023-11-05: 05:30 UTC and 06:30 UTC are both
    // 01:30 local time.
    let t = |h| Utc.with_ymd_and_hms(2023, 11, 5, h, 30, 0).unwrap();
    let log = vec![item("時計", vec![
      ReviewEvent::new(t(5), "pass"),
      ReviewEvent::new(t(6), "pass"),
    ])];
    let a = analyze(&log, Tz::America__New_York);
    assert_eq!(counts(&a.minutes_spent), vec![2]);
    assert_eq!(
      a.minutes_spent[0].date,
      NaiveDate::from_ymd_opt(2023, 11, 5).unwrap()
    );
  }

  #[test]
  fn timezone_name_is_reported() {
    let a = analyze(&small_log(), Tz::Europe__Berlin);
    assert_eq!(a.timezone, "Europe/Berlin");
  }

  #[test]
  fn analysis_is_repeatable() {
    let log = small_log();
    assert_eq!(analyze(&log, Tz::UTC), analyze(&log, Tz::UTC));
  }

  #[test]
  fn empty_log_gives_empty_series() {
    let a = analyze(&[], Tz::UTC);
    assert!(a.new_cards.is_empty());
    assert!(a.card_states.is_empty());
    assert!(a.items.is_empty());
  }

  #[test]
  fn json_omits_undefined_percentages() {
    let a = analyze(&small_log(), Tz::UTC);
    let json: serde_json::Value =
      serde_json::from_str(&a.to_json_pretty().unwrap()).unwrap();
    let first = &json["retention_learning"][0];
    assert!(first.get("retention").is_none());
    assert_eq!(json["retention_learning"][1]["retention"], 100.0);
    assert_eq!(json["card_states"][2]["abandoned"], 1);
  }
}
