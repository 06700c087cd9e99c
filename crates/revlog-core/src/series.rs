//! Dense per-day series.
//!
//! [`DailySeries`] buckets dated observations, fills every missing day between
//! the first and last observation with `T::default()`, and offers trailing
//! window reductions over the result. Every chart-shaped output of the
//! analysis is built on it.

use std::{collections::BTreeMap, ops::AddAssign};

use chrono::NaiveDate;

/// One value per calendar day, with no gaps.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySeries<T> {
  start:  Option<NaiveDate>,
  values: Vec<T>,
}

impl<T> Default for DailySeries<T> {
  fn default() -> Self {
    Self {
      start:  None,
      values: Vec::new(),
    }
  }
}

impl<T: Default> DailySeries<T> {
  /// Group `observations` by date, combining values on the same date with
  /// `merge`, and densify the range between the earliest and latest date.
  pub fn bucket<I, F>(observations: I, mut merge: F) -> Self
  where
    I: IntoIterator<Item = (NaiveDate, T)>,
    F: FnMut(&mut T, T),
  {
    let mut by_date: BTreeMap<NaiveDate, T> = BTreeMap::new();
    for (date, value) in observations {
      merge(by_date.entry(date).or_default(), value);
    }

    let (Some(&first), Some(&last)) =
      (by_date.keys().next(), by_date.keys().next_back())
    else {
      return Self::default();
    };

    let values: Vec<T> = first
      .iter_days()
      .take_while(|d| *d <= last)
      .map(|d| by_date.remove(&d).unwrap_or_default())
      .collect();

    Self {
      start: Some(first),
      values,
    }
  }
}

impl<T> DailySeries<T> {
  pub fn len(&self) -> usize { self.values.len() }

  pub fn is_empty(&self) -> bool { self.values.is_empty() }

  pub fn first_date(&self) -> Option<NaiveDate> { self.start }

  pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
    self
      .start
      .into_iter()
      .flat_map(|start| start.iter_days())
      .take(self.values.len())
  }

  pub fn values(&self) -> &[T] { &self.values }

  pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, &T)> + '_ {
    self.dates().zip(self.values.iter())
  }

  /// Reduce the `window` days ending at each day (inclusive). Days with fewer
  /// than `window` days of history before them yield `None`, as does any
  /// window for which `reduce` returns `None`.
  pub fn trailing<U, F>(&self, window: usize, mut reduce: F) -> Vec<Option<U>>
  where
    F: FnMut(&[T]) -> Option<U>,
  {
    (0..self.values.len())
      .map(|i| {
        if window == 0 || i + 1 < window {
          None
        } else {
          reduce(&self.values[i + 1 - window..=i])
        }
      })
      .collect()
  }
}

impl<T: Copy + Default + AddAssign> DailySeries<T> {
  /// Running total up to and including each day.
  pub fn cumulative(&self) -> Vec<T> {
    let mut total = T::default();
    self
      .values
      .iter()
      .map(|v| {
        total += *v;
        total
      })
      .collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn d(day: u32) -> NaiveDate { NaiveDate::from_ymd_opt(2024, 2, day).unwrap() }

  fn counts(obs: &[(u32, u32)]) -> DailySeries<u32> {
    DailySeries::bucket(obs.iter().map(|&(day, n)| (d(day), n)), |acc, n| {
      *acc += n
    })
  }

  #[test]
  fn buckets_and_fills_gaps() {
    let s = counts(&[(3, 1), (1, 2), (3, 4), (5, 1)]);
    assert_eq!(s.first_date(), Some(d(1)));
    assert_eq!(s.values(), &[2, 0, 5, 0, 1]);
    assert_eq!(s.dates().collect::<Vec<_>>(), vec![
      d(1),
      d(2),
      d(3),
      d(4),
      d(5)
    ]);
  }

  #[test]
  fn spans_month_boundaries() {
    let s = DailySeries::bucket(
      [
        (NaiveDate::from_ymd_opt(2024, 2, 28).unwrap(), 1u32),
        (NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(), 1u32),
      ],
      |acc, n| *acc += n,
    );
    // 2024 is a leap year.
    assert_eq!(s.values(), &[1, 0, 1]);
  }

  #[test]
  fn empty_input_gives_empty_series() {
    let s = counts(&[]);
    assert!(s.is_empty());
    assert_eq!(s.first_date(), None);
    assert_eq!(s.iter().count(), 0);
    assert!(s.trailing(7, |w| Some(w.len())).is_empty());
  }

  #[test]
  fn single_day_series() {
    let s = counts(&[(9, 3)]);
    assert_eq!(s.len(), 1);
    assert_eq!(s.cumulative(), vec![3]);
    assert_eq!(s.trailing(7, |w| Some(w.len())), vec![None]);
  }

  #[test]
  fn trailing_window_needs_full_history() {
    let s = counts(&[(1, 1), (2, 2), (3, 3), (4, 4)]);
    let sums = s.trailing(3, |w| Some(w.iter().sum::<u32>()));
    assert_eq!(sums, vec![None, None, Some(6), Some(9)]);
  }

  #[test]
  fn trailing_reducer_may_decline() {
    let s = counts(&[(1, 0), (2, 5)]);
    let r = s.trailing(1, |w| (w[0] > 0).then_some(w[0]));
    assert_eq!(r, vec![None, Some(5)]);
  }

  #[test]
  fn cumulative_totals() {
    let s = counts(&[(1, 2), (3, 1)]);
    assert_eq!(s.cumulative(), vec![2, 2, 3]);
  }
}
