//! Plain-text rendering of an analysis.

use std::io::{self, Write};

use revlog_core::{Analysis, replay::ItemSummary};

const HEADERS: [&str; 6] = [
  "Word",
  "Reviews",
  "Time to learn",
  "Relapses",
  "Abandoned",
  "First reviewed",
];

/// One-paragraph overview of the whole log.
pub fn write_overview(out: &mut impl Write, a: &Analysis) -> io::Result<()> {
  let total = |points: &[revlog_core::analysis::CountPoint]| {
    points.last().map_or(0, |p| p.cumulative)
  };
  let span = match (a.repetitions.first(), a.repetitions.last()) {
    (Some(first), Some(last)) => format!("{} to {}", first.date, last.date),
    _ => "no reviews".to_string(),
  };

  writeln!(out, "Cards:       {}", total(&a.new_cards))?;
  writeln!(out, "Reviews:     {}", total(&a.repetitions))?;
  writeln!(out, "Minutes:     {}", total(&a.minutes_spent))?;
  writeln!(out, "Period:      {span} ({})", a.timezone)?;
  writeln!(out)
}

/// The problem-word table, one row per summary in the given order.
pub fn write_table(out: &mut impl Write, rows: &[ItemSummary]) -> io::Result<()> {
  let cells: Vec<[String; 6]> = rows
    .iter()
    .map(|r| {
      [
        r.label.clone(),
        r.total_reviews.to_string(),
        r.time_to_learn.to_string(),
        r.relapses.to_string(),
        r.abandoned.to_string(),
        r.first_reviewed_at.format("%Y-%m-%d %H:%M").to_string(),
      ]
    })
    .collect();

  let mut widths = HEADERS.map(|h| h.chars().count());
  for row in &cells {
    for (w, cell) in widths.iter_mut().zip(row) {
      *w = (*w).max(cell.chars().count());
    }
  }

  write_row(out, &HEADERS.map(str::to_string), &widths)?;
  let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
  writeln!(out, "{}", rule.join("  "))?;
  for row in &cells {
    write_row(out, row, &widths)?;
  }
  Ok(())
}

fn write_row(
  out: &mut impl Write,
  row: &[String; 6],
  widths: &[usize; 6],
) -> io::Result<()> {
  let line: Vec<String> = row
    .iter()
    .zip(widths)
    .enumerate()
    .map(|(i, (cell, w))| {
      let pad = w.saturating_sub(cell.chars().count());
      // Text columns left aligned, counts right aligned.
      if i == 0 || i == 5 {
        format!("{cell}{}", " ".repeat(pad))
      } else {
        format!("{}{cell}", " ".repeat(pad))
      }
    })
    .collect();
  writeln!(out, "{}", line.join("  ").trim_end())
}
