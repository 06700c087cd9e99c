//! Core types and analysis for vocabulary review logs.
//!
//! This crate is deliberately free of HTTP and file-format dependencies. It
//! takes items that already carry their chronological review history and
//! turns them into per-day series and per-item summaries.
//!
//! ```rust,ignore
//! let tz = revlog_core::parse_timezone("Asia/Tokyo")?;
//! let analysis = revlog_core::analyze(&items, tz);
//! ```

pub mod analysis;
pub mod error;
pub mod grade;
pub mod item;
pub mod replay;
pub mod series;
pub mod table;

pub use analysis::{Analysis, analyze};
pub use error::{Error, Result};
pub use item::{Category, Item, ReviewEvent};
pub use table::{SummaryColumn, sort_summaries};

pub use chrono_tz::Tz;

/// Resolve an IANA time zone name such as `"Europe/Berlin"`.
pub fn parse_timezone(name: &str) -> Result<Tz> {
  name
    .trim()
    .parse::<Tz>()
    .map_err(|_| Error::UnknownTimeZone(name.to_string()))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_known_zone() {
    assert_eq!(parse_timezone("Asia/Tokyo").unwrap(), Tz::Asia__Tokyo);
    assert_eq!(parse_timezone(" UTC ").unwrap(), Tz::UTC);
  }

  #[test]
  fn rejects_unknown_zone() {
    let err = parse_timezone("Mars/Olympus_Mons").unwrap_err();
    assert!(matches!(err, Error::UnknownTimeZone(ref n) if n == "Mars/Olympus_Mons"));
  }
}
