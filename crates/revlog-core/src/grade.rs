//! Review grades and their three-way classification.
//!
//! Every grade falls into exactly one [`Outcome`]: a success, a failure, or an
//! abandonment. Grade strings the exporter may add in the future are treated
//! as failures rather than rejected.

use std::fmt;

use serde::{Deserialize, Serialize};

// ─── Grade ───────────────────────────────────────────────────────────────────

/// The recorded result of a single review.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Grade {
  Known,
  Pass,
  Hard,
  Easy,
  Okay,
  Abandoned,
  /// Any other grade string, e.g. `"fail"`, `"nothing"`, `"something"`.
  Other(String),
}

impl Grade {
  pub fn as_str(&self) -> &str {
    match self {
      Self::Known => "known",
      Self::Pass => "pass",
      Self::Hard => "hard",
      Self::Easy => "easy",
      Self::Okay => "okay",
      Self::Abandoned => "abandoned",
      Self::Other(s) => s,
    }
  }

  pub fn outcome(&self) -> Outcome {
    match self {
      Self::Known | Self::Pass | Self::Hard | Self::Easy | Self::Okay => {
        Outcome::Success
      }
      Self::Abandoned => Outcome::Abandoned,
      Self::Other(_) => Outcome::Failure,
    }
  }

  pub fn is_successful(&self) -> bool { self.outcome() == Outcome::Success }

  pub fn is_failure(&self) -> bool { self.outcome() == Outcome::Failure }

  pub fn is_abandoned(&self) -> bool { self.outcome() == Outcome::Abandoned }
}

impl From<&str> for Grade {
  fn from(s: &str) -> Self {
    match s {
      "known" => Self::Known,
      "pass" => Self::Pass,
      "hard" => Self::Hard,
      "easy" => Self::Easy,
      "okay" => Self::Okay,
      "abandoned" => Self::Abandoned,
      other => Self::Other(other.to_string()),
    }
  }
}

impl From<String> for Grade {
  fn from(s: String) -> Self {
    match Grade::from(s.as_str()) {
      Self::Other(_) => Self::Other(s),
      g => g,
    }
  }
}

impl From<Grade> for String {
  fn from(g: Grade) -> Self {
    match g {
      Grade::Other(s) => s,
      g => g.as_str().to_string(),
    }
  }
}

impl fmt::Display for Grade {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── Outcome ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
  Success,
  Failure,
  Abandoned,
}

/// `true` iff `grade` is one of `known`, `pass`, `hard`, `easy`, `okay`.
pub fn is_successful(grade: &str) -> bool { Grade::from(grade).is_successful() }

/// `true` iff `grade` is neither successful nor `abandoned`.
pub fn is_failure(grade: &str) -> bool { Grade::from(grade).is_failure() }
