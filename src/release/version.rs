//! Date-stamped nightly versions

use crate::core::error::NightlyResult;
use chrono::{Local, NaiveDate};
use serde::{Serialize, Serializer};
use std::fmt;

/// Format of the version string (`2024.03.07`)
pub const VERSION_FORMAT: &str = "%Y.%m.%d";
/// Format accepted for `--date` (`2024-03-07`)
pub const DATE_INPUT_FORMAT: &str = "%Y-%m-%d";

/// A nightly version: a calendar date rendered as `YYYY.MM.DD`
///
/// Same day, same version. Runs on different days never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct NightlyVersion(NaiveDate);

impl NightlyVersion {
  /// Today's date in the local timezone of the machine running the publisher
  pub fn today() -> Self {
    Self::from_date(Local::now().date_naive())
  }

  pub fn from_date(date: NaiveDate) -> Self {
    Self(date)
  }

  /// Parse a `YYYY-MM-DD` date (as given to `--date`)
  pub fn parse_date(input: &str) -> NightlyResult<Self> {
    let date = NaiveDate::parse_from_str(input.trim(), DATE_INPUT_FORMAT)?;
    Ok(Self(date))
  }

  /// `--date` if given, otherwise today
  pub fn resolve(date: Option<&str>) -> NightlyResult<Self> {
    match date {
      Some(input) => Self::parse_date(input),
      None => Ok(Self::today()),
    }
  }
}

impl fmt::Display for NightlyVersion {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0.format(VERSION_FORMAT))
  }
}

impl Serialize for NightlyVersion {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(self)
  }
}
