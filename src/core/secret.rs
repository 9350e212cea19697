//! Redacted wrapper for the upload token

use serde::{Serialize, Serializer};
use std::fmt;

/// Placeholder printed wherever a secret would appear
pub const REDACTED: &str = "***";

/// A value that must never be printed, logged, or serialized in clear text
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
  pub fn new(value: impl Into<String>) -> Self {
    Self(value.into())
  }

  /// The clear-text value, for handing to a child process only
  pub fn expose(&self) -> &str {
    &self.0
  }
}

impl fmt::Debug for Secret {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Secret({})", REDACTED)
  }
}

impl fmt::Display for Secret {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(REDACTED)
  }
}

impl Serialize for Secret {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(REDACTED)
  }
}
