//! Check trait abstraction for environment health checks
//!
//! All checks implement the `Check` trait, making it easy to add new checks
//! without modifying the runner.

use crate::core::config::NightlyConfig;
use serde::Serialize;
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::PathBuf;

/// Severity level for check results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
  /// Informational message (not an issue)
  Info,
  /// Warning (non-blocking, but should be addressed)
  Warning,
  /// Error (blocking, must be fixed)
  Error,
}

/// Result of running a check
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
  /// Name of the check that ran
  pub check_name: String,
  /// Whether the check passed
  pub passed: bool,
  /// Severity level (if failed)
  pub severity: Severity,
  /// Human-readable message
  pub message: String,
  /// Optional suggested fix
  pub suggestion: Option<String>,
}

impl CheckResult {
  /// Create a passing check result
  pub fn pass(check_name: impl Into<String>, message: impl Into<String>) -> Self {
    Self {
      check_name: check_name.into(),
      passed: true,
      severity: Severity::Info,
      message: message.into(),
      suggestion: None,
    }
  }

  /// Create a failing check result with error severity
  pub fn error(
    check_name: impl Into<String>,
    message: impl Into<String>,
    suggestion: Option<impl Into<String>>,
  ) -> Self {
    Self {
      check_name: check_name.into(),
      passed: false,
      severity: Severity::Error,
      message: message.into(),
      suggestion: suggestion.map(|s| s.into()),
    }
  }

  /// Create a failing check result with warning severity
  pub fn warning(
    check_name: impl Into<String>,
    message: impl Into<String>,
    suggestion: Option<impl Into<String>>,
  ) -> Self {
    Self {
      check_name: check_name.into(),
      passed: false,
      severity: Severity::Warning,
      message: message.into(),
      suggestion: suggestion.map(|s| s.into()),
    }
  }

  /// True if this result should fail the doctor run
  pub fn is_error(&self) -> bool {
    !self.passed && self.severity == Severity::Error
  }
}

/// Context passed to checks
#[derive(Debug, Clone)]
pub struct CheckContext {
  /// Directory the doctor runs in
  pub work_dir: PathBuf,
  /// Loaded config, if a file was found and parsed
  pub config: Option<NightlyConfig>,
  /// Why the config could not be loaded, if a file exists but is broken
  pub config_error: Option<String>,
  /// Where the config was found
  pub config_path: Option<PathBuf>,
  /// Environment snapshot
  pub env: BTreeMap<String, String>,
}

impl CheckContext {
  /// Build a context from the process environment
  pub fn from_process(work_dir: PathBuf) -> Self {
    Self::with_env(work_dir, unicode_env(std::env::vars_os()))
  }

  /// Build a context with an explicit environment (config is still read from `work_dir`)
  pub fn with_env(work_dir: PathBuf, env: BTreeMap<String, String>) -> Self {
    let config_path = NightlyConfig::find_config_path(&work_dir);
    let (config, config_error) = match NightlyConfig::load_optional(&work_dir) {
      Ok(config) => (config, None),
      Err(err) => (None, Some(err.to_string())),
    };

    Self {
      work_dir,
      config,
      config_error,
      config_path,
      env,
    }
  }

  /// Loaded config, or defaults when there is none
  pub fn effective_config(&self) -> NightlyConfig {
    self.config.clone().unwrap_or_default()
  }

  pub fn var(&self, key: &str) -> Option<&str> {
    self.env.get(key).map(String::as_str).filter(|v| !v.is_empty())
  }
}

/// Keep the variables whose name and value are both valid Unicode
///
/// Anything else cannot name a tool, a token or a path the checks look at.
fn unicode_env(vars: impl IntoIterator<Item = (OsString, OsString)>) -> BTreeMap<String, String> {
  vars
    .into_iter()
    .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
    .collect()
}

/// A single health check
pub trait Check: Send + Sync {
  /// Short, stable name (used in JSON output)
  fn name(&self) -> &str;

  /// One-line description of what is checked
  fn description(&self) -> &str;

  /// Run the check
  fn run(&self, ctx: &CheckContext) -> anyhow::Result<CheckResult>;
}
