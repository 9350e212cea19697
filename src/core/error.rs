//! Error types for conda-nightly with contextual messages and exit codes
//!
//! Errors raised by the external tools themselves are never translated: their
//! output goes straight to the terminal and only their exit status is kept.
//! The types here cover failures of the publisher itself (config, filesystem,
//! spawning processes) and carry a help hint where one is useful.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for publisher-level failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, invalid args, missing files)
  User = 1,
  /// System error (I/O, process spawning)
  System = 2,
  /// Validation failure (doctor checks)
  Validation = 3,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for conda-nightly
#[derive(Debug)]
pub enum NightlyError {
  /// Configuration errors
  Config(ConfigError),

  /// External tool could not be run
  Tool(ToolError),

  /// Validation errors (doctor)
  Validation(ValidationError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl NightlyError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    NightlyError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    NightlyError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      NightlyError::Message { message, context, help } => NightlyError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      NightlyError::Io(err) => NightlyError::Message {
        message: ctx_str,
        context: Some(format!("I/O error: {}", err)),
        help: None,
      },
      _ => self,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      NightlyError::Config(_) => ExitCode::User,
      NightlyError::Tool(_) => ExitCode::System,
      NightlyError::Validation(_) => ExitCode::Validation,
      NightlyError::Io(_) => ExitCode::System,
      NightlyError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      NightlyError::Config(e) => e.help_message(),
      NightlyError::Tool(e) => e.help_message(),
      NightlyError::Validation(e) => e.help_message(),
      NightlyError::Message { help, .. } => help.clone(),
      NightlyError::Io(_) => None,
    }
  }
}

impl fmt::Display for NightlyError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      NightlyError::Config(e) => write!(f, "{}", e),
      NightlyError::Tool(e) => write!(f, "{}", e),
      NightlyError::Validation(e) => write!(f, "{}", e),
      NightlyError::Io(e) => write!(f, "I/O error: {}", e),
      NightlyError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for NightlyError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      NightlyError::Io(e) => Some(e),
      NightlyError::Tool(ToolError::Spawn { source, .. }) => Some(source),
      _ => None,
    }
  }
}

impl From<io::Error> for NightlyError {
  fn from(err: io::Error) -> Self {
    NightlyError::Io(err)
  }
}

impl From<String> for NightlyError {
  fn from(msg: String) -> Self {
    NightlyError::message(msg)
  }
}

impl From<&str> for NightlyError {
  fn from(msg: &str) -> Self {
    NightlyError::message(msg)
  }
}

impl From<toml_edit::de::Error> for NightlyError {
  fn from(err: toml_edit::de::Error) -> Self {
    NightlyError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<toml_edit::ser::Error> for NightlyError {
  fn from(err: toml_edit::ser::Error) -> Self {
    NightlyError::message(format!("TOML serialization error: {}", err))
  }
}

impl From<serde_json::Error> for NightlyError {
  fn from(err: serde_json::Error) -> Self {
    NightlyError::message(format!("JSON error: {}", err))
  }
}

impl From<chrono::ParseError> for NightlyError {
  fn from(err: chrono::ParseError) -> Self {
    NightlyError::with_help(
      format!("Invalid date: {}", err),
      "Dates are written as YYYY-MM-DD, e.g. --date 2024-03-07",
    )
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// nightly.toml not found
  NotFound { dir: PathBuf },

  /// Missing required value (neither in file nor on the command line)
  MissingField { field: String, flag: String },

  /// HOME is not set, so the default output root cannot be resolved
  NoHome,

  /// A path handed to the build or upload tool is not valid Unicode
  NonUnicodePath { field: String, path: PathBuf },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::NotFound { .. } => {
        Some("Run `conda-nightly init --package <name> --user <user>` to create one.".to_string())
      }
      ConfigError::MissingField { flag, .. } => Some(format!(
        "Set it in nightly.toml or pass {} on the command line.",
        flag
      )),
      ConfigError::NoHome => Some("Set HOME or pass --output-root explicitly.".to_string()),
      ConfigError::NonUnicodePath { .. } => Some("Use a path made of valid Unicode characters.".to_string()),
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::NotFound { dir } => {
        write!(
          f,
          "No conda-nightly configuration found.\nExpected file: {}/nightly.toml",
          dir.display()
        )
      }
      ConfigError::MissingField { field, .. } => {
        write!(f, "Missing required value: {}", field)
      }
      ConfigError::NoHome => write!(f, "Could not determine the home directory"),
      ConfigError::NonUnicodePath { field, path } => {
        write!(f, "{} is not valid Unicode: {}", field, path.display())
      }
    }
  }
}

/// External tool errors raised by the publisher (not by the tool itself)
#[derive(Debug)]
pub enum ToolError {
  /// The process could not be started
  Spawn { program: String, source: io::Error },
}

impl ToolError {
  fn help_message(&self) -> Option<String> {
    match self {
      ToolError::Spawn { program, source } if source.kind() == io::ErrorKind::NotFound => Some(format!(
        "`{}` is not on PATH. Install it or set the tool in nightly.toml. Run `conda-nightly doctor` to diagnose.",
        program
      )),
      ToolError::Spawn { .. } => None,
    }
  }
}

impl fmt::Display for ToolError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ToolError::Spawn { program, source } => write!(f, "Failed to run {}: {}", program, source),
    }
  }
}

/// Validation errors
#[derive(Debug)]
pub enum ValidationError {
  /// One or more doctor checks failed
  ChecksFailed { failed: usize },
}

impl ValidationError {
  fn help_message(&self) -> Option<String> {
    match self {
      ValidationError::ChecksFailed { .. } => Some("Fix the errors listed above and run the doctor again.".to_string()),
    }
  }
}

impl fmt::Display for ValidationError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ValidationError::ChecksFailed { failed } => write!(f, "{} health check(s) failed", failed),
    }
  }
}

/// Result type alias for conda-nightly
pub type NightlyResult<T> = Result<T, NightlyError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> NightlyResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> NightlyResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<NightlyError>,
{
  fn context(self, ctx: impl Into<String>) -> NightlyResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> NightlyResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &NightlyError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
