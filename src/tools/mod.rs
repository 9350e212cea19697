//! External tool invocations
//!
//! The publisher never talks to conda or anaconda.org directly. It builds
//! `Invocation`s describing the exact command lines and hands them to a
//! `ToolRunner`.
//!
//! - **conda**: build-tool command lines (config, build)
//! - **anaconda**: upload-client command line
//! - **runner**: the `ToolRunner` seam and the process-spawning `SystemRunner`

pub mod anaconda;
pub mod conda;
pub mod runner;

use crate::core::secret::Secret;
use crate::utils::shell_quote;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::process::Command;

pub use runner::{SystemRunner, ToolRunner, ToolStatus};

/// One command-line argument; secrets are redacted everywhere except the spawned process
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Arg {
  Plain(String),
  Secret(Secret),
}

impl Arg {
  fn exposed(&self) -> &str {
    match self {
      Arg::Plain(s) => s,
      Arg::Secret(s) => s.expose(),
    }
  }
}

impl From<&str> for Arg {
  fn from(s: &str) -> Self {
    Arg::Plain(s.to_string())
  }
}

impl From<String> for Arg {
  fn from(s: String) -> Self {
    Arg::Plain(s)
  }
}

/// A fully specified external command
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invocation {
  pub program: String,
  pub args: Vec<Arg>,
  /// Variables set on the child only; the publisher's own environment is untouched
  #[serde(skip_serializing_if = "BTreeMap::is_empty")]
  pub env: BTreeMap<String, String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub cwd: Option<PathBuf>,
}

impl Invocation {
  pub fn new(program: impl Into<String>) -> Self {
    Self {
      program: program.into(),
      args: Vec::new(),
      env: BTreeMap::new(),
      cwd: None,
    }
  }

  pub fn arg(mut self, arg: impl Into<Arg>) -> Self {
    self.args.push(arg.into());
    self
  }

  pub fn args<I, A>(mut self, args: I) -> Self
  where
    I: IntoIterator<Item = A>,
    A: Into<Arg>,
  {
    self.args.extend(args.into_iter().map(Into::into));
    self
  }

  pub fn secret(mut self, secret: Secret) -> Self {
    self.args.push(Arg::Secret(secret));
    self
  }

  pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
    self.env.insert(key.into(), value.into());
    self
  }

  pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
    self.cwd = Some(dir.into());
    self
  }

  /// True if any argument equals `flag`
  pub fn has_flag(&self, flag: &str) -> bool {
    self.args.iter().any(|a| matches!(a, Arg::Plain(s) if s == flag))
  }

  /// Arguments as plain strings with secrets redacted
  pub fn redacted_args(&self) -> Vec<String> {
    self
      .args
      .iter()
      .map(|a| match a {
        Arg::Plain(s) => s.clone(),
        Arg::Secret(s) => s.to_string(),
      })
      .collect()
  }

  /// Build the process command with secrets exposed
  pub fn to_command(&self) -> Command {
    let mut cmd = Command::new(&self.program);
    cmd.args(self.args.iter().map(Arg::exposed));
    cmd.envs(&self.env);
    if let Some(ref dir) = self.cwd {
      cmd.current_dir(dir);
    }
    cmd
  }
}

impl fmt::Display for Invocation {
  /// Shell-like rendering, e.g. `VERSION=2024.03.07 conda build . --old-build-string`
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (key, value) in &self.env {
      write!(f, "{}={} ", key, shell_quote(value))?;
    }
    write!(f, "{}", shell_quote(&self.program))?;
    for arg in self.redacted_args() {
      write!(f, " {}", shell_quote(&arg))?;
    }
    Ok(())
  }
}
