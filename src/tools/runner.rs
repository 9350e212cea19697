//! Process execution behind a trait, so plans can be executed against a fake

use super::Invocation;
use crate::core::error::{NightlyError, NightlyResult, ToolError};
use std::process::ExitStatus;

/// Exit status conventionally reported by a shell for "command not found"
pub const STATUS_NOT_FOUND: i32 = 127;
/// Exit status conventionally reported by a shell for "found but not executable"
pub const STATUS_NOT_EXECUTABLE: i32 = 126;

/// How an external tool finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolStatus {
  pub code: i32,
}

impl ToolStatus {
  pub fn success(&self) -> bool {
    self.code == 0
  }

  /// Status a shell would report when the program could not be started
  pub fn from_spawn_error(err: &std::io::Error) -> Self {
    let code = match err.kind() {
      std::io::ErrorKind::NotFound => STATUS_NOT_FOUND,
      _ => STATUS_NOT_EXECUTABLE,
    };
    Self { code }
  }
}

impl From<ExitStatus> for ToolStatus {
  fn from(status: ExitStatus) -> Self {
    if let Some(code) = status.code() {
      return Self { code };
    }

    #[cfg(unix)]
    {
      use std::os::unix::process::ExitStatusExt;
      if let Some(signal) = status.signal() {
        return Self { code: 128 + signal };
      }
    }

    Self { code: 1 }
  }
}

/// Runs an invocation to completion
pub trait ToolRunner {
  /// Run the command and wait for it.
  ///
  /// A non-zero exit is `Ok` with that status. `Err` means the process
  /// could not be started at all.
  fn run(&self, invocation: &Invocation) -> NightlyResult<ToolStatus>;
}

/// Spawns real processes with inherited stdio, so tool output reaches the terminal untouched
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner {
  stdout_to_stderr: bool,
}

impl SystemRunner {
  /// Send the child's stdout to our stderr, leaving stdout to `--json` output
  pub fn stdout_to_stderr(mut self, enabled: bool) -> Self {
    self.stdout_to_stderr = enabled;
    self
  }
}

impl ToolRunner for SystemRunner {
  fn run(&self, invocation: &Invocation) -> NightlyResult<ToolStatus> {
    tracing::debug!(command = %invocation, "spawning");

    let mut cmd = invocation.to_command();
    if self.stdout_to_stderr {
      cmd.stdout(std::io::stderr());
    }

    let status = cmd.status().map_err(|source| {
      NightlyError::Tool(ToolError::Spawn {
        program: invocation.program.clone(),
        source,
      })
    })?;

    let status = ToolStatus::from(status);
    tracing::debug!(program = %invocation.program, code = status.code, "exited");
    Ok(status)
  }
}
