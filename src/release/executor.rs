//! Walks a `PublishPlan` step by step
//!
//! By default a failing step never stops the run: the build can fail and the
//! upload is still attempted, and the run's exit status is the status of the
//! last command executed (the upload). `FailurePolicy::FailFast` stops at the
//! first failing step instead.

use super::plan::{PlanId, PublishPlan, Stage, Step};
use crate::core::error::{NightlyError, ToolError};
use crate::tools::{ToolRunner, ToolStatus};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// What to do after a step fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
  /// Keep going; the last command decides the exit status
  #[default]
  Continue,
  /// Stop at the first failure and exit with its status
  FailFast,
}

/// Result of one step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepOutcome {
  /// Directory was created
  Created,
  /// Directory was already there; nothing changed
  AlreadyExists,
  /// Directory could not be created
  DirFailed { error: String },
  /// Directory listing, sorted by name
  Listed { entries: Vec<String> },
  /// Directory could not be read (informational only)
  ListFailed { error: String },
  /// Tool ran and exited
  Exited { code: i32 },
  /// Tool could not be started
  SpawnFailed { error: String, code: i32 },
  /// Not run because an earlier step failed under fail-fast
  Skipped,
}

impl StepOutcome {
  /// Exit status this step contributes, if it is a command
  ///
  /// Listings are informational and never contribute a status.
  pub fn status_code(&self) -> Option<i32> {
    match self {
      StepOutcome::Created | StepOutcome::AlreadyExists => Some(0),
      StepOutcome::DirFailed { .. } => Some(1),
      StepOutcome::Exited { code } | StepOutcome::SpawnFailed { code, .. } => Some(*code),
      StepOutcome::Listed { .. } | StepOutcome::ListFailed { .. } | StepOutcome::Skipped => None,
    }
  }

  /// True if the step counts as a failure for fail-fast purposes
  pub fn is_failure(&self) -> bool {
    self.status_code().is_some_and(|code| code != 0)
  }
}

/// Report line for one step
#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
  pub index: usize,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub stage: Option<Stage>,
  pub description: String,
  pub outcome: StepOutcome,
}

/// What happened during a run
#[derive(Debug, Clone, Serialize)]
pub struct PublishReport {
  pub plan_id: PlanId,
  pub artifact: PathBuf,
  pub steps: Vec<StepReport>,
  /// Status of the last command executed
  pub exit_code: i32,
  pub stopped_early: bool,
}

impl PublishReport {
  pub fn success(&self) -> bool {
    self.exit_code == 0
  }
}

#[cfg(test)]
impl PublishReport {
  /// Outcome of a tool stage, if it ran or was skipped
  pub fn stage_outcome(&self, stage: Stage) -> Option<&StepOutcome> {
    self
      .steps
      .iter()
      .find(|s| s.stage == Some(stage))
      .map(|s| &s.outcome)
  }
}

/// Executes plans against a `ToolRunner`
pub struct Executor<'a, R: ToolRunner> {
  runner: &'a R,
  policy: FailurePolicy,
  echo: bool,
}

impl<'a, R: ToolRunner> Executor<'a, R> {
  pub fn new(runner: &'a R) -> Self {
    Self {
      runner,
      policy: FailurePolicy::Continue,
      echo: false,
    }
  }

  pub fn policy(mut self, policy: FailurePolicy) -> Self {
    self.policy = policy;
    self
  }

  /// Print step headers and listings to stdout as the run progresses
  pub fn echo(mut self, echo: bool) -> Self {
    self.echo = echo;
    self
  }

  /// Run every step of the plan in order
  pub fn execute(&self, plan: &PublishPlan) -> PublishReport {
    let total = plan.steps.len();
    let mut reports = Vec::with_capacity(total);
    let mut exit_code = 0;
    let mut stopped_early = false;
    let mut build_failed = false;

    for (i, step) in plan.steps.iter().enumerate() {
      let stage = match step {
        Step::Run { stage, .. } => Some(*stage),
        _ => None,
      };

      if stopped_early {
        reports.push(StepReport {
          index: i + 1,
          stage,
          description: step.describe(),
          outcome: StepOutcome::Skipped,
        });
        continue;
      }

      if self.echo {
        println!("▶ [{}/{}] {}", i + 1, total, step.describe());
      }

      if stage == Some(Stage::Upload) && build_failed {
        tracing::warn!("build failed, uploading {} anyway", plan.artifact.display());
      }

      let outcome = self.run_step(step);
      tracing::info!(step = i + 1, outcome = ?outcome, "step finished");

      if let Some(code) = outcome.status_code() {
        exit_code = code;
      }

      if outcome.is_failure() {
        if stage == Some(Stage::Build) {
          build_failed = true;
        }
        if self.echo {
          println!("   ⚠️  step {} failed with status {}", i + 1, exit_code);
        }
        if self.policy == FailurePolicy::FailFast {
          stopped_early = true;
        }
      }

      reports.push(StepReport {
        index: i + 1,
        stage,
        description: step.describe(),
        outcome,
      });
    }

    PublishReport {
      plan_id: plan.id.clone(),
      artifact: plan.artifact.clone(),
      steps: reports,
      exit_code,
      stopped_early,
    }
  }

  fn run_step(&self, step: &Step) -> StepOutcome {
    match step {
      Step::EnsureDir { path } => ensure_dir(path),
      Step::List { path } => {
        let outcome = list_dir(path);
        if self.echo {
          match &outcome {
            StepOutcome::Listed { entries } => {
              for entry in entries {
                println!("   {}", entry);
              }
            }
            StepOutcome::ListFailed { error } => println!("   (cannot list {}: {})", path.display(), error),
            _ => {}
          }
        }
        outcome
      }
      Step::Run { invocation, .. } => match self.runner.run(invocation) {
        Ok(status) => {
          if !status.success() {
            tracing::warn!(program = %invocation.program, code = status.code, "tool exited with failure");
          }
          StepOutcome::Exited { code: status.code }
        }
        Err(NightlyError::Tool(ToolError::Spawn { program, source })) => {
          tracing::error!(program = %program, error = %source, "could not start tool");
          StepOutcome::SpawnFailed {
            error: source.to_string(),
            code: ToolStatus::from_spawn_error(&source).code,
          }
        }
        Err(err) => {
          tracing::error!(error = %err, "could not start tool");
          StepOutcome::SpawnFailed {
            error: err.to_string(),
            code: crate::tools::runner::STATUS_NOT_EXECUTABLE,
          }
        }
      },
    }
  }
}

/// `mkdir -p` without touching an existing directory
fn ensure_dir(path: &Path) -> StepOutcome {
  if path.is_dir() {
    return StepOutcome::AlreadyExists;
  }

  match fs::create_dir_all(path) {
    Ok(()) => StepOutcome::Created,
    Err(err) => {
      tracing::warn!(path = %path.display(), error = %err, "could not create output directory");
      StepOutcome::DirFailed { error: err.to_string() }
    }
  }
}

fn list_dir(path: &Path) -> StepOutcome {
  match fs::read_dir(path) {
    Ok(entries) => {
      let mut names: Vec<String> = entries
        .filter_map(Result::ok)
        .map(|e| e.file_name().to_string_lossy().to_string())
        .collect();
      names.sort();
      StepOutcome::Listed { entries: names }
    }
    Err(err) => {
      tracing::warn!(path = %path.display(), error = %err, "could not list output directory");
      StepOutcome::ListFailed { error: err.to_string() }
    }
  }
}
