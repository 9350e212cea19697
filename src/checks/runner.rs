//! Check runner for executing health checks

use super::environment::{ConfigCheck, OutputRootCheck, TokenCheck};
use super::tools::{RecipeCheck, ToolCheck, ToolKind};
use super::trait_def::{Check, CheckContext, CheckResult};
use std::sync::Arc;

/// Check runner that executes multiple checks
pub struct CheckRunner {
  checks: Vec<Arc<dyn Check>>,
}

impl CheckRunner {
  /// Create a new check runner
  pub fn new() -> Self {
    Self { checks: Vec::new() }
  }

  /// Add a check to the runner
  pub fn add_check(&mut self, check: Arc<dyn Check>) {
    self.checks.push(check);
  }

  /// Run all checks and collect results
  pub fn run_all(&self, ctx: &CheckContext) -> Vec<CheckResult> {
    self
      .checks
      .iter()
      .map(|check| {
        check.run(ctx).unwrap_or_else(|err| {
          // A check that cannot run is itself an error result
          CheckResult::error(
            check.name(),
            format!("Check failed to run: {}", err),
            Some("Run with -vv for more details"),
          )
        })
      })
      .collect()
  }

  /// Registered checks (for listing)
  pub fn checks(&self) -> &[Arc<dyn Check>] {
    &self.checks
  }
}

impl Default for CheckRunner {
  fn default() -> Self {
    Self::new()
  }
}

/// Create a runner with all built-in checks registered
pub fn create_default_runner() -> CheckRunner {
  let mut runner = CheckRunner::new();
  runner.add_check(Arc::new(ConfigCheck));
  runner.add_check(Arc::new(ToolCheck::new(ToolKind::Build)));
  runner.add_check(Arc::new(ToolCheck::new(ToolKind::Upload)));
  runner.add_check(Arc::new(RecipeCheck));
  runner.add_check(Arc::new(TokenCheck));
  runner.add_check(Arc::new(OutputRootCheck));
  runner
}
