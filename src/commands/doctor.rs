//! Health check command for diagnosing a publishing environment

use std::env;

use crate::checks::{CheckContext, CheckResult, Severity, create_default_runner};
use crate::core::error::{NightlyError, NightlyResult, ValidationError};

/// Run the doctor command
///
/// Returns a validation error (exit code 3) if any check fails with error severity.
pub fn run_doctor(json: bool) -> NightlyResult<()> {
  let ctx = CheckContext::from_process(env::current_dir()?);
  let runner = create_default_runner();
  let results = runner.run_all(&ctx);

  if json {
    println!("{}", serde_json::to_string_pretty(&results)?);
  } else {
    println!("🏥 Running {} health checks...", runner.checks().len());
    for check in runner.checks() {
      println!("   • {} - {}", check.name(), check.description());
    }
    println!();

    for result in &results {
      print_result(result);
    }

    let passed_count = results.iter().filter(|r| r.passed).count();
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Summary: {}/{} checks passed", passed_count, results.len());
  }

  let failed = results.iter().filter(|r| r.is_error()).count();
  if failed > 0 {
    return Err(NightlyError::Validation(ValidationError::ChecksFailed { failed }));
  }

  if !json {
    if results.iter().any(|r| !r.passed) {
      println!("\n⚠️  Some warnings found. Consider addressing them.");
    } else {
      println!("\n✨ All checks passed! Ready to publish.");
    }
  }

  Ok(())
}

fn print_result(result: &CheckResult) {
  let icon = match (result.passed, result.severity) {
    (true, _) => "✅",
    (false, Severity::Warning) => "⚠️ ",
    (false, _) => "❌",
  };
  println!("{} {}: {}", icon, result.check_name, result.message);

  if !result.passed
    && let Some(ref suggestion) = result.suggestion
  {
    println!("   💡 Fix: {}", suggestion);
  }
  println!();
}
