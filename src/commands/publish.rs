//! `conda-nightly publish` - build the package and upload it to the nightly label
//!
//! Steps, in order, with no gate between them unless `--fail-fast`:
//! ensure output dir, disable auto-upload, build, list noarch/, upload --force.
//! The exit status is the upload's.

use crate::core::context::{Overrides, PublishContext};
use crate::core::error::{NightlyError, NightlyResult, print_error};
use crate::release::{Executor, FailurePolicy, NightlyVersion, PublishPlan, PublishReport};
use crate::tools::SystemRunner;
use std::env;

/// Options for a publish run
#[derive(Debug, Clone, Default)]
pub struct PublishOptions {
  pub overrides: Overrides,
  pub date: Option<String>,
  pub dry_run: bool,
  pub json: bool,
  pub fail_fast: bool,
}

/// Run the publish command, returning the process exit status
pub fn run_publish(options: PublishOptions) -> NightlyResult<i32> {
  let work_dir = env::current_dir()?;
  let ctx = PublishContext::load(&work_dir, options.overrides)?;
  let version = NightlyVersion::resolve(options.date.as_deref())?;
  let plan = PublishPlan::build(&ctx, version)?;

  tracing::info!(plan = %plan.id, package = %plan.package, version = %plan.version, "plan ready");
  match ctx.config_path {
    Some(ref path) => tracing::debug!(config = %path.display(), "using configuration file"),
    None => tracing::debug!("no configuration file, using flags and defaults"),
  }

  if ctx.token.is_none() {
    tracing::warn!(
      "no upload token ({} unset, no --token); relying on the upload client's login",
      ctx.token_env
    );
  }

  if options.dry_run {
    if options.json {
      println!("{}", plan.to_json()?);
    } else {
      print!("{}", plan.to_human_readable());
      println!("\n🔍 Dry-run mode (nothing executed)");
    }
    return Ok(0);
  }

  if !options.json {
    println!(
      "🌙 Publishing {} {} to label '{}' as {}",
      plan.package, plan.version, plan.label, plan.user
    );
    println!();
  }

  let policy = if options.fail_fast {
    FailurePolicy::FailFast
  } else {
    FailurePolicy::Continue
  };
  let runner = SystemRunner::default().stdout_to_stderr(options.json);
  let report = Executor::new(&runner)
    .policy(policy)
    .echo(!options.json)
    .execute(&plan);

  Ok(finish(&report, options.json))
}

/// Print the report and return the run's exit status
///
/// The tools have already run by now, so a report that fails to render does not
/// replace the upload's status.
fn finish(report: &PublishReport, json: bool) -> i32 {
  if json {
    match serde_json::to_string_pretty(report) {
      Ok(rendered) => println!("{}", rendered),
      Err(err) => print_error(&NightlyError::from(err).context("Failed to render the publish report")),
    }
  } else {
    print_summary(report);
  }
  report.exit_code
}

fn print_summary(report: &PublishReport) {
  println!();
  if report.success() {
    println!("✅ Uploaded {}", report.artifact.display());
    return;
  }

  if report.stopped_early {
    println!("❌ Stopped after a failed step (--fail-fast), exit status {}", report.exit_code);
  } else {
    println!("❌ Upload failed with exit status {}", report.exit_code);
  }
}
