//! The ordered list of steps a nightly run performs
//!
//! A plan is built from a resolved `PublishContext` without touching the
//! filesystem or spawning anything. `--dry-run` prints it; a real run hands it
//! to the `Executor`.
//!
//! ```text
//! 1. ensure    <output_root>
//! 2. run       conda config --set anaconda_upload no
//! 3. run       CONDA_BLD_PATH=.. VERSION=.. conda build <recipe> --old-build-string
//! 4. list      <output_root>/noarch
//! 5. run       anaconda -t *** upload -u <user> -l <label> <artifact> --force
//! ```

use super::{Artifact, NightlyVersion};
use crate::core::context::PublishContext;
use crate::core::error::NightlyResult;
use crate::tools::{Invocation, anaconda, conda};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::PathBuf;

/// Plan identifier (SHA256 hash of the redacted steps)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanId(String);

impl PlanId {
  /// Create a plan ID from plan contents
  pub fn from_contents(contents: &[u8]) -> Self {
    let mut hasher = Sha256::new();
    hasher.update(contents);
    let result = hasher.finalize();
    Self(format!("{:x}", result))
  }

  /// Get the short ID (first 12 characters)
  pub fn short(&self) -> &str {
    &self.0[..12.min(self.0.len())]
  }
}

impl fmt::Display for PlanId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.short())
  }
}

/// Which external call a `Step::Run` is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
  ConfigureBuildTool,
  Build,
  Upload,
}

impl fmt::Display for Stage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Stage::ConfigureBuildTool => write!(f, "configure"),
      Stage::Build => write!(f, "build"),
      Stage::Upload => write!(f, "upload"),
    }
  }
}

/// One step of a nightly run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Step {
  /// Create a directory (and parents) if missing
  EnsureDir { path: PathBuf },

  /// Run an external tool
  Run { stage: Stage, invocation: Invocation },

  /// Print the file names in a directory
  List { path: PathBuf },
}

impl Step {
  /// Short human-readable description
  pub fn describe(&self) -> String {
    match self {
      Step::EnsureDir { path } => format!("Ensure output directory {}", path.display()),
      Step::Run { stage, invocation } => format!("{}: {}", stage, invocation),
      Step::List { path } => format!("List {}", path.display()),
    }
  }
}

/// Everything a nightly run will do, in order
#[derive(Debug, Clone, Serialize)]
pub struct PublishPlan {
  pub id: PlanId,
  pub package: String,
  pub user: String,
  pub label: String,
  pub version: NightlyVersion,
  pub output_root: PathBuf,
  pub artifact: PathBuf,
  pub steps: Vec<Step>,
}

impl PublishPlan {
  /// Build the plan for `version` from resolved settings
  pub fn build(ctx: &PublishContext, version: NightlyVersion) -> NightlyResult<Self> {
    let artifact = Artifact::new(ctx.package.clone(), version);
    let artifact_path = artifact.path(&ctx.output_root);

    let steps = vec![
      Step::EnsureDir {
        path: ctx.output_root.clone(),
      },
      Step::Run {
        stage: Stage::ConfigureBuildTool,
        invocation: conda::disable_auto_upload(&ctx.build_tool).current_dir(&ctx.work_dir),
      },
      Step::Run {
        stage: Stage::Build,
        invocation: conda::build(
          &ctx.build_tool,
          &ctx.recipe,
          &ctx.output_root,
          &version,
          &ctx.build_args,
          &ctx.work_dir,
        ),
      },
      Step::List {
        path: Artifact::noarch_dir(&ctx.output_root),
      },
      Step::Run {
        stage: Stage::Upload,
        invocation: anaconda::upload(
          &ctx.upload_tool,
          ctx.token.as_ref(),
          &ctx.user,
          &ctx.label,
          &artifact_path,
        )
        .current_dir(&ctx.work_dir),
      },
    ];

    debug_assert!(steps.iter().all(|step| match step {
      Step::Run {
        stage: Stage::Build,
        invocation,
      } => invocation.has_flag(conda::PRESERVE_BUILD_STRING),
      Step::Run {
        stage: Stage::Upload,
        invocation,
      } => invocation.has_flag(anaconda::FORCE),
      _ => true,
    }));

    // Steps serialize with the token redacted, so the id does not depend on it
    let json = serde_json::to_vec(&steps)?;

    Ok(Self {
      id: PlanId::from_contents(&json),
      package: ctx.package.clone(),
      user: ctx.user.clone(),
      label: ctx.label.clone(),
      version,
      output_root: ctx.output_root.clone(),
      artifact: artifact_path,
      steps,
    })
  }

  /// Serialize to JSON
  pub fn to_json(&self) -> NightlyResult<String> {
    Ok(serde_json::to_string_pretty(self)?)
  }

  /// Get human-readable representation
  pub fn to_human_readable(&self) -> String {
    let mut output = String::new();

    output.push_str(&format!("📋 Nightly plan: {} {} ({})\n", self.package, self.version, self.id));
    output.push_str(&format!("   Owner:    {}\n", self.user));
    output.push_str(&format!("   Label:    {}\n", self.label));
    output.push_str(&format!("   Artifact: {}\n", self.artifact.display()));

    output.push_str(&format!("\n   Steps ({}):\n", self.steps.len()));
    for (i, step) in self.steps.iter().enumerate() {
      output.push_str(&format!("   {}. {}\n", i + 1, step.describe()));
    }

    output.push_str("\n⚠️  NOTE: The upload replaces any existing artifact with the same name and label\n");

    output
  }
}

#[cfg(test)]
impl PublishPlan {
  /// The invocation for a stage, if the plan has one
  pub fn invocation(&self, wanted: Stage) -> Option<&Invocation> {
    self.steps.iter().find_map(|step| match step {
      Step::Run { stage, invocation } if *stage == wanted => Some(invocation),
      _ => None,
    })
  }
}
