//! Checks on the external tools and the recipe they build

use super::trait_def::{Check, CheckContext, CheckResult};
use crate::utils::absolutize;

/// Which external tool a `ToolCheck` looks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
  Build,
  Upload,
}

/// The configured tool executable is on PATH
pub struct ToolCheck {
  kind: ToolKind,
}

impl ToolCheck {
  pub fn new(kind: ToolKind) -> Self {
    Self { kind }
  }
}

impl Check for ToolCheck {
  fn name(&self) -> &str {
    match self.kind {
      ToolKind::Build => "build-tool",
      ToolKind::Upload => "upload-tool",
    }
  }

  fn description(&self) -> &str {
    match self.kind {
      ToolKind::Build => "Build tool (conda) is installed",
      ToolKind::Upload => "Upload client (anaconda) is installed",
    }
  }

  fn run(&self, ctx: &CheckContext) -> anyhow::Result<CheckResult> {
    let config = ctx.effective_config();
    let (tool, hint) = match self.kind {
      ToolKind::Build => (config.build.tool, "Install conda-build: conda install conda-build"),
      ToolKind::Upload => (config.upload.tool, "Install the client: conda install anaconda-client"),
    };

    // Names with a separator are checked as paths relative to the work dir
    match which::which_in(&tool, ctx.var("PATH"), &ctx.work_dir) {
      Ok(path) => Ok(CheckResult::pass(self.name(), format!("{} found at {}", tool, path.display()))),
      Err(_) => Ok(CheckResult::error(self.name(), format!("{} not found on PATH", tool), Some(hint))),
    }
  }
}

/// Recipe file names the build tool accepts
const RECIPE_FILES: [&str; 2] = ["meta.yaml", "meta.yml"];

/// The recipe directory contains a package recipe
pub struct RecipeCheck;

impl Check for RecipeCheck {
  fn name(&self) -> &str {
    "recipe"
  }

  fn description(&self) -> &str {
    "Package recipe is present"
  }

  fn run(&self, ctx: &CheckContext) -> anyhow::Result<CheckResult> {
    let recipe = absolutize(&ctx.effective_config().build.recipe, &ctx.work_dir);

    if !recipe.is_dir() {
      return Ok(CheckResult::error(
        self.name(),
        format!("Recipe directory {} does not exist", recipe.display()),
        Some("Set build.recipe in nightly.toml"),
      ));
    }

    match RECIPE_FILES.iter().map(|f| recipe.join(f)).find(|p| p.is_file()) {
      Some(found) => Ok(CheckResult::pass(self.name(), format!("Found {}", found.display()))),
      None => Ok(CheckResult::error(
        self.name(),
        format!("No meta.yaml in {}", recipe.display()),
        Some("Run from the recipe directory or set build.recipe in nightly.toml"),
      )),
    }
  }
}
