//! Checks on configuration, token and output directory

use super::trait_def::{Check, CheckContext, CheckResult};
use crate::core::config::DEFAULT_OUTPUT_ROOT;
use crate::utils::{absolutize, expand_home};
use std::path::{Path, PathBuf};

/// A config file is present and valid
pub struct ConfigCheck;

impl Check for ConfigCheck {
  fn name(&self) -> &str {
    "config"
  }

  fn description(&self) -> &str {
    "nightly.toml is present and valid"
  }

  fn run(&self, ctx: &CheckContext) -> anyhow::Result<CheckResult> {
    if let Some(ref err) = ctx.config_error {
      return Ok(CheckResult::error(
        self.name(),
        format!("Configuration is invalid: {}", err),
        Some("Fix the file or recreate it with `conda-nightly init --force`"),
      ));
    }

    let Some(ref config) = ctx.config else {
      return Ok(CheckResult::warning(
        self.name(),
        "No nightly.toml found; --package and --user must be passed on every run",
        Some("Run `conda-nightly init --package <name> --user <user>`"),
      ));
    };

    if config.package.name.is_none() || config.package.user.is_none() {
      return Ok(CheckResult::warning(
        self.name(),
        "nightly.toml does not set both package.name and package.user",
        Some("Add them under [package] or pass --package/--user"),
      ));
    }

    let location = ctx
      .config_path
      .as_ref()
      .map(|p| p.display().to_string())
      .unwrap_or_else(|| "nightly.toml".to_string());
    Ok(CheckResult::pass(self.name(), format!("Loaded {}", location)))
  }
}

/// The upload token is available in the environment
pub struct TokenCheck;

impl Check for TokenCheck {
  fn name(&self) -> &str {
    "upload-token"
  }

  fn description(&self) -> &str {
    "Upload token is set in the environment"
  }

  fn run(&self, ctx: &CheckContext) -> anyhow::Result<CheckResult> {
    let token_env = ctx.effective_config().upload.token_env;

    if ctx.var(&token_env).is_some() {
      return Ok(CheckResult::pass(self.name(), format!("{} is set", token_env)));
    }

    // The upload client may still have a logged-in session
    Ok(CheckResult::warning(
      self.name(),
      format!("{} is not set; the upload will rely on the client's own login", token_env),
      Some(format!("export {}=<token> or pass --token", token_env)),
    ))
  }
}

/// The output root exists or can be created
pub struct OutputRootCheck;

impl OutputRootCheck {
  fn resolve(ctx: &CheckContext) -> Option<PathBuf> {
    let config = ctx.effective_config();
    let raw = config.build.output_root.as_deref().unwrap_or(DEFAULT_OUTPUT_ROOT);
    let home = ctx.var("HOME").map(PathBuf::from);
    expand_home(raw, home.as_deref()).map(|p| absolutize(&p, &ctx.work_dir))
  }
}

impl Check for OutputRootCheck {
  fn name(&self) -> &str {
    "output-root"
  }

  fn description(&self) -> &str {
    "Build output directory exists or can be created"
  }

  fn run(&self, ctx: &CheckContext) -> anyhow::Result<CheckResult> {
    let Some(root) = Self::resolve(ctx) else {
      return Ok(CheckResult::error(
        self.name(),
        "HOME is not set, so the default output root cannot be resolved",
        Some("Set HOME or build.output_root in nightly.toml"),
      ));
    };

    if root.is_dir() {
      return Ok(CheckResult::pass(self.name(), format!("{} exists", root.display())));
    }

    if root.exists() {
      return Ok(CheckResult::error(
        self.name(),
        format!("{} exists but is not a directory", root.display()),
        Some("Remove the file or point build.output_root elsewhere"),
      ));
    }

    match nearest_existing_ancestor(&root) {
      Some(ancestor) if ancestor.is_dir() => Ok(CheckResult::pass(
        self.name(),
        format!("{} will be created under {}", root.display(), ancestor.display()),
      )),
      _ => Ok(CheckResult::error(
        self.name(),
        format!("{} cannot be created", root.display()),
        Some("Point build.output_root at a writable location"),
      )),
    }
  }
}

fn nearest_existing_ancestor(path: &Path) -> Option<&Path> {
  path.ancestors().skip(1).find(|p| p.exists())
}
