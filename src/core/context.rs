//! Resolved run context - read once, pass everywhere
//!
//! Every value a run needs is resolved here exactly once, from three layers
//! in increasing precedence: built-in defaults, `nightly.toml`, command-line
//! flags. Nothing downstream reads the environment or the config file again.
//!
//! ```text
//! main.rs:
//!   Overrides (CLI) + NightlyConfig (file) + env
//!   |
//!   v
//! PublishContext::resolve() -> &PublishContext
//!   |
//!   v
//! release::PublishPlan::build(&ctx, version)
//! ```

use crate::core::config::{self, DEFAULT_OUTPUT_ROOT, NightlyConfig};
use crate::core::error::{ConfigError, NightlyError, NightlyResult};
use crate::core::secret::Secret;
use crate::utils::{absolutize, expand_home};
use std::path::{Path, PathBuf};

/// Values supplied on the command line; each one beats the config file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
  pub package: Option<String>,
  pub user: Option<String>,
  pub output_root: Option<PathBuf>,
  pub label: Option<String>,
  pub token: Option<String>,
}

/// Fully resolved settings for one run
#[derive(Debug, Clone)]
pub struct PublishContext {
  /// Directory the publisher was started in
  pub work_dir: PathBuf,
  /// Config file that was loaded, if any
  pub config_path: Option<PathBuf>,
  pub package: String,
  pub user: String,
  /// Build output root (absolute)
  pub output_root: PathBuf,
  /// Recipe directory (absolute)
  pub recipe: PathBuf,
  pub build_tool: String,
  pub build_args: Vec<String>,
  pub upload_tool: String,
  pub label: String,
  /// Name of the env var the token came from (for messages)
  pub token_env: String,
  pub token: Option<Secret>,
}

impl PublishContext {
  /// Load the config file from `work_dir` (if present) and resolve against the process environment
  ///
  /// Without a config file, `--package` is required and its absence is reported as a missing config.
  pub fn load(work_dir: &Path, overrides: Overrides) -> NightlyResult<Self> {
    let config = NightlyConfig::load_optional(work_dir)?;
    if config.is_none() && overrides.package.is_none() {
      return Err(NightlyError::Config(ConfigError::NotFound {
        dir: work_dir.to_path_buf(),
      }));
    }
    let config_path = NightlyConfig::find_config_path(work_dir).filter(|_| config.is_some());
    let mut ctx = Self::resolve(work_dir, config.as_ref(), overrides, |key| std::env::var(key).ok())?;
    ctx.config_path = config_path;
    Ok(ctx)
  }

  /// Resolve settings from an optional config, CLI overrides, and an environment lookup
  pub fn resolve<F>(
    work_dir: &Path,
    config: Option<&NightlyConfig>,
    overrides: Overrides,
    env: F,
  ) -> NightlyResult<Self>
  where
    F: Fn(&str) -> Option<String>,
  {
    let defaults = NightlyConfig::default();
    let config = config.unwrap_or(&defaults);

    let package = overrides
      .package
      .or_else(|| config.package.name.clone())
      .ok_or_else(|| missing("package name", "--package"))?;
    config::validate_package_name(&package)?;

    let user = overrides
      .user
      .or_else(|| config.package.user.clone())
      .filter(|u| !u.trim().is_empty())
      .ok_or_else(|| missing("user account", "--user"))?;

    let label = overrides.label.unwrap_or_else(|| config.upload.label.clone());
    config::validate_label(&label)?;

    let home = env("HOME").filter(|h| !h.is_empty()).map(PathBuf::from);
    let raw_root = match &overrides.output_root {
      Some(path) => unicode_path(path, "output root")?,
      None => config.build.output_root.as_deref().unwrap_or(DEFAULT_OUTPUT_ROOT),
    };
    let output_root = expand_home(raw_root, home.as_deref()).ok_or(NightlyError::Config(ConfigError::NoHome))?;
    let output_root = absolutize(&output_root, work_dir);
    let recipe = absolutize(&config.build.recipe, work_dir);

    // Both paths are handed to the tools as strings
    unicode_path(&output_root, "output root")?;
    unicode_path(&recipe, "recipe path")?;

    let token_env = config.upload.token_env.clone();
    let token = overrides
      .token
      .or_else(|| env(&token_env))
      .filter(|t| !t.is_empty())
      .map(Secret::new);

    Ok(Self {
      work_dir: work_dir.to_path_buf(),
      config_path: None,
      package,
      user,
      output_root,
      recipe,
      build_tool: config.build.tool.clone(),
      build_args: config.build.extra_args.clone(),
      upload_tool: config.upload.tool.clone(),
      label,
      token_env,
      token,
    })
  }
}

fn missing(field: &str, flag: &str) -> NightlyError {
  NightlyError::Config(ConfigError::MissingField {
    field: field.to_string(),
    flag: flag.to_string(),
  })
}

fn unicode_path<'a>(path: &'a Path, field: &str) -> NightlyResult<&'a str> {
  path.to_str().ok_or_else(|| {
    NightlyError::Config(ConfigError::NonUnicodePath {
      field: field.to_string(),
      path: path.to_path_buf(),
    })
  })
}
