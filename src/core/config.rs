use crate::core::error::{NightlyError, NightlyResult, ResultExt};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default build-tool executable
pub const DEFAULT_BUILD_TOOL: &str = "conda";
/// Default upload-client executable
pub const DEFAULT_UPLOAD_TOOL: &str = "anaconda";
/// Default channel label
pub const DEFAULT_LABEL: &str = "nightly";
/// Default environment variable holding the upload token
pub const DEFAULT_TOKEN_ENV: &str = "CONDA_UPLOAD_TOKEN";
/// Default output root, relative to the home directory
pub const DEFAULT_OUTPUT_ROOT: &str = "~/conda-bld";

/// Configuration for conda-nightly
/// Searched in order: nightly.toml, .nightly.toml, .config/nightly.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NightlyConfig {
  #[serde(default)]
  pub package: PackageConfig,
  #[serde(default)]
  pub build: BuildConfig,
  #[serde(default)]
  pub upload: UploadConfig,
}

/// What is being published and under whose account
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PackageConfig {
  /// Package name, used in the uploaded file name
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,

  /// Account that owns the upload
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub user: Option<String>,
}

/// Build-tool settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
  /// Build-tool executable (default: conda)
  #[serde(default = "default_build_tool")]
  pub tool: String,

  /// Directory holding the package recipe (default: current directory)
  #[serde(default = "default_recipe")]
  pub recipe: PathBuf,

  /// Build output root (default: ~/conda-bld)
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub output_root: Option<String>,

  /// Extra arguments appended to the build invocation
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub extra_args: Vec<String>,
}

fn default_build_tool() -> String {
  DEFAULT_BUILD_TOOL.to_string()
}

fn default_recipe() -> PathBuf {
  PathBuf::from(".")
}

impl Default for BuildConfig {
  fn default() -> Self {
    Self {
      tool: default_build_tool(),
      recipe: default_recipe(),
      output_root: None,
      extra_args: Vec::new(),
    }
  }
}

/// Upload-client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
  /// Upload-client executable (default: anaconda)
  #[serde(default = "default_upload_tool")]
  pub tool: String,

  /// Channel label (default: nightly)
  #[serde(default = "default_label")]
  pub label: String,

  /// Environment variable the token is read from (default: CONDA_UPLOAD_TOKEN)
  #[serde(default = "default_token_env")]
  pub token_env: String,
}

fn default_upload_tool() -> String {
  DEFAULT_UPLOAD_TOOL.to_string()
}

fn default_label() -> String {
  DEFAULT_LABEL.to_string()
}

fn default_token_env() -> String {
  DEFAULT_TOKEN_ENV.to_string()
}

impl Default for UploadConfig {
  fn default() -> Self {
    Self {
      tool: default_upload_tool(),
      label: default_label(),
      token_env: default_token_env(),
    }
  }
}

impl NightlyConfig {
  /// Find config file in search order: nightly.toml, .nightly.toml, .config/nightly.toml
  pub fn find_config_path(path: &Path) -> Option<PathBuf> {
    let candidates = [
      path.join("nightly.toml"),
      path.join(".nightly.toml"),
      path.join(".config").join("nightly.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load config if one exists (searches multiple locations)
  ///
  /// A file that exists but does not parse is still an error.
  pub fn load_optional(path: &Path) -> NightlyResult<Option<Self>> {
    match Self::find_config_path(path) {
      Some(config_path) => Self::load_file(&config_path).map(Some),
      None => Ok(None),
    }
  }

  fn load_file(config_path: &Path) -> NightlyResult<Self> {
    let content = fs::read_to_string(config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let config: NightlyConfig = toml_edit::de::from_str(&content)
      .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

    config
      .validate()
      .with_context(|| format!("Invalid configuration in {}", config_path.display()))?;

    Ok(config)
  }

  /// Save config to nightly.toml (default location)
  pub fn save(&self, path: &Path) -> NightlyResult<PathBuf> {
    let config_path = path.join("nightly.toml");
    let content = toml_edit::ser::to_string_pretty(self).context("Failed to serialize config to TOML")?;
    fs::write(&config_path, content).with_context(|| format!("Failed to write config to {}", config_path.display()))?;
    Ok(config_path)
  }

  /// Create a config for a package and account, everything else defaulted
  pub fn new(package: impl Into<String>, user: impl Into<String>) -> Self {
    Self {
      package: PackageConfig {
        name: Some(package.into()),
        user: Some(user.into()),
      },
      build: BuildConfig::default(),
      upload: UploadConfig::default(),
    }
  }

  /// Validate values that would otherwise produce malformed invocations
  pub fn validate(&self) -> NightlyResult<()> {
    if let Some(ref name) = self.package.name {
      validate_package_name(name)?;
    }

    if let Some(ref user) = self.package.user
      && user.trim().is_empty()
    {
      return Err(NightlyError::message("package.user must not be empty"));
    }

    if self.build.tool.trim().is_empty() {
      return Err(NightlyError::message("build.tool must not be empty"));
    }

    if self.upload.tool.trim().is_empty() {
      return Err(NightlyError::message("upload.tool must not be empty"));
    }

    validate_label(&self.upload.label)?;

    if self.upload.token_env.trim().is_empty() || self.upload.token_env.contains('=') {
      return Err(NightlyError::message(format!(
        "Invalid upload.token_env '{}'. Must be a non-empty environment variable name",
        self.upload.token_env
      )));
    }

    Ok(())
  }
}

/// Package names end up in a file name; reject anything that would escape `noarch/`
pub fn validate_package_name(name: &str) -> NightlyResult<()> {
  let invalid = name.is_empty()
    || name.contains('/')
    || name.contains('\\')
    || name.chars().any(char::is_whitespace)
    || name == "."
    || name == "..";

  if invalid {
    return Err(NightlyError::with_help(
      format!("Invalid package name '{}'", name),
      "Package names are single file-name components without whitespace, e.g. 'pygsa'",
    ));
  }

  Ok(())
}

/// Channel labels must be a single non-empty token
pub fn validate_label(label: &str) -> NightlyResult<()> {
  if label.is_empty() || label.chars().any(char::is_whitespace) {
    return Err(NightlyError::message(format!(
      "Invalid channel label '{}'. Must be non-empty without whitespace",
      label
    )));
  }
  Ok(())
}
