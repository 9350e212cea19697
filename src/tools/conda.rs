//! Build-tool command lines

use super::Invocation;
use crate::release::NightlyVersion;
use std::path::Path;

/// Variable the build tool reads its output root from
pub const BUILD_PATH_VAR: &str = "CONDA_BLD_PATH";
/// Variable the recipe reads the package version from
pub const VERSION_VAR: &str = "VERSION";
/// Keep the existing build string instead of generating a new one
pub const PRESERVE_BUILD_STRING: &str = "--old-build-string";

/// `conda config --set anaconda_upload no`
pub fn disable_auto_upload(tool: &str) -> Invocation {
  Invocation::new(tool).args(["config", "--set", "anaconda_upload", "no"])
}

/// `CONDA_BLD_PATH=<root> VERSION=<version> conda build <recipe> --old-build-string [extra...]`
///
/// The preserve flag is always emitted once, whatever `extra_args` holds.
pub fn build(
  tool: &str,
  recipe: &Path,
  output_root: &Path,
  version: &NightlyVersion,
  extra_args: &[String],
  work_dir: &Path,
) -> Invocation {
  Invocation::new(tool)
    .arg("build")
    // Paths are checked for valid Unicode when the context is resolved
    .arg(recipe.to_string_lossy().to_string())
    .arg(PRESERVE_BUILD_STRING)
    .args(extra_args.iter().filter(|a| a.as_str() != PRESERVE_BUILD_STRING).cloned())
    .env(BUILD_PATH_VAR, output_root.to_string_lossy())
    .env(VERSION_VAR, version.to_string())
    .current_dir(work_dir)
}
