//! Names and locations of the built package file

use super::NightlyVersion;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Output subdirectory for architecture-independent packages
pub const NOARCH_SUBDIR: &str = "noarch";
/// Build string of the published package
pub const BUILD_STRING: &str = "py_0";
/// Package archive extension
pub const EXTENSION: &str = "tar.bz2";

/// The package file a nightly run produces and uploads
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
  pub package: String,
  pub version: NightlyVersion,
}

impl Artifact {
  pub fn new(package: impl Into<String>, version: NightlyVersion) -> Self {
    Self {
      package: package.into(),
      version,
    }
  }

  /// `<package>-<version>-py_0.tar.bz2`
  pub fn file_name(&self) -> String {
    format!("{}-{}-{}.{}", self.package, self.version, BUILD_STRING, EXTENSION)
  }

  /// `<output_root>/noarch`
  pub fn noarch_dir(output_root: &Path) -> PathBuf {
    output_root.join(NOARCH_SUBDIR)
  }

  /// `<output_root>/noarch/<file_name>`
  pub fn path(&self, output_root: &Path) -> PathBuf {
    Self::noarch_dir(output_root).join(self.file_name())
  }
}
