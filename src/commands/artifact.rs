//! `conda-nightly artifact` - show the version and file a run would produce

use crate::core::context::{Overrides, PublishContext};
use crate::core::error::NightlyResult;
use crate::release::{Artifact, NightlyVersion};
use serde::Serialize;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Serialize)]
struct ArtifactInfo {
  package: String,
  version: NightlyVersion,
  file_name: String,
  path: PathBuf,
  label: String,
}

/// Run the artifact command
pub fn run_artifact(overrides: Overrides, date: Option<String>, json: bool) -> NightlyResult<()> {
  let work_dir = env::current_dir()?;
  let ctx = PublishContext::load(&work_dir, overrides)?;
  let version = NightlyVersion::resolve(date.as_deref())?;
  let artifact = Artifact::new(ctx.package.clone(), version);

  let info = ArtifactInfo {
    package: ctx.package.clone(),
    version,
    file_name: artifact.file_name(),
    path: artifact.path(&ctx.output_root),
    label: ctx.label.clone(),
  };

  if json {
    println!("{}", serde_json::to_string_pretty(&info)?);
  } else {
    println!("📦 {} {}", info.package, info.version);
    println!("   File:  {}", info.file_name);
    println!("   Path:  {}", info.path.display());
    println!("   Label: {}", info.label);
  }

  Ok(())
}
