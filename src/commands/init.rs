use crate::core::config::{self, NightlyConfig};
use crate::core::error::{NightlyError, NightlyResult};
use std::env;

/// Run the init command to write nightly.toml in the current directory
pub fn run_init(package: String, user: String, output_root: Option<String>, force: bool) -> NightlyResult<()> {
  let current_dir = env::current_dir()?;

  if let Some(existing) = NightlyConfig::find_config_path(&current_dir)
    && !force
  {
    return Err(NightlyError::with_help(
      format!("Configuration already exists at {}", existing.display()),
      "Pass --force to overwrite it",
    ));
  }

  config::validate_package_name(&package)?;

  let mut config = NightlyConfig::new(package, user);
  config.build.output_root = output_root;
  config.validate()?;

  let path = config.save(&current_dir)?;
  println!("✅ Wrote {}", path.display());
  println!();
  println!("Next steps:");
  println!("  conda-nightly doctor");
  println!("  conda-nightly publish --dry-run");

  Ok(())
}
