//! Integration tests for `conda-nightly artifact`

use crate::helpers::*;
use anyhow::Result;

#[test]
fn test_artifact_name_for_date() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.write_default_config()?;

  let output = ws.run_ok(&["artifact", "--date", "2024-03-07", "--json"])?;
  let info = json(&output)?;

  assert_eq!(info["package"], "pygsa");
  assert_eq!(info["version"], "2024.03.07");
  assert_eq!(info["file_name"], "pygsa-2024.03.07-py_0.tar.bz2");
  assert_eq!(info["label"], "nightly");
  let expected = ws.default_output_root().join("noarch/pygsa-2024.03.07-py_0.tar.bz2");
  assert_eq!(info["path"], expected.display().to_string());

  Ok(())
}

#[test]
fn test_artifact_pads_month_and_day() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.write_default_config()?;

  let output = ws.run_ok(&["artifact", "--date", "2025-01-02"])?;

  assert!(stdout(&output).contains("pygsa-2025.01.02-py_0.tar.bz2"));
  Ok(())
}

#[test]
fn test_artifact_without_date_uses_today() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.write_default_config()?;

  let output = ws.run_ok(&["artifact", "--json"])?;
  let info = json(&output)?;

  let version = info["version"].as_str().unwrap_or_default().to_string();
  let parts: Vec<&str> = version.split('.').collect();
  assert_eq!(parts.len(), 3, "{}", version);
  assert_eq!(parts[0].len(), 4);
  assert_eq!(parts[1].len(), 2);
  assert_eq!(parts[2].len(), 2);
  assert_eq!(info["file_name"], format!("pygsa-{}-py_0.tar.bz2", version));
  Ok(())
}

#[test]
fn test_artifact_runs_no_tools() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.write_default_config()?;

  ws.run_ok(&["artifact", "--date", "2024-03-07"])?;

  assert!(ws.calls()?.is_empty());
  assert!(!ws.default_output_root().exists());
  Ok(())
}

#[test]
fn test_artifact_rejects_bad_package_override() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.write_default_config()?;

  let output = ws.run(&["artifact", "--package", "../escape"])?;

  assert!(!output.status.success());
  Ok(())
}
