//! Integration tests for `conda-nightly doctor`

use crate::helpers::*;
use anyhow::Result;

fn check<'a>(results: &'a serde_json::Value, name: &str) -> Option<&'a serde_json::Value> {
  results.as_array()?.iter().find(|r| r["check_name"] == name)
}

#[cfg(unix)]
#[test]
fn test_doctor_healthy_project() -> Result<()> {
  let mut ws = TestWorkspace::new()?;
  ws.write_default_config()?;
  ws.set_env("CONDA_UPLOAD_TOKEN", "s3cr3t-token");

  let output = ws.run_ok(&["doctor"])?;

  let out = stdout(&output);
  assert!(out.contains("All checks passed"), "{}", out);
  assert!(!out.contains("s3cr3t-token"));
  Ok(())
}

#[cfg(unix)]
#[test]
fn test_doctor_missing_token_is_warning_only() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.write_default_config()?;

  let output = ws.run_ok(&["doctor", "--json"])?;
  let results = json(&output)?;

  let token = check(&results, "upload-token").cloned().unwrap_or_default();
  assert_eq!(token["passed"], false);
  assert_eq!(token["severity"], "Warning");
  Ok(())
}

#[test]
fn test_doctor_missing_tools_exit_3() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.write_config(
    r#"[package]
name = "pygsa"
user = "someone"

[build]
tool = "no-such-conda"

[upload]
tool = "no-such-anaconda"
"#,
  )?;

  let output = ws.run(&["doctor", "--json"])?;

  assert_eq!(output.status.code(), Some(3));
  let results = json(&output)?;
  for name in ["build-tool", "upload-tool"] {
    let result = check(&results, name).cloned().unwrap_or_default();
    assert_eq!(result["passed"], false, "{}", name);
    assert_eq!(result["severity"], "Error", "{}", name);
  }
  Ok(())
}

#[test]
fn test_doctor_missing_recipe() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.write_default_config()?;
  std::fs::remove_file(ws.path.join("meta.yaml"))?;

  let output = ws.run(&["doctor", "--json"])?;

  assert_eq!(output.status.code(), Some(3));
  let results = json(&output)?;
  let recipe = check(&results, "recipe").cloned().unwrap_or_default();
  assert_eq!(recipe["passed"], false);
  Ok(())
}

#[test]
fn test_doctor_broken_config() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.write_config("[package\nname = ")?;

  let output = ws.run(&["doctor", "--json"])?;

  assert_eq!(output.status.code(), Some(3));
  let results = json(&output)?;
  let config = check(&results, "config").cloned().unwrap_or_default();
  assert_eq!(config["severity"], "Error");
  Ok(())
}

#[cfg(unix)]
#[test]
fn test_doctor_ignores_non_unicode_environment() -> Result<()> {
  use std::ffi::OsString;
  use std::os::unix::ffi::OsStringExt;

  let mut ws = TestWorkspace::new()?;
  ws.write_default_config()?;
  ws.set_env_os("JUNK", OsString::from_vec(vec![0xff, 0xfe]));

  let output = ws.run_ok(&["doctor", "--json"])?;

  let results = json(&output)?;
  let tool = check(&results, "build-tool").cloned().unwrap_or_default();
  assert_eq!(tool["passed"], true);
  Ok(())
}
