//! Integration tests for `conda-nightly publish`

use crate::helpers::*;
use anyhow::Result;

const DATE: &str = "2024-03-07";
const ARTIFACT: &str = "pygsa-2024.03.07-py_0.tar.bz2";

#[test]
fn test_publish_runs_tools_in_order() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.write_default_config()?;

  ws.run_ok(&["publish", "--date", DATE])?;

  let calls = ws.calls()?;
  assert_eq!(calls.len(), 3, "unexpected calls: {:#?}", calls);
  assert!(calls[0].starts_with("conda config --set anaconda_upload no"));
  assert!(calls[1].starts_with("conda build"));
  assert!(calls[2].starts_with("anaconda upload"));

  Ok(())
}

#[test]
fn test_publish_creates_output_root_under_home() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.write_default_config()?;
  let root = ws.default_output_root();
  assert!(!root.exists());

  ws.run_ok(&["publish", "--date", DATE])?;

  assert!(root.is_dir());
  assert!(is_under(&root, &ws.home));
  Ok(())
}

#[test]
fn test_build_gets_version_and_output_root() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.write_default_config()?;

  ws.run_ok(&["publish", "--date", DATE])?;

  let calls = ws.calls()?;
  let build = &calls[1];
  assert!(build.contains("--old-build-string"), "{}", build);
  assert!(build.contains("VERSION=2024.03.07"), "{}", build);
  assert!(
    build.contains(&format!("CONDA_BLD_PATH={}", ws.default_output_root().display())),
    "{}",
    build
  );

  Ok(())
}

#[test]
fn test_upload_targets_dated_artifact_with_force() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.write_default_config()?;

  let output = ws.run_ok(&["publish", "--date", DATE])?;

  let calls = ws.calls()?;
  let expected_path = ws.default_output_root().join("noarch").join(ARTIFACT);
  assert_eq!(
    calls[2],
    format!("anaconda upload -u someone -l nightly {} --force", expected_path.display())
  );

  // The noarch listing comes from the real directory
  assert!(stdout(&output).contains("built-by-fake-conda"));
  Ok(())
}

#[test]
fn test_token_reaches_client_but_not_output() -> Result<()> {
  let mut ws = TestWorkspace::new()?;
  ws.write_default_config()?;
  ws.set_env("CONDA_UPLOAD_TOKEN", "s3cr3t-token");

  let output = ws.run_ok(&["-vv", "publish", "--date", DATE])?;

  let calls = ws.calls()?;
  assert!(calls[2].starts_with("anaconda -t s3cr3t-token upload"), "{}", calls[2]);
  assert!(!stdout(&output).contains("s3cr3t-token"));
  assert!(!stderr(&output).contains("s3cr3t-token"));
  assert!(stdout(&output).contains("-t '***'"));

  Ok(())
}

#[test]
fn test_token_flag_overrides_environment() -> Result<()> {
  let mut ws = TestWorkspace::new()?;
  ws.write_default_config()?;
  ws.set_env("CONDA_UPLOAD_TOKEN", "from-env");

  ws.run_ok(&["publish", "--date", DATE, "--token", "from-flag"])?;

  let calls = ws.calls()?;
  assert!(calls[2].starts_with("anaconda -t from-flag upload"), "{}", calls[2]);
  Ok(())
}

#[test]
fn test_failed_build_still_uploads() -> Result<()> {
  let mut ws = TestWorkspace::new()?;
  ws.write_default_config()?;
  ws.set_env("FAKE_CONDA_BUILD_EXIT", "1");

  let output = ws.run(&["publish", "--date", DATE])?;

  // Exit status is the upload's, not the build's
  assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
  let calls = ws.calls()?;
  assert!(calls.iter().any(|c| c.starts_with("anaconda upload")));
  Ok(())
}

#[test]
fn test_exit_status_is_upload_status() -> Result<()> {
  let mut ws = TestWorkspace::new()?;
  ws.write_default_config()?;
  ws.set_env("FAKE_ANACONDA_EXIT", "7");

  let output = ws.run(&["publish", "--date", DATE])?;

  assert_eq!(output.status.code(), Some(7));
  assert!(stdout(&output).contains("Upload failed with exit status 7"));
  Ok(())
}

#[test]
fn test_fail_fast_stops_before_upload() -> Result<()> {
  let mut ws = TestWorkspace::new()?;
  ws.write_default_config()?;
  ws.set_env("FAKE_CONDA_BUILD_EXIT", "3");

  let output = ws.run(&["publish", "--date", DATE, "--fail-fast"])?;

  assert_eq!(output.status.code(), Some(3));
  let calls = ws.calls()?;
  assert!(calls.iter().all(|c| !c.starts_with("anaconda")), "{:#?}", calls);
  Ok(())
}

#[test]
fn test_missing_upload_tool_exits_127() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.write_config(
    r#"[package]
name = "pygsa"
user = "someone"

[upload]
tool = "no-such-anaconda-client"
"#,
  )?;

  let output = ws.run(&["publish", "--date", DATE])?;

  assert_eq!(output.status.code(), Some(127));
  Ok(())
}

#[test]
fn test_dry_run_executes_nothing() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.write_default_config()?;

  let output = ws.run_ok(&["publish", "--date", DATE, "--dry-run"])?;

  assert!(ws.calls()?.is_empty());
  assert!(!ws.default_output_root().exists());
  let out = stdout(&output);
  assert!(out.contains("Dry-run"));
  assert!(out.contains(ARTIFACT));
  Ok(())
}

#[test]
fn test_dry_run_json_plan() -> Result<()> {
  let mut ws = TestWorkspace::new()?;
  ws.write_default_config()?;
  ws.set_env("CONDA_UPLOAD_TOKEN", "s3cr3t-token");

  let output = ws.run_ok(&["publish", "--date", DATE, "--dry-run", "--json"])?;

  assert!(!stdout(&output).contains("s3cr3t-token"));
  let plan = json(&output)?;
  assert_eq!(plan["version"], "2024.03.07");
  assert_eq!(plan["label"], "nightly");
  assert_eq!(plan["steps"].as_array().map(Vec::len), Some(5));
  Ok(())
}

#[test]
fn test_json_report() -> Result<()> {
  let mut ws = TestWorkspace::new()?;
  ws.write_default_config()?;
  ws.set_env("FAKE_CONDA_BUILD_EXIT", "1");

  let output = ws.run(&["publish", "--date", DATE, "--json"])?;

  // Tool output is moved to stderr so stdout stays parseable
  let report = json(&output)?;
  assert!(stderr(&output).contains("fake conda build output"));
  assert_eq!(report["exit_code"], 0);
  assert_eq!(report["stopped_early"], false);
  let steps = report["steps"].as_array().cloned().unwrap_or_default();
  assert_eq!(steps.len(), 5);
  assert_eq!(steps[2]["outcome"]["status"], "exited");
  assert_eq!(steps[2]["outcome"]["code"], 1);
  Ok(())
}

#[test]
fn test_flags_work_without_config_file() -> Result<()> {
  let ws = TestWorkspace::new()?;
  let root = ws.path.join("out");

  ws.run_ok(&[
    "publish",
    "--date",
    DATE,
    "--package",
    "other",
    "--user",
    "team",
    "--label",
    "dev",
    "--output-root",
    "out",
  ])?;

  let calls = ws.calls()?;
  let expected = root.join("noarch").join("other-2024.03.07-py_0.tar.bz2");
  assert_eq!(
    calls[2],
    format!("anaconda upload -u team -l dev {} --force", expected.display())
  );
  Ok(())
}

#[test]
fn test_missing_config_is_user_error() -> Result<()> {
  let ws = TestWorkspace::new()?;

  let output = ws.run(&["publish"])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(ws.calls()?.is_empty());
  Ok(())
}

#[test]
fn test_bad_date_is_rejected_before_running_anything() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.write_default_config()?;

  let output = ws.run(&["publish", "--date", "2024.03.07"])?;

  assert!(!output.status.success());
  assert!(ws.calls()?.is_empty());
  Ok(())
}

#[cfg(unix)]
#[test]
fn test_non_unicode_output_root_is_rejected_before_running_anything() -> Result<()> {
  use std::ffi::OsString;
  use std::os::unix::ffi::OsStringExt;

  let ws = TestWorkspace::new()?;
  ws.write_default_config()?;
  let root = OsString::from_vec(b"bld-\xff".to_vec());

  let output = ws.run_os([
    OsString::from("publish"),
    OsString::from("--date"),
    OsString::from(DATE),
    OsString::from("--output-root"),
    root,
  ])?;

  assert_eq!(output.status.code(), Some(1), "stderr: {}", stderr(&output));
  assert!(stderr(&output).contains("not valid Unicode"));
  assert!(ws.calls()?.is_empty());
  Ok(())
}

#[test]
fn test_output_root_flag_expands_home() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.write_default_config()?;

  ws.run_ok(&["publish", "--date", DATE, "--output-root", "~/nightly-bld"])?;

  let calls = ws.calls()?;
  let root = ws.home.join("nightly-bld");
  assert!(root.is_dir());
  assert!(calls[1].contains(&format!("CONDA_BLD_PATH={}", root.display())), "{}", calls[1]);
  Ok(())
}

