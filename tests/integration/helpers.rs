//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Variable the fake tools append their invocations to
pub const LOG_VAR: &str = "NIGHTLY_TEST_LOG";

/// A scratch project with a fake HOME and fake `conda`/`anaconda` on PATH
pub struct TestWorkspace {
  _root: TempDir,
  pub path: PathBuf,
  pub home: PathBuf,
  pub bin: PathBuf,
  pub log: PathBuf,
  env: Vec<(OsString, OsString)>,
}

impl TestWorkspace {
  /// Create a workspace with a recipe directory and fake tools installed
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().join("project");
    let home = root.path().join("home");
    let bin = root.path().join("bin");
    let log = root.path().join("calls.log");

    std::fs::create_dir_all(&path)?;
    std::fs::create_dir_all(&home)?;
    std::fs::create_dir_all(&bin)?;
    std::fs::write(
      path.join("meta.yaml"),
      "package:\n  name: pygsa\n  version: {{ environ.get('VERSION') }}\n",
    )?;

    let ws = Self {
      _root: root,
      path,
      home,
      bin,
      log,
      env: Vec::new(),
    };

    // The fake build prints to stdout and drops a file into noarch/ for the listing
    ws.install_tool(
      "conda",
      r#"echo "conda $* | CONDA_BLD_PATH=$CONDA_BLD_PATH VERSION=$VERSION" >> "$NIGHTLY_TEST_LOG"
echo "fake conda $1 output"
if [ "$1" = "build" ]; then
  mkdir -p "$CONDA_BLD_PATH/noarch"
  touch "$CONDA_BLD_PATH/noarch/built-by-fake-conda"
  exit "${FAKE_CONDA_BUILD_EXIT:-0}"
fi
exit 0"#,
    )?;
    ws.install_tool(
      "anaconda",
      r#"echo "anaconda $*" >> "$NIGHTLY_TEST_LOG"
exit "${FAKE_ANACONDA_EXIT:-0}""#,
    )?;

    Ok(ws)
  }

  /// Write an executable shell script named `name` into the fake bin directory
  pub fn install_tool(&self, name: &str, body: &str) -> Result<PathBuf> {
    let script = self.bin.join(name);
    std::fs::write(&script, format!("#!/bin/sh\n{}\n", body))?;

    #[cfg(unix)]
    {
      use std::os::unix::fs::PermissionsExt;
      std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755))?;
    }

    Ok(script)
  }

  /// Set an environment variable for every subsequent run
  pub fn set_env(&mut self, key: &str, value: &str) {
    self.set_env_os(key, value);
  }

  /// Set an environment variable that need not be valid Unicode
  pub fn set_env_os(&mut self, key: impl Into<OsString>, value: impl Into<OsString>) {
    self.env.push((key.into(), value.into()));
  }

  /// Write nightly.toml in the project directory
  pub fn write_config(&self, content: &str) -> Result<()> {
    std::fs::write(self.path.join("nightly.toml"), content)?;
    Ok(())
  }

  /// Write a minimal config for `pygsa` owned by `someone`
  pub fn write_default_config(&self) -> Result<()> {
    self.write_config(
      r#"[package]
name = "pygsa"
user = "someone"
"#,
    )
  }

  /// Lines the fake tools logged, in call order
  pub fn calls(&self) -> Result<Vec<String>> {
    if !self.log.exists() {
      return Ok(Vec::new());
    }
    let content = std::fs::read_to_string(&self.log)?;
    Ok(content.lines().map(String::from).collect())
  }

  /// Default output root under the fake HOME
  pub fn default_output_root(&self) -> PathBuf {
    self.home.join("conda-bld")
  }

  /// Check if a file exists in the project
  pub fn file_exists(&self, path: &str) -> bool {
    self.path.join(path).exists()
  }

  /// Read a file in the project
  pub fn read_file(&self, path: &str) -> Result<String> {
    Ok(std::fs::read_to_string(self.path.join(path))?)
  }

  /// Run conda-nightly in the project directory, returning its output whatever the status
  pub fn run(&self, args: &[&str]) -> Result<Output> {
    self.run_os(args)
  }

  /// Run conda-nightly with arguments that need not be valid Unicode
  pub fn run_os<I, S>(&self, args: I) -> Result<Output>
  where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
  {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_conda-nightly"));
    cmd
      .current_dir(&self.path)
      .args(args)
      .env_clear()
      .env("PATH", format!("{}:/usr/bin:/bin", self.bin.display()))
      .env("HOME", &self.home)
      .env(LOG_VAR, &self.log);

    for (key, value) in &self.env {
      cmd.env(key, value);
    }

    cmd.output().context("Failed to run conda-nightly")
  }

  /// Run conda-nightly and fail unless it exits 0
  pub fn run_ok(&self, args: &[&str]) -> Result<Output> {
    let output = self.run(args)?;

    if !output.status.success() {
      anyhow::bail!(
        "conda-nightly {} failed\nstdout: {}\nstderr: {}",
        args.join(" "),
        stdout(&output),
        stderr(&output)
      );
    }

    Ok(output)
  }
}

pub fn stdout(output: &Output) -> String {
  String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr(output: &Output) -> String {
  String::from_utf8_lossy(&output.stderr).to_string()
}

/// Parse stdout as JSON
pub fn json(output: &Output) -> Result<serde_json::Value> {
  serde_json::from_slice(&output.stdout).with_context(|| format!("stdout is not JSON:\n{}", stdout(output)))
}

/// True if `path` is inside `dir`
pub fn is_under(path: &Path, dir: &Path) -> bool {
  path.starts_with(dir)
}
