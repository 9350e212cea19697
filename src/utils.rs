//! Utility functions for paths and command-line rendering

use std::path::{Path, PathBuf};

/// Expand a leading `~` to the given home directory
///
/// Returns `None` when the path starts with `~` but no home is known.
/// Paths without a leading `~` are returned unchanged.
/// `~user` forms are not expanded.
pub fn expand_home(path: &str, home: Option<&Path>) -> Option<PathBuf> {
  if path == "~" {
    return home.map(Path::to_path_buf);
  }

  if let Some(rest) = path.strip_prefix("~/") {
    return home.map(|h| h.join(rest));
  }

  Some(PathBuf::from(path))
}

/// Resolve `path` against `base` unless it is already absolute
///
/// `.` components are dropped, so `absolutize(".", "/work")` is `/work`.
pub fn absolutize(path: &Path, base: &Path) -> PathBuf {
  let joined = if path.is_absolute() {
    path.to_path_buf()
  } else {
    base.join(path)
  };
  joined.components().collect()
}

/// Quote a single argument for display in a shell-like command line
///
/// Only used for human-readable output; commands are always spawned with
/// an argument vector, never through a shell.
pub fn shell_quote(arg: &str) -> String {
  let plain = !arg.is_empty()
    && arg
      .chars()
      .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/' | ':' | '=' | '+' | ',' | '@'));

  if plain {
    arg.to_string()
  } else {
    format!("'{}'", arg.replace('\'', r"'\''"))
  }
}
