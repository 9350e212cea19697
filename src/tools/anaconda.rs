//! Upload-client command line

use super::Invocation;
use crate::core::secret::Secret;
use std::path::Path;

/// Replace any artifact already uploaded under the same name and label
pub const FORCE: &str = "--force";

/// `anaconda [-t <token>] upload -u <user> -l <label> <file> --force`
///
/// Without a token the client falls back to its own logged-in session.
pub fn upload(tool: &str, token: Option<&Secret>, user: &str, label: &str, file: &Path) -> Invocation {
  let mut inv = Invocation::new(tool);
  if let Some(token) = token {
    inv = inv.arg("-t").secret(token.clone());
  }

  inv
    .args(["upload", "-u", user, "-l", label])
    // Paths are checked for valid Unicode when the context is resolved
    .arg(file.to_string_lossy().to_string())
    .arg(FORCE)
}
