//! Diagnostic logging to stderr
//!
//! User-facing progress goes to stdout with `println!`. Logging is for
//! diagnostics only: spawned commands, step outcomes, warnings about failed
//! steps. Controlled by `-v`/`-vv` or `RUST_LOG`, which wins when set.

use tracing_subscriber::EnvFilter;

/// Default filter for a verbosity count (`-v` = 1, `-vv` = 2)
pub fn default_level(verbosity: u8) -> &'static str {
  match verbosity {
    0 => "warn",
    1 => "info",
    _ => "debug",
  }
}

/// Install the global subscriber; call once from `main`
pub fn init(verbosity: u8) {
  let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level(verbosity)));

  tracing_subscriber::fmt()
    .with_env_filter(env_filter)
    .with_writer(std::io::stderr)
    .with_target(false)
    .init();
}
