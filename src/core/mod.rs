//! Core building blocks for conda-nightly
//!
//! - **config**: `nightly.toml` parsing and validation
//! - **context**: resolved settings for one run (config + flags + env)
//! - **error**: error types with contextual help messages and exit codes
//! - **secret**: redacted wrapper for the upload token

pub mod config;
pub mod context;
pub mod error;
pub mod secret;
