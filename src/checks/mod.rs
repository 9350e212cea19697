//! Health checks behind `conda-nightly doctor`
//!
//! # Built-in Checks
//!
//! - **config**: nightly.toml is present and valid
//! - **build-tool** / **upload-tool**: conda and anaconda are on PATH
//! - **recipe**: the recipe directory holds a meta.yaml
//! - **upload-token**: the token variable is set
//! - **output-root**: the build output directory exists or can be created

mod environment;
mod runner;
mod tools;
mod trait_def;

pub use runner::create_default_runner;
pub use trait_def::{CheckContext, CheckResult, Severity};
