//! Nightly release: version, artifact naming, plan, execution
//!
//! - **version**: `YYYY.MM.DD` versions from the calendar date
//! - **artifact**: the `<pkg>-<version>-py_0.tar.bz2` file and where it lands
//! - **plan**: the ordered steps of a run, with a content-hash id
//! - **executor**: runs a plan and reports per-step outcomes

pub mod artifact;
pub mod executor;
pub mod plan;
pub mod version;

pub use artifact::Artifact;
pub use executor::{Executor, FailurePolicy, PublishReport};
pub use plan::PublishPlan;
pub use version::NightlyVersion;
