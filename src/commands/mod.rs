//! CLI commands for conda-nightly
//!
//! - **publish**: build the package and upload it under the nightly label
//! - **artifact**: show the version, file name and path a run would produce
//! - **init**: write a nightly.toml for the current directory
//! - **doctor**: check tools, recipe, token and output directory

pub mod artifact;
pub mod doctor;
pub mod init;
pub mod publish;

pub use artifact::run_artifact;
pub use doctor::run_doctor;
pub use init::run_init;
pub use publish::{PublishOptions, run_publish};
