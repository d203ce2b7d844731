//! Project configuration for statecraft builds.
//!
//! A config file names the project and carries the schema sections
//! (`enums`, `types`, `entries`, `errors`) at its top level.

mod config;
mod error;

pub use config::{ConfigFormat, ProjectConfig, ProjectInfo};
pub use error::ConfigError;
