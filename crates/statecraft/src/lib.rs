//! ## Crate layout
//! - `schema`: type registry, entry normalizer and the frozen `Schema`.
//! - `core`: canonical binary codec, JSON bridge and event-record codec.
//! - `build`: Move source generation and the atomic file-batch writer.
//! - `config`: project configuration loading (TOML or JSON).
//!
//! The generated Move module and the codec never call each other; both are
//! driven by the same `Schema`, which keeps their layouts in step.

pub use statecraft_build as build;
pub use statecraft_config_build as config;
pub use statecraft_core as core;
pub use statecraft_schema as schema;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//
// Macros
//

pub use statecraft_build::build;

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        build::{BuildError, GeneratedFile, ModuleBuilder, WritePolicy, generate, write_batch},
        config::{ConfigError, ProjectConfig, ProjectInfo},
        core::prelude::*,
        schema::prelude::*,
    };
}
