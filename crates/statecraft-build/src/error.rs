use statecraft_config_build::ConfigError;
use statecraft_schema::error::SchemaError;
use std::{io, path::PathBuf};
use thiserror::Error as ThisError;

///
/// BuildError
///
/// Anything that stops a generation run. Nothing is written to the output
/// root unless the whole batch was generated first.
///

#[derive(Debug, ThisError)]
#[remain::sorted]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("generated function '{name}' is defined twice ({first} and {second})")]
    DuplicateFunction {
        name: String,
        first: String,
        second: String,
    },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to render Move.toml: {0}")]
    Manifest(#[from] toml::ser::Error),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl BuildError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
