use std::{io, path::PathBuf};
use thiserror::Error as ThisError;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
#[remain::sorted]
pub enum ConfigError {
    #[error("invalid project: {0}")]
    InvalidProject(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("unsupported config format: {0} (expected .toml or .json)")]
    UnsupportedFormat(PathBuf),
}
