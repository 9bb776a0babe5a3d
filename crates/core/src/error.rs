use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or interpreting configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to parse config file {path}: config with id '{id}' already exists")]
    DuplicateId { id: String, path: PathBuf },

    #[error("no YAML config files found in directory: {0}")]
    Empty(PathBuf),

    #[error("directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
}
