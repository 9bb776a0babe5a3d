use std::path::PathBuf;

/// Errors tied to a specific file encoding.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("unsupported file format: {0}")]
    Unsupported(String),

    #[error("malformed file {path}: {reason}")]
    Malformed { path: PathBuf, reason: String },
}

impl FormatError {
    pub(crate) fn malformed(path: &std::path::Path, reason: impl ToString) -> Self {
        FormatError::Malformed {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }
}

/// Errors raised while building or driving a connector.
#[derive(Debug, thiserror::Error)]
pub enum ConnectorError {
    /// Bad or missing connector settings.
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("connector '{0}' is not declared in this config")]
    UnknownConnector(String),

    #[error("connector is closed")]
    Closed,

    #[error("connector '{0}' lock poisoned by a panicked run")]
    LockPoisoned(String),
}

impl From<walkdir::Error> for ConnectorError {
    fn from(err: walkdir::Error) -> Self {
        ConnectorError::Io(err.into())
    }
}
