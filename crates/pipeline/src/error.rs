use mdf_connector::ConnectorError;
use mdf_core::Value;

use crate::executor::Stage;

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("validation error: field '{field}' cannot be null (row {row})")]
    NotNull { field: String, row: usize },

    #[error("validation error: field '{field}' must be unique (row {row}, value {value})")]
    Duplicate { field: String, row: usize, value: Value },
}

/// What went wrong inside a single pipeline step.
#[derive(Debug, thiserror::Error)]
pub enum StageError {
    #[error(transparent)]
    Connector(#[from] ConnectorError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The blocking task running the job panicked or was cancelled.
    #[error("job task aborted: {0}")]
    Join(String),
}

/// A failed job run. `stage` is the last stage the run reached.
#[derive(Debug, thiserror::Error)]
#[error("job {job_id} failed after {stage}: {source}")]
pub struct ExecuteError {
    pub job_id: String,
    pub stage: Stage,
    #[source]
    pub source: StageError,
}

impl ExecuteError {
    pub fn is_validation(&self) -> bool {
        matches!(self.source, StageError::Validation(_))
    }
}
