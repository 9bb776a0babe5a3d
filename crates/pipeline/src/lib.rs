//! One job run: extract from the source connector, validate, load into the
//! destination connector.

pub mod error;
pub mod eventlog;
pub mod executor;
pub mod validator;

pub use error::{ExecuteError, StageError, ValidationError};
pub use eventlog::{EventLog, EventType, JobEvent};
pub use executor::{job_id, Executor, JobReport, Stage};
pub use validator::Validator;
