//! Turns configured cron expressions into concurrent, jittered job runs.
//!
//! - [`CronEngine`]: owned cron dispatcher running on the tokio runtime
//! - [`Scheduler`]: runs the executor inline on each firing
//! - [`CronTriggerer`]: posts the config id to a queue on each firing

pub mod engine;
pub mod error;
pub mod expr;
pub mod jitter;
pub mod scheduler;
pub mod triggerer;

pub use engine::{CronEngine, EntryId, JobFn};
pub use error::ScheduleError;
pub use expr::{normalize_cron, parse_cron};
pub use scheduler::{ScheduledJob, Scheduler};
pub use triggerer::{CronTriggerer, Triggerer};
