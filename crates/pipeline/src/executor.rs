//! Runs one ingestion job end to end.
//!
//! A run walks `started → source_resolved → destination_resolved →
//! extracted → validated → loaded → completed`; any error moves it to
//! `failed` and is returned with the last stage reached. There are no
//! retries and no rollback of a completed write.

use std::fmt;
use std::sync::{Arc, MutexGuard};
use std::time::Instant;

use chrono::{DateTime, Utc};
use mdf_connector::{Connector, ConnectorError, ConnectorRegistry, SharedConnector};
use mdf_core::{Config, DataSource};
use serde::Serialize;
use tracing::{debug, error, info};

use crate::error::{ExecuteError, StageError};
use crate::eventlog::EventLog;
use crate::validator::Validator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Started,
    SourceResolved,
    DestinationResolved,
    Extracted,
    Validated,
    Loaded,
    Completed,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Started => "started",
            Stage::SourceResolved => "source_resolved",
            Stage::DestinationResolved => "destination_resolved",
            Stage::Extracted => "extracted",
            Stage::Validated => "validated",
            Stage::Loaded => "loaded",
            Stage::Completed => "completed",
            Stage::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, Serialize)]
pub struct JobReport {
    pub job_id: String,
    pub records: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub duration_ms: u64,
}

/// `<domain>-<name>-<unix seconds>`.
pub fn job_id(ds: &DataSource, started_at: DateTime<Utc>) -> String {
    format!("{}-{}-{}", ds.domain, ds.name, started_at.timestamp())
}

pub struct Executor {
    config: Arc<Config>,
    registry: Arc<ConnectorRegistry>,
    events: EventLog,
}

impl Executor {
    pub fn new(config: Arc<Config>, registry: Arc<ConnectorRegistry>) -> Self {
        Self {
            config,
            registry,
            events: EventLog::new(),
        }
    }

    pub fn with_event_log(mut self, events: EventLog) -> Self {
        self.events = events;
        self
    }

    /// Run the job once. Blocks for the duration of the run.
    pub fn execute(&self) -> Result<JobReport, ExecuteError> {
        let ds = &self.config.data_source;
        let started_at = Utc::now();
        let clock = Instant::now();
        let job_id = job_id(ds, started_at);

        info!(
            job_id = %job_id,
            domain = %ds.domain,
            name = %ds.name,
            time = %started_at.to_rfc3339(),
            "job started"
        );
        self.events.job_start(ds, &job_id);

        let mut stage = Stage::Started;
        let result = self.run(&job_id, &mut stage);
        let duration_ms = clock.elapsed().as_millis() as u64;

        match result {
            Ok(records) => {
                advance(&job_id, &mut stage, Stage::Completed);
                let finished_at = Utc::now();
                info!(
                    job_id = %job_id,
                    domain = %ds.domain,
                    name = %ds.name,
                    records,
                    duration_ms,
                    success = true,
                    "job completed"
                );
                self.events.job_end(ds, &job_id, None);
                Ok(JobReport {
                    job_id,
                    records,
                    started_at,
                    finished_at,
                    duration_ms,
                })
            }
            Err(source) => {
                let reached = stage;
                advance(&job_id, &mut stage, Stage::Failed);
                error!(
                    job_id = %job_id,
                    domain = %ds.domain,
                    name = %ds.name,
                    stage = %reached,
                    error = %source,
                    duration_ms,
                    success = false,
                    "job failed"
                );
                self.events.job_end(ds, &job_id, Some(&source));
                Err(ExecuteError {
                    job_id,
                    stage: reached,
                    source,
                })
            }
        }
    }

    fn run(&self, job_id: &str, stage: &mut Stage) -> Result<usize, StageError> {
        let ds = &self.config.data_source;

        let source = self.registry.get(&ds.source.connector)?;
        advance(job_id, stage, Stage::SourceResolved);
        let destination = self.registry.get(&ds.destination.connector)?;
        advance(job_id, stage, Stage::DestinationResolved);

        // Held for the whole run so overlapping firings of this job queue up.
        let mut source_guard = lock(&source, &ds.source.connector)?;
        let mut destination_guard = if Arc::ptr_eq(&source, &destination) {
            None
        } else {
            Some(lock(&destination, &ds.destination.connector)?)
        };

        let data = source_guard.read()?;
        advance(job_id, stage, Stage::Extracted);
        debug!(job_id, records = data.len(), resource = %ds.source.fqn_resource, "extracted");

        Validator::new(ds.validate.clone()).validate(&data)?;
        advance(job_id, stage, Stage::Validated);

        match destination_guard.as_mut() {
            Some(guard) => guard.write(&data)?,
            None => source_guard.write(&data)?,
        }
        advance(job_id, stage, Stage::Loaded);

        Ok(data.len())
    }
}

fn advance(job_id: &str, stage: &mut Stage, next: Stage) {
    debug!(job_id, from = %stage, to = %next, "stage transition");
    *stage = next;
}

fn lock<'a>(
    connector: &'a SharedConnector,
    name: &str,
) -> Result<MutexGuard<'a, Box<dyn Connector>>, ConnectorError> {
    connector
        .lock()
        .map_err(|_| ConnectorError::LockPoisoned(name.to_string()))
}
