//! Runs the executor for every configured data source on its cron schedule.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures::FutureExt;
use mdf_connector::{ConnectorFactory, ConnectorRegistry};
use mdf_core::Config;
use mdf_notify::{JobNotification, Notifier};
use mdf_pipeline::{EventLog, ExecuteError, Executor, Stage, StageError};
use tracing::{debug, error, info, warn};

use crate::engine::{CronEngine, JobFn};
use crate::error::ScheduleError;
use crate::jitter;

/// Runs of one job allowed at once: the one holding the connectors plus one
/// waiting behind it. Firings beyond that are skipped.
pub const MAX_PENDING_RUNS: usize = 2;

/// A config together with its live connectors.
#[derive(Clone)]
pub struct ScheduledJob {
    pub config: Arc<Config>,
    pub registry: Arc<ConnectorRegistry>,
    gate: RunGate,
}

impl ScheduledJob {
    pub fn new(config: Arc<Config>, registry: Arc<ConnectorRegistry>) -> Self {
        Self {
            config,
            registry,
            gate: RunGate::new(MAX_PENDING_RUNS),
        }
    }
}

/// Counts the runs of one job that are in flight.
#[derive(Clone)]
struct RunGate {
    pending: Arc<AtomicUsize>,
    limit: usize,
}

/// Releases its slot on drop.
struct RunPermit {
    pending: Arc<AtomicUsize>,
}

impl RunGate {
    fn new(limit: usize) -> Self {
        Self {
            pending: Arc::new(AtomicUsize::new(0)),
            limit,
        }
    }

    fn try_enter(&self) -> Option<RunPermit> {
        self.pending
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                (n < self.limit).then_some(n + 1)
            })
            .ok()
            .map(|_| RunPermit {
                pending: self.pending.clone(),
            })
    }
}

impl Drop for RunPermit {
    fn drop(&mut self) {
        self.pending.fetch_sub(1, Ordering::AcqRel);
    }
}

pub struct Scheduler {
    jobs: Vec<ScheduledJob>,
    notifier: Arc<dyn Notifier>,
    events: EventLog,
    engine: CronEngine,
}

impl Scheduler {
    pub fn new(jobs: Vec<ScheduledJob>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            jobs,
            notifier,
            events: EventLog::new(),
            engine: CronEngine::new(),
        }
    }

    /// Build one connector registry per config through `factory`.
    pub fn from_configs(
        configs: impl IntoIterator<Item = Arc<Config>>,
        factory: &ConnectorFactory,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, ScheduleError> {
        let jobs = configs
            .into_iter()
            .map(|config| {
                let registry = ConnectorRegistry::from_config(&config, factory).map_err(|source| {
                    ScheduleError::Registry {
                        config_id: config.id.clone(),
                        source,
                    }
                })?;
                Ok(ScheduledJob::new(config, Arc::new(registry)))
            })
            .collect::<Result<Vec<_>, ScheduleError>>()?;
        Ok(Self::new(jobs, notifier))
    }

    pub fn with_event_log(mut self, events: EventLog) -> Self {
        self.events = events;
        self
    }

    pub fn jobs(&self) -> &[ScheduledJob] {
        &self.jobs
    }

    /// Register every job with a cron expression and start firing.
    ///
    /// The first invalid expression aborts with an error and nothing is
    /// started. Must be called from within a tokio runtime.
    pub fn start(&mut self) -> Result<(), ScheduleError> {
        let mut engine = CronEngine::new();
        let entries = self.jobs.iter().map(|job| {
            (
                job.config.as_ref(),
                run_on_fire(job.clone(), self.notifier.clone(), self.events.clone()),
            )
        });
        let count = register_all(&mut engine, entries)?;

        info!(jobs_count = count, "scheduler starting");
        self.engine.stop();
        self.engine = engine;
        self.engine.start();
        Ok(())
    }

    /// Stop firing. In-flight runs finish on their own.
    pub fn stop(&mut self) {
        self.engine.stop();
        info!("scheduler stopped");
    }

    pub fn is_running(&self) -> bool {
        self.engine.is_running()
    }

    /// Close every job's connectors, logging failures.
    pub fn close_connectors(&self) {
        for job in &self.jobs {
            if let Err(e) = job.registry.close_all() {
                warn!(config_id = %job.config.id, error = %e, "failed to close connectors");
            }
        }
    }
}

/// Add one engine entry per config with a non-empty cron expression.
/// Returns the number of entries registered.
pub(crate) fn register_all<'a>(
    engine: &mut CronEngine,
    entries: impl IntoIterator<Item = (&'a Config, JobFn)>,
) -> Result<usize, ScheduleError> {
    for (config, job) in entries {
        let ds = &config.data_source;
        if ds.trigger.cron.trim().is_empty() {
            debug!(domain = %ds.domain, name = %ds.name, "no cron expression, not scheduled");
            continue;
        }

        info!(
            domain = %ds.domain,
            name = %ds.name,
            cron = %ds.trigger.cron,
            random_offset = ds.trigger.random_offset,
            "scheduling data source"
        );
        engine
            .add_job(&ds.trigger.cron, job)
            .map_err(|e| ScheduleError::Registration {
                data_source: config.label(),
                source: Box::new(e),
            })?;
    }
    Ok(engine.len())
}

fn run_on_fire(job: ScheduledJob, notifier: Arc<dyn Notifier>, events: EventLog) -> JobFn {
    Arc::new(move || run_job(job.clone(), notifier.clone(), events.clone()).boxed())
}

/// One firing: optional jitter, the blocking pipeline, then notification.
async fn run_job(job: ScheduledJob, notifier: Arc<dyn Notifier>, events: EventLog) {
    let ds = &job.config.data_source;
    let Some(_permit) = job.gate.try_enter() else {
        warn!(
            domain = %ds.domain,
            name = %ds.name,
            pending = MAX_PENDING_RUNS,
            "previous runs still in flight, skipping firing"
        );
        return;
    };
    jitter::apply(ds).await;

    let executor = Executor::new(job.config.clone(), job.registry.clone()).with_event_log(events);
    let outcome = tokio::task::spawn_blocking(move || executor.execute())
        .await
        .unwrap_or_else(|e| {
            Err(ExecuteError {
                job_id: job.config.label(),
                stage: Stage::Started,
                source: StageError::Join(e.to_string()),
            })
        });

    let notification = match &outcome {
        Ok(report) => {
            info!(
                domain = %ds.domain,
                name = %ds.name,
                job_id = %report.job_id,
                "job execution completed"
            );
            JobNotification::success(
                &ds.domain,
                &ds.name,
                format!("ingested {} records", report.records),
            )
            .with_metadata("job_id", &report.job_id)
            .with_metadata("records", report.records)
            .with_metadata("duration_ms", report.duration_ms)
        }
        Err(e) => {
            error!(
                domain = %ds.domain,
                name = %ds.name,
                job_id = %e.job_id,
                error = %e,
                "job execution failed"
            );
            JobNotification::failure(&ds.domain, &ds.name, e.to_string())
                .with_metadata("job_id", &e.job_id)
                .with_metadata("stage", e.stage)
        }
    };

    if let Err(e) = notifier.send(&notification).await {
        warn!(
            channel = notifier.channel_name(),
            domain = %ds.domain,
            name = %ds.name,
            error = %e,
            "failed to send job notification"
        );
    }
}

#[cfg(test)]
mod tests;
