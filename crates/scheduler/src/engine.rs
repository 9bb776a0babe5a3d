//! A small cron dispatcher on top of the tokio runtime.
//!
//! Each entry gets one ticker task that sleeps until the next due time and
//! then spawns the job future as its own task, so a slow run never delays
//! the next firing and runs of the same entry may overlap.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use cron::Schedule;
use futures::future::BoxFuture;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::ScheduleError;
use crate::expr::parse_cron;

/// Produces one run of a job per call.
pub type JobFn = Arc<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>;

pub type EntryId = usize;

struct Entry {
    id: EntryId,
    expression: String,
    schedule: Schedule,
    job: JobFn,
}

#[derive(Default)]
pub struct CronEngine {
    entries: Vec<Arc<Entry>>,
    shutdown: Option<watch::Sender<bool>>,
}

impl CronEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `job` under `expression`. 5-field expressions get a leading
    /// seconds field. If the engine is already running the entry starts
    /// ticking immediately.
    pub fn add_job(&mut self, expression: &str, job: JobFn) -> Result<EntryId, ScheduleError> {
        let schedule = parse_cron(expression)?;
        let entry = Arc::new(Entry {
            id: self.entries.len(),
            expression: expression.trim().to_string(),
            schedule,
            job,
        });

        if let Some(tx) = &self.shutdown {
            tokio::spawn(tick(entry.clone(), tx.subscribe()));
        }
        self.entries.push(entry.clone());
        Ok(entry.id)
    }

    /// Spawn the ticker tasks. Must be called from within a tokio runtime.
    pub fn start(&mut self) {
        if self.is_running() {
            warn!("cron engine already running");
            return;
        }
        let (tx, _) = watch::channel(false);
        for entry in &self.entries {
            tokio::spawn(tick(entry.clone(), tx.subscribe()));
        }
        info!(entries = self.entries.len(), "cron engine started");
        self.shutdown = Some(tx);
    }

    /// Stop future firings. Runs already spawned are left to finish.
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(true);
            info!(entries = self.entries.len(), "cron engine stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.shutdown.is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Next due time of an entry, if it has one.
    pub fn next_fire(&self, id: EntryId) -> Option<DateTime<Utc>> {
        self.entries
            .get(id)
            .and_then(|e| e.schedule.upcoming(Utc).next())
    }
}

impl Drop for CronEngine {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn tick(entry: Arc<Entry>, mut shutdown: watch::Receiver<bool>) {
    let mut last_fired: Option<DateTime<Utc>> = None;

    loop {
        // Never fire the same slot twice if the timer wakes a little early.
        let now = Utc::now();
        let from = last_fired.map_or(now, |last| last.max(now));
        let Some(next) = entry.schedule.after(&from).next() else {
            debug!(entry = entry.id, expression = %entry.expression, "no upcoming fire time");
            return;
        };
        let wait = (next - Utc::now()).to_std().unwrap_or(Duration::ZERO);

        tokio::select! {
            _ = tokio::time::sleep(wait) => {
                debug!(entry = entry.id, expression = %entry.expression, due = %next, "cron entry fired");
                last_fired = Some(next);
                tokio::spawn((entry.job)());
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    return;
                }
            }
        }
    }
}
