//! Cron-driven job posting for deployments where workers consume a queue.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::FutureExt;
use mdf_core::Config;
use tracing::{debug, error, info};

use crate::engine::{CronEngine, JobFn};
use crate::error::ScheduleError;
use crate::jitter;
use crate::scheduler::register_all;

pub trait Triggerer: Send {
    fn start(&mut self) -> Result<(), ScheduleError>;
    fn stop(&mut self) -> Result<(), ScheduleError>;
    /// Announce that the job for `config_id` is due.
    fn post(&self, config_id: &str) -> Result<(), ScheduleError>;
    fn register_queue(&self, settings: &HashMap<String, String>) -> Result<(), ScheduleError>;
    fn deregister_queue(&self, queue_id: &str) -> Result<(), ScheduleError>;
}

/// Queue stand-in that accepts every post and only counts them.
#[derive(Debug, Default)]
pub struct PassThroughQueue {
    posted: AtomicU64,
}

impl PassThroughQueue {
    pub fn post(&self, config_id: &str) -> Result<(), ScheduleError> {
        self.posted.fetch_add(1, Ordering::Relaxed);
        debug!(config_id, "queue post accepted");
        Ok(())
    }

    pub fn posted(&self) -> u64 {
        self.posted.load(Ordering::Relaxed)
    }
}

pub struct CronTriggerer {
    configs: Vec<Arc<Config>>,
    queue: Arc<PassThroughQueue>,
    engine: CronEngine,
}

impl CronTriggerer {
    pub fn new(configs: Vec<Arc<Config>>) -> Self {
        Self {
            configs,
            queue: Arc::new(PassThroughQueue::default()),
            engine: CronEngine::new(),
        }
    }

    pub fn queue(&self) -> &PassThroughQueue {
        &self.queue
    }

    pub fn is_running(&self) -> bool {
        self.engine.is_running()
    }
}

impl Triggerer for CronTriggerer {
    /// Register every config with a cron expression; the first invalid one
    /// aborts and leaves the triggerer stopped.
    fn start(&mut self) -> Result<(), ScheduleError> {
        let mut engine = CronEngine::new();
        let entries = self
            .configs
            .iter()
            .map(|config| (config.as_ref(), post_on_fire(config.clone(), self.queue.clone())));
        let count = register_all(&mut engine, entries)?;

        info!(jobs_count = count, "triggerer starting");
        self.engine.stop();
        self.engine = engine;
        self.engine.start();
        Ok(())
    }

    fn stop(&mut self) -> Result<(), ScheduleError> {
        self.engine.stop();
        info!("triggerer stopped");
        Ok(())
    }

    fn post(&self, config_id: &str) -> Result<(), ScheduleError> {
        self.queue.post(config_id)
    }

    fn register_queue(&self, settings: &HashMap<String, String>) -> Result<(), ScheduleError> {
        debug!(keys = settings.len(), "register queue");
        Ok(())
    }

    fn deregister_queue(&self, queue_id: &str) -> Result<(), ScheduleError> {
        debug!(queue_id, "deregister queue");
        Ok(())
    }
}

fn post_on_fire(config: Arc<Config>, queue: Arc<PassThroughQueue>) -> JobFn {
    Arc::new(move || {
        let config = config.clone();
        let queue = queue.clone();
        async move {
            let ds = &config.data_source;
            jitter::apply(ds).await;
            match queue.post(&config.id) {
                Ok(()) => info!(domain = %ds.domain, name = %ds.name, "job posted to queue"),
                Err(e) => error!(
                    domain = %ds.domain,
                    name = %ds.name,
                    error = %e,
                    "failed to post job to queue"
                ),
            }
        }
        .boxed()
    })
}
