//! Process setup: logging, config loading and engine construction.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use mdf_connector::ConnectorFactory;
use mdf_core::{load_config_dir, Config};
use mdf_notify::{Dispatcher, LogNotifier, Notifier};
use mdf_scheduler::{CronTriggerer, Scheduler};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{LogFormat, Mode};

pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.pretty().init(),
    }
}

/// Load every config under `dir` and log a summary line per job.
pub fn load_configs(dir: &Path) -> anyhow::Result<Vec<Arc<Config>>> {
    let configs = load_config_dir(dir)
        .with_context(|| format!("failed to load configs from {}", dir.display()))?;
    for config in &configs {
        config.log_summary();
    }
    Ok(configs.into_iter().map(Arc::new).collect())
}

/// The engines selected by `--mode`, not yet started.
pub struct Runners {
    pub scheduler: Option<Scheduler>,
    pub triggerer: Option<CronTriggerer>,
}

pub fn build_runners(configs: Vec<Arc<Config>>, mode: Mode) -> anyhow::Result<Runners> {
    let scheduler = if mode.runs_scheduler() {
        let factory = ConnectorFactory::with_defaults();
        let log: Arc<dyn Notifier> = Arc::new(LogNotifier::new());
        let notifier: Arc<dyn Notifier> = Arc::new(Dispatcher::new(vec![log]));
        let scheduler = Scheduler::from_configs(configs.iter().cloned(), &factory, notifier)?;
        info!(jobs = scheduler.jobs().len(), "scheduler ready");
        Some(scheduler)
    } else {
        None
    };

    let triggerer = mode.runs_triggerer().then(|| CronTriggerer::new(configs));

    Ok(Runners { scheduler, triggerer })
}
