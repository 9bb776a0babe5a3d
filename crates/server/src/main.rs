//! mdf: runs declarative ingestion jobs on their cron schedules.
//!
//! # Usage
//!
//! ```bash
//! mdf --config-dir ./configs --log-format pretty
//!
//! # Post due jobs to the queue instead of running them
//! MDF_MODE=triggerer mdf
//! ```

mod cli;
mod startup;

use std::time::Duration;

use clap::Parser;
use mdf_scheduler::Triggerer;
use tracing::{info, warn};

use crate::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    startup::init_tracing(cli.log_format);

    info!(?cli, "starting mdf");

    let configs = startup::load_configs(&cli.config_dir)?;
    let startup::Runners {
        mut scheduler,
        mut triggerer,
    } = startup::build_runners(configs, cli.mode)?;

    if let Some(scheduler) = scheduler.as_mut() {
        scheduler.start()?;
    }
    if let Some(triggerer) = triggerer.as_mut() {
        triggerer.start()?;
    }

    if cli.keepalive_secs > 0 {
        let period = Duration::from_secs(cli.keepalive_secs);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            loop {
                interval.tick().await;
                info!("mdf is running");
            }
        });
    }

    shutdown_signal().await?;
    info!("shutdown signal received");

    if let Some(mut triggerer) = triggerer {
        triggerer.stop()?;
    }
    if let Some(mut scheduler) = scheduler {
        scheduler.stop();
        scheduler.close_connectors();
    }

    info!("mdf exited cleanly");
    Ok(())
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() -> anyhow::Result<()> {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        let mut sigterm =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;
        tokio::select! {
            result = ctrl_c => {
                if let Err(e) = result {
                    warn!(error = %e, "failed to listen for ctrl_c");
                }
            }
            _ = sigterm.recv() => {}
        }
    }

    #[cfg(not(unix))]
    {
        ctrl_c.await?;
    }

    Ok(())
}
