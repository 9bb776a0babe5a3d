//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Scheduled, config-driven data ingestion runner.
#[derive(Parser, Debug)]
#[command(name = "mdf", version, about)]
pub struct Cli {
    /// Directory searched recursively for `*.yaml` / `*.yml` job configs.
    #[arg(long, env = "MDF_CONFIG_DIR", default_value = "configs")]
    pub config_dir: PathBuf,

    /// Log output format.
    #[arg(long, env = "MDF_LOG_FORMAT", value_enum, default_value_t = LogFormat::Json)]
    pub log_format: LogFormat,

    /// Interval in seconds between keepalive log lines (0 = disabled).
    #[arg(long, env = "MDF_KEEPALIVE_SECS", default_value_t = 1800)]
    pub keepalive_secs: u64,

    /// Which engines to run.
    #[arg(long, env = "MDF_MODE", value_enum, default_value_t = Mode::Scheduler)]
    pub mode: Mode,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum LogFormat {
    Json,
    Pretty,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum Mode {
    /// Run each job in-process on its schedule.
    Scheduler,
    /// Post due config ids to the job queue.
    Triggerer,
    Both,
}

impl Mode {
    pub fn runs_scheduler(self) -> bool {
        matches!(self, Mode::Scheduler | Mode::Both)
    }

    pub fn runs_triggerer(self) -> bool {
        matches!(self, Mode::Triggerer | Mode::Both)
    }
}
