//! Shared types for the mdf ingestion runner.
//!
//! - [`Value`], [`Record`] and [`Batch`]: the in-memory row model every
//!   connector reads into and writes from
//! - [`config`]: the declarative data source description and its YAML loader

pub mod config;
pub mod error;
pub mod loader;
pub mod record;

pub use config::{
    Config, ConnectorSettings, DataSource, DestinationConfig, FieldConfig, SourceConfig,
    TriggerConfig, ValidationConfig,
};
pub use error::ConfigError;
pub use loader::{load_config_dir, load_config_file};
pub use record::{record_of, Batch, Record, Value};
