//! Pluggable read/write backends for ingestion jobs.
//!
//! A [`Connector`] moves [`Batch`](mdf_core::Batch)es in and out of some
//! storage location. Connectors are built by name from YAML settings through
//! the [`ConnectorFactory`] and owned per config by a [`ConnectorRegistry`].
//!
//! The only shipped backend is the [`FilesystemConnector`], which reads
//! csv / json / jsonl / parquet files and writes partitioned parquet output.

pub mod codec;
pub mod columnar;
pub mod engine;
pub mod error;
pub mod factory;
pub mod filesystem;
pub mod format;
pub mod partition;
pub mod traits;

pub use codec::{codec_for, FormatCodec};
pub use engine::{ArrowEngine, TabularSource};
pub use error::{ConnectorError, FormatError};
pub use factory::{ConnectorContext, ConnectorFactory, ConnectorRegistry, SharedConnector};
pub use filesystem::FilesystemConnector;
pub use format::FileFormat;
pub use partition::Partition;
pub use traits::Connector;
