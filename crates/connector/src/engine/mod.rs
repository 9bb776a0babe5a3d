//! Multi-file tabular scanning used by directory reads.

mod arrow_engine;

use std::path::PathBuf;

use mdf_core::Batch;

use crate::error::ConnectorError;
use crate::format::FileFormat;

pub use self::arrow_engine::ArrowEngine;

/// A handle that scans groups of same-format files into records.
///
/// Numeric and boolean cells come back typed, unlike the text-only CSV
/// codec used for single-file reads.
pub trait TabularSource: Send {
    /// Scan `files` (all of `format`) and return their records in file order.
    fn scan(&mut self, format: FileFormat, files: &[PathBuf]) -> Result<Batch, ConnectorError>;

    fn close(&mut self) -> Result<(), ConnectorError>;
}
