//! Per-format file codecs used for single-file reads and writes.

mod csv;
mod json;
mod jsonl;
mod parquet;

use std::path::Path;

use mdf_core::{Batch, FieldConfig};

use crate::error::ConnectorError;
use crate::format::FileFormat;

pub use self::csv::CsvCodec;
pub use self::json::JsonCodec;
pub use self::jsonl::JsonlCodec;
pub use self::parquet::ParquetCodec;

/// Decode a whole file into records, or encode records into a file.
pub trait FormatCodec: Send + Sync {
    fn format(&self) -> FileFormat;

    fn decode(&self, path: &Path) -> Result<Batch, ConnectorError>;

    /// Create or truncate `path` and write `batch` into it.
    fn encode(&self, path: &Path, batch: &Batch) -> Result<(), ConnectorError>;
}

/// Pick the codec for `format`. Only Parquet output uses the declared fields.
pub fn codec_for(format: FileFormat, fields: &[FieldConfig]) -> Box<dyn FormatCodec> {
    match format {
        FileFormat::Csv => Box::new(CsvCodec),
        FileFormat::Json => Box::new(JsonCodec),
        FileFormat::Jsonl => Box::new(JsonlCodec),
        FileFormat::Parquet => Box::new(ParquetCodec::new(fields.to_vec())),
    }
}

/// Union of field names across `batch`, in first-seen order.
fn header_of(batch: &Batch) -> Vec<&str> {
    let mut seen = indexmap::IndexSet::new();
    for record in batch {
        for key in record.keys() {
            seen.insert(key.as_str());
        }
    }
    seen.into_iter().collect()
}
