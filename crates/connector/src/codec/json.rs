use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use mdf_core::{Batch, Record, Value};

use super::FormatCodec;
use crate::error::{ConnectorError, FormatError};
use crate::format::FileFormat;

/// A single JSON array of flat objects.
pub struct JsonCodec;

impl FormatCodec for JsonCodec {
    fn format(&self) -> FileFormat {
        FileFormat::Json
    }

    fn decode(&self, path: &Path) -> Result<Batch, ConnectorError> {
        let text = fs::read_to_string(path)?;
        if text.trim().is_empty() {
            return Ok(Batch::new());
        }

        let rows: Vec<serde_json::Map<String, serde_json::Value>> =
            serde_json::from_str(&text).map_err(|e| FormatError::malformed(path, e))?;

        Ok(rows.into_iter().map(object_to_record).collect())
    }

    fn encode(&self, path: &Path, batch: &Batch) -> Result<(), ConnectorError> {
        let rows: Vec<serde_json::Map<String, serde_json::Value>> =
            batch.iter().map(record_to_object).collect();

        let mut out = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut out, &rows)
            .map_err(|e| FormatError::malformed(path, e))?;
        out.write_all(b"\n")?;
        out.flush()?;
        Ok(())
    }
}

pub(super) fn object_to_record(object: serde_json::Map<String, serde_json::Value>) -> Record {
    object.into_iter().map(|(k, v)| (k, Value::from(v))).collect()
}

pub(super) fn record_to_object(record: &Record) -> serde_json::Map<String, serde_json::Value> {
    record
        .iter()
        .map(|(k, v)| (k.clone(), serde_json::Value::from(v)))
        .collect()
}
