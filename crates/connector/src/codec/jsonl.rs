use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use mdf_core::Batch;

use super::json::{object_to_record, record_to_object};
use super::FormatCodec;
use crate::error::{ConnectorError, FormatError};
use crate::format::FileFormat;

/// Newline-delimited JSON objects.
pub struct JsonlCodec;

impl FormatCodec for JsonlCodec {
    fn format(&self) -> FileFormat {
        FileFormat::Jsonl
    }

    fn decode(&self, path: &Path) -> Result<Batch, ConnectorError> {
        let reader = BufReader::new(File::open(path)?);
        let mut batch = Batch::new();

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let object: serde_json::Map<String, serde_json::Value> = serde_json::from_str(&line)
                .map_err(|e| FormatError::malformed(path, format!("line {}: {e}", idx + 1)))?;
            batch.push(object_to_record(object));
        }
        Ok(batch)
    }

    fn encode(&self, path: &Path, batch: &Batch) -> Result<(), ConnectorError> {
        let mut out = BufWriter::new(File::create(path)?);
        for record in batch {
            serde_json::to_writer(&mut out, &record_to_object(record))
                .map_err(|e| FormatError::malformed(path, e))?;
            out.write_all(b"\n")?;
        }
        out.flush()?;
        Ok(())
    }
}
