use std::fs::{self, File};
use std::io::Seek;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::csv::reader::Format;
use arrow::json::reader::infer_json_schema_from_iterator;
use mdf_core::Batch;
use tracing::debug;

use super::TabularSource;
use crate::columnar::{read_parquet, record_batch_to_records};
use crate::error::{ConnectorError, FormatError};
use crate::format::FileFormat;

const BATCH_SIZE: usize = 1024;

/// [`TabularSource`] backed by the Arrow CSV / JSON readers and the Parquet
/// Arrow reader. Schemas are inferred per file.
pub struct ArrowEngine {
    closed: bool,
}

impl ArrowEngine {
    pub fn new() -> Self {
        Self { closed: false }
    }

    fn scan_file(&self, format: FileFormat, path: &Path) -> Result<Batch, ConnectorError> {
        match format {
            FileFormat::Csv => scan_csv(path),
            FileFormat::Json => scan_json_array(path),
            FileFormat::Jsonl => scan_jsonl(path),
            FileFormat::Parquet => read_parquet(path),
        }
    }
}

impl Default for ArrowEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TabularSource for ArrowEngine {
    fn scan(&mut self, format: FileFormat, files: &[PathBuf]) -> Result<Batch, ConnectorError> {
        if self.closed {
            return Err(ConnectorError::Closed);
        }

        let mut records = Batch::new();
        for path in files {
            if fs::metadata(path)?.len() == 0 {
                debug!(file = %path.display(), "skipping empty file");
                continue;
            }
            let batch = self.scan_file(format, path)?;
            debug!(file = %path.display(), %format, records = batch.len(), "scanned file");
            records.extend(batch);
        }
        Ok(records)
    }

    fn close(&mut self) -> Result<(), ConnectorError> {
        self.closed = true;
        Ok(())
    }
}

fn scan_csv(path: &Path) -> Result<Batch, ConnectorError> {
    let mut file = File::open(path)?;
    let format = Format::default().with_header(true);
    // Whole-file inference so a late row cannot contradict the schema.
    let (schema, _) = format.infer_schema(&mut file, None)?;
    file.rewind()?;

    let reader = arrow::csv::ReaderBuilder::new(Arc::new(schema))
        .with_format(format)
        .with_batch_size(BATCH_SIZE)
        .build(file)?;

    let mut records = Batch::new();
    for batch in reader {
        records.extend(record_batch_to_records(&batch?)?);
    }
    Ok(records)
}

fn scan_jsonl(path: &Path) -> Result<Batch, ConnectorError> {
    let text = fs::read_to_string(path)?;
    let mut rows = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let row: serde_json::Value = serde_json::from_str(line)
            .map_err(|e| FormatError::malformed(path, format!("line {}: {e}", idx + 1)))?;
        rows.push(row);
    }
    decode_json_rows(&rows)
}

fn scan_json_array(path: &Path) -> Result<Batch, ConnectorError> {
    let text = fs::read_to_string(path)?;
    let rows: Vec<serde_json::Value> =
        serde_json::from_str(&text).map_err(|e| FormatError::malformed(path, e))?;
    decode_json_rows(&rows)
}

/// Decode parsed JSON objects through the Arrow JSON decoder.
///
/// The schema is inferred over every row. Scalars that do not match the
/// inferred column type are coerced to text, and each record keeps only the
/// keys its source object carried.
fn decode_json_rows(rows: &[serde_json::Value]) -> Result<Batch, ConnectorError> {
    if rows.is_empty() {
        return Ok(Batch::new());
    }

    let schema = infer_json_schema_from_iterator(rows.iter().map(Ok))?;
    let mut decoder = arrow::json::ReaderBuilder::new(Arc::new(schema))
        .with_batch_size(BATCH_SIZE)
        .with_coerce_primitive(true)
        .build_decoder()?;

    let mut records = Batch::with_capacity(rows.len());
    for chunk in rows.chunks(BATCH_SIZE) {
        decoder.serialize(chunk)?;
        let Some(batch) = decoder.flush()? else {
            continue;
        };
        for (mut record, source) in record_batch_to_records(&batch)?.into_iter().zip(chunk) {
            if let Some(object) = source.as_object() {
                record.retain(|key, _| object.contains_key(key));
            }
            records.push(record);
        }
    }
    Ok(records)
}
