use std::fs::File;
use std::path::Path;

use mdf_core::{Batch, Record, Value};

use super::{header_of, FormatCodec};
use crate::error::{ConnectorError, FormatError};
use crate::format::FileFormat;

/// Header-first CSV. Every cell decodes as text.
pub struct CsvCodec;

impl FormatCodec for CsvCodec {
    fn format(&self) -> FileFormat {
        FileFormat::Csv
    }

    fn decode(&self, path: &Path) -> Result<Batch, ConnectorError> {
        let file = File::open(path)?;
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(file);

        let headers = reader
            .headers()
            .map_err(|e| FormatError::malformed(path, e))?
            .clone();

        let mut batch = Batch::new();
        for row in reader.records() {
            let row = row.map_err(|e| FormatError::malformed(path, e))?;
            // Ragged rows keep only the columns they actually have.
            let record: Record = headers
                .iter()
                .zip(row.iter())
                .map(|(name, cell)| (name.to_string(), Value::from(cell)))
                .collect();
            batch.push(record);
        }
        Ok(batch)
    }

    fn encode(&self, path: &Path, batch: &Batch) -> Result<(), ConnectorError> {
        let file = File::create(path)?;
        if batch.is_empty() {
            return Ok(());
        }

        let header = header_of(batch);
        let mut writer = csv::Writer::from_writer(file);
        writer
            .write_record(&header)
            .map_err(|e| FormatError::malformed(path, e))?;

        for record in batch {
            let row = header.iter().map(|name| match record.get(*name) {
                None | Some(Value::Null) => String::new(),
                Some(value) => value.to_string(),
            });
            writer
                .write_record(row)
                .map_err(|e| FormatError::malformed(path, e))?;
        }
        writer.flush()?;
        Ok(())
    }
}
