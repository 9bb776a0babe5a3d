use std::fs::File;
use std::path::Path;

use mdf_core::{Batch, FieldConfig};

use super::FormatCodec;
use crate::columnar::{read_parquet, write_parquet};
use crate::error::ConnectorError;
use crate::format::FileFormat;

/// Parquet typed by the declared fields, or by inference when none are given.
pub struct ParquetCodec {
    fields: Vec<FieldConfig>,
}

impl ParquetCodec {
    pub fn new(fields: Vec<FieldConfig>) -> Self {
        Self { fields }
    }
}

impl FormatCodec for ParquetCodec {
    fn format(&self) -> FileFormat {
        FileFormat::Parquet
    }

    fn decode(&self, path: &Path) -> Result<Batch, ConnectorError> {
        read_parquet(path)
    }

    fn encode(&self, path: &Path, batch: &Batch) -> Result<(), ConnectorError> {
        if batch.is_empty() {
            // Zero-length file; decode treats it as an empty batch.
            File::create(path)?;
            return Ok(());
        }
        write_parquet(batch, &self.fields, path)?;
        Ok(())
    }
}
