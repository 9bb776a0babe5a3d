use std::fs::File;
use std::path::Path;

use mdf_core::Batch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::convert::record_batch_to_records;
use crate::error::ConnectorError;

/// Read every row group of a Parquet file into records.
///
/// A zero-length file is treated as an empty batch.
pub fn read_parquet(path: &Path) -> Result<Batch, ConnectorError> {
    if std::fs::metadata(path)?.len() == 0 {
        return Ok(Batch::new());
    }

    let file = File::open(path)?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut records = Batch::new();
    for batch in reader {
        records.extend(record_batch_to_records(&batch?)?);
    }
    Ok(records)
}
