use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use mdf_core::{Batch, FieldConfig};
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use tracing::debug;

use super::builders::build_arrays;
use super::schema::build_schema;
use crate::error::ConnectorError;

/// Convert a batch into an Arrow [`RecordBatch`] typed by `fields`.
pub fn batch_to_record_batch(
    batch: &Batch,
    fields: &[FieldConfig],
) -> Result<RecordBatch, ConnectorError> {
    let schema = Arc::new(build_schema(fields, batch));
    let arrays = build_arrays(batch, &schema);
    let options = RecordBatchOptions::new().with_row_count(Some(batch.len()));
    Ok(RecordBatch::try_new_with_options(schema, arrays, &options)?)
}

/// Write a batch to a Zstd-compressed Parquet file, returning the row count.
///
/// The parent directory must exist.
pub fn write_parquet(
    batch: &Batch,
    fields: &[FieldConfig],
    path: &Path,
) -> Result<u64, ConnectorError> {
    let record_batch = batch_to_record_batch(batch, fields)?;
    let row_count = record_batch.num_rows() as u64;

    let props = WriterProperties::builder()
        .set_compression(Compression::ZSTD(Default::default()))
        .build();

    let file = File::create(path)?;
    let mut writer = ArrowWriter::try_new(file, record_batch.schema(), Some(props))?;
    writer.write(&record_batch)?;
    writer.close()?;

    debug!(path = %path.display(), rows = row_count, "wrote parquet file");
    Ok(row_count)
}
