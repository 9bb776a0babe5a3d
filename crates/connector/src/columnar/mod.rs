//! Conversion between [`Batch`](mdf_core::Batch)es and Arrow / Parquet.
//!
//! Writing maps declared field types to Arrow types, builds typed columns
//! from the dynamically typed records and stores them as Zstd-compressed
//! Parquet. Reading goes the other way, turning Arrow arrays back into
//! [`Value`](mdf_core::Value)s by data type.

pub(crate) mod builders;
pub(crate) mod convert;
mod reader;
pub(crate) mod schema;
mod writer;

#[cfg(test)]
mod tests;

pub use convert::record_batch_to_records;
pub use reader::read_parquet;
pub use schema::declared_type_to_arrow;
pub use writer::{batch_to_record_batch, write_parquet};
