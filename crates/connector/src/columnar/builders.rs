//! Build typed Arrow arrays from dynamically typed records.

use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanBuilder, Float64Builder, Int64Builder, StringBuilder};
use arrow::datatypes::{DataType, Schema};
use mdf_core::{Batch, Value};

/// Build one array per schema field.
///
/// Each value is coerced to the column's Arrow type. Values that cannot be
/// coerced, and fields a record does not carry, become NULL.
pub(crate) fn build_arrays(batch: &Batch, schema: &Schema) -> Vec<ArrayRef> {
    let num_rows = batch.len();
    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(schema.fields().len());

    for field in schema.fields() {
        let name = field.name().as_str();
        let cells = batch.iter().map(|record| record.get(name).filter(|v| !v.is_null()));

        let array: ArrayRef = match field.data_type() {
            DataType::Int64 => {
                let mut builder = Int64Builder::with_capacity(num_rows);
                for cell in cells {
                    builder.append_option(cell.and_then(Value::to_i64));
                }
                Arc::new(builder.finish())
            }
            DataType::Float64 => {
                let mut builder = Float64Builder::with_capacity(num_rows);
                for cell in cells {
                    builder.append_option(cell.and_then(Value::to_f64));
                }
                Arc::new(builder.finish())
            }
            DataType::Boolean => {
                let mut builder = BooleanBuilder::with_capacity(num_rows);
                for cell in cells {
                    builder.append_option(cell.and_then(Value::to_bool));
                }
                Arc::new(builder.finish())
            }
            _ => {
                let mut builder = StringBuilder::with_capacity(num_rows, num_rows * 16);
                for cell in cells {
                    match cell {
                        Some(Value::String(s)) => builder.append_value(s),
                        Some(other) => builder.append_value(other.to_string()),
                        None => builder.append_null(),
                    }
                }
                Arc::new(builder.finish())
            }
        };

        arrays.push(array);
    }

    arrays
}
