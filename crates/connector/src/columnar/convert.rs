//! Arrow arrays to [`Value`]s.

use arrow::array::{Array, AsArray};
use arrow::datatypes::{
    DataType, Float16Type, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type, Int8Type,
    UInt16Type, UInt32Type, UInt64Type, UInt8Type,
};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use arrow::util::display::{ArrayFormatter, FormatOptions};
use mdf_core::{Batch, Record, Value};

/// Turn every row of `batch` into a [`Record`] keyed by column name.
pub fn record_batch_to_records(batch: &RecordBatch) -> Result<Batch, ArrowError> {
    let schema = batch.schema();
    let columns: Vec<Vec<Value>> = batch
        .columns()
        .iter()
        .map(|array| column_values(array.as_ref()))
        .collect::<Result<_, _>>()?;

    let mut records = Batch::with_capacity(batch.num_rows());
    for row in 0..batch.num_rows() {
        let mut record = Record::with_capacity(columns.len());
        for (field, values) in schema.fields().iter().zip(&columns) {
            record.insert(field.name().clone(), values[row].clone());
        }
        records.push(record);
    }
    Ok(records)
}

/// Convert one column. Integer, float, boolean and string arrays map to the
/// matching scalar; any other type falls back to its display text.
pub(crate) fn column_values(array: &dyn Array) -> Result<Vec<Value>, ArrowError> {
    let len = array.len();

    macro_rules! ints {
        ($ty:ty) => {{
            let arr = array.as_primitive::<$ty>();
            (0..len)
                .map(|i| nullable(array, i, || Value::Int(i64::from(arr.value(i)))))
                .collect()
        }};
    }
    macro_rules! floats {
        ($ty:ty) => {{
            let arr = array.as_primitive::<$ty>();
            (0..len)
                .map(|i| nullable(array, i, || Value::Float(f64::from(arr.value(i)))))
                .collect()
        }};
    }

    let values = match array.data_type() {
        DataType::Null => vec![Value::Null; len],
        DataType::Boolean => {
            let arr = array.as_boolean();
            (0..len)
                .map(|i| nullable(array, i, || Value::Bool(arr.value(i))))
                .collect()
        }
        DataType::Int8 => ints!(Int8Type),
        DataType::Int16 => ints!(Int16Type),
        DataType::Int32 => ints!(Int32Type),
        DataType::Int64 => ints!(Int64Type),
        DataType::UInt8 => ints!(UInt8Type),
        DataType::UInt16 => ints!(UInt16Type),
        DataType::UInt32 => ints!(UInt32Type),
        DataType::UInt64 => {
            let arr = array.as_primitive::<UInt64Type>();
            (0..len)
                .map(|i| {
                    nullable(array, i, || {
                        let v = arr.value(i);
                        i64::try_from(v).map(Value::Int).unwrap_or(Value::Float(v as f64))
                    })
                })
                .collect()
        }
        DataType::Float16 => {
            let arr = array.as_primitive::<Float16Type>();
            (0..len)
                .map(|i| nullable(array, i, || Value::Float(arr.value(i).to_f64())))
                .collect()
        }
        DataType::Float32 => floats!(Float32Type),
        DataType::Float64 => floats!(Float64Type),
        DataType::Utf8 => {
            let arr = array.as_string::<i32>();
            (0..len)
                .map(|i| nullable(array, i, || Value::String(arr.value(i).to_string())))
                .collect()
        }
        DataType::LargeUtf8 => {
            let arr = array.as_string::<i64>();
            (0..len)
                .map(|i| nullable(array, i, || Value::String(arr.value(i).to_string())))
                .collect()
        }
        _ => {
            let formatter = ArrayFormatter::try_new(array, &FormatOptions::default())?;
            (0..len)
                .map(|i| nullable(array, i, || Value::String(formatter.value(i).to_string())))
                .collect()
        }
    };

    Ok(values)
}

fn nullable(array: &dyn Array, row: usize, value: impl FnOnce() -> Value) -> Value {
    if array.is_null(row) {
        Value::Null
    } else {
        value()
    }
}
