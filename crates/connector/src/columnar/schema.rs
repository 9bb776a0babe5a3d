//! Declared field type to Arrow type mapping and schema construction.

use arrow::datatypes::{DataType, Field, Schema};
use indexmap::IndexMap;
use mdf_core::{Batch, FieldConfig, Value};

/// Map a declared `data_type` string to an Arrow DataType.
///
/// Anything not recognised as numeric or boolean is stored as UTF-8,
/// including dates and timestamps.
pub fn declared_type_to_arrow(data_type: &str) -> DataType {
    match data_type.trim().to_lowercase().as_str() {
        "int" | "integer" | "bigint" | "long" => DataType::Int64,
        "float" | "double" | "decimal" | "number" => DataType::Float64,
        "bool" | "boolean" => DataType::Boolean,
        _ => DataType::Utf8,
    }
}

/// Build a schema from declared fields, or infer one from the records when
/// nothing is declared.
pub(crate) fn build_schema(fields: &[FieldConfig], batch: &Batch) -> Schema {
    if fields.is_empty() {
        return infer_schema(batch);
    }
    let fields: Vec<Field> = fields
        .iter()
        .map(|f| Field::new(&f.label, declared_type_to_arrow(&f.data_type), true))
        .collect();
    Schema::new(fields)
}

/// Union of field names in first-seen order, typed by the first non-null
/// value seen for each field.
pub(crate) fn infer_schema(batch: &Batch) -> Schema {
    let mut columns: IndexMap<&str, Option<DataType>> = IndexMap::new();

    for record in batch {
        for (name, value) in record {
            let slot = columns.entry(name.as_str()).or_insert(None);
            if slot.is_none() {
                *slot = value_type(value);
            }
        }
    }

    let fields: Vec<Field> = columns
        .into_iter()
        .map(|(name, ty)| Field::new(name, ty.unwrap_or(DataType::Utf8), true))
        .collect();
    Schema::new(fields)
}

fn value_type(value: &Value) -> Option<DataType> {
    match value {
        Value::Null => None,
        Value::Bool(_) => Some(DataType::Boolean),
        Value::Int(_) => Some(DataType::Int64),
        Value::Float(_) => Some(DataType::Float64),
        Value::String(_) => Some(DataType::Utf8),
    }
}
