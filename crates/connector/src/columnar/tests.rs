//! Tests for Arrow / Parquet conversion.

#[cfg(test)]
mod tests {
    use arrow::array::{Array, AsArray};
    use arrow::datatypes::{DataType, Float64Type, Int64Type};
    use mdf_core::{record_of, Batch, FieldConfig, Value};

    use crate::columnar::schema::{declared_type_to_arrow, infer_schema};
    use crate::columnar::{batch_to_record_batch, read_parquet, write_parquet};

    fn sample_fields() -> Vec<FieldConfig> {
        vec![
            FieldConfig::new("id", "bigint"),
            FieldConfig::new("name", "string"),
            FieldConfig::new("score", "double"),
            FieldConfig::new("active", "boolean"),
        ]
    }

    fn sample_batch() -> Batch {
        vec![
            record_of([
                ("id", Value::from("1")),
                ("name", Value::from("alice")),
                ("score", Value::from("9.5")),
                ("active", Value::from("true")),
            ]),
            record_of([
                ("id", Value::Int(2)),
                ("name", Value::from("bob")),
                ("score", Value::Null),
                ("active", Value::Bool(false)),
            ]),
            record_of([("id", Value::from("three")), ("score", Value::Float(7.0))]),
        ]
    }

    #[test]
    fn test_declared_type_mapping() {
        assert_eq!(declared_type_to_arrow("int"), DataType::Int64);
        assert_eq!(declared_type_to_arrow("BIGINT"), DataType::Int64);
        assert_eq!(declared_type_to_arrow("long"), DataType::Int64);
        assert_eq!(declared_type_to_arrow("double"), DataType::Float64);
        assert_eq!(declared_type_to_arrow("number"), DataType::Float64);
        assert_eq!(declared_type_to_arrow("Boolean"), DataType::Boolean);
        assert_eq!(declared_type_to_arrow("string"), DataType::Utf8);
        assert_eq!(declared_type_to_arrow("date"), DataType::Utf8);
        assert_eq!(declared_type_to_arrow("whatever"), DataType::Utf8);
    }

    #[test]
    fn test_coercion_to_declared_types() {
        let rb = batch_to_record_batch(&sample_batch(), &sample_fields()).unwrap();
        assert_eq!(rb.num_rows(), 3);
        assert_eq!(rb.num_columns(), 4);

        let ids = rb.column(0).as_primitive::<Int64Type>();
        assert_eq!(ids.value(0), 1);
        assert_eq!(ids.value(1), 2);
        // "three" cannot become an integer.
        assert!(ids.is_null(2));

        let names = rb.column(1).as_string::<i32>();
        assert_eq!(names.value(0), "alice");
        assert!(names.is_null(2));

        let scores = rb.column(2).as_primitive::<Float64Type>();
        assert_eq!(scores.value(0), 9.5);
        assert!(scores.is_null(1));
        assert_eq!(scores.value(2), 7.0);

        let active = rb.column(3).as_boolean();
        assert!(active.value(0));
        assert!(!active.value(1));
        assert!(active.is_null(2));
    }

    #[test]
    fn test_out_of_range_float_becomes_null_int() {
        let batch = vec![
            record_of([("id", Value::Float(1e20))]),
            record_of([("id", Value::Float(42.0))]),
        ];
        let rb = batch_to_record_batch(&batch, &[FieldConfig::new("id", "int")]).unwrap();
        let ids = rb.column(0).as_primitive::<Int64Type>();
        assert!(ids.is_null(0));
        assert_eq!(ids.value(1), 42);
    }

    #[test]
    fn test_inferred_schema_uses_first_non_null() {
        let batch = vec![
            record_of([("a", Value::Null), ("b", Value::Int(1))]),
            record_of([("a", Value::Float(1.5)), ("c", Value::from("x"))]),
            record_of([("d", Value::Null)]),
        ];
        let schema = infer_schema(&batch);
        let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c", "d"]);
        assert_eq!(schema.field(0).data_type(), &DataType::Float64);
        assert_eq!(schema.field(1).data_type(), &DataType::Int64);
        assert_eq!(schema.field(2).data_type(), &DataType::Utf8);
        assert_eq!(schema.field(3).data_type(), &DataType::Utf8);
    }

    #[test]
    fn test_write_and_read_parquet() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("out.parquet");

        let rows = write_parquet(&sample_batch(), &sample_fields(), &path).unwrap();
        assert_eq!(rows, 3);

        let records = read_parquet(&path).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0]["id"], Value::Int(1));
        assert_eq!(records[0]["name"], Value::from("alice"));
        assert_eq!(records[0]["active"], Value::Bool(true));
        assert_eq!(records[1]["score"], Value::Null);
        assert_eq!(records[2]["id"], Value::Null);
        let keys: Vec<&str> = records[0].keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["id", "name", "score", "active"]);
    }

    #[test]
    fn test_zero_length_file_reads_as_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("empty.parquet");
        std::fs::File::create(&path).unwrap();
        assert!(read_parquet(&path).unwrap().is_empty());
    }
}
