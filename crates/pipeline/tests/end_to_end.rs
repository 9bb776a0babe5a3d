//! Full runs through the filesystem connector: YAML config, source file,
//! validation and partitioned parquet output.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use mdf_connector::columnar::read_parquet;
use mdf_connector::{ConnectorFactory, ConnectorRegistry, Partition};
use mdf_core::{Config, Value};
use mdf_pipeline::{Executor, Stage};
use walkdir::WalkDir;

fn write_config(raw: &Path, out: &Path) -> Config {
    let yaml = format!(
        r#"
id: config1
connectors:
  source:
    type: filesystem
    base_path: "{raw}"
    partition: daily
  destination:
    type: filesystem
    base_path: "{out}"
    partition: daily
data_source:
  domain: test
  name: users
  source:
    connector: source
    fqn_resource: users.json
    primary_key: [id]
  destination:
    connector: destination
    ordering: [id asc]
  trigger:
    cron: "0 0 * * *"
    random_offset: false
  validate:
    not_null: [id, name]
    unique: [id]
  fields:
    - label: id
      data_type: string
    - label: name
      data_type: string
"#,
        raw = raw.display(),
        out = out.display(),
    );
    serde_yaml::from_str(&yaml).unwrap()
}

fn setup(source_json: &str) -> (tempfile::TempDir, PathBuf, Executor) {
    let tmp = tempfile::tempdir().unwrap();
    let raw = tmp.path().join("raw");
    let out = tmp.path().join("ingested");
    fs::create_dir_all(&raw).unwrap();
    fs::create_dir_all(&out).unwrap();
    fs::write(raw.join("users.json"), source_json).unwrap();

    let config = write_config(&raw, &out);
    let registry = ConnectorRegistry::from_config(&config, &ConnectorFactory::with_defaults()).unwrap();
    let executor = Executor::new(Arc::new(config), Arc::new(registry));
    (tmp, out, executor)
}

fn output_files(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .collect()
}

#[test]
fn valid_source_lands_in_todays_partition() {
    let (_tmp, out, executor) =
        setup(r#"[{"id": "1", "name": "Alice"}, {"id": "2", "name": "Bob"}]"#);

    let report = executor.execute().unwrap();
    assert_eq!(report.records, 2);

    let partition = out.join(Partition::Daily.current_key());
    let files = output_files(&partition);
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].extension().unwrap(), "parquet");

    let rows = read_parquet(&files[0]).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["id"], Value::from("1"));
    assert_eq!(rows[1]["name"], Value::from("Bob"));
}

#[test]
fn duplicate_id_fails_without_output() {
    let (_tmp, out, executor) =
        setup(r#"[{"id": "1", "name": "Alice"}, {"id": "1", "name": "Bob"}]"#);

    let err = executor.execute().unwrap_err();
    assert_eq!(err.stage, Stage::Extracted);
    assert!(err.is_validation());
    assert!(err.to_string().contains("field 'id' must be unique (row 1"));
    assert!(output_files(&out).is_empty());
}

#[test]
fn directory_rows_missing_a_unique_field_pass() {
    let tmp = tempfile::tempdir().unwrap();
    let raw = tmp.path().join("raw");
    let out = tmp.path().join("ingested");
    fs::create_dir_all(raw.join("2024")).unwrap();
    fs::create_dir_all(&out).unwrap();
    fs::write(
        raw.join("2024/users.jsonl"),
        "{\"id\": 1, \"email\": \"a@example.com\"}\n{\"id\": 2}\n{\"id\": 3}\n",
    )
    .unwrap();

    let mut config = write_config(&raw, &out);
    let ds = &mut config.data_source;
    ds.source.fqn_resource.clear();
    ds.validate.not_null = vec!["id".into()];
    ds.validate.unique = vec!["id".into(), "email".into()];
    ds.fields = vec![
        mdf_core::FieldConfig::new("id", "int"),
        mdf_core::FieldConfig::new("email", "string"),
    ];

    let registry = ConnectorRegistry::from_config(&config, &ConnectorFactory::with_defaults()).unwrap();
    let report = Executor::new(Arc::new(config), Arc::new(registry))
        .execute()
        .unwrap();
    assert_eq!(report.records, 3);

    let files = output_files(&out.join(Partition::Daily.current_key()));
    let rows = read_parquet(&files[0]).unwrap();
    assert_eq!(rows[0]["email"], Value::from("a@example.com"));
    assert_eq!(rows[1]["id"], Value::Int(2));
    assert_eq!(rows[2]["email"], Value::Null);
}
