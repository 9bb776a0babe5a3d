//! Local filesystem backend.
//!
//! Reads either a single file (decoded by its [`FormatCodec`]) or a whole
//! directory tree (scanned by a [`TabularSource`], never re-reading a file
//! this instance already returned). Writes land as one Parquet file per
//! batch under a time-partitioned subdirectory.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use mdf_core::{Batch, ConnectorSettings, FieldConfig};
use tracing::{debug, info};
use uuid::Uuid;
use walkdir::WalkDir;

use crate::codec::codec_for;
use crate::columnar::write_parquet;
use crate::engine::{ArrowEngine, TabularSource};
use crate::error::ConnectorError;
use crate::factory::ConnectorContext;
use crate::format::FileFormat;
use crate::partition::Partition;
use crate::traits::Connector;

pub struct FilesystemConnector {
    base_path: PathBuf,
    partition: Partition,
    fields: Vec<FieldConfig>,
    engine: Box<dyn TabularSource>,
    /// Canonical paths already returned by a directory read.
    processed: HashSet<PathBuf>,
    closed: bool,
}

impl fmt::Debug for FilesystemConnector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilesystemConnector")
            .field("base_path", &self.base_path)
            .field("partition", &self.partition)
            .field("fields", &self.fields.len())
            .field("processed", &self.processed.len())
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}

impl FilesystemConnector {
    pub const KIND: &'static str = "filesystem";

    /// Bind to an existing file or directory.
    pub fn new(
        base_path: impl Into<PathBuf>,
        partition: &str,
        fields: Vec<FieldConfig>,
    ) -> Result<Self, ConnectorError> {
        let base_path = base_path.into();
        if !base_path.exists() {
            return Err(ConnectorError::Configuration(format!(
                "base path does not exist: {}",
                base_path.display()
            )));
        }
        let partition: Partition = partition.parse()?;

        info!(base_path = %base_path.display(), %partition, "initialized filesystem connector");
        Ok(Self {
            base_path,
            partition,
            fields,
            engine: Box::new(ArrowEngine::new()),
            processed: HashSet::new(),
            closed: false,
        })
    }

    /// Build from YAML settings. `base_path` and `partition` are required;
    /// a resource locator in `ctx` is joined onto the base path.
    pub fn from_settings(
        settings: &ConnectorSettings,
        ctx: &ConnectorContext,
    ) -> Result<Self, ConnectorError> {
        let base_path = settings.get_str("base_path").ok_or_else(|| {
            ConnectorError::Configuration(
                "filesystem connector is missing 'base_path' configuration".into(),
            )
        })?;
        let partition = settings.get_str("partition").ok_or_else(|| {
            ConnectorError::Configuration(
                "filesystem connector is missing 'partition' configuration".into(),
            )
        })?;

        let mut path = PathBuf::from(base_path);
        if let Some(resource) = ctx.resource.as_deref().filter(|r| !r.is_empty()) {
            path.push(resource);
        }
        Self::new(path, partition, ctx.fields.clone())
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn partition(&self) -> Partition {
        self.partition
    }

    fn ensure_open(&self) -> Result<(), ConnectorError> {
        if self.closed {
            Err(ConnectorError::Closed)
        } else {
            Ok(())
        }
    }

    fn read_file(&self) -> Result<Batch, ConnectorError> {
        let format = FileFormat::from_path(&self.base_path)?;
        info!(path = %self.base_path.display(), %format, "reading from file");
        codec_for(format, &self.fields).decode(&self.base_path)
    }

    fn read_directory(&mut self) -> Result<Batch, ConnectorError> {
        let mut groups: BTreeMap<FileFormat, Vec<PathBuf>> = BTreeMap::new();
        let mut pending = Vec::new();

        for entry in WalkDir::new(&self.base_path).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(format) = FileFormat::from_path(entry.path()) else {
                continue;
            };
            let canonical = fs::canonicalize(entry.path())?;
            if self.processed.contains(&canonical) {
                continue;
            }
            groups.entry(format).or_default().push(entry.into_path());
            pending.push(canonical);
        }

        if pending.is_empty() {
            debug!(dir = %self.base_path.display(), "no new files");
            return Ok(Batch::new());
        }

        let mut records = Batch::new();
        for (format, files) in &groups {
            records.extend(self.engine.scan(*format, files)?);
        }

        info!(
            dir = %self.base_path.display(),
            files = pending.len(),
            records = records.len(),
            "read directory"
        );
        self.processed.extend(pending);
        Ok(records)
    }
}

impl Connector for FilesystemConnector {
    fn read(&mut self) -> Result<Batch, ConnectorError> {
        self.ensure_open()?;
        if self.base_path.is_dir() {
            self.read_directory()
        } else {
            self.read_file()
        }
    }

    fn write(&mut self, batch: &Batch) -> Result<(), ConnectorError> {
        self.ensure_open()?;
        if batch.is_empty() {
            debug!(base_path = %self.base_path.display(), "empty batch, nothing to write");
            return Ok(());
        }

        let dir = self.base_path.join(self.partition.current_key());
        fs::create_dir_all(&dir)?;
        let path = dir.join(format!("{}.{}", Uuid::new_v4(), FileFormat::Parquet.extension()));

        let rows = write_parquet(batch, &self.fields, &path)?;
        info!(path = %path.display(), records = rows, "wrote partition file");
        Ok(())
    }

    fn close(&mut self) -> Result<(), ConnectorError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.engine.close()
    }

    fn kind(&self) -> &'static str {
        Self::KIND
    }
}
