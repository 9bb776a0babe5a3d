//! Declarative data source configuration.
//!
//! One YAML document describes one ingestion job: the named connectors it
//! uses and the [`DataSource`] that wires them together.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub id: String,
    /// Connector name to backend settings (`type` plus backend-specific keys).
    #[serde(default)]
    pub connectors: IndexMap<String, ConnectorSettings>,
    pub data_source: DataSource,
}

impl Config {
    /// `domain.name`, used in log lines and error messages.
    pub fn label(&self) -> String {
        format!("{}.{}", self.data_source.domain, self.data_source.name)
    }

    /// Print a one-line summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!(
            id = %self.id,
            data_source = %self.label(),
            connectors = self.connectors.len(),
            cron = %self.data_source.trigger.cron,
            "config loaded"
        );
    }
}

/// Untyped connector settings as written in YAML.
///
/// Interpretation is left to the connector factory, which knows which keys
/// each backend requires.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct ConnectorSettings(pub IndexMap<String, serde_json::Value>);

impl ConnectorSettings {
    /// The declared connector `type`, if present and a string.
    pub fn kind(&self) -> Option<&str> {
        self.get_str("type")
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.as_str())
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) {
        self.0.insert(key.into(), value.into());
    }
}

impl<K: Into<String>, V: Into<serde_json::Value>> FromIterator<(K, V)> for ConnectorSettings {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

// ── Data source ───────────────────────────────────────────────

/// One ingestion job: where to read, where to write, when, and what to check.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataSource {
    pub domain: String,
    pub name: String,
    pub source: SourceConfig,
    pub destination: DestinationConfig,
    #[serde(default, alias = "schedule")]
    pub trigger: TriggerConfig,
    #[serde(default)]
    pub validate: ValidationConfig,
    #[serde(default)]
    pub fields: Vec<FieldConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Name of an entry in [`Config::connectors`].
    pub connector: String,
    /// Resource locator relative to the connector's base path.
    #[serde(default)]
    pub fqn_resource: String,
    #[serde(default)]
    pub is_cdc: bool,
    #[serde(default)]
    pub primary_key: Vec<String>,
    #[serde(default)]
    pub timestamp_field: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DestinationConfig {
    pub connector: String,
    /// Output ordering hint, e.g. `["id asc"]`.
    #[serde(default)]
    pub ordering: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TriggerConfig {
    /// Cron expression; empty means the job is not scheduled.
    #[serde(default)]
    pub cron: String,
    #[serde(default, rename = "event", skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    /// Sleep a random 0-59s before each run.
    #[serde(default)]
    pub random_offset: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ValidationConfig {
    #[serde(default)]
    pub not_null: Vec<String>,
    #[serde(default)]
    pub unique: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldConfig {
    pub label: String,
    pub data_type: String,
}

impl FieldConfig {
    pub fn new(label: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            data_type: data_type.into(),
        }
    }
}
