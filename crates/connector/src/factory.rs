//! Connector construction by declared `type` and per-config ownership.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use indexmap::IndexMap;
use mdf_core::{Config, ConnectorSettings, DataSource, FieldConfig};
use tracing::{info, warn};

use crate::error::ConnectorError;
use crate::filesystem::FilesystemConnector;
use crate::traits::Connector;

/// Per-data-source parameters handed to connector constructors.
#[derive(Debug, Clone, Default)]
pub struct ConnectorContext {
    pub fields: Vec<FieldConfig>,
    /// Resource locator relative to the connector's location, if any.
    pub resource: Option<String>,
}

impl ConnectorContext {
    pub fn for_source(ds: &DataSource) -> Self {
        Self {
            fields: ds.fields.clone(),
            resource: Some(ds.source.fqn_resource.clone()).filter(|r| !r.is_empty()),
        }
    }

    pub fn for_destination(ds: &DataSource) -> Self {
        Self {
            fields: ds.fields.clone(),
            resource: None,
        }
    }
}

type Constructor = Box<
    dyn Fn(&ConnectorSettings, &ConnectorContext) -> Result<Box<dyn Connector>, ConnectorError>
        + Send
        + Sync,
>;

/// Maps connector `type` names to constructors.
pub struct ConnectorFactory {
    constructors: HashMap<String, Constructor>,
}

impl ConnectorFactory {
    /// An empty factory. Most callers want [`ConnectorFactory::with_defaults`].
    pub fn new() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// A factory with every built-in backend registered.
    pub fn with_defaults() -> Self {
        let mut factory = Self::new();
        factory.register(FilesystemConnector::KIND, |settings, ctx| {
            Ok(Box::new(FilesystemConnector::from_settings(settings, ctx)?))
        });
        factory
    }

    /// Register (or replace) the constructor for `kind`.
    pub fn register<F>(&mut self, kind: impl Into<String>, constructor: F)
    where
        F: Fn(&ConnectorSettings, &ConnectorContext) -> Result<Box<dyn Connector>, ConnectorError>
            + Send
            + Sync
            + 'static,
    {
        self.constructors.insert(kind.into(), Box::new(constructor));
    }

    pub fn create(
        &self,
        name: &str,
        settings: &ConnectorSettings,
        ctx: &ConnectorContext,
    ) -> Result<Box<dyn Connector>, ConnectorError> {
        let kind = settings.kind().ok_or_else(|| {
            ConnectorError::Configuration(format!("connector {name} is missing 'type' configuration"))
        })?;
        let constructor = self.constructors.get(kind).ok_or_else(|| {
            ConnectorError::Configuration(format!("unsupported connector type: {kind}"))
        })?;

        info!(name, kind, "creating connector");
        constructor(settings, ctx).map_err(|e| match e {
            ConnectorError::Configuration(msg) => ConnectorError::Configuration(format!(
                "failed to initialize connector {name}: {msg}"
            )),
            other => other,
        })
    }
}

impl Default for ConnectorFactory {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// A connector shared between runs of the same job.
pub type SharedConnector = Arc<Mutex<Box<dyn Connector>>>;

/// The live connector instances of one config, keyed by connector name.
pub struct ConnectorRegistry {
    connectors: IndexMap<String, SharedConnector>,
}

impl ConnectorRegistry {
    /// Instantiate every connector declared in `config`.
    ///
    /// The connector named as the data source's source receives the
    /// resource locator; all others are built with the destination context.
    pub fn from_config(
        config: &Config,
        factory: &ConnectorFactory,
    ) -> Result<Self, ConnectorError> {
        let ds = &config.data_source;
        let mut connectors = IndexMap::with_capacity(config.connectors.len());

        for (name, settings) in &config.connectors {
            let ctx = if *name == ds.source.connector {
                ConnectorContext::for_source(ds)
            } else {
                ConnectorContext::for_destination(ds)
            };
            let connector = factory.create(name, settings, &ctx)?;
            connectors.insert(name.clone(), Arc::new(Mutex::new(connector)));
        }

        info!(config_id = %config.id, connectors = connectors.len(), "connectors initialized");
        Ok(Self { connectors })
    }

    /// Wrap already-built connectors.
    pub fn from_connectors(
        connectors: impl IntoIterator<Item = (String, Box<dyn Connector>)>,
    ) -> Self {
        Self {
            connectors: connectors
                .into_iter()
                .map(|(name, c)| (name, Arc::new(Mutex::new(c))))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Result<SharedConnector, ConnectorError> {
        self.connectors
            .get(name)
            .cloned()
            .ok_or_else(|| ConnectorError::UnknownConnector(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.connectors.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.connectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connectors.is_empty()
    }

    /// Close every connector, returning the first error after trying all.
    pub fn close_all(&self) -> Result<(), ConnectorError> {
        let mut first_err = None;
        for (name, connector) in &self.connectors {
            let result = match connector.lock() {
                Ok(mut guard) => guard.close(),
                Err(_) => Err(ConnectorError::LockPoisoned(name.clone())),
            };
            if let Err(e) = result {
                warn!(connector = %name, error = %e, "failed to close connector");
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
