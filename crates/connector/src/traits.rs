use mdf_core::Batch;

use crate::error::ConnectorError;

/// A read/write backend bound to one storage location.
///
/// Methods are synchronous; the executor drives them from the blocking
/// pool. Callers only ever see `dyn Connector`.
pub trait Connector: Send {
    /// Read the records currently available at the location.
    fn read(&mut self) -> Result<Batch, ConnectorError>;

    /// Persist a batch. An empty batch is accepted and writes nothing.
    fn write(&mut self, batch: &Batch) -> Result<(), ConnectorError>;

    /// Release underlying resources. Calling it twice is a no-op; any
    /// `read`/`write` afterwards fails with [`ConnectorError::Closed`].
    fn close(&mut self) -> Result<(), ConnectorError>;

    /// Backend type name as written in config (`filesystem`, ...).
    fn kind(&self) -> &'static str;
}
