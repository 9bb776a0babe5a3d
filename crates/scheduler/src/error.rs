use mdf_connector::ConnectorError;

#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    #[error("invalid cron expression '{expression}': {reason}")]
    InvalidCron { expression: String, reason: String },

    #[error("failed to schedule data source {data_source}: {source}")]
    Registration {
        data_source: String,
        #[source]
        source: Box<ScheduleError>,
    },

    #[error("failed to initialize connectors for config {config_id}: {source}")]
    Registry {
        config_id: String,
        #[source]
        source: ConnectorError,
    },
}
