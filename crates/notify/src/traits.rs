//! Notifier trait definition and shared error types.

use std::collections::BTreeMap;

use chrono::Utc;

/// Errors that can occur during notification delivery.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("delivery failed: {0}")]
    Delivery(String),

    #[error("configuration error: {0}")]
    Config(String),
}

/// The outcome of one job run, addressed by data source.
#[derive(Debug, Clone, serde::Serialize)]
pub struct JobNotification {
    pub domain: String,
    pub name: String,
    pub message: String,
    pub success: bool,
    /// RFC 3339 creation time.
    pub timestamp: String,
    /// Extra context such as `job_id` or `records`.
    pub metadata: BTreeMap<String, String>,
}

impl JobNotification {
    pub fn success(domain: impl Into<String>, name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(domain, name, message, true)
    }

    pub fn failure(domain: impl Into<String>, name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(domain, name, message, false)
    }

    fn new(
        domain: impl Into<String>,
        name: impl Into<String>,
        message: impl Into<String>,
        success: bool,
    ) -> Self {
        Self {
            domain: domain.into(),
            name: name.into(),
            message: message.into(),
            success,
            timestamp: Utc::now().to_rfc3339(),
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.metadata.insert(key.into(), value.to_string());
        self
    }

    /// `domain.name`.
    pub fn data_source(&self) -> String {
        format!("{}.{}", self.domain, self.name)
    }
}

/// Trait for notification channel implementations.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a notification through this channel.
    async fn send(&self, notification: &JobNotification) -> Result<(), NotifyError>;

    /// Test connectivity with a sample notification.
    async fn test(&self) -> Result<(), NotifyError> {
        let sample = JobNotification::success("mdf", "test", "This is a test notification from mdf.")
            .with_metadata("job_id", "mdf-test-0");
        self.send(&sample).await
    }

    /// Human-readable name for this channel (e.g., "log").
    fn channel_name(&self) -> &str;
}

/// Result of dispatching a notification to a single channel.
#[derive(Debug)]
pub struct DispatchResult {
    pub channel: String,
    pub data_source: String,
    pub success: bool,
    pub error: Option<String>,
    pub duration_ms: u64,
}
