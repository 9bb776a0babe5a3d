use tracing::{error, info};

use crate::traits::{JobNotification, Notifier, NotifyError};

/// Writes each notification as a structured log line: info on success,
/// error on failure.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

impl LogNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, n: &JobNotification) -> Result<(), NotifyError> {
        let job_id = n.metadata.get("job_id").map(String::as_str).unwrap_or("");
        if n.success {
            info!(
                domain = %n.domain,
                name = %n.name,
                message = %n.message,
                job_id,
                success = true,
                timestamp = %n.timestamp,
                "job notification"
            );
        } else {
            error!(
                domain = %n.domain,
                name = %n.name,
                message = %n.message,
                job_id,
                success = false,
                timestamp = %n.timestamp,
                "job notification"
            );
        }
        Ok(())
    }

    fn channel_name(&self) -> &str {
        "log"
    }
}
