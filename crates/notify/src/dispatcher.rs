//! Fans notifications out to every configured channel.
//!
//! Individual channel failures don't block other channels.

use std::sync::Arc;

use crate::traits::{DispatchResult, JobNotification, Notifier, NotifyError};

/// Dispatches notifications to multiple channels.
#[derive(Default)]
pub struct Dispatcher {
    channels: Vec<Arc<dyn Notifier>>,
}

impl Dispatcher {
    pub fn new(channels: Vec<Arc<dyn Notifier>>) -> Self {
        Self { channels }
    }

    /// Deliver to every channel in order.
    pub async fn dispatch(&self, notification: &JobNotification) -> Vec<DispatchResult> {
        let data_source = notification.data_source();
        let channels = &self.channels;

        if channels.is_empty() {
            tracing::debug!(data_source = %data_source, "no notification channels configured");
            return Vec::new();
        }

        let mut results = Vec::with_capacity(channels.len());

        for channel in channels {
            let start = std::time::Instant::now();
            let result = channel.send(notification).await;
            let duration_ms = start.elapsed().as_millis() as u64;

            let (success, error) = match result {
                Ok(()) => {
                    tracing::debug!(
                        data_source = %data_source,
                        channel = channel.channel_name(),
                        duration_ms,
                        "notification delivered"
                    );
                    (true, None)
                }
                Err(e) => {
                    tracing::warn!(
                        data_source = %data_source,
                        channel = channel.channel_name(),
                        error = %e,
                        duration_ms,
                        "notification delivery failed"
                    );
                    (false, Some(e.to_string()))
                }
            };

            results.push(DispatchResult {
                channel: channel.channel_name().to_string(),
                data_source: data_source.clone(),
                success,
                error,
                duration_ms,
            });
        }

        results
    }
}

#[async_trait::async_trait]
impl Notifier for Dispatcher {
    /// Fan out; per-channel failures are logged, never returned.
    async fn send(&self, notification: &JobNotification) -> Result<(), NotifyError> {
        self.dispatch(notification).await;
        Ok(())
    }

    fn channel_name(&self) -> &str {
        "dispatcher"
    }
}
