//! Structured job lifecycle events.
//!
//! Every event is emitted as a `tracing` event under the `mdf::events`
//! target. An [`EventLog`] can additionally keep a bounded in-memory
//! history, which the binary uses for shutdown summaries and tests use
//! for assertions. Events never influence job control flow.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use mdf_core::DataSource;
use serde::Serialize;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    JobStart,
    JobEnd,
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventType::JobStart => f.write_str("job_start"),
            EventType::JobEnd => f.write_str("job_end"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct JobEvent {
    pub event_type: EventType,
    pub domain: String,
    pub name: String,
    pub job_id: String,
    /// Only set on `job_end`.
    pub success: Option<bool>,
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct EventLog {
    history: Option<Arc<Mutex<History>>>,
}

#[derive(Debug)]
struct History {
    capacity: usize,
    events: VecDeque<JobEvent>,
}

impl EventLog {
    /// Log-only event sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Also retain the most recent `capacity` events in memory.
    pub fn with_history(capacity: usize) -> Self {
        Self {
            history: Some(Arc::new(Mutex::new(History {
                capacity,
                events: VecDeque::with_capacity(capacity),
            }))),
        }
    }

    pub fn job_start(&self, ds: &DataSource, job_id: &str) {
        self.record(JobEvent {
            event_type: EventType::JobStart,
            domain: ds.domain.clone(),
            name: ds.name.clone(),
            job_id: job_id.to_string(),
            success: None,
            error: None,
            timestamp: Utc::now(),
        });
    }

    pub fn job_end(&self, ds: &DataSource, job_id: &str, error: Option<&dyn fmt::Display>) {
        self.record(JobEvent {
            event_type: EventType::JobEnd,
            domain: ds.domain.clone(),
            name: ds.name.clone(),
            job_id: job_id.to_string(),
            success: Some(error.is_none()),
            error: error.map(|e| e.to_string()),
            timestamp: Utc::now(),
        });
    }

    /// Snapshot of retained events, oldest first. Empty without history.
    pub fn recent(&self) -> Vec<JobEvent> {
        match &self.history {
            Some(history) => history
                .lock()
                .map(|h| h.events.iter().cloned().collect())
                .unwrap_or_default(),
            None => Vec::new(),
        }
    }

    fn record(&self, event: JobEvent) {
        emit(&event);

        let Some(history) = &self.history else {
            return;
        };
        if let Ok(mut h) = history.lock() {
            if h.capacity == 0 {
                return;
            }
            if h.events.len() == h.capacity {
                h.events.pop_front();
            }
            h.events.push_back(event);
        }
    }
}

fn emit(event: &JobEvent) {
    let timestamp = event.timestamp.to_rfc3339();
    match (event.event_type, &event.error) {
        (EventType::JobStart, _) => info!(
            target: "mdf::events",
            event_type = %event.event_type,
            domain = %event.domain,
            name = %event.name,
            job_id = %event.job_id,
            timestamp = %timestamp,
            "job started"
        ),
        (EventType::JobEnd, None) => info!(
            target: "mdf::events",
            event_type = %event.event_type,
            domain = %event.domain,
            name = %event.name,
            job_id = %event.job_id,
            success = true,
            timestamp = %timestamp,
            "job completed"
        ),
        (EventType::JobEnd, Some(err)) => error!(
            target: "mdf::events",
            event_type = %event.event_type,
            domain = %event.domain,
            name = %event.name,
            job_id = %event.job_id,
            success = false,
            error = %err,
            timestamp = %timestamp,
            "job failed"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ds() -> DataSource {
        DataSource {
            domain: "test".into(),
            name: "users".into(),
            ..Default::default()
        }
    }

    #[test]
    fn log_only_keeps_nothing() {
        let log = EventLog::new();
        log.job_start(&ds(), "test-users-1");
        assert!(log.recent().is_empty());
    }

    #[test]
    fn history_records_start_and_end() {
        let log = EventLog::with_history(8);
        log.job_start(&ds(), "test-users-1");
        log.job_end(&ds(), "test-users-1", Some(&"boom"));

        let events = log.recent();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event_type, EventType::JobStart);
        assert_eq!(events[0].success, None);
        assert_eq!(events[1].event_type, EventType::JobEnd);
        assert_eq!(events[1].success, Some(false));
        assert_eq!(events[1].error.as_deref(), Some("boom"));
    }

    #[test]
    fn history_is_bounded() {
        let log = EventLog::with_history(2);
        for i in 0..5 {
            log.job_end(&ds(), &format!("test-users-{i}"), None);
        }
        let ids: Vec<String> = log.recent().into_iter().map(|e| e.job_id).collect();
        assert_eq!(ids, vec!["test-users-3", "test-users-4"]);
    }

    #[test]
    fn clones_share_history() {
        let log = EventLog::with_history(4);
        log.clone().job_start(&ds(), "x");
        assert_eq!(log.recent().len(), 1);
    }

    #[test]
    fn event_type_serializes_snake_case() {
        let json = serde_json::to_string(&EventType::JobEnd).unwrap();
        assert_eq!(json, "\"job_end\"");
    }
}
