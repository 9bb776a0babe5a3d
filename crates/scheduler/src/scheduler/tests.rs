use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use mdf_connector::{Connector, ConnectorError};
use mdf_core::{
    record_of, Batch, ConnectorSettings, DataSource, DestinationConfig, SourceConfig,
    TriggerConfig, Value,
};
use mdf_notify::NotifyError;

use super::*;

struct MemoryConnector {
    rows: Batch,
    writes: Arc<AtomicUsize>,
}

impl Connector for MemoryConnector {
    fn read(&mut self) -> Result<Batch, ConnectorError> {
        Ok(self.rows.clone())
    }

    fn write(&mut self, _batch: &Batch) -> Result<(), ConnectorError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn close(&mut self) -> Result<(), ConnectorError> {
        Ok(())
    }

    fn kind(&self) -> &'static str {
        "memory"
    }
}

#[derive(Default)]
struct CountingNotifier {
    sent: Mutex<Vec<JobNotification>>,
}

#[async_trait::async_trait]
impl Notifier for CountingNotifier {
    async fn send(&self, n: &JobNotification) -> Result<(), NotifyError> {
        self.sent.lock().unwrap().push(n.clone());
        Ok(())
    }

    fn channel_name(&self) -> &str {
        "counting"
    }
}

struct FailingNotifier;

#[async_trait::async_trait]
impl Notifier for FailingNotifier {
    async fn send(&self, _n: &JobNotification) -> Result<(), NotifyError> {
        Err(NotifyError::Delivery("unreachable".into()))
    }

    fn channel_name(&self) -> &str {
        "failing"
    }
}

fn config(name: &str, cron: &str) -> Arc<Config> {
    Arc::new(Config {
        id: format!("config-{name}"),
        connectors: Default::default(),
        data_source: DataSource {
            domain: "test".into(),
            name: name.into(),
            source: SourceConfig {
                connector: "source".into(),
                ..Default::default()
            },
            destination: DestinationConfig {
                connector: "destination".into(),
                ..Default::default()
            },
            trigger: TriggerConfig {
                cron: cron.into(),
                ..Default::default()
            },
            ..Default::default()
        },
    })
}

fn job(name: &str, cron: &str, writes: Arc<AtomicUsize>) -> ScheduledJob {
    let source = MemoryConnector {
        rows: vec![record_of([("id", Value::from("1"))])],
        writes: Arc::new(AtomicUsize::new(0)),
    };
    let destination = MemoryConnector {
        rows: Batch::new(),
        writes,
    };
    let registry = ConnectorRegistry::from_connectors(vec![
        ("source".to_string(), Box::new(source) as Box<dyn Connector>),
        ("destination".to_string(), Box::new(destination) as Box<dyn Connector>),
    ]);
    ScheduledJob::new(config(name, cron), Arc::new(registry))
}

async fn wait_for(mut done: impl FnMut() -> bool, limit: Duration) -> bool {
    let deadline = tokio::time::Instant::now() + limit;
    while tokio::time::Instant::now() < deadline {
        if done() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    done()
}

#[tokio::test]
async fn invalid_cron_fails_start_and_schedules_nothing() {
    let writes = Arc::new(AtomicUsize::new(0));
    let mut scheduler = Scheduler::new(
        vec![
            job("users", "0 0 * * *", writes.clone()),
            job("orders", "not a cron", writes),
        ],
        Arc::new(CountingNotifier::default()),
    );

    let err = scheduler.start().unwrap_err();
    let text = err.to_string();
    assert!(text.contains("not a cron"), "{text}");
    assert!(text.contains("test.orders"), "{text}");
    assert!(!scheduler.is_running());
    assert!(scheduler.engine.is_empty());
}

#[tokio::test]
async fn empty_cron_is_not_scheduled() {
    let writes = Arc::new(AtomicUsize::new(0));
    let mut scheduler = Scheduler::new(
        vec![job("users", "", writes.clone()), job("orders", "0 0 * * *", writes)],
        Arc::new(CountingNotifier::default()),
    );

    scheduler.start().unwrap();
    assert!(scheduler.is_running());
    assert_eq!(scheduler.engine.len(), 1);
    scheduler.stop();
    assert!(!scheduler.is_running());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn firing_runs_the_job_and_notifies() {
    let writes = Arc::new(AtomicUsize::new(0));
    let notifier = Arc::new(CountingNotifier::default());
    let mut scheduler = Scheduler::new(
        vec![job("users", "* * * * * *", writes.clone())],
        notifier.clone(),
    );

    scheduler.start().unwrap();
    let fired = wait_for(|| !notifier.sent.lock().unwrap().is_empty(), Duration::from_secs(5)).await;
    scheduler.stop();
    assert!(fired, "no notification within 5s");

    assert!(writes.load(Ordering::SeqCst) >= 1);
    let sent = notifier.sent.lock().unwrap();
    let first = &sent[0];
    assert!(first.success);
    assert_eq!(first.data_source(), "test.users");
    assert_eq!(first.message, "ingested 1 records");
    assert_eq!(first.metadata["records"], "1");
    assert!(first.metadata["job_id"].starts_with("test-users-"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn stop_halts_further_firings() {
    let writes = Arc::new(AtomicUsize::new(0));
    let mut scheduler = Scheduler::new(
        vec![job("users", "* * * * * *", writes.clone())],
        Arc::new(FailingNotifier),
    );

    scheduler.start().unwrap();
    assert!(wait_for(|| writes.load(Ordering::SeqCst) > 0, Duration::from_secs(5)).await);
    scheduler.stop();

    // Let any run spawned just before stop finish.
    tokio::time::sleep(Duration::from_millis(300)).await;
    let after_stop = writes.load(Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(2200)).await;
    assert_eq!(writes.load(Ordering::SeqCst), after_stop);
}

#[test]
fn from_configs_reports_connector_errors() {
    let mut config = (*config("users", "0 0 * * *")).clone();
    config.connectors.insert(
        "source".into(),
        ConnectorSettings::from_iter([("base_path", "/tmp")]),
    );

    let result = Scheduler::from_configs(
        vec![Arc::new(config)],
        &ConnectorFactory::with_defaults(),
        Arc::new(CountingNotifier::default()),
    );
    match result {
        Err(ScheduleError::Registry { config_id, source }) => {
            assert_eq!(config_id, "config-users");
            assert!(source.to_string().contains("missing 'type'"));
        }
        Err(other) => panic!("expected Registry error, got {other}"),
        Ok(_) => panic!("expected Registry error"),
    }
}

#[test]
fn run_gate_bounds_pending_runs() {
    let gate = RunGate::new(2);
    let first = gate.try_enter().unwrap();
    let second = gate.try_enter().unwrap();
    assert!(gate.try_enter().is_none());

    drop(first);
    let third = gate.try_enter();
    assert!(third.is_some());
    assert!(gate.try_enter().is_none());

    drop(second);
    drop(third);
    assert!(gate.try_enter().is_some());
}

#[tokio::test]
async fn firing_is_skipped_while_runs_are_backed_up() {
    let writes = Arc::new(AtomicUsize::new(0));
    let notifier = Arc::new(CountingNotifier::default());
    let job = job("users", "* * * * * *", writes.clone());

    let held: Vec<_> = (0..MAX_PENDING_RUNS)
        .map(|_| job.gate.try_enter().unwrap())
        .collect();
    run_job(job.clone(), notifier.clone(), EventLog::new()).await;
    assert_eq!(writes.load(Ordering::SeqCst), 0);
    assert!(notifier.sent.lock().unwrap().is_empty());

    drop(held);
    run_job(job, notifier.clone(), EventLog::new()).await;
    assert_eq!(writes.load(Ordering::SeqCst), 1);
    assert_eq!(notifier.sent.lock().unwrap().len(), 1);
}
