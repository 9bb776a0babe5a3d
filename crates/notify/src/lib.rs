//! Job outcome notifications.
//!
//! This crate provides:
//! - `Notifier` trait for pluggable notification channels
//! - `LogNotifier`, which writes each notification as a log line
//! - `Dispatcher`, which fans a notification out to several channels

pub mod dispatcher;
pub mod log;
pub mod traits;

pub use dispatcher::Dispatcher;
pub use log::LogNotifier;
pub use traits::{DispatchResult, JobNotification, Notifier, NotifyError};
