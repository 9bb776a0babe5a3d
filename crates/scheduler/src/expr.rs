//! Cron expression normalization.

use std::str::FromStr;

use cron::Schedule;

use crate::error::ScheduleError;

/// Normalize a 5-field cron expression to 6-field by prepending "0 " for seconds.
///
/// The `cron` crate requires `sec min hour day-of-month month day-of-week`
/// (plus an optional year). Config files use standard 5-field cron.
pub fn normalize_cron(expr: &str) -> String {
    let trimmed = expr.trim();
    if trimmed.split_whitespace().count() == 5 {
        format!("0 {trimmed}")
    } else {
        trimmed.to_string()
    }
}

/// Parse an expression after normalization.
pub fn parse_cron(expr: &str) -> Result<Schedule, ScheduleError> {
    Schedule::from_str(&normalize_cron(expr)).map_err(|e| ScheduleError::InvalidCron {
        expression: expr.to_string(),
        reason: e.to_string(),
    })
}
