use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::error::ConnectorError;

/// Time granularity of destination output directories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Partition {
    Hourly,
    Daily,
    Monthly,
}

impl Partition {
    /// Directory name for the partition containing `at`.
    pub fn key_for(&self, at: DateTime<Utc>) -> String {
        let pattern = match self {
            Partition::Hourly => "%Y-%m-%d-%H",
            Partition::Daily => "%Y-%m-%d",
            Partition::Monthly => "%Y-%m",
        };
        at.format(pattern).to_string()
    }

    pub fn current_key(&self) -> String {
        self.key_for(Utc::now())
    }
}

impl FromStr for Partition {
    type Err = ConnectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hourly" => Ok(Partition::Hourly),
            "daily" => Ok(Partition::Daily),
            "monthly" => Ok(Partition::Monthly),
            "" => Err(ConnectorError::Configuration(
                "partition must not be empty".into(),
            )),
            other => Err(ConnectorError::Configuration(format!(
                "invalid partition '{other}': expected hourly, daily or monthly"
            ))),
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Partition::Hourly => "hourly",
            Partition::Daily => "daily",
            Partition::Monthly => "monthly",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn keys_per_granularity() {
        let at = Utc.with_ymd_and_hms(2024, 3, 7, 9, 41, 0).unwrap();
        assert_eq!(Partition::Hourly.key_for(at), "2024-03-07-09");
        assert_eq!(Partition::Daily.key_for(at), "2024-03-07");
        assert_eq!(Partition::Monthly.key_for(at), "2024-03");
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Daily".parse::<Partition>().unwrap(), Partition::Daily);
        assert_eq!("HOURLY".parse::<Partition>().unwrap(), Partition::Hourly);
    }

    #[test]
    fn rejects_empty_and_unknown() {
        assert!("".parse::<Partition>().is_err());
        assert!("weekly".parse::<Partition>().is_err());
    }
}
