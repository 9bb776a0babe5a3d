//! Random start offsets for jobs with `random_offset: true`.

use std::time::Duration;

use mdf_core::DataSource;
use rand::Rng;
use tracing::info;

/// Offsets are drawn uniformly from `0..MAX_OFFSET_SECS` whole seconds.
pub const MAX_OFFSET_SECS: u64 = 60;

pub fn random_offset() -> Duration {
    Duration::from_secs(rand::thread_rng().gen_range(0..MAX_OFFSET_SECS))
}

/// Sleep a random offset if the data source asks for one.
pub async fn apply(ds: &DataSource) {
    if !ds.trigger.random_offset {
        return;
    }
    let offset = random_offset();
    info!(
        domain = %ds.domain,
        name = %ds.name,
        offset_seconds = offset.as_secs(),
        "applying random offset"
    );
    tokio::time::sleep(offset).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_stay_below_a_minute() {
        for _ in 0..1000 {
            let offset = random_offset();
            assert!(offset < Duration::from_secs(60));
            assert_eq!(offset.subsec_nanos(), 0);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn apply_sleeps_only_when_enabled() {
        let mut ds = DataSource::default();
        let before = tokio::time::Instant::now();
        apply(&ds).await;
        assert_eq!(before.elapsed(), Duration::ZERO);

        ds.trigger.random_offset = true;
        apply(&ds).await;
        assert!(before.elapsed() < Duration::from_secs(MAX_OFFSET_SECS));
    }
}
