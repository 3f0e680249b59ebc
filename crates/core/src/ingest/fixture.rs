use crate::domain::market::PriceSnapshot;
use crate::error::{MarketError, MarketResult};
use crate::ingest::catalogue::TRACKED_COMMODITIES;
use crate::ingest::provider::PriceSnapshotProvider;
use chrono::{DateTime, Utc};

/// Snapshot feed serving a fixed set of snapshots. Every call returns the same set.
#[derive(Debug, Clone)]
pub struct FixturePriceFeed {
    snapshots: Vec<PriceSnapshot>,
}

impl FixturePriceFeed {
    /// The tracked catalogue, stamped once with `as_of`.
    pub fn catalogue(as_of: DateTime<Utc>) -> Self {
        let snapshots = TRACKED_COMMODITIES
            .iter()
            .map(|c| {
                PriceSnapshot::new(c.name, c.grade, c.current_price, c.price_change, as_of)
                    .with_range(c.volume, c.high, c.low)
            })
            .collect();
        Self { snapshots }
    }

    pub fn from_snapshots(snapshots: Vec<PriceSnapshot>) -> Self {
        Self { snapshots }
    }
}

#[async_trait::async_trait]
impl PriceSnapshotProvider for FixturePriceFeed {
    fn provider_name(&self) -> &'static str {
        "fixture"
    }

    async fn current_prices(&self) -> MarketResult<Vec<PriceSnapshot>> {
        if self.snapshots.is_empty() {
            return Err(MarketError::unavailable(
                self.provider_name(),
                "fixture holds no snapshots",
            ));
        }
        Ok(self.snapshots.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[tokio::test]
    async fn repeated_calls_return_identical_snapshots() {
        let as_of = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
        let feed = FixturePriceFeed::catalogue(as_of);

        let first = feed.current_prices().await.unwrap();
        let second = feed.current_prices().await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), TRACKED_COMMODITIES.len());
    }

    #[tokio::test]
    async fn catalogue_snapshots_are_valid() {
        let feed = FixturePriceFeed::catalogue(Utc::now());
        for snap in feed.current_prices().await.unwrap() {
            snap.validate().unwrap();
        }
    }

    #[tokio::test]
    async fn empty_fixture_is_unavailable() {
        let feed = FixturePriceFeed::from_snapshots(Vec::new());
        let err = feed.current_prices().await.unwrap_err();
        assert!(matches!(err, MarketError::DataUnavailable { .. }));
    }
}
