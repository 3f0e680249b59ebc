use crate::domain::market::PriceSnapshot;
use crate::ingest::types::{FeedPriceItem, FeedPricesResponse};
use anyhow::{ensure, Context};
use std::collections::BTreeSet;

impl FeedPricesResponse {
    /// Validates a feed payload and converts it into snapshots stamped with `as_of`.
    pub fn validate_and_into_snapshots(self) -> anyhow::Result<Vec<PriceSnapshot>> {
        ensure!(!self.items.is_empty(), "feed returned no price items");

        let mut seen = BTreeSet::<String>::new();
        let mut out = Vec::with_capacity(self.items.len());
        for item in self.items {
            let snapshot = item.validate_and_into_snapshot(self.as_of, &mut seen)?;
            out.push(snapshot);
        }
        Ok(out)
    }
}

impl FeedPriceItem {
    fn validate_and_into_snapshot(
        self,
        as_of: chrono::DateTime<chrono::Utc>,
        seen: &mut BTreeSet<String>,
    ) -> anyhow::Result<PriceSnapshot> {
        let commodity = self.commodity.trim().to_string();
        ensure!(!commodity.is_empty(), "commodity must be non-empty");
        ensure!(
            seen.insert(commodity.to_ascii_lowercase()),
            "duplicate commodity: {commodity}"
        );

        let grade = self.grade.trim().to_string();
        ensure!(!grade.is_empty(), "grade must be non-empty for {commodity}");

        let mut snapshot = PriceSnapshot::new(
            commodity,
            grade,
            self.current_price,
            self.price_change,
            as_of,
        );
        snapshot.volume = self.volume;
        snapshot.high = self.high;
        snapshot.low = self.low;

        snapshot
            .validate()
            .with_context(|| format!("invalid feed item {}", snapshot.commodity))?;
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn payload(items: serde_json::Value) -> FeedPricesResponse {
        let as_of = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
        serde_json::from_value(json!({ "as_of": as_of, "items": items })).unwrap()
    }

    #[test]
    fn converts_valid_payload() {
        let resp = payload(json!([
            {
                "commodity": "White Maize",
                "grade": "WMAZ",
                "current_price": 4250.0,
                "price_change": 50.0,
                "volume": 1200,
                "high": 4275.0,
                "low": 4190.0
            },
            {
                "commodity": "Wheat",
                "grade": "WEAT",
                "current_price": 5800.0,
                "price_change": -35.0
            }
        ]));

        let snaps = resp.validate_and_into_snapshots().unwrap();
        assert_eq!(snaps.len(), 2);
        assert_eq!(snaps[0].volume, Some(1200));
        assert!(snaps[1].percent_change < 0.0);
        assert_eq!(snaps[0].timestamp, snaps[1].timestamp);
    }

    #[test]
    fn rejects_empty_and_duplicate_items() {
        assert!(payload(json!([])).validate_and_into_snapshots().is_err());

        let dup = payload(json!([
            {"commodity": "Wheat", "grade": "WEAT", "current_price": 5800.0, "price_change": 0.0},
            {"commodity": "wheat", "grade": "WEAT", "current_price": 5810.0, "price_change": 0.0}
        ]));
        assert!(dup.validate_and_into_snapshots().is_err());
    }

    #[test]
    fn rejects_non_positive_price_and_inverted_range() {
        let bad_price = payload(json!([
            {"commodity": "Wheat", "grade": "WEAT", "current_price": -1.0, "price_change": 0.0}
        ]));
        assert!(bad_price.validate_and_into_snapshots().is_err());

        let inverted = payload(json!([
            {
                "commodity": "Wheat",
                "grade": "WEAT",
                "current_price": 5800.0,
                "price_change": 0.0,
                "volume": 10,
                "high": 5700.0,
                "low": 5900.0
            }
        ]));
        assert!(inverted.validate_and_into_snapshots().is_err());
    }
}
