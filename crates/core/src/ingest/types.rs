use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Payload of `GET {base}/v1/prices` on an HTTP JSON price feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedPricesResponse {
    pub as_of: DateTime<Utc>,
    pub items: Vec<FeedPriceItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedPriceItem {
    pub commodity: String,
    pub grade: String,
    pub current_price: f64,
    pub price_change: f64,
    pub volume: Option<u64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
}
