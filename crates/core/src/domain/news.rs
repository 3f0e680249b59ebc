use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

/// Informational market headline. Carries no weight in the recommendation rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub timestamp: DateTime<Utc>,
    pub source: String,
    pub sentiment: Sentiment,
    /// Commodity the item is about; `None` for general market news.
    pub commodity: Option<String>,
}

impl NewsItem {
    pub fn is_about(&self, commodity: &str) -> bool {
        self.commodity
            .as_deref()
            .is_some_and(|c| c.eq_ignore_ascii_case(commodity.trim()))
    }
}
