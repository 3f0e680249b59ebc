use crate::domain::news::{NewsItem, Sentiment};
use crate::error::MarketResult;
use chrono::{DateTime, Duration, Utc};

#[async_trait::async_trait]
pub trait NewsFeedProvider: Send + Sync {
    fn provider_name(&self) -> &'static str;

    /// Items about `commodity`, or every item when `None`.
    async fn commodity_news(&self, commodity: Option<&str>) -> MarketResult<Vec<NewsItem>>;
}

/// Fetches news, degrading to an empty list when the feed fails.
pub async fn news_or_empty(feed: &dyn NewsFeedProvider, commodity: Option<&str>) -> Vec<NewsItem> {
    match feed.commodity_news(commodity).await {
        Ok(items) => items,
        Err(err) => {
            tracing::warn!(
                provider = feed.provider_name(),
                commodity,
                error = %err,
                "news feed failed; returning no items"
            );
            Vec::new()
        }
    }
}

/// Built-in headlines, stamped relative to the time the feed was built.
#[derive(Debug, Clone)]
pub struct FixtureNewsFeed {
    items: Vec<NewsItem>,
}

impl FixtureNewsFeed {
    pub fn new(now: DateTime<Utc>) -> Self {
        let item = |id: &str,
                    hours_ago: i64,
                    title: &str,
                    summary: &str,
                    source: &str,
                    sentiment: Sentiment,
                    commodity: Option<&str>| NewsItem {
            id: id.to_string(),
            title: title.to_string(),
            summary: summary.to_string(),
            timestamp: now - Duration::hours(hours_ago),
            source: source.to_string(),
            sentiment,
            commodity: commodity.map(str::to_string),
        };

        let items = vec![
            item(
                "news-001",
                2,
                "Maize export demand firms ahead of harvest",
                "Regional buyers are securing white maize contracts early as stocks tighten.",
                "Grain Market Weekly",
                Sentiment::Positive,
                Some("White Maize"),
            ),
            item(
                "news-002",
                6,
                "Crop estimate lifts yellow maize production outlook",
                "The latest crop estimate revised yellow maize output upward by 4%.",
                "Crop Estimates Committee",
                Sentiment::Negative,
                Some("Yellow Maize"),
            ),
            item(
                "news-003",
                12,
                "Wheat imports slow as local millers draw on stock",
                "Import volumes fell for a third week while mill intake held steady.",
                "Milling Digest",
                Sentiment::Neutral,
                Some("Wheat"),
            ),
            item(
                "news-004",
                20,
                "Soybean crush margins narrow",
                "Lower oilcake prices have squeezed crush margins, weighing on soybean bids.",
                "Oilseeds Review",
                Sentiment::Negative,
                Some("Soybeans"),
            ),
            item(
                "news-005",
                30,
                "Diesel and fertiliser costs ease for the season",
                "Input costs declined month on month, improving planting economics.",
                "Farm Inputs Monitor",
                Sentiment::Positive,
                None,
            ),
            item(
                "news-006",
                40,
                "Dry spell forecast for western production areas",
                "Forecasters expect below-normal rainfall, a risk for late-planted white maize.",
                "Agri Weather Service",
                Sentiment::Positive,
                Some("White Maize"),
            ),
        ];
        Self { items }
    }
}

#[async_trait::async_trait]
impl NewsFeedProvider for FixtureNewsFeed {
    fn provider_name(&self) -> &'static str {
        "fixture"
    }

    async fn commodity_news(&self, commodity: Option<&str>) -> MarketResult<Vec<NewsItem>> {
        let items = match commodity {
            Some(c) => self.items.iter().filter(|n| n.is_about(c)).cloned().collect(),
            None => self.items.clone(),
        };
        Ok(items)
    }
}
