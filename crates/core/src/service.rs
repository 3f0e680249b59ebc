use crate::config::Settings;
use crate::domain::market::{check_history_days, PriceSeries, PriceSnapshot};
use crate::domain::news::NewsItem;
use crate::domain::recommendation::RecommendationResult;
use crate::engine::{evaluate, validate_position, MarketInputs, HISTORY_DAYS};
use crate::error::{MarketError, MarketResult};
use crate::ingest::fixture::FixturePriceFeed;
use crate::ingest::synthetic::SyntheticSeriesProvider;
use crate::ingest::{HistoricalSeriesProvider, HttpJsonPriceFeed, PriceSnapshotProvider};
use crate::news::{news_or_empty, FixtureNewsFeed, NewsFeedProvider};
use crate::time::SeasonCalendar;
use chrono::{NaiveDate, Utc};
use std::sync::Arc;

/// The four market operations exposed to the dashboard and the assistant.
///
/// Holds only read-only provider handles; concurrent calls are independent.
#[derive(Clone)]
pub struct MarketService {
    prices: Arc<dyn PriceSnapshotProvider>,
    history: Arc<dyn HistoricalSeriesProvider>,
    news: Arc<dyn NewsFeedProvider>,
    calendar: SeasonCalendar,
}

impl MarketService {
    pub fn new(
        prices: Arc<dyn PriceSnapshotProvider>,
        history: Arc<dyn HistoricalSeriesProvider>,
        news: Arc<dyn NewsFeedProvider>,
        calendar: SeasonCalendar,
    ) -> Self {
        Self {
            prices,
            history,
            news,
            calendar,
        }
    }

    /// HTTP feed when `PRICE_FEED_BASE_URL` is set, otherwise the built-in fixture.
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let now = Utc::now();

        let prices: Arc<dyn PriceSnapshotProvider> = if settings.price_feed_base_url.is_some() {
            Arc::new(HttpJsonPriceFeed::from_settings(settings)?)
        } else {
            Arc::new(FixturePriceFeed::catalogue(now))
        };

        let history = match settings.series_seed {
            Some(seed) => SyntheticSeriesProvider::with_seed(seed),
            None => SyntheticSeriesProvider::new(),
        };

        tracing::info!(
            prices = prices.provider_name(),
            history = history.provider_name(),
            seeded = settings.series_seed.is_some(),
            "market service configured"
        );

        Ok(Self::new(
            prices,
            Arc::new(history),
            Arc::new(FixtureNewsFeed::new(now)),
            SeasonCalendar::from_env(),
        ))
    }

    pub async fn current_prices(&self) -> MarketResult<Vec<PriceSnapshot>> {
        self.prices.current_prices().await
    }

    pub async fn historical_prices(&self, commodity: &str, days: usize) -> MarketResult<PriceSeries> {
        check_history_days(days)?;
        self.history.historical_prices(commodity, days).await
    }

    pub async fn market_recommendation(
        &self,
        commodity: &str,
        inventory_tons: f64,
        monthly_storage_cost: f64,
    ) -> MarketResult<RecommendationResult> {
        self.market_recommendation_as_of(
            commodity,
            inventory_tons,
            monthly_storage_cost,
            Utc::now().date_naive(),
        )
        .await
    }

    /// Same as [`Self::market_recommendation`], evaluated for the month of `as_of`.
    pub async fn market_recommendation_as_of(
        &self,
        commodity: &str,
        inventory_tons: f64,
        monthly_storage_cost: f64,
        as_of: NaiveDate,
    ) -> MarketResult<RecommendationResult> {
        validate_position(inventory_tons, monthly_storage_cost)?;

        let (snapshots, history) = tokio::try_join!(
            self.prices.current_prices(),
            self.history.historical_prices(commodity, HISTORY_DAYS),
        )?;

        let snapshot = snapshots
            .iter()
            .find(|s| s.matches(commodity))
            .ok_or_else(|| {
                MarketError::unavailable(
                    self.prices.provider_name(),
                    format!("no current price for commodity {commodity}"),
                )
            })?;

        evaluate(
            MarketInputs {
                commodity: &snapshot.commodity,
                current_price: snapshot.current_price,
                history: &history,
                inventory_tons,
                monthly_storage_cost,
            },
            as_of,
            &self.calendar,
        )
    }

    /// Never fails; a broken news feed yields an empty list.
    pub async fn commodity_news(&self, commodity: Option<&str>) -> Vec<NewsItem> {
        news_or_empty(self.news.as_ref(), commodity).await
    }
}
