use crate::config::Settings;
use crate::domain::market::{PriceSeries, PriceSnapshot};
use crate::error::{MarketError, MarketResult};
use crate::ingest::types::FeedPricesResponse;
use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue};
use std::time::Duration;

const DEFAULT_PATH: &str = "/v1/prices";

/// Source of current per-commodity price snapshots.
#[async_trait::async_trait]
pub trait PriceSnapshotProvider: Send + Sync {
    fn provider_name(&self) -> &'static str;

    /// One snapshot per tracked commodity. Fails with `DataUnavailable`; never retries.
    async fn current_prices(&self) -> MarketResult<Vec<PriceSnapshot>>;
}

/// Source of ordered daily price history.
#[async_trait::async_trait]
pub trait HistoricalSeriesProvider: Send + Sync {
    fn provider_name(&self) -> &'static str;

    async fn historical_prices(&self, commodity: &str, days: usize) -> MarketResult<PriceSeries>;
}

/// Snapshot feed backed by an HTTP endpoint returning [`FeedPricesResponse`] JSON.
#[derive(Debug, Clone)]
pub struct HttpJsonPriceFeed {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    path: String,
}

impl HttpJsonPriceFeed {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let base_url = settings.require_price_feed_base_url()?.to_string();

        let path = std::env::var("PRICE_FEED_PATH")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PATH.to_string());

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.price_feed_timeout_secs))
            .build()
            .context("failed to build price feed http client")?;

        Ok(Self {
            http,
            base_url,
            api_key: settings.price_feed_api_key.clone(),
            path,
        })
    }

    fn url(&self) -> String {
        let path = if self.path.starts_with('/') {
            self.path.clone()
        } else {
            format!("/{}", self.path)
        };

        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        if let Some(api_key) = &self.api_key {
            headers.insert("x-api-key", HeaderValue::from_str(api_key)?);
        }
        Ok(headers)
    }

    async fn fetch_once(&self) -> Result<Vec<PriceSnapshot>> {
        let url = self.url();
        let headers = self.headers()?;

        let res = self
            .http
            .get(url)
            .headers(headers)
            .send()
            .await
            .context("price feed request failed")?;

        let status = res.status();
        let text = res
            .text()
            .await
            .context("failed to read price feed response")?;

        if !status.is_success() {
            anyhow::bail!("price feed HTTP {status}: {text}");
        }

        let parsed = serde_json::from_str::<FeedPricesResponse>(&text)
            .with_context(|| format!("price feed response does not match schema: {text}"))?;
        parsed.validate_and_into_snapshots()
    }
}

#[async_trait::async_trait]
impl PriceSnapshotProvider for HttpJsonPriceFeed {
    fn provider_name(&self) -> &'static str {
        "http_json_feed"
    }

    async fn current_prices(&self) -> MarketResult<Vec<PriceSnapshot>> {
        self.fetch_once()
            .await
            .map_err(|err| MarketError::unavailable(self.provider_name(), format!("{err:#}")))
    }
}
