pub mod analysis;
pub mod domain;
pub mod engine;
pub mod error;
pub mod ingest;
pub mod news;
pub mod service;
pub mod time;

pub use error::{MarketError, MarketResult};
pub use service::MarketService;

pub mod config {
    use anyhow::Context;

    const DEFAULT_PRICE_FEED_TIMEOUT_SECS: u64 = 30;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub price_feed_base_url: Option<String>,
        pub price_feed_api_key: Option<String>,
        pub price_feed_timeout_secs: u64,
        pub series_seed: Option<u64>,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            let price_feed_timeout_secs = match std::env::var("PRICE_FEED_TIMEOUT_SECS") {
                Ok(s) => s
                    .trim()
                    .parse::<u64>()
                    .with_context(|| format!("PRICE_FEED_TIMEOUT_SECS is not a number: {s}"))?,
                Err(_) => DEFAULT_PRICE_FEED_TIMEOUT_SECS,
            };

            let series_seed = match std::env::var("MARKET_SERIES_SEED") {
                Ok(s) => Some(
                    s.trim()
                        .parse::<u64>()
                        .with_context(|| format!("MARKET_SERIES_SEED is not a u64: {s}"))?,
                ),
                Err(_) => None,
            };

            Ok(Self {
                price_feed_base_url: std::env::var("PRICE_FEED_BASE_URL")
                    .ok()
                    .filter(|s| !s.trim().is_empty()),
                price_feed_api_key: std::env::var("PRICE_FEED_API_KEY").ok(),
                price_feed_timeout_secs,
                series_seed,
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
            })
        }

        pub fn require_price_feed_base_url(&self) -> anyhow::Result<&str> {
            self.price_feed_base_url
                .as_deref()
                .context("PRICE_FEED_BASE_URL is required")
        }
    }

    impl Default for Settings {
        fn default() -> Self {
            Self {
                price_feed_base_url: None,
                price_feed_api_key: None,
                price_feed_timeout_secs: DEFAULT_PRICE_FEED_TIMEOUT_SECS,
                series_seed: None,
                sentry_dsn: None,
            }
        }
    }
}
