//! Synthetic daily history for feeds that do not publish one.
//!
//! Each point is the commodity's base price scaled by a slow seasonal sine
//! wave and an independent per-day perturbation:
//!
//! ```text
//! price[i] = base * (1 + amplitude * sin(2*pi*i / period)) * (1 + U(-volatility, volatility))
//! ```
//!
//! The random component comes from an owned [`StdRng`], so a provider built
//! with [`SyntheticSeriesProvider::with_seed`] is fully reproducible.

use crate::domain::market::{check_history_days, HistoricalPricePoint, PriceSeries};
use crate::error::{MarketError, MarketResult};
use crate::ingest::catalogue::TRACKED_COMMODITIES;
use crate::ingest::provider::HistoricalSeriesProvider;
use chrono::{Duration, NaiveDate, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesModel {
    /// Fractional swing of the seasonal wave.
    pub seasonal_amplitude: f64,
    /// Wave period in points.
    pub seasonal_period: f64,
    /// Bound on the per-point perturbation, as a fraction of price.
    pub volatility: f64,
    pub min_volume: u64,
    pub max_volume: u64,
}

impl Default for SeriesModel {
    fn default() -> Self {
        Self {
            seasonal_amplitude: 0.05,
            seasonal_period: 30.0,
            volatility: 0.02,
            min_volume: 500,
            max_volume: 5000,
        }
    }
}

impl SeriesModel {
    fn validate(&self) -> MarketResult<()> {
        if !(0.0..1.0).contains(&self.seasonal_amplitude) {
            return Err(MarketError::invalid(
                "seasonal_amplitude",
                format!("must be in [0, 1) (got {})", self.seasonal_amplitude),
            ));
        }
        if !(0.0..1.0).contains(&self.volatility) {
            return Err(MarketError::invalid(
                "volatility",
                format!("must be in [0, 1) (got {})", self.volatility),
            ));
        }
        if self.seasonal_period <= 0.0 {
            return Err(MarketError::invalid(
                "seasonal_period",
                format!("must be > 0 (got {})", self.seasonal_period),
            ));
        }
        if self.min_volume > self.max_volume {
            return Err(MarketError::invalid(
                "min_volume",
                format!("{} exceeds max_volume {}", self.min_volume, self.max_volume),
            ));
        }
        Ok(())
    }
}

/// Generates `days` points ending the day before `today`.
pub fn synthesize<R: Rng>(
    rng: &mut R,
    base_price: f64,
    days: usize,
    today: NaiveDate,
    model: &SeriesModel,
) -> MarketResult<PriceSeries> {
    check_history_days(days)?;
    let start = today
        .checked_sub_signed(Duration::days(days as i64))
        .ok_or_else(|| {
            MarketError::invalid("days", format!("{days} days before {today} is out of range"))
        })?;
    let points = (0..days)
        .map(|i| {
            let phase = 2.0 * PI * i as f64 / model.seasonal_period;
            let seasonal = 1.0 + model.seasonal_amplitude * phase.sin();
            let noise = if model.volatility > 0.0 {
                1.0 + rng.gen_range(-model.volatility..=model.volatility)
            } else {
                1.0
            };
            HistoricalPricePoint {
                date: start + Duration::days(i as i64),
                price: base_price * seasonal * noise,
                volume: rng.gen_range(model.min_volume..=model.max_volume),
            }
        })
        .collect();
    Ok(PriceSeries::new(points))
}

#[derive(Debug, Clone)]
struct SeriesBase {
    name: String,
    grade: String,
    base_price: f64,
}

/// History provider that synthesizes series around each commodity's base price.
#[derive(Debug)]
pub struct SyntheticSeriesProvider {
    bases: Vec<SeriesBase>,
    model: SeriesModel,
    rng: Mutex<StdRng>,
    anchor: Option<NaiveDate>,
}

impl SyntheticSeriesProvider {
    /// Catalogue commodities, entropy-seeded.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(rng: StdRng) -> Self {
        let bases = TRACKED_COMMODITIES
            .iter()
            .map(|c| SeriesBase {
                name: c.name.to_string(),
                grade: c.grade.to_string(),
                base_price: c.base_price,
            })
            .collect();
        Self {
            bases,
            model: SeriesModel::default(),
            rng: Mutex::new(rng),
            anchor: None,
        }
    }

    pub fn with_model(mut self, model: SeriesModel) -> Self {
        self.model = model;
        self
    }

    /// Pins "today" instead of reading the clock on every call.
    pub fn anchored_at(mut self, today: NaiveDate) -> Self {
        self.anchor = Some(today);
        self
    }

    /// Adds or replaces the base price for a commodity.
    pub fn with_base_price(mut self, name: &str, grade: &str, base_price: f64) -> Self {
        self.bases.retain(|b| !b.name.eq_ignore_ascii_case(name));
        self.bases.push(SeriesBase {
            name: name.to_string(),
            grade: grade.to_string(),
            base_price,
        });
        self
    }

    fn base_price(&self, commodity: &str) -> Option<f64> {
        let wanted = commodity.trim();
        self.bases
            .iter()
            .find(|b| b.name.eq_ignore_ascii_case(wanted) || b.grade.eq_ignore_ascii_case(wanted))
            .map(|b| b.base_price)
    }
}

impl Default for SyntheticSeriesProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl HistoricalSeriesProvider for SyntheticSeriesProvider {
    fn provider_name(&self) -> &'static str {
        "synthetic"
    }

    async fn historical_prices(&self, commodity: &str, days: usize) -> MarketResult<PriceSeries> {
        check_history_days(days)?;
        self.model.validate()?;

        let base_price = self.base_price(commodity).ok_or_else(|| {
            MarketError::unavailable(
                self.provider_name(),
                format!("no price history for commodity {commodity}"),
            )
        })?;
        if !(base_price.is_finite() && base_price > 0.0) {
            return Err(MarketError::unavailable(
                self.provider_name(),
                format!("base price for {commodity} is not positive ({base_price})"),
            ));
        }

        let today = self.anchor.unwrap_or_else(|| Utc::now().date_naive());
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        synthesize(&mut *rng, base_price, days, today, &self.model)
    }
}
