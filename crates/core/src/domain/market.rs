use crate::error::{MarketError, MarketResult};
use anyhow::ensure;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// Percentage points of slack allowed between the reported and derived percent change.
const PERCENT_CHANGE_TOLERANCE: f64 = 0.01;

/// Current price observation for one commodity, in currency units per ton.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSnapshot {
    pub commodity: String,
    pub grade: String,
    pub current_price: f64,
    pub price_change: f64,
    pub percent_change: f64,
    pub timestamp: DateTime<Utc>,
    pub volume: Option<u64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
}

impl PriceSnapshot {
    /// Builds a snapshot, deriving `percent_change` from the price and its daily change.
    pub fn new(
        commodity: impl Into<String>,
        grade: impl Into<String>,
        current_price: f64,
        price_change: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            commodity: commodity.into(),
            grade: grade.into(),
            current_price,
            price_change,
            percent_change: percent_change(current_price, price_change),
            timestamp,
            volume: None,
            high: None,
            low: None,
        }
    }

    pub fn with_range(mut self, volume: u64, high: f64, low: f64) -> Self {
        self.volume = Some(volume);
        self.high = Some(high);
        self.low = Some(low);
        self
    }

    /// Case-insensitive match on commodity name or grade code.
    pub fn matches(&self, commodity: &str) -> bool {
        let wanted = commodity.trim();
        self.commodity.eq_ignore_ascii_case(wanted) || self.grade.eq_ignore_ascii_case(wanted)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            !self.commodity.trim().is_empty(),
            "commodity must be non-empty"
        );
        ensure!(
            self.current_price.is_finite() && self.current_price > 0.0,
            "current_price must be > 0 for {} (got {})",
            self.commodity,
            self.current_price
        );

        let expected = percent_change(self.current_price, self.price_change);
        ensure!(
            (self.percent_change - expected).abs() <= PERCENT_CHANGE_TOLERANCE,
            "percent_change {} inconsistent with price_change {} for {} (expected {expected:.4})",
            self.percent_change,
            self.price_change,
            self.commodity
        );

        if let (Some(high), Some(low)) = (self.high, self.low) {
            ensure!(
                high >= low,
                "high {high} below low {low} for {}",
                self.commodity
            );
        }
        Ok(())
    }
}

/// Daily change as a percentage of the previous close.
pub fn percent_change(current_price: f64, price_change: f64) -> f64 {
    let previous = current_price - price_change;
    if previous == 0.0 {
        return 0.0;
    }
    price_change / previous * 100.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalPricePoint {
    pub date: NaiveDate,
    pub price: f64,
    pub volume: u64,
}

/// Longest history a single request may ask for (ten years of days).
pub const MAX_HISTORY_DAYS: usize = 3650;

/// Accepts `1..=MAX_HISTORY_DAYS`.
pub fn check_history_days(days: usize) -> MarketResult<()> {
    if days == 0 || days > MAX_HISTORY_DAYS {
        return Err(MarketError::invalid(
            "days",
            format!("must be in 1..={MAX_HISTORY_DAYS} (got {days})"),
        ));
    }
    Ok(())
}

/// Daily prices ordered strictly ascending by date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceSeries {
    points: Vec<HistoricalPricePoint>,
}

impl PriceSeries {
    pub fn new(points: Vec<HistoricalPricePoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[HistoricalPricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Arithmetic mean of all prices; `None` for an empty series.
    pub fn mean_price(&self) -> Option<f64> {
        if self.points.is_empty() {
            return None;
        }
        let sum: f64 = self.points.iter().map(|p| p.price).sum();
        Some(sum / self.points.len() as f64)
    }

    /// The last `window` points (or all of them when the series is shorter).
    pub fn trailing(&self, window: usize) -> &[HistoricalPricePoint] {
        let start = self.points.len().saturating_sub(window);
        &self.points[start..]
    }

    /// Checks the series has exactly `days` gap-free, ascending, positive points.
    pub fn validate(&self, days: usize) -> anyhow::Result<()> {
        ensure!(
            self.points.len() == days,
            "series length mismatch: expected {days}, got {}",
            self.points.len()
        );

        for pair in self.points.windows(2) {
            ensure!(
                pair[1].date == pair[0].date + Duration::days(1),
                "series dates not contiguous: {} followed by {}",
                pair[0].date,
                pair[1].date
            );
        }

        for point in &self.points {
            ensure!(
                point.price.is_finite() && point.price > 0.0,
                "price must be > 0 on {} (got {})",
                point.date,
                point.price
            );
        }
        Ok(())
    }
}
