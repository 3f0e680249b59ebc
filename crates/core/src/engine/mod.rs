pub mod rules;

use crate::analysis::{trend, TREND_WINDOW};
use crate::domain::market::PriceSeries;
use crate::domain::recommendation::{
    Action, RecommendationResult, DEFAULT_TIMEFRAME, MAX_CONFIDENCE,
};
use crate::error::{MarketError, MarketResult};
use crate::time::SeasonCalendar;
use chrono::{Datelike, NaiveDate};
use rules::{apply_rules, RuleContext};

/// Length of the history the engine averages over.
pub const HISTORY_DAYS: usize = 365;

/// Data one recommendation is computed from, already fetched or injected.
#[derive(Debug, Clone, Copy)]
pub struct MarketInputs<'a> {
    pub commodity: &'a str,
    pub current_price: f64,
    pub history: &'a PriceSeries,
    pub inventory_tons: f64,
    pub monthly_storage_cost: f64,
}

/// Rejects inventory/storage figures the storage-cost rule cannot divide by.
pub fn validate_position(inventory_tons: f64, monthly_storage_cost: f64) -> MarketResult<()> {
    if !(inventory_tons.is_finite() && inventory_tons > 0.0) {
        return Err(MarketError::invalid(
            "inventory_tons",
            format!("must be > 0 (got {inventory_tons})"),
        ));
    }
    if !(monthly_storage_cost.is_finite() && monthly_storage_cost >= 0.0) {
        return Err(MarketError::invalid(
            "monthly_storage_cost",
            format!("must be >= 0 (got {monthly_storage_cost})"),
        ));
    }
    Ok(())
}

/// Runs the rule set over `inputs` as of `as_of` and composes the result.
pub fn evaluate(
    inputs: MarketInputs<'_>,
    as_of: NaiveDate,
    calendar: &SeasonCalendar,
) -> MarketResult<RecommendationResult> {
    validate_position(inputs.inventory_tons, inputs.monthly_storage_cost)?;

    if !(inputs.current_price.is_finite() && inputs.current_price > 0.0) {
        return Err(MarketError::invalid(
            "current_price",
            format!("must be > 0 (got {})", inputs.current_price),
        ));
    }

    let historical_average = inputs.history.mean_price().ok_or_else(|| {
        MarketError::unavailable(
            "history",
            format!("empty price history for {}", inputs.commodity),
        )
    })?;

    let ctx = RuleContext {
        current_price: inputs.current_price,
        historical_average,
        trend: trend(inputs.history.trailing(TREND_WINDOW)),
        storage_cost_per_ton: inputs.monthly_storage_cost / inputs.inventory_tons,
        month: as_of.month(),
        calendar,
    };

    let state = apply_rules(&ctx);
    let confidence = clamp_confidence(state.confidence);

    tracing::debug!(
        commodity = inputs.commodity,
        action = %state.action,
        confidence,
        rules = ?state.fired,
        historical_average,
        trend = ctx.trend,
        "recommendation computed"
    );

    Ok(RecommendationResult {
        commodity: inputs.commodity.to_string(),
        action: state.action,
        confidence,
        summary: summary(
            state.action,
            inputs.commodity,
            inputs.inventory_tons,
            inputs.current_price,
        ),
        reasoning: state.factors,
        projected_price: state.projected_price,
        timeframe: DEFAULT_TIMEFRAME.to_string(),
        current_price: inputs.current_price,
        historical_average,
        trend: ctx.trend,
    })
}

pub fn clamp_confidence(confidence: u32) -> u32 {
    confidence.min(MAX_CONFIDENCE)
}

fn summary(action: Action, commodity: &str, inventory_tons: f64, current_price: f64) -> String {
    match action {
        Action::Sell => format!(
            "Recommend selling {inventory_tons} tons of {commodity} at the current price of {current_price:.2} per ton."
        ),
        Action::Buy => format!(
            "Consider purchasing additional {commodity} at the current price of {current_price:.2} per ton."
        ),
        Action::Hold => format!(
            "Hold current inventory of {inventory_tons} tons of {commodity}; conditions do not favour immediate action."
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::market::HistoricalPricePoint;
    use crate::engine::rules::{
        FACTOR_ABOVE_AVERAGE, FACTOR_HARVEST, FACTOR_STORAGE_COST, FACTOR_UPTREND,
    };
    use chrono::Duration;
    use proptest::prelude::*;

    fn flat(price: f64, days: usize) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        PriceSeries::new(
            (0..days)
                .map(|i| HistoricalPricePoint {
                    date: start + Duration::days(i as i64),
                    price,
                    volume: 1000,
                })
                .collect(),
        )
    }

    fn january() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()
    }

    fn inputs<'a>(history: &'a PriceSeries, current_price: f64, storage: f64) -> MarketInputs<'a> {
        MarketInputs {
            commodity: "White Maize",
            current_price,
            history,
            inventory_tons: 100.0,
            monthly_storage_cost: storage,
        }
    }

    #[test]
    fn above_average_price_sells() {
        let history = flat(4000.0, HISTORY_DAYS);
        let out = evaluate(
            inputs(&history, 4600.0, 50.0),
            january(),
            &SeasonCalendar::default(),
        )
        .unwrap();
        assert_eq!(out.action, Action::Sell);
        assert!(out.confidence >= 30);
        assert!(out.reasoning.iter().any(|f| f == FACTOR_ABOVE_AVERAGE));
        assert!(out.summary.starts_with("Recommend selling"));
        assert_eq!(out.timeframe, "30-60 days");
        assert_eq!(out.projected_price, 4600.0);
    }

    #[test]
    fn modest_premium_does_not_trigger_price_rule() {
        let history = flat(4000.0, HISTORY_DAYS);
        let out = evaluate(
            inputs(&history, 4250.0, 50.0),
            january(),
            &SeasonCalendar::default(),
        )
        .unwrap();
        assert_eq!(out.action, Action::Hold);
        assert_eq!(out.confidence, 0);
        assert!(out.reasoning.is_empty());
        assert!(out.summary.starts_with("Hold current inventory"));
    }

    #[test]
    fn storage_rule_fires_only_above_one_percent() {
        let history = flat(4000.0, HISTORY_DAYS);
        let cal = SeasonCalendar::default();

        let cheap = evaluate(inputs(&history, 4000.0, 50.0), january(), &cal).unwrap();
        assert_eq!(cheap.action, Action::Hold);

        let dear = evaluate(inputs(&history, 4000.0, 5000.0), january(), &cal).unwrap();
        assert_eq!(dear.action, Action::Sell);
        assert_eq!(dear.confidence, 15);
        assert_eq!(dear.reasoning, vec![FACTOR_STORAGE_COST]);
    }

    #[test]
    fn every_sell_factor_accumulates() {
        // Above average, rising, expensive to store, in harvest: 30 + 20 + 15 + 10.
        let mut points = flat(4000.0, HISTORY_DAYS).points().to_vec();
        let last = points.len() - 1;
        points[last].price = 4400.0;
        let history = PriceSeries::new(points);
        let june = NaiveDate::from_ymd_opt(2026, 6, 10).unwrap();

        let cal = SeasonCalendar::default();
        let out = evaluate(inputs(&history, 5000.0, 10_000.0), june, &cal).unwrap();
        assert_eq!(out.action, Action::Sell);
        assert_eq!(out.confidence, 75);
        assert_eq!(out.reasoning.len(), 4);
        assert_eq!(out.reasoning[1], FACTOR_UPTREND);
        assert_eq!(out.reasoning[3], FACTOR_HARVEST);
        assert_eq!(out.projected_price, 5000.0 * 1.05);
    }

    #[test]
    fn confidence_is_capped() {
        assert_eq!(clamp_confidence(0), 0);
        assert_eq!(clamp_confidence(75), 75);
        assert_eq!(clamp_confidence(140), MAX_CONFIDENCE);
    }

    #[test]
    fn rejects_zero_inventory_and_negative_storage() {
        let history = flat(4000.0, 30);
        let cal = SeasonCalendar::default();

        let mut zero = inputs(&history, 4000.0, 50.0);
        zero.inventory_tons = 0.0;
        assert!(matches!(
            evaluate(zero, january(), &cal),
            Err(MarketError::InvalidInput { field: "inventory_tons", .. })
        ));

        let negative = inputs(&history, 4000.0, -1.0);
        assert!(matches!(
            evaluate(negative, january(), &cal),
            Err(MarketError::InvalidInput { field: "monthly_storage_cost", .. })
        ));
    }

    #[test]
    fn empty_history_is_unavailable() {
        let history = PriceSeries::default();
        let cal = SeasonCalendar::default();
        let err = evaluate(inputs(&history, 4000.0, 50.0), january(), &cal).unwrap_err();
        assert!(matches!(err, MarketError::DataUnavailable { .. }));
    }

    proptest! {
        #[test]
        fn evaluate_caps_confidence_for_any_position(
            average in 100.0f64..10_000.0,
            last_move in -0.2f64..0.2,
            current_price in 100.0f64..10_000.0,
            inventory_tons in 0.1f64..10_000.0,
            monthly_storage_cost in 0.0f64..100_000.0,
            month in 1u32..=12,
        ) {
            let mut points = flat(average, 60).points().to_vec();
            let last = points.len() - 1;
            points[last].price = average * (1.0 + last_move);
            let history = PriceSeries::new(points);
            let as_of = NaiveDate::from_ymd_opt(2026, month, 15).unwrap();

            let out = evaluate(
                MarketInputs {
                    commodity: "Wheat",
                    current_price,
                    history: &history,
                    inventory_tons,
                    monthly_storage_cost,
                },
                as_of,
                &SeasonCalendar::default(),
            )
            .unwrap();
            prop_assert!(out.confidence <= MAX_CONFIDENCE);
            prop_assert!(out.historical_average > 0.0);
            prop_assert_eq!(out.action == Action::Hold, out.summary.starts_with("Hold"));
        }
    }
}
