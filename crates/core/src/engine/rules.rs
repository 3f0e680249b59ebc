//! Ordered recommendation rules.
//!
//! Each rule maps `(RuleState, &RuleContext)` to a new state. Rules only ever
//! move the action away from HOLD; a SELL or BUY set by an earlier rule is
//! never reverted, so the outcome is monotonic toward taking action.

use crate::domain::recommendation::Action;
use crate::time::SeasonCalendar;

pub const FACTOR_ABOVE_AVERAGE: &str = "current price 10%+ above historical average";
pub const FACTOR_BELOW_AVERAGE: &str = "current price 10%+ below historical average";
pub const FACTOR_UPTREND: &str = "strong upward price trend (2%+ in 30 days)";
pub const FACTOR_DOWNTREND: &str = "downward price trend (-2%+ in 30 days)";
pub const FACTOR_STORAGE_COST: &str = "high storage costs (>1% of commodity value per month)";
pub const FACTOR_HARVEST: &str = "harvest season — typically higher supply";
pub const FACTOR_PRE_PLANTING: &str = "pre-planting season — typically higher demand";

const ABOVE_AVERAGE_RATIO: f64 = 1.10;
const BELOW_AVERAGE_RATIO: f64 = 0.90;
const TREND_THRESHOLD: f64 = 0.02;
const STORAGE_COST_FRACTION: f64 = 0.01;

/// Everything the rules read. Fixed for the whole fold.
#[derive(Debug, Clone)]
pub struct RuleContext<'a> {
    pub current_price: f64,
    pub historical_average: f64,
    pub trend: f64,
    pub storage_cost_per_ton: f64,
    pub month: u32,
    pub calendar: &'a SeasonCalendar,
}

/// Accumulated decision, threaded through the rules.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleState {
    pub action: Action,
    pub confidence: u32,
    pub projected_price: f64,
    pub factors: Vec<String>,
    /// Names of the rules that contributed a factor, in evaluation order.
    pub fired: Vec<&'static str>,
}

impl RuleState {
    pub fn initial(current_price: f64) -> Self {
        Self {
            action: Action::Hold,
            confidence: 0,
            projected_price: current_price,
            factors: Vec::new(),
            fired: Vec::new(),
        }
    }

    fn with_factor(mut self, factor: &str) -> Self {
        self.factors.push(factor.to_string());
        self
    }

    fn add_confidence(mut self, points: u32) -> Self {
        self.confidence += points;
        self
    }

    fn sell_if_holding(mut self) -> Self {
        if self.action == Action::Hold {
            self.action = Action::Sell;
        }
        self
    }
}

pub type Rule = fn(RuleState, &RuleContext<'_>) -> RuleState;

/// Evaluation order matters: later rules see the action earlier ones set.
pub const RULES: [(&str, Rule); 4] = [
    ("price_level", price_level_rule),
    ("trend", trend_rule),
    ("storage_cost", storage_cost_rule),
    ("seasonal", seasonal_rule),
];

pub fn apply_rules(ctx: &RuleContext<'_>) -> RuleState {
    RULES
        .iter()
        .fold(RuleState::initial(ctx.current_price), |state, &(name, rule)| {
            let before = state.factors.len();
            let mut next = rule(state, ctx);
            if next.factors.len() > before {
                next.fired.push(name);
            }
            next
        })
}

pub fn price_level_rule(mut state: RuleState, ctx: &RuleContext<'_>) -> RuleState {
    if ctx.current_price > ctx.historical_average * ABOVE_AVERAGE_RATIO {
        state.action = Action::Sell;
        state.add_confidence(30).with_factor(FACTOR_ABOVE_AVERAGE)
    } else if ctx.current_price < ctx.historical_average * BELOW_AVERAGE_RATIO {
        state.action = Action::Buy;
        state.add_confidence(25).with_factor(FACTOR_BELOW_AVERAGE)
    } else {
        state
    }
}

pub fn trend_rule(mut state: RuleState, ctx: &RuleContext<'_>) -> RuleState {
    if ctx.trend > TREND_THRESHOLD {
        if state.action == Action::Sell {
            state.confidence += 20;
        }
        state.projected_price = ctx.current_price * 1.05;
        state.with_factor(FACTOR_UPTREND)
    } else if ctx.trend < -TREND_THRESHOLD {
        state.projected_price = ctx.current_price * 0.95;
        state
            .sell_if_holding()
            .add_confidence(15)
            .with_factor(FACTOR_DOWNTREND)
    } else {
        state
    }
}

pub fn storage_cost_rule(state: RuleState, ctx: &RuleContext<'_>) -> RuleState {
    if ctx.storage_cost_per_ton > ctx.current_price * STORAGE_COST_FRACTION {
        state
            .sell_if_holding()
            .add_confidence(15)
            .with_factor(FACTOR_STORAGE_COST)
    } else {
        state
    }
}

pub fn seasonal_rule(state: RuleState, ctx: &RuleContext<'_>) -> RuleState {
    if ctx.calendar.is_harvest(ctx.month) && state.action == Action::Sell {
        state.add_confidence(10).with_factor(FACTOR_HARVEST)
    } else if ctx.calendar.is_pre_planting(ctx.month)
        && matches!(state.action, Action::Hold | Action::Buy)
    {
        state.add_confidence(10).with_factor(FACTOR_PRE_PLANTING)
    } else {
        state
    }
}
