use serde::{Deserialize, Serialize};
use std::fmt;

pub const MAX_CONFIDENCE: u32 = 95;
pub const DEFAULT_TIMEFRAME: &str = "30-60 days";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Hold,
    Sell,
    Buy,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Hold => "HOLD",
            Action::Sell => "SELL",
            Action::Buy => "BUY",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResult {
    pub commodity: String,
    pub action: Action,
    /// Always within `0..=MAX_CONFIDENCE`.
    pub confidence: u32,
    pub summary: String,
    /// Factors in the order the rules fired.
    pub reasoning: Vec<String>,
    pub projected_price: f64,
    pub timeframe: String,
    pub current_price: f64,
    pub historical_average: f64,
    pub trend: f64,
}
