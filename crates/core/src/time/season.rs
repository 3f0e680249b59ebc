use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeSet;

const DEFAULT_HARVEST_MONTHS: [u32; 3] = [5, 6, 7];
const DEFAULT_PRE_PLANTING_MONTHS: [u32; 2] = [8, 9];

/// Evaluation date: an explicit `YYYY-MM-DD` argument, or today's UTC date.
pub fn resolve_as_of_date(
    as_of_date_arg: Option<&str>,
    now_utc: DateTime<Utc>,
) -> anyhow::Result<NaiveDate> {
    if let Some(s) = as_of_date_arg {
        return Ok(NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")?);
    }
    Ok(now_utc.date_naive())
}

/// Months (1-12) in which the seasonal rule applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonCalendar {
    harvest_months: BTreeSet<u32>,
    pre_planting_months: BTreeSet<u32>,
}

impl Default for SeasonCalendar {
    fn default() -> Self {
        Self {
            harvest_months: DEFAULT_HARVEST_MONTHS.into_iter().collect(),
            pre_planting_months: DEFAULT_PRE_PLANTING_MONTHS.into_iter().collect(),
        }
    }
}

impl SeasonCalendar {
    pub fn new(
        harvest_months: impl IntoIterator<Item = u32>,
        pre_planting_months: impl IntoIterator<Item = u32>,
    ) -> Self {
        Self {
            harvest_months: harvest_months.into_iter().filter(is_month).collect(),
            pre_planting_months: pre_planting_months.into_iter().filter(is_month).collect(),
        }
    }

    /// Defaults, overridden by HARVEST_MONTHS / PRE_PLANTING_MONTHS="5,6,7".
    pub fn from_env() -> Self {
        let mut out = Self::default();
        if let Ok(s) = std::env::var("HARVEST_MONTHS") {
            if let Some(months) = parse_months(&s) {
                out.harvest_months = months;
            }
        }
        if let Ok(s) = std::env::var("PRE_PLANTING_MONTHS") {
            if let Some(months) = parse_months(&s) {
                out.pre_planting_months = months;
            }
        }
        out
    }

    pub fn is_harvest(&self, month: u32) -> bool {
        self.harvest_months.contains(&month)
    }

    pub fn is_pre_planting(&self, month: u32) -> bool {
        self.pre_planting_months.contains(&month)
    }
}

fn is_month(m: &u32) -> bool {
    (1..=12).contains(m)
}

// None when nothing valid was listed, so a malformed override keeps the defaults.
fn parse_months(s: &str) -> Option<BTreeSet<u32>> {
    let mut out = BTreeSet::new();
    for part in s.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        if let Ok(m) = part.parse::<u32>() {
            if is_month(&m) {
                out.insert(m);
            }
        }
    }
    (!out.is_empty()).then_some(out)
}
