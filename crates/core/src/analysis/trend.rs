use crate::domain::market::HistoricalPricePoint;

/// Trailing window, in points, the engine measures trend over.
pub const TREND_WINDOW: usize = 30;

/// Fractional change from the first to the last price of `points`.
///
/// Callers pass the window they want measured (the engine passes the last
/// [`TREND_WINDOW`] points). Fewer than two points, or a non-positive first
/// price, yields 0.
pub fn trend(points: &[HistoricalPricePoint]) -> f64 {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return 0.0;
    };
    if points.len() < 2 || first.price <= 0.0 {
        return 0.0;
    }
    (last.price - first.price) / first.price
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn series(prices: &[f64]) -> Vec<HistoricalPricePoint> {
        let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        prices
            .iter()
            .enumerate()
            .map(|(i, &price)| HistoricalPricePoint {
                date: start + Duration::days(i as i64),
                price,
                volume: 0,
            })
            .collect()
    }

    #[test]
    fn short_series_has_zero_trend() {
        assert_eq!(trend(&[]), 0.0);
        assert_eq!(trend(&series(&[4000.0])), 0.0);
    }

    #[test]
    fn measures_first_to_last() {
        let up = series(&[4000.0, 3900.0, 4100.0, 4200.0]);
        assert!((trend(&up) - 0.05).abs() < 1e-12);

        let down = series(&[5000.0, 4900.0]);
        assert!((trend(&down) + 0.02).abs() < 1e-12);
    }
}
