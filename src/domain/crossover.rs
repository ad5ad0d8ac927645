//! Short/long moving average frame with the warm-up span removed.

use chrono::NaiveDate;

use crate::domain::indicator::sma::calculate_sma;
use crate::domain::price::{self, PricePoint};
use crate::domain::strategy::Strategy;

/// One fully-warmed row: both averages are defined.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossoverRow {
    pub date: NaiveDate,
    pub close: f64,
    pub short_ma: f64,
    pub long_ma: f64,
}

/// Compute both SMAs and keep only rows where each is defined.
///
/// The result is indexed contiguously from zero. For a series of length `n`
/// with `long_window <= n` it holds `n - long_window + 1` rows, otherwise none.
pub fn build_crossover_frame(prices: &[PricePoint], strategy: &Strategy) -> Vec<CrossoverRow> {
    let closes = price::closes(prices);
    let short = calculate_sma(&closes, strategy.short_window);
    let long = calculate_sma(&closes, strategy.long_window);

    prices
        .iter()
        .enumerate()
        .filter_map(|(i, p)| match (short.get(i), long.get(i)) {
            (Some(short_ma), Some(long_ma)) => Some(CrossoverRow {
                date: p.date,
                close: p.close,
                short_ma,
                long_ma,
            }),
            _ => None,
        })
        .collect()
}
