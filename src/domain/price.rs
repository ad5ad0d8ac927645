//! Daily close price representation and series integrity checks.

use chrono::NaiveDate;

use crate::domain::error::SmacrossError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

/// Reject series that the moving average stage cannot consume positionally.
///
/// Checks, in index order: strictly increasing dates, a finite close
/// (missing values arrive as NaN and are not filled), and a positive close.
pub fn validate_series(prices: &[PricePoint]) -> Result<(), SmacrossError> {
    for (index, point) in prices.iter().enumerate() {
        if index > 0 && point.date <= prices[index - 1].date {
            return Err(SmacrossError::UnorderedSeries {
                index,
                date: point.date,
            });
        }
        if !point.close.is_finite() {
            return Err(SmacrossError::IncompletePriceData {
                index,
                date: point.date,
            });
        }
        if point.close <= 0.0 {
            return Err(SmacrossError::NonPositivePrice {
                index,
                price: point.close,
            });
        }
    }
    Ok(())
}

pub fn closes(prices: &[PricePoint]) -> Vec<f64> {
    prices.iter().map(|p| p.close).collect()
}
