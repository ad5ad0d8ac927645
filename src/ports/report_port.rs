//! Report generation port trait.

use chrono::NaiveDate;

use crate::domain::backtest::BacktestResult;
use crate::domain::error::SmacrossError;
use crate::domain::strategy::Strategy;
use crate::domain::summary::ReturnSummary;

/// Everything a reporter needs about one finished run.
pub struct BacktestReport<'a> {
    pub symbol: &'a str,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub strategy: &'a Strategy,
    pub result: &'a BacktestResult,
    pub summary: ReturnSummary,
}

impl<'a> BacktestReport<'a> {
    pub fn new(
        symbol: &'a str,
        start_date: NaiveDate,
        end_date: NaiveDate,
        strategy: &'a Strategy,
        result: &'a BacktestResult,
    ) -> Self {
        Self {
            symbol,
            start_date,
            end_date,
            strategy,
            result,
            summary: result.summary(),
        }
    }
}

/// Port for presenting backtest output.
pub trait ReportPort {
    fn write(&self, report: &BacktestReport) -> Result<(), SmacrossError>;
}
