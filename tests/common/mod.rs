#![allow(dead_code)]

use chrono::NaiveDate;
use smacross::domain::backtest::BacktestConfig;
use smacross::domain::error::SmacrossError;
pub use smacross::domain::price::PricePoint;
use smacross::ports::data_port::DataPort;
use smacross::ports::report_port::{BacktestReport, ReportPort};
use std::cell::RefCell;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<PricePoint>>,
    pub errors: HashMap<String, String>,
    pub fetches: RefCell<usize>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
            fetches: RefCell::new(0),
        }
    }

    pub fn with_prices(mut self, symbol: &str, prices: Vec<PricePoint>) -> Self {
        self.data.insert(symbol.to_string(), prices);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_closes(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PricePoint>, SmacrossError> {
        *self.fetches.borrow_mut() += 1;
        if let Some(reason) = self.errors.get(symbol) {
            return Err(SmacrossError::DataSource {
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(symbol)
            .map(|prices| {
                prices
                    .iter()
                    .filter(|p| p.date >= start_date && p.date < end_date)
                    .copied()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, SmacrossError> {
        match self.data.get(symbol) {
            Some(prices) if !prices.is_empty() => Ok(Some((
                prices[0].date,
                prices[prices.len() - 1].date,
                prices.len(),
            ))),
            _ => Ok(None),
        }
    }
}

/// Records the final value and trade count of every report it receives.
pub struct RecordingReport {
    pub seen: RefCell<Vec<(String, f64, usize)>>,
}

impl RecordingReport {
    pub fn new() -> Self {
        Self {
            seen: RefCell::new(Vec::new()),
        }
    }
}

impl ReportPort for RecordingReport {
    fn write(&self, report: &BacktestReport) -> Result<(), SmacrossError> {
        self.seen.borrow_mut().push((
            report.symbol.to_string(),
            report.summary.final_value,
            report.summary.trade_count,
        ));
        Ok(())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// One price per calendar day starting at `start`.
pub fn daily_prices(start: &str, closes: &[f64]) -> Vec<PricePoint> {
    let start = NaiveDate::parse_from_str(start, "%Y-%m-%d").unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PricePoint::new(start + chrono::Duration::days(i as i64), close))
        .collect()
}

/// Rises by `step` for `up` days then falls by `step` for `down` days.
pub fn tent_closes(base: f64, step: f64, up: usize, down: usize) -> Vec<f64> {
    let peak = base + step * up as f64;
    (0..up)
        .map(|i| base + step * i as f64)
        .chain((0..down).map(|i| peak - step * i as f64))
        .collect()
}

pub fn sample_config(symbol: &str) -> BacktestConfig {
    BacktestConfig {
        symbol: symbol.to_string(),
        start_date: date(2020, 1, 1),
        end_date: date(2023, 1, 1),
        initial_balance: 10_000.0,
    }
}
