//! Backtest pipeline.
//!
//! `prices → validate → SMA frame (warm-up dropped) → signals → simulate`.
//! Every stage takes the previous stage's output by reference and returns a
//! new value.

use chrono::NaiveDate;

use crate::domain::crossover::{CrossoverRow, build_crossover_frame};
use crate::domain::error::SmacrossError;
use crate::domain::portfolio::{self, PortfolioSnapshot, Simulation, Trade};
use crate::domain::price::{self, PricePoint};
use crate::domain::signal::{Signal, generate_signals};
use crate::domain::strategy::Strategy;
use crate::domain::summary::ReturnSummary;

pub const DEFAULT_INITIAL_BALANCE: f64 = 10_000.0;

/// Date range is inclusive of `start_date`, exclusive of `end_date`.
#[derive(Debug, Clone)]
pub struct BacktestConfig {
    pub symbol: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub initial_balance: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub initial_balance: f64,
    pub rows: Vec<CrossoverRow>,
    pub signals: Vec<Signal>,
    pub simulation: Simulation,
}

impl BacktestResult {
    pub fn snapshots(&self) -> &[PortfolioSnapshot] {
        &self.simulation.snapshots
    }

    pub fn trades(&self) -> &[Trade] {
        &self.simulation.trades
    }

    pub fn portfolio_values(&self) -> Vec<f64> {
        self.simulation.total_values()
    }

    /// Value after the last step. `run_backtest` never yields an empty
    /// simulation; an empty one reports the initial balance.
    pub fn final_value(&self) -> f64 {
        self.simulation
            .final_value()
            .unwrap_or(self.initial_balance)
    }

    pub fn trade_date(&self, trade: &Trade) -> Option<NaiveDate> {
        self.rows.get(trade.index).map(|r| r.date)
    }

    pub fn summary(&self) -> ReturnSummary {
        ReturnSummary::compute(self.initial_balance, self.final_value(), self.trades().len())
    }
}

/// Run the crossover strategy over an already-fetched price series.
pub fn run_backtest(
    symbol: &str,
    prices: &[PricePoint],
    strategy: &Strategy,
    initial_balance: f64,
) -> Result<BacktestResult, SmacrossError> {
    strategy.validate()?;
    portfolio::validate_initial_balance(initial_balance)?;

    if prices.is_empty() {
        return Err(SmacrossError::NoData {
            symbol: symbol.to_string(),
        });
    }
    price::validate_series(prices)?;

    if prices.len() < strategy.minimum_bars() {
        return Err(SmacrossError::InsufficientData {
            symbol: symbol.to_string(),
            bars: prices.len(),
            minimum: strategy.minimum_bars(),
        });
    }

    let rows = build_crossover_frame(prices, strategy);
    log::info!(
        "{symbol}: {} bars, {} after {}-bar warm-up",
        prices.len(),
        rows.len(),
        strategy.long_window - 1
    );

    let signals = generate_signals(&rows);
    let closes: Vec<f64> = rows.iter().map(|r| r.close).collect();
    let simulation = portfolio::simulate(&closes, &signals, initial_balance)?;

    Ok(BacktestResult {
        initial_balance,
        rows,
        signals,
        simulation,
    })
}
