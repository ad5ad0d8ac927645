//! Portfolio state machine and mark-to-market trajectory.
//!
//! The portfolio is always either fully in cash (`Flat`) or fully in shares
//! (`Invested`). [`simulate`] folds `(price, signal)` pairs through
//! [`PortfolioState::apply`] and records a valuation after every step.

use std::fmt;

use crate::domain::error::SmacrossError;
use crate::domain::signal::Signal;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PortfolioState {
    Flat { cash: f64 },
    Invested { shares: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeSide {
    Buy,
    Sell,
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            TradeSide::Buy => "BUY",
            TradeSide::Sell => "SELL",
        })
    }
}

impl PortfolioState {
    pub fn new(initial_balance: f64) -> Self {
        PortfolioState::Flat {
            cash: initial_balance,
        }
    }

    pub fn cash(&self) -> f64 {
        match *self {
            PortfolioState::Flat { cash } => cash,
            PortfolioState::Invested { .. } => 0.0,
        }
    }

    pub fn shares(&self) -> u64 {
        match *self {
            PortfolioState::Flat { .. } => 0,
            PortfolioState::Invested { shares } => shares,
        }
    }

    pub fn is_invested(&self) -> bool {
        matches!(self, PortfolioState::Invested { .. })
    }

    pub fn market_value(&self, price: f64) -> f64 {
        self.cash() + self.shares() as f64 * price
    }

    /// Advance one step. Returns the next state and the side of the trade
    /// that fired, if any.
    ///
    /// A buy spends the whole balance on `floor(cash / price)` shares; the
    /// fractional remainder is not carried into the invested state. A buy that
    /// cannot afford one share leaves the portfolio flat and untouched. A
    /// share count that does not fit in `u64` is an error.
    pub fn apply(
        self,
        price: f64,
        signal: Signal,
    ) -> Result<(Self, Option<TradeSide>), SmacrossError> {
        let step = match (self, signal) {
            (PortfolioState::Flat { cash }, Signal::Buy) => {
                let shares = affordable_shares(cash, price)?;
                if shares == 0 {
                    (self, None)
                } else {
                    (PortfolioState::Invested { shares }, Some(TradeSide::Buy))
                }
            }
            (PortfolioState::Flat { .. }, Signal::Sell | Signal::Hold) => (self, None),
            (PortfolioState::Invested { shares }, Signal::Sell) => (
                PortfolioState::Flat {
                    cash: shares as f64 * price,
                },
                Some(TradeSide::Sell),
            ),
            (PortfolioState::Invested { .. }, Signal::Buy | Signal::Hold) => (self, None),
        };
        Ok(step)
    }
}

/// `floor(cash / price)`, refusing counts that a `u64` cannot hold.
fn affordable_shares(cash: f64, price: f64) -> Result<u64, SmacrossError> {
    let shares = (cash / price).floor();
    // u64::MAX rounds up to 2^64 as f64, the first value that does not fit
    if shares >= u64::MAX as f64 {
        return Err(SmacrossError::ShareOverflow { cash, price });
    }
    Ok(shares as u64)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortfolioSnapshot {
    pub index: usize,
    pub price: f64,
    pub cash: f64,
    pub shares: u64,
    pub total_value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trade {
    pub index: usize,
    pub side: TradeSide,
    pub price: f64,
    pub shares: u64,
    /// Cash balance immediately after the fill.
    pub cash_after: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Simulation {
    pub snapshots: Vec<PortfolioSnapshot>,
    pub trades: Vec<Trade>,
    pub final_state: PortfolioState,
}

impl Simulation {
    pub fn total_values(&self) -> Vec<f64> {
        self.snapshots.iter().map(|s| s.total_value).collect()
    }

    pub fn final_value(&self) -> Option<f64> {
        self.snapshots.last().map(|s| s.total_value)
    }
}

pub fn validate_initial_balance(initial_balance: f64) -> Result<(), SmacrossError> {
    if !initial_balance.is_finite() || initial_balance < 0.0 {
        return Err(SmacrossError::InvalidStrategyParams {
            reason: format!("initial_balance must be a non-negative amount, got {initial_balance}"),
        });
    }
    Ok(())
}

/// Run the portfolio state machine over aligned prices and signals.
pub fn simulate(
    prices: &[f64],
    signals: &[Signal],
    initial_balance: f64,
) -> Result<Simulation, SmacrossError> {
    if prices.len() != signals.len() {
        return Err(SmacrossError::LengthMismatch {
            prices: prices.len(),
            signals: signals.len(),
        });
    }
    validate_initial_balance(initial_balance)?;

    let seed = (
        PortfolioState::new(initial_balance),
        Vec::with_capacity(prices.len()),
        Vec::new(),
    );

    let (final_state, snapshots, trades) = prices.iter().zip(signals).enumerate().try_fold(
        seed,
        |(state, mut snapshots, mut trades), (index, (&price, &signal))| -> Result<_, SmacrossError> {
            if !(price > 0.0 && price.is_finite()) {
                return Err(SmacrossError::NonPositivePrice { index, price });
            }

            let (next, fill) = state.apply(price, signal)?;
            match fill {
                Some(side) => {
                    let shares = match side {
                        TradeSide::Buy => next.shares(),
                        TradeSide::Sell => state.shares(),
                    };
                    log::debug!("step {index}: {side} {shares} @ {price:.4}");
                    trades.push(Trade {
                        index,
                        side,
                        price,
                        shares,
                        cash_after: next.cash(),
                    });
                }
                None if signal == Signal::Buy && !state.is_invested() => {
                    log::warn!(
                        "step {index}: buy skipped, cash {:.2} below price {price:.2}",
                        state.cash()
                    );
                }
                None => {}
            }

            snapshots.push(PortfolioSnapshot {
                index,
                price,
                cash: next.cash(),
                shares: next.shares(),
                total_value: next.market_value(price),
            });
            Ok((next, snapshots, trades))
        },
    )?;

    Ok(Simulation {
        snapshots,
        trades,
        final_state,
    })
}
