//! Crossover trading signal.

use std::cmp::Ordering;
use std::fmt;

use crate::domain::crossover::CrossoverRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

impl Signal {
    /// `Buy` when the short average is above the long one, `Sell` when below,
    /// `Hold` on equality. Incomparable (NaN) inputs hold.
    pub fn from_averages(short_ma: f64, long_ma: f64) -> Self {
        match short_ma.partial_cmp(&long_ma) {
            Some(Ordering::Greater) => Signal::Buy,
            Some(Ordering::Less) => Signal::Sell,
            Some(Ordering::Equal) | None => Signal::Hold,
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Buy => write!(f, "BUY"),
            Signal::Sell => write!(f, "SELL"),
            Signal::Hold => write!(f, "HOLD"),
        }
    }
}

pub fn generate_signals(frame: &[CrossoverRow]) -> Vec<Signal> {
    frame
        .iter()
        .map(|row| Signal::from_averages(row.short_ma, row.long_ma))
        .collect()
}
