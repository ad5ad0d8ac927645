//! Technical indicator series.
//!
//! - `MovingAverage`: one trailing-window average per input index, `None`
//!   during the warm-up span where the window has insufficient history.

pub mod sma;

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct MovingAverage {
    pub window: usize,
    pub values: Vec<Option<f64>>,
}

impl MovingAverage {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }
}

impl fmt::Display for MovingAverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SMA({})", self.window)
    }
}
