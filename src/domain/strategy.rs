//! Moving-average crossover strategy parameters.

use std::fmt;

use crate::domain::error::SmacrossError;

pub const DEFAULT_SHORT_WINDOW: usize = 20;
pub const DEFAULT_LONG_WINDOW: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Strategy {
    pub short_window: usize,
    pub long_window: usize,
}

impl Strategy {
    /// Build a strategy, rejecting zero windows and `short_window >= long_window`.
    pub fn new(short_window: usize, long_window: usize) -> Result<Self, SmacrossError> {
        let strategy = Strategy {
            short_window,
            long_window,
        };
        strategy.validate()?;
        Ok(strategy)
    }

    pub fn validate(&self) -> Result<(), SmacrossError> {
        if self.short_window == 0 || self.long_window == 0 {
            return Err(SmacrossError::InvalidStrategyParams {
                reason: format!(
                    "windows must be positive (short={}, long={})",
                    self.short_window, self.long_window
                ),
            });
        }
        if self.short_window >= self.long_window {
            return Err(SmacrossError::InvalidStrategyParams {
                reason: format!(
                    "short_window ({}) must be less than long_window ({})",
                    self.short_window, self.long_window
                ),
            });
        }
        Ok(())
    }

    /// Bars needed before the first fully-defined crossover row.
    pub fn minimum_bars(&self) -> usize {
        self.long_window
    }
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy {
            short_window: DEFAULT_SHORT_WINDOW,
            long_window: DEFAULT_LONG_WINDOW,
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SMA({}) / SMA({}) crossover",
            self.short_window, self.long_window
        )
    }
}
