//! Final return of a backtest run.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReturnSummary {
    pub initial_balance: f64,
    pub final_value: f64,
    pub net_profit: f64,
    /// Fraction of the initial balance; 1.0 == 100%.
    pub percent_return: f64,
    pub trade_count: usize,
}

impl ReturnSummary {
    pub fn compute(initial_balance: f64, final_value: f64, trade_count: usize) -> Self {
        let net_profit = final_value - initial_balance;
        let percent_return = if initial_balance > 0.0 {
            net_profit / initial_balance
        } else {
            0.0
        };
        ReturnSummary {
            initial_balance,
            final_value,
            net_profit,
            percent_return,
            trade_count,
        }
    }
}
