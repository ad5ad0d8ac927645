//! Plain-text summary of a backtest run.

use std::io::Write;

use crate::domain::error::SmacrossError;
use crate::ports::report_port::{BacktestReport, ReportPort};

/// Writes the summary to stdout. With `show_trades` each fill is listed too.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleReport {
    pub show_trades: bool,
}

impl ConsoleReport {
    pub fn new(show_trades: bool) -> Self {
        Self { show_trades }
    }

    pub fn render(&self, report: &BacktestReport) -> String {
        let s = &report.summary;
        let mut out = String::new();

        out.push_str("FINAL RETURN\n");
        out.push_str(&format!(
            "Initial Balance: {}\n",
            format_currency(s.initial_balance)
        ));
        out.push_str(&format!("Final Balance: {}\n", format_currency(s.final_value)));
        out.push_str(&format!(
            "Net Profit: {} ({:.2}%)\n",
            format_currency(s.net_profit),
            s.percent_return * 100.0
        ));
        out.push_str(&format!("Trades: {}\n", s.trade_count));

        if self.show_trades && !report.result.trades().is_empty() {
            out.push_str("\nDate        Side  Shares        Price          Cash\n");
            for trade in report.result.trades() {
                let date = report
                    .result
                    .trade_date(trade)
                    .map(|d| d.to_string())
                    .unwrap_or_default();
                out.push_str(&format!(
                    "{:<10}  {:<4}  {:>6}  {:>11}  {:>12}\n",
                    date,
                    trade.side,
                    trade.shares,
                    format_currency(trade.price),
                    format_currency(trade.cash_after)
                ));
            }
        }

        out
    }
}

impl ReportPort for ConsoleReport {
    fn write(&self, report: &BacktestReport) -> Result<(), SmacrossError> {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(self.render(report).as_bytes())?;
        stdout.flush()?;
        Ok(())
    }
}

/// `$1,234.50`, `-$0.75`.
pub fn format_currency(value: f64) -> String {
    let formatted = format!("{:.2}", value.abs());
    let (int_part, frac_part) = formatted.split_once('.').unwrap_or((&formatted, "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && formatted != "0.00" {
        "-"
    } else {
        ""
    };
    format!("{sign}${grouped}.{frac_part}")
}
