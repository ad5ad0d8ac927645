//! Configuration validation.
//!
//! Validates every config field before any data is fetched. The `read_*`
//! helpers are shared with the CLI builders so that validation and
//! construction agree on defaults and parsing.

use crate::domain::backtest::DEFAULT_INITIAL_BALANCE;
use crate::domain::error::SmacrossError;
use crate::domain::portfolio::validate_initial_balance;
use crate::domain::strategy::{DEFAULT_LONG_WINDOW, DEFAULT_SHORT_WINDOW, Strategy};
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), SmacrossError> {
    read_symbol(config)?;
    read_date_range(config)?;
    read_initial_balance(config)?;
    Ok(())
}

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), SmacrossError> {
    read_strategy(config)?;
    Ok(())
}

pub fn read_symbol(config: &dyn ConfigPort) -> Result<String, SmacrossError> {
    match config.get_string("data", "symbol") {
        Some(s) if !s.trim().is_empty() => Ok(s.trim().to_uppercase()),
        _ => Err(SmacrossError::ConfigMissing {
            section: "data".to_string(),
            key: "symbol".to_string(),
        }),
    }
}

pub fn read_date_range(config: &dyn ConfigPort) -> Result<(NaiveDate, NaiveDate), SmacrossError> {
    let start_date = parse_date(config.get_string("data", "start_date").as_deref(), "start_date")?;
    let end_date = parse_date(config.get_string("data", "end_date").as_deref(), "end_date")?;

    if start_date >= end_date {
        return Err(SmacrossError::ConfigInvalid {
            section: "data".to_string(),
            key: "start_date".to_string(),
            reason: "start_date must be before end_date".to_string(),
        });
    }
    Ok((start_date, end_date))
}

fn parse_date(value: Option<&str>, field: &str) -> Result<NaiveDate, SmacrossError> {
    match value {
        None => Err(SmacrossError::ConfigMissing {
            section: "data".to_string(),
            key: field.to_string(),
        }),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
            SmacrossError::ConfigInvalid {
                section: "data".to_string(),
                key: field.to_string(),
                reason: format!("invalid {} format, expected YYYY-MM-DD", field),
            }
        }),
    }
}

pub fn read_initial_balance(config: &dyn ConfigPort) -> Result<f64, SmacrossError> {
    let value = match config.get_string("backtest", "initial_balance") {
        None => DEFAULT_INITIAL_BALANCE,
        Some(s) => s.trim().parse::<f64>().map_err(|_| SmacrossError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "initial_balance".to_string(),
            reason: format!("expected a number, got '{}'", s.trim()),
        })?,
    };
    validate_initial_balance(value)?;
    Ok(value)
}

pub fn read_strategy(config: &dyn ConfigPort) -> Result<Strategy, SmacrossError> {
    let short_window = read_window(config, "short_window", DEFAULT_SHORT_WINDOW)?;
    let long_window = read_window(config, "long_window", DEFAULT_LONG_WINDOW)?;
    Strategy::new(short_window, long_window)
}

fn read_window(config: &dyn ConfigPort, key: &str, default: usize) -> Result<usize, SmacrossError> {
    let raw = match config.get_string("strategy", key) {
        None => return Ok(default),
        Some(s) => s,
    };
    let value: i64 = raw.trim().parse().map_err(|_| SmacrossError::ConfigInvalid {
        section: "strategy".to_string(),
        key: key.to_string(),
        reason: format!("expected an integer, got '{}'", raw.trim()),
    })?;
    if value < 1 {
        return Err(SmacrossError::InvalidStrategyParams {
            reason: format!("{} must be positive, got {}", key, value),
        });
    }
    Ok(value as usize)
}
