//! Domain error types.

use chrono::NaiveDate;

/// Top-level error type for smacross.
#[derive(Debug, thiserror::Error)]
pub enum SmacrossError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("invalid strategy parameters: {reason}")]
    InvalidStrategyParams { reason: String },

    #[error("data source error: {reason}")]
    DataSource { reason: String },

    #[error("no data for {symbol}")]
    NoData { symbol: String },

    #[error(
        "insufficient history for requested windows: {symbol} has {bars} bars, need {minimum}"
    )]
    InsufficientData {
        symbol: String,
        bars: usize,
        minimum: usize,
    },

    #[error("incomplete price data at index {index} ({date})")]
    IncompletePriceData { index: usize, date: NaiveDate },

    #[error("non-positive price at index {index}: {price}")]
    NonPositivePrice { index: usize, price: f64 },

    #[error("price series out of order at index {index} ({date})")]
    UnorderedSeries { index: usize, date: NaiveDate },

    #[error("position too large: {cash} at {price} exceeds the share count limit")]
    ShareOverflow { cash: f64, price: f64 },

    #[error("length mismatch: {prices} prices, {signals} signals")]
    LengthMismatch { prices: usize, signals: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&SmacrossError> for std::process::ExitCode {
    fn from(err: &SmacrossError) -> Self {
        let code: u8 = match err {
            SmacrossError::Io(_) => 1,
            SmacrossError::ConfigParse { .. }
            | SmacrossError::ConfigMissing { .. }
            | SmacrossError::ConfigInvalid { .. } => 2,
            SmacrossError::DataSource { .. } => 3,
            SmacrossError::InvalidStrategyParams { .. } => 4,
            SmacrossError::NoData { .. }
            | SmacrossError::InsufficientData { .. }
            | SmacrossError::IncompletePriceData { .. }
            | SmacrossError::NonPositivePrice { .. }
            | SmacrossError::UnorderedSeries { .. }
            | SmacrossError::ShareOverflow { .. }
            | SmacrossError::LengthMismatch { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
