//! CSV file price data adapter.
//!
//! Reads `<base_path>/<SYMBOL>.csv`. The header row must name a `date` and a
//! `close` column (any case); other columns are ignored, so vendor exports
//! with open/high/low/adj close/volume load as-is. Missing closes (empty,
//! `NaN`, `null`, `NA`) are passed through as NaN for the domain to reject.

use crate::domain::error::SmacrossError;
use crate::domain::price::PricePoint;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }

    fn read_all(&self, symbol: &str) -> Result<Vec<PricePoint>, SmacrossError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| SmacrossError::DataSource {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());

        let headers = rdr.headers().map_err(|e| SmacrossError::DataSource {
            reason: format!("CSV header error: {}", e),
        })?;
        let date_col = find_column(headers, "date")?;
        let close_col = find_column(headers, "close")?;

        let mut prices = Vec::new();
        for (row, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| SmacrossError::DataSource {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = record.get(date_col).unwrap_or_default();
            let date = parse_date(date_str).ok_or_else(|| SmacrossError::DataSource {
                reason: format!("invalid date '{}' on row {}", date_str, row + 1),
            })?;

            let close_str = record.get(close_col).unwrap_or_default();
            let close = parse_close(close_str).ok_or_else(|| SmacrossError::DataSource {
                reason: format!("invalid close value '{}' on row {}", close_str, row + 1),
            })?;

            prices.push(PricePoint { date, close });
        }

        prices.sort_by_key(|p| p.date);
        Ok(prices)
    }
}

fn find_column(headers: &csv::StringRecord, name: &str) -> Result<usize, SmacrossError> {
    headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case(name))
        .ok_or_else(|| SmacrossError::DataSource {
            reason: format!("missing {} column", name),
        })
}

/// `YYYY-MM-DD`, optionally followed by a time component.
fn parse_date(value: &str) -> Option<NaiveDate> {
    let day = value.get(..10).unwrap_or(value);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

fn parse_close(value: &str) -> Option<f64> {
    match value.to_ascii_lowercase().as_str() {
        "" | "nan" | "null" | "na" => Some(f64::NAN),
        v => v.parse().ok(),
    }
}

impl DataPort for CsvAdapter {
    fn fetch_closes(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PricePoint>, SmacrossError> {
        let prices = self.read_all(symbol)?;
        Ok(prices
            .into_iter()
            .filter(|p| p.date >= start_date && p.date < end_date)
            .collect())
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, SmacrossError> {
        let prices = self.read_all(symbol)?;
        Ok(match (prices.first(), prices.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date, prices.len())),
            _ => None,
        })
    }
}
