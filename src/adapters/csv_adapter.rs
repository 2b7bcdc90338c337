//! CSV file data adapter.
//!
//! One file per ticker, `<TICKER>.csv`, with a header row. Columns are found
//! by name (case-insensitive): `date`, `high`, `low`, `close`. Any other
//! columns (`open`, `adj close`, `volume`, ...) are ignored.

use crate::domain::error::SignalbenchError;
use crate::domain::ohlcv::PriceBar;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

pub struct CsvAdapter {
    base_path: PathBuf,
}

struct Columns {
    date: usize,
    high: usize,
    low: usize,
    close: usize,
}

impl Columns {
    fn locate(headers: &csv::StringRecord) -> Result<Self, SignalbenchError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .ok_or_else(|| SignalbenchError::DataSource {
                    reason: format!("missing {} column", name),
                })
        };
        Ok(Self {
            date: find("date")?,
            high: find("high")?,
            low: find("low")?,
            close: find("close")?,
        })
    }
}

fn parse_price(value: &str, field: &str, line: u64) -> Result<f64, SignalbenchError> {
    value
        .trim()
        .parse()
        .map_err(|e| SignalbenchError::DataSource {
            reason: format!("invalid {} value '{}' on line {}: {}", field, value, line, e),
        })
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, ticker: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", ticker))
    }

    /// Every complete row in the file, sorted by date.
    fn read_all(&self, ticker: &str) -> Result<Vec<PriceBar>, SignalbenchError> {
        let path = self.csv_path(ticker);
        let content = fs::read_to_string(&path).map_err(|e| SignalbenchError::DataSource {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr.headers().map_err(|e| SignalbenchError::DataSource {
            reason: format!("CSV header error: {}", e),
        })?;
        let columns = Columns::locate(headers)?;

        let mut bars = Vec::new();
        let mut dropped = 0usize;

        for result in rdr.records() {
            let record = result.map_err(|e| SignalbenchError::DataSource {
                reason: format!("CSV parse error: {}", e),
            })?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);

            let fields = [columns.date, columns.high, columns.low, columns.close]
                .map(|i| record.get(i).map(str::trim).unwrap_or(""));
            if fields.iter().any(|f| f.is_empty()) {
                dropped += 1;
                continue;
            }
            let [date_str, high, low, close] = fields;

            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                SignalbenchError::DataSource {
                    reason: format!("invalid date '{}' on line {}: {}", date_str, line, e),
                }
            })?;

            bars.push(PriceBar::new(
                date,
                parse_price(high, "high", line)?,
                parse_price(low, "low", line)?,
                parse_price(close, "close", line)?,
            ));
        }

        if dropped > 0 {
            debug!(ticker, dropped, "dropped rows with missing fields");
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }
}

impl DataPort for CsvAdapter {
    fn fetch_bars(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceBar>, SignalbenchError> {
        let mut bars = self.read_all(ticker)?;
        bars.retain(|b| b.date >= start_date && b.date <= end_date);
        Ok(bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, SignalbenchError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| SignalbenchError::DataSource {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|e| SignalbenchError::DataSource {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();

            if let Some(ticker) = name_str.strip_suffix(".csv") {
                symbols.push(ticker.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, SignalbenchError> {
        let bars = self.read_all(ticker)?;
        Ok(match (bars.first(), bars.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date, bars.len())),
            _ => None,
        })
    }
}
