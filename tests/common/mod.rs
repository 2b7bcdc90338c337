#![allow(dead_code)]

use chrono::NaiveDate;
use signalbench::domain::error::SignalbenchError;
pub use signalbench::domain::ohlcv::{PriceBar, PriceSeries};
use signalbench::ports::data_port::DataPort;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<PriceBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, ticker: &str, bars: Vec<PriceBar>) -> Self {
        self.data.insert(ticker.to_string(), bars);
        self
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_bars(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceBar>, SignalbenchError> {
        if let Some(reason) = self.errors.get(ticker) {
            return Err(SignalbenchError::DataSource {
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(ticker)
            .map(|bars| {
                bars.iter()
                    .filter(|b| b.date >= start_date && b.date <= end_date)
                    .copied()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn list_symbols(&self) -> Result<Vec<String>, SignalbenchError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, SignalbenchError> {
        if let Some(reason) = self.errors.get(ticker) {
            return Err(SignalbenchError::DataSource {
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(ticker)
            .and_then(|bars| Some((bars.first()?.date, bars.last()?.date, bars.len()))))
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// One bar per calendar day from `start`, high/low one unit either side.
pub fn bars_from_closes(start: NaiveDate, closes: &[f64]) -> Vec<PriceBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            PriceBar::new(
                start + chrono::Duration::days(i as i64),
                c + 1.0,
                (c - 1.0).max(c * 0.5),
                c,
            )
        })
        .collect()
}

pub fn series_from_closes(closes: &[f64]) -> PriceSeries {
    PriceSeries::new(bars_from_closes(date(2024, 1, 1), closes)).unwrap()
}

/// Linear ramp: `count` closes from `start_price`, stepping by `step`.
pub fn ramp(count: usize, start_price: f64, step: f64) -> Vec<f64> {
    (0..count).map(|i| start_price + step * i as f64).collect()
}

/// Rises for `count / 2` bars then falls back, stepping by `step`.
pub fn rise_then_fall(count: usize, start_price: f64, step: f64) -> Vec<f64> {
    let peak = count / 2;
    (0..count)
        .map(|i| {
            let steps = if i <= peak { i } else { 2 * peak - i };
            start_price + step * steps as f64
        })
        .collect()
}

pub fn csv_content(bars: &[PriceBar]) -> String {
    let mut out = String::from("Date,Open,High,Low,Close,Adj Close,Volume\n");
    for bar in bars {
        out.push_str(&format!(
            "{},{},{},{},{},{},1000\n",
            bar.date.format("%Y-%m-%d"),
            bar.close,
            bar.high,
            bar.low,
            bar.close,
            bar.close
        ));
    }
    out
}
