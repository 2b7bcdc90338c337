//! Daily price bars and the validated price series built from them.

use crate::domain::error::SignalbenchError;
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl PriceBar {
    pub fn new(date: NaiveDate, high: f64, low: f64, close: f64) -> Self {
        Self {
            date,
            high,
            low,
            close,
        }
    }

    /// max(high - low, |high - prev_close|, |low - prev_close|)
    pub fn true_range(&self, prev_close: f64) -> f64 {
        let hl = self.high - self.low;
        let hc = (self.high - prev_close).abs();
        let lc = (self.low - prev_close).abs();
        hl.max(hc).max(lc)
    }
}

/// Bars sorted by strictly increasing date with positive, finite prices.
///
/// Gaps between dates (weekends, holidays) are allowed and never filled in.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    pub fn new(bars: Vec<PriceBar>) -> Result<Self, SignalbenchError> {
        for (i, bar) in bars.iter().enumerate() {
            check_price(bar, "high", bar.high)?;
            check_price(bar, "low", bar.low)?;
            check_price(bar, "close", bar.close)?;

            if i > 0 && bar.date <= bars[i - 1].date {
                return Err(SignalbenchError::NonMonotonicDates {
                    index: i,
                    date: bar.date,
                    previous: bars[i - 1].date,
                });
            }
        }
        Ok(Self { bars })
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.bars.first().map(|b| b.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(|b| b.date)
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Index of the first bar dated on or after `date`.
    pub fn first_index_on_or_after(&self, date: NaiveDate) -> Option<usize> {
        let idx = self.bars.partition_point(|b| b.date < date);
        (idx < self.bars.len()).then_some(idx)
    }

    /// Bars from `start` onwards. Slicing an ordered series keeps it ordered.
    pub fn slice_from(&self, start: usize) -> PriceSeries {
        PriceSeries {
            bars: self.bars[start.min(self.bars.len())..].to_vec(),
        }
    }
}

fn check_price(bar: &PriceBar, field: &'static str, value: f64) -> Result<(), SignalbenchError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SignalbenchError::InvalidPrice {
            date: bar.date,
            field,
            value,
        })
    }
}
