//! MACD signal-line crossover.
//!
//! Buy when the MACD line crosses above its signal line, sell when it crosses
//! below. Warm-up is the largest of the three spans.

use crate::domain::error::SignalbenchError;
use crate::domain::indicator::macd::macd;
use crate::domain::indicator::{IndicatorSeries, IndicatorType, defined};
use crate::domain::ohlcv::PriceSeries;
use crate::domain::signal::{SignalFrame, crossings};
use crate::domain::strategy::{SignalGenerator, require_ordered, require_positive};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacdCrossover {
    pub short_window: usize,
    pub long_window: usize,
    pub signal_window: usize,
}

impl Default for MacdCrossover {
    fn default() -> Self {
        Self {
            short_window: 12,
            long_window: 26,
            signal_window: 9,
        }
    }
}

impl SignalGenerator for MacdCrossover {
    fn warmup_length(&self) -> usize {
        self.short_window
            .max(self.long_window)
            .max(self.signal_window)
    }

    fn validate(&self) -> Result<(), SignalbenchError> {
        require_positive("short_window", self.short_window)?;
        require_positive("long_window", self.long_window)?;
        require_positive("signal_window", self.signal_window)?;
        require_ordered("short_window", self.short_window, "long_window", self.long_window)
    }

    fn generate(&self, prices: &PriceSeries) -> SignalFrame {
        let lines = macd(
            &prices.closes(),
            self.short_window,
            self.long_window,
            self.signal_window,
        );
        let line = defined(&lines.line);
        let signal_line = defined(&lines.signal);
        let signals = crossings(&line, &signal_line);

        SignalFrame::new(
            prices.clone(),
            vec![
                IndicatorSeries::new(IndicatorType::Ema(self.short_window), defined(&lines.fast_ema)),
                IndicatorSeries::new(IndicatorType::Ema(self.long_window), defined(&lines.slow_ema)),
                IndicatorSeries::new(
                    IndicatorType::Macd {
                        fast: self.short_window,
                        slow: self.long_window,
                    },
                    line,
                ),
                IndicatorSeries::new(
                    IndicatorType::MacdSignal {
                        fast: self.short_window,
                        slow: self.long_window,
                        signal: self.signal_window,
                    },
                    signal_line,
                ),
            ],
            signals,
            self.warmup_length(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ohlcv::PriceBar;
    use crate::domain::signal::Signal;
    use chrono::{Duration, NaiveDate};

    fn prices(closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| PriceBar::new(start + Duration::days(i as i64), c + 1.0, c - 1.0, c))
            .collect();
        PriceSeries::new(bars).unwrap()
    }

    fn params(short: usize, long: usize, signal: usize) -> MacdCrossover {
        MacdCrossover {
            short_window: short,
            long_window: long,
            signal_window: signal,
        }
    }

    #[test]
    fn warmup_is_largest_span() {
        assert_eq!(params(12, 26, 9).warmup_length(), 26);
        assert_eq!(params(3, 5, 9).warmup_length(), 9);
    }

    #[test]
    fn uptrend_then_downtrend() {
        let mut closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        closes.extend((0..30).map(|i| 128.0 - 2.0 * i as f64));
        let frame = params(3, 6, 4).generate(&prices(&closes));

        assert_eq!(frame.signals()[0], Signal::Hold);
        assert_eq!(frame.buy_count(), 1);
        assert_eq!(frame.sell_count(), 1);

        let buy_at = frame.signals().iter().position(|s| *s == Signal::Buy).unwrap();
        let sell_at = frame.signals().iter().position(|s| *s == Signal::Sell).unwrap();
        assert!(buy_at < 30);
        assert!(sell_at >= 30);
    }

    #[test]
    fn columns_present() {
        let frame = params(3, 6, 4).generate(&prices(&[10.0, 11.0, 10.5]));
        assert!(frame.indicator(&IndicatorType::Macd { fast: 3, slow: 6 }).is_some());
        assert!(
            frame
                .indicator(&IndicatorType::MacdSignal {
                    fast: 3,
                    slow: 6,
                    signal: 4
                })
                .is_some()
        );
        assert_eq!(frame.indicators().len(), 4);
    }

    #[test]
    fn constant_prices_never_signal() {
        let frame = params(3, 6, 4).generate(&prices(&[73.25; 40]));
        assert!(frame.signals().iter().all(|s| *s == Signal::Hold));
    }

    #[test]
    fn validation() {
        assert!(params(12, 26, 9).validate().is_ok());
        assert!(params(12, 26, 0).validate().is_err());
        assert!(params(26, 12, 9).validate().is_err());
    }
}
