//! Simple moving average crossover.
//!
//! Buy when SMA(short) crosses above SMA(long); sell when it crosses below.
//! No signal while either mean is still undefined.

use crate::domain::error::SignalbenchError;
use crate::domain::indicator::rolling::rolling_mean;
use crate::domain::indicator::{IndicatorSeries, IndicatorType, defined};
use crate::domain::ohlcv::PriceSeries;
use crate::domain::signal::{SignalFrame, crossings};
use crate::domain::strategy::{SignalGenerator, require_ordered, require_positive};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmaCrossover {
    pub short_window: usize,
    pub long_window: usize,
}

impl Default for SmaCrossover {
    fn default() -> Self {
        Self {
            short_window: 20,
            long_window: 50,
        }
    }
}

impl SignalGenerator for SmaCrossover {
    fn warmup_length(&self) -> usize {
        self.short_window.max(self.long_window)
    }

    fn validate(&self) -> Result<(), SignalbenchError> {
        require_positive("short_window", self.short_window)?;
        require_positive("long_window", self.long_window)?;
        require_ordered("short_window", self.short_window, "long_window", self.long_window)
    }

    fn generate(&self, prices: &PriceSeries) -> SignalFrame {
        let closes = defined(&prices.closes());
        let short = rolling_mean(&closes, self.short_window);
        let long = rolling_mean(&closes, self.long_window);
        let signals = crossings(&short, &long);

        SignalFrame::new(
            prices.clone(),
            vec![
                IndicatorSeries::new(IndicatorType::Sma(self.short_window), short),
                IndicatorSeries::new(IndicatorType::Sma(self.long_window), long),
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
    use crate::domain::position::Position;
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

    fn sma(short: usize, long: usize) -> SmaCrossover {
        SmaCrossover {
            short_window: short,
            long_window: long,
        }
    }

    #[test]
    fn rising_prices_buy_once() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let frame = sma(2, 5).generate(&prices(&closes));

        assert_eq!(frame.buy_count(), 1);
        assert_eq!(frame.sell_count(), 0);
        // long mean first defined at bar 4, short mean already above it
        assert_eq!(frame.signals()[4], Signal::Buy);
        assert!(frame.positions()[4..].iter().all(|p| *p == Position::Long));
        assert!(frame.positions()[..4].iter().all(|p| *p == Position::Flat));
    }

    #[test]
    fn falling_then_rising_flips() {
        let mut closes: Vec<f64> = (0..15).map(|i| 120.0 - i as f64).collect();
        closes.extend((0..15).map(|i| 106.0 + 2.0 * i as f64));
        let frame = sma(2, 5).generate(&prices(&closes));

        assert_eq!(frame.signals()[4], Signal::Sell);
        assert_eq!(frame.sell_count(), 1);
        assert_eq!(frame.buy_count(), 1);
        assert_eq!(*frame.positions().last().unwrap(), Position::Long);
    }

    #[test]
    fn constant_prices_never_signal() {
        let frame = sma(2, 5).generate(&prices(&[100.0; 20]));
        assert!(frame.signals().iter().all(|s| *s == Signal::Hold));
    }

    #[test]
    fn indicator_columns() {
        let frame = sma(3, 5).generate(&prices(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]));
        let short = frame.indicator(&IndicatorType::Sma(3)).unwrap();
        let long = frame.indicator(&IndicatorType::Sma(5)).unwrap();

        assert_eq!(short.values.iter().take_while(|v| v.is_none()).count(), 2);
        assert_eq!(long.values.iter().take_while(|v| v.is_none()).count(), 4);
        assert_eq!(frame.warmup(), 5);
    }

    #[test]
    fn validation() {
        assert!(sma(5, 10).validate().is_ok());
        assert!(sma(0, 10).validate().is_err());
        assert!(sma(10, 10).validate().is_err());
        assert!(sma(20, 10).validate().is_err());
    }
}
