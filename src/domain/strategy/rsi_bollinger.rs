//! RSI + Bollinger Bands mean reversion.
//!
//! Buy condition:  RSI < 30 and close <= lower band.
//! Sell condition: RSI > 70 and close >= upper band.
//! Signals are edge-triggered: they fire on the bar a condition becomes true,
//! not on every bar it stays true. An undefined RSI or band makes the
//! condition false.

use crate::domain::error::SignalbenchError;
use crate::domain::indicator::bollinger::{DEFAULT_PERIOD, DEFAULT_STDDEV_MULT, bollinger_bands};
use crate::domain::indicator::rsi::rsi;
use crate::domain::indicator::{IndicatorSeries, IndicatorType, Multiplier};
use crate::domain::ohlcv::PriceSeries;
use crate::domain::signal::{SignalFrame, combine, rising_edges};
use crate::domain::strategy::{SignalGenerator, require_positive};

pub const OVERSOLD: f64 = 30.0;
pub const OVERBOUGHT: f64 = 70.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RsiBollinger {
    pub rsi_period: usize,
    pub bollinger_window: usize,
    pub num_std_dev: f64,
}

impl Default for RsiBollinger {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            bollinger_window: DEFAULT_PERIOD,
            num_std_dev: DEFAULT_STDDEV_MULT,
        }
    }
}

impl RsiBollinger {
    pub fn with_rsi_period(rsi_period: usize) -> Self {
        Self {
            rsi_period,
            ..Self::default()
        }
    }
}

impl SignalGenerator for RsiBollinger {
    fn warmup_length(&self) -> usize {
        self.rsi_period.max(self.bollinger_window)
    }

    fn validate(&self) -> Result<(), SignalbenchError> {
        require_positive("rsi_period", self.rsi_period)?;
        require_positive("bollinger_window", self.bollinger_window)?;
        if !(self.num_std_dev.is_finite() && self.num_std_dev > 0.0) {
            return Err(SignalbenchError::invalid_parameter(
                "num_std_dev",
                "must be a positive number",
            ));
        }
        Ok(())
    }

    fn generate(&self, prices: &PriceSeries) -> SignalFrame {
        let closes = prices.closes();
        let bands = bollinger_bands(&closes, self.bollinger_window, self.num_std_dev);
        let rsi_values = rsi(&closes, self.rsi_period);

        let buy_condition: Vec<bool> = (0..closes.len())
            .map(|i| match (rsi_values[i], bands.lower[i]) {
                (Some(r), Some(lower)) => r < OVERSOLD && closes[i] <= lower,
                _ => false,
            })
            .collect();
        let sell_condition: Vec<bool> = (0..closes.len())
            .map(|i| match (rsi_values[i], bands.upper[i]) {
                (Some(r), Some(upper)) => r > OVERBOUGHT && closes[i] >= upper,
                _ => false,
            })
            .collect();

        let signals = combine(&rising_edges(&buy_condition), &rising_edges(&sell_condition));

        let period = self.bollinger_window;
        let stddev_mult = Multiplier::new(self.num_std_dev);
        SignalFrame::new(
            prices.clone(),
            vec![
                IndicatorSeries::new(IndicatorType::Sma(period), bands.middle),
                IndicatorSeries::new(IndicatorType::Stddev(period), bands.stddev),
                IndicatorSeries::new(
                    IndicatorType::BollingerUpper {
                        period,
                        stddev_mult,
                    },
                    bands.upper,
                ),
                IndicatorSeries::new(
                    IndicatorType::BollingerLower {
                        period,
                        stddev_mult,
                    },
                    bands.lower,
                ),
                IndicatorSeries::new(IndicatorType::Rsi(self.rsi_period), rsi_values),
            ],
            signals,
            self.warmup_length(),
        )
    }
}
