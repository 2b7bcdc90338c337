//! Exponentially weighted moving average crossover.
//!
//! Same crossing rule as the SMA strategy over EWMA(short) and EWMA(long).
//! The averages are defined from the first bar; the reported warm-up only
//! gives the crossover time to settle before the requested start.

use crate::domain::error::SignalbenchError;
use crate::domain::indicator::ema::ewm_mean;
use crate::domain::indicator::{IndicatorSeries, IndicatorType, defined};
use crate::domain::ohlcv::PriceSeries;
use crate::domain::signal::{SignalFrame, crossings};
use crate::domain::strategy::{SignalGenerator, require_ordered, require_positive};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EwmaCrossover {
    pub short_window: usize,
    pub long_window: usize,
}

impl Default for EwmaCrossover {
    fn default() -> Self {
        Self {
            short_window: 20,
            long_window: 50,
        }
    }
}

impl SignalGenerator for EwmaCrossover {
    fn warmup_length(&self) -> usize {
        self.short_window.max(self.long_window)
    }

    fn validate(&self) -> Result<(), SignalbenchError> {
        require_positive("short_window", self.short_window)?;
        require_positive("long_window", self.long_window)?;
        require_ordered("short_window", self.short_window, "long_window", self.long_window)
    }

    fn generate(&self, prices: &PriceSeries) -> SignalFrame {
        let closes = prices.closes();
        let short = defined(&ewm_mean(&closes, self.short_window));
        let long = defined(&ewm_mean(&closes, self.long_window));
        let signals = crossings(&short, &long);

        SignalFrame::new(
            prices.clone(),
            vec![
                IndicatorSeries::new(IndicatorType::Ema(self.short_window), short),
                IndicatorSeries::new(IndicatorType::Ema(self.long_window), long),
            ],
            signals,
            self.warmup_length(),
        )
    }
}
