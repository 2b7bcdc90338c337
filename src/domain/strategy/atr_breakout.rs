//! Average True Range breakout.
//!
//! Bands are the rolling high/low of closes over `breakout_window`, widened by
//! `scale_factor * ATR(atr_window)`. A buy fires when the close breaks above
//! the prior bar's upper band after sitting at or under it; a sell mirrors
//! this on the lower band.

use crate::domain::error::SignalbenchError;
use crate::domain::indicator::atr::{atr, true_range};
use crate::domain::indicator::rolling::{rolling_max, rolling_min};
use crate::domain::indicator::{Column, IndicatorSeries, IndicatorType, Multiplier, defined};
use crate::domain::ohlcv::PriceSeries;
use crate::domain::signal::{SignalFrame, breakouts};
use crate::domain::strategy::{SignalGenerator, require_positive};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtrBreakout {
    pub atr_window: usize,
    pub breakout_window: usize,
    pub scale_factor: f64,
}

impl Default for AtrBreakout {
    fn default() -> Self {
        Self {
            atr_window: 14,
            breakout_window: 20,
            scale_factor: 0.5,
        }
    }
}

fn widen(base: &[Option<f64>], atr: &[Option<f64>], offset: f64) -> Column {
    base.iter()
        .zip(atr)
        .map(|(b, a)| match (b, a) {
            (Some(b), Some(a)) => Some(b + offset * a),
            _ => None,
        })
        .collect()
}

impl SignalGenerator for AtrBreakout {
    fn warmup_length(&self) -> usize {
        self.atr_window.max(self.breakout_window)
    }

    fn validate(&self) -> Result<(), SignalbenchError> {
        require_positive("atr_window", self.atr_window)?;
        require_positive("breakout_window", self.breakout_window)?;
        if !(self.scale_factor.is_finite() && self.scale_factor >= 0.0) {
            return Err(SignalbenchError::invalid_parameter(
                "scale_factor",
                "must be a non-negative number",
            ));
        }
        Ok(())
    }

    fn generate(&self, prices: &PriceSeries) -> SignalFrame {
        let closes = prices.closes();
        let close_column = defined(&closes);

        let tr = true_range(prices);
        let atr_values = atr(prices, self.atr_window);
        let high = rolling_max(&close_column, self.breakout_window);
        let low = rolling_min(&close_column, self.breakout_window);
        let upper = widen(&high, &atr_values, self.scale_factor);
        let lower = widen(&low, &atr_values, -self.scale_factor);

        let signals = breakouts(&closes, &upper, &lower);

        let breakout = self.breakout_window;
        let atr_window = self.atr_window;
        let scale = Multiplier::new(self.scale_factor);
        SignalFrame::new(
            prices.clone(),
            vec![
                IndicatorSeries::new(IndicatorType::TrueRange, tr),
                IndicatorSeries::new(IndicatorType::Atr(atr_window), atr_values),
                IndicatorSeries::new(IndicatorType::RollingHigh(breakout), high),
                IndicatorSeries::new(IndicatorType::RollingLow(breakout), low),
                IndicatorSeries::new(
                    IndicatorType::BreakoutUpper {
                        breakout,
                        atr: atr_window,
                        scale,
                    },
                    upper,
                ),
                IndicatorSeries::new(
                    IndicatorType::BreakoutLower {
                        breakout,
                        atr: atr_window,
                        scale,
                    },
                    lower,
                ),
            ],
            signals,
            self.warmup_length(),
        )
    }
}
