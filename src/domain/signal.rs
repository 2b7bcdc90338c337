//! Trade signals and the frame that carries them alongside prices and
//! indicators.
//!
//! # Trigger semantics
//!
//! - `crossings`: `Buy` on the first bar `left > right` after a bar where it
//!   was not (an undefined prior bar counts as "not"); `Sell` symmetric.
//! - `breakouts`: compares today's value with the *previous* bar's band, and
//!   yesterday's value with the band two bars back, so no bar sees its own band.
//! - `rising_edges`: true only where a condition goes from false to true.
//! - `combine`: a sell event overrides a buy event on the same bar.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::PriceSeries;
use crate::domain::position::{Position, derive_positions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Signal {
    Sell,
    #[default]
    Hold,
    Buy,
}

impl Signal {
    pub fn value(self) -> i8 {
        match self {
            Signal::Sell => -1,
            Signal::Hold => 0,
            Signal::Buy => 1,
        }
    }

    pub fn is_event(self) -> bool {
        self != Signal::Hold
    }
}

/// Prices with indicator columns, signals and positions, all bar-aligned.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalFrame {
    prices: PriceSeries,
    indicators: Vec<IndicatorSeries>,
    signals: Vec<Signal>,
    positions: Vec<Position>,
    warmup: usize,
    offset: usize,
}

impl SignalFrame {
    /// Builds the frame and derives positions from `signals`.
    ///
    /// Every indicator column and the signal vector must be as long as `prices`.
    pub fn new(
        prices: PriceSeries,
        indicators: Vec<IndicatorSeries>,
        signals: Vec<Signal>,
        warmup: usize,
    ) -> Self {
        debug_assert_eq!(signals.len(), prices.len());
        debug_assert!(indicators.iter().all(|s| s.values.len() == prices.len()));

        let positions = derive_positions(&signals);
        Self {
            prices,
            indicators,
            signals,
            positions,
            warmup,
            offset: 0,
        }
    }

    pub fn prices(&self) -> &PriceSeries {
        &self.prices
    }

    pub fn indicators(&self) -> &[IndicatorSeries] {
        &self.indicators
    }

    pub fn indicator(&self, indicator_type: &IndicatorType) -> Option<&IndicatorSeries> {
        self.indicators
            .iter()
            .find(|s| &s.indicator_type == indicator_type)
    }

    pub fn signals(&self) -> &[Signal] {
        &self.signals
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// Strategy warm-up: the largest window parameter in use.
    pub fn warmup(&self) -> usize {
        self.warmup
    }

    /// Bars removed from the front of the frame as first generated.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Leading bars of this frame on which some indicator column is still
    /// inside its construction warm-up.
    pub fn undefined_prefix(&self) -> usize {
        self.indicators
            .iter()
            .map(|s| s.indicator_type.warmup())
            .max()
            .unwrap_or(0)
            .saturating_sub(self.offset)
            .min(self.len())
    }

    /// A new frame holding bars `start..`. Positions are sliced, not
    /// re-derived, so a position opened before `start` is still held.
    pub fn slice_from(&self, start: usize) -> SignalFrame {
        let start = start.min(self.len());
        SignalFrame {
            prices: self.prices.slice_from(start),
            indicators: self
                .indicators
                .iter()
                .map(|s| IndicatorSeries::new(s.indicator_type.clone(), s.values[start..].to_vec()))
                .collect(),
            signals: self.signals[start..].to_vec(),
            positions: self.positions[start..].to_vec(),
            warmup: self.warmup,
            offset: self.offset + start,
        }
    }

    pub fn buy_count(&self) -> usize {
        self.signals.iter().filter(|s| **s == Signal::Buy).count()
    }

    pub fn sell_count(&self) -> usize {
        self.signals.iter().filter(|s| **s == Signal::Sell).count()
    }
}

fn above(a: Option<f64>, b: Option<f64>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a > b)
}

fn below(a: Option<f64>, b: Option<f64>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a < b)
}

/// Strict crossings of `left` over/under `right`.
pub fn crossings(left: &[Option<f64>], right: &[Option<f64>]) -> Vec<Signal> {
    let n = left.len().min(right.len());
    let prev = |i: usize| -> (Option<f64>, Option<f64>) {
        if i == 0 {
            (None, None)
        } else {
            (left[i - 1], right[i - 1])
        }
    };

    let buys: Vec<bool> = (0..n)
        .map(|i| {
            let (lp, rp) = prev(i);
            above(left[i], right[i]) && !above(lp, rp)
        })
        .collect();
    let sells: Vec<bool> = (0..n)
        .map(|i| {
            let (lp, rp) = prev(i);
            below(left[i], right[i]) && !below(lp, rp)
        })
        .collect();

    combine(&buys, &sells)
}

/// Breaks of `values` through the prior bar's `upper`/`lower` band.
pub fn breakouts(values: &[f64], upper: &[Option<f64>], lower: &[Option<f64>]) -> Vec<Signal> {
    let n = values.len();
    let at = |band: &[Option<f64>], i: usize, back: usize| -> Option<f64> {
        i.checked_sub(back).and_then(|j| band.get(j).copied().flatten())
    };
    let value_at = |i: usize, back: usize| -> Option<f64> { i.checked_sub(back).map(|j| values[j]) };

    let buys: Vec<bool> = (0..n)
        .map(|i| {
            above(value_at(i, 0), at(upper, i, 1))
                && matches!((value_at(i, 1), at(upper, i, 2)), (Some(v), Some(b)) if v <= b)
        })
        .collect();
    let sells: Vec<bool> = (0..n)
        .map(|i| {
            below(value_at(i, 0), at(lower, i, 1))
                && matches!((value_at(i, 1), at(lower, i, 2)), (Some(v), Some(b)) if v >= b)
        })
        .collect();

    combine(&buys, &sells)
}

/// True where `conditions` turns true after being false (or at bar 0).
pub fn rising_edges(conditions: &[bool]) -> Vec<bool> {
    conditions
        .iter()
        .enumerate()
        .map(|(i, &c)| c && (i == 0 || !conditions[i - 1]))
        .collect()
}

pub fn combine(buys: &[bool], sells: &[bool]) -> Vec<Signal> {
    buys.iter()
        .zip(sells)
        .map(|(&b, &s)| match (b, s) {
            (_, true) => Signal::Sell,
            (true, false) => Signal::Buy,
            (false, false) => Signal::Hold,
        })
        .collect()
}
