//! Technical indicator implementations.
//!
//! Every indicator is a pure function from input columns to an output column
//! aligned bar-for-bar with its input:
//! - `Column`: one `Option<f64>` per bar, `None` while the indicator has not
//!   accumulated enough history
//! - `IndicatorType`: indicator identity + parameters, doubles as column header
//! - `IndicatorSeries`: a named column attached to a signal frame

pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rolling;
pub mod rsi;
pub mod stddev;

use std::fmt;

pub type Column = Vec<Option<f64>>;

/// Wraps fully-defined values (e.g. closing prices) as a column.
pub fn defined(values: &[f64]) -> Column {
    values.iter().copied().map(Some).collect()
}

/// Shifts a column `n` bars later; the first `n` entries become undefined.
pub fn lag(values: &[Option<f64>], n: usize) -> Column {
    (0..values.len())
        .map(|i| if i >= n { values[i - n] } else { None })
        .collect()
}

/// Bar-to-bar difference; undefined at the first bar.
pub fn diff(values: &[f64]) -> Column {
    (0..values.len())
        .map(|i| (i > 0).then(|| values[i] - values[i - 1]))
        .collect()
}

/// Band width multiplier, keyed by its exact bit pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Multiplier(u64);

impl Multiplier {
    pub fn new(value: f64) -> Self {
        // -0.0 folds into 0.0
        Self((value + 0.0).to_bits())
    }

    pub fn value(self) -> f64 {
        f64::from_bits(self.0)
    }
}

impl fmt::Display for Multiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Ema(usize),
    Stddev(usize),
    Rsi(usize),
    TrueRange,
    Atr(usize),
    RollingHigh(usize),
    RollingLow(usize),
    Macd {
        fast: usize,
        slow: usize,
    },
    MacdSignal {
        fast: usize,
        slow: usize,
        signal: usize,
    },
    BollingerUpper {
        period: usize,
        stddev_mult: Multiplier,
    },
    BollingerLower {
        period: usize,
        stddev_mult: Multiplier,
    },
    BreakoutUpper {
        breakout: usize,
        atr: usize,
        scale: Multiplier,
    },
    BreakoutLower {
        breakout: usize,
        atr: usize,
        scale: Multiplier,
    },
}

impl IndicatorType {
    /// Number of leading bars the column leaves undefined by construction.
    pub fn warmup(&self) -> usize {
        match self {
            IndicatorType::Sma(n)
            | IndicatorType::Stddev(n)
            | IndicatorType::RollingHigh(n)
            | IndicatorType::RollingLow(n) => n.saturating_sub(1),
            IndicatorType::BollingerUpper { period, .. }
            | IndicatorType::BollingerLower { period, .. } => period.saturating_sub(1),
            IndicatorType::Ema(_) | IndicatorType::Macd { .. } | IndicatorType::MacdSignal { .. } => {
                0
            }
            IndicatorType::Rsi(n) | IndicatorType::Atr(n) => *n,
            IndicatorType::TrueRange => 1,
            IndicatorType::BreakoutUpper { breakout, atr, .. }
            | IndicatorType::BreakoutLower { breakout, atr, .. } => {
                breakout.saturating_sub(1).max(*atr)
            }
        }
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Ema(period) => write!(f, "EMA({})", period),
            IndicatorType::Stddev(period) => write!(f, "STDDEV({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::TrueRange => write!(f, "TR"),
            IndicatorType::Atr(period) => write!(f, "ATR({})", period),
            IndicatorType::RollingHigh(period) => write!(f, "HIGH({})", period),
            IndicatorType::RollingLow(period) => write!(f, "LOW({})", period),
            IndicatorType::Macd { fast, slow } => write!(f, "MACD({},{})", fast, slow),
            IndicatorType::MacdSignal { fast, slow, signal } => {
                write!(f, "MACD_SIGNAL({},{},{})", fast, slow, signal)
            }
            IndicatorType::BollingerUpper {
                period,
                stddev_mult,
            } => write!(f, "BOLLINGER_UPPER({},{})", period, stddev_mult),
            IndicatorType::BollingerLower {
                period,
                stddev_mult,
            } => write!(f, "BOLLINGER_LOWER({},{})", period, stddev_mult),
            IndicatorType::BreakoutUpper {
                breakout,
                atr,
                scale,
            } => write!(
                f,
                "BREAKOUT_UPPER({},{},{})",
                breakout,
                atr,
                scale
            ),
            IndicatorType::BreakoutLower {
                breakout,
                atr,
                scale,
            } => write!(
                f,
                "BREAKOUT_LOWER({},{},{})",
                breakout,
                atr,
                scale
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Column,
}

impl IndicatorSeries {
    pub fn new(indicator_type: IndicatorType, values: Column) -> Self {
        Self {
            indicator_type,
            values,
        }
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }
}
