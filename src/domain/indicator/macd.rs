//! MACD (Moving Average Convergence Divergence).
//!
//! MACD line = EMA(fast) - EMA(slow); signal line = EMA(signal) of the MACD
//! line. All three EMAs are seeded with their first input, so the output is
//! defined from the first bar.

use crate::domain::indicator::ema::ewm_mean;

#[derive(Debug, Clone, PartialEq)]
pub struct MacdLines {
    pub fast_ema: Vec<f64>,
    pub slow_ema: Vec<f64>,
    pub line: Vec<f64>,
    pub signal: Vec<f64>,
}

pub fn macd(closes: &[f64], fast: usize, slow: usize, signal: usize) -> MacdLines {
    let fast_ema = ewm_mean(closes, fast);
    let slow_ema = ewm_mean(closes, slow);
    let line: Vec<f64> = fast_ema.iter().zip(&slow_ema).map(|(f, s)| f - s).collect();
    let signal = ewm_mean(&line, signal);

    MacdLines {
        fast_ema,
        slow_ema,
        line,
        signal,
    }
}
