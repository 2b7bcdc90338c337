//! RSI (Relative Strength Index).
//!
//! Average gain and loss are simple rolling means of the positive and negative
//! parts of the bar-to-bar change over `period` bars (not Wilder smoothing).
//!
//! RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//!
//! Zero average loss:
//! - avg_gain > 0: RSI = 100 (the limit as avg_loss -> 0)
//! - avg_gain == 0 as well (flat window): undefined, there is no ratio to take
//!
//! Warmup: first `period` bars are undefined (`period` changes are needed).

use crate::domain::indicator::rolling::rolling_mean;
use crate::domain::indicator::{Column, diff};

pub fn rsi(closes: &[f64], period: usize) -> Column {
    let changes = diff(closes);
    let gains: Column = changes.iter().map(|c| c.map(|d| d.max(0.0))).collect();
    let losses: Column = changes.iter().map(|c| c.map(|d| (-d).max(0.0))).collect();

    let avg_gain = rolling_mean(&gains, period);
    let avg_loss = rolling_mean(&losses, period);

    avg_gain
        .iter()
        .zip(&avg_loss)
        .map(|(g, l)| match (*g, *l) {
            (Some(g), Some(l)) => relative_strength_index(g, l),
            _ => None,
        })
        .collect()
}

fn relative_strength_index(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    if avg_loss == 0.0 {
        (avg_gain > 0.0).then_some(100.0)
    } else {
        Some(100.0 - (100.0 / (1.0 + avg_gain / avg_loss)))
    }
}
