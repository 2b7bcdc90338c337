//! Trailing-window aggregates: mean, max, min.
//!
//! Output at bar i covers bars (i-window, i]. The first (window-1) bars are
//! undefined, and so is any window that contains an undefined input.

use crate::domain::indicator::Column;

/// Applies `f` to each complete, fully-defined trailing window.
pub(crate) fn rolling_apply<F>(values: &[Option<f64>], window: usize, f: F) -> Column
where
    F: Fn(&[f64]) -> Option<f64>,
{
    let mut out = Vec::with_capacity(values.len());
    let mut buf: Vec<f64> = Vec::with_capacity(window.min(values.len()));

    for i in 0..values.len() {
        if window == 0 || i + 1 < window {
            out.push(None);
            continue;
        }
        buf.clear();
        let complete = values[i + 1 - window..=i].iter().all(|v| match v {
            Some(x) => {
                buf.push(*x);
                true
            }
            None => false,
        });
        out.push(if complete { f(&buf) } else { None });
    }

    out
}

/// Mean taken as offsets from the window's first value; exact for flat windows.
pub fn rolling_mean(values: &[Option<f64>], window: usize) -> Column {
    rolling_apply(values, window, |w| {
        let base = w[0];
        Some(base + w.iter().map(|x| x - base).sum::<f64>() / w.len() as f64)
    })
}

pub fn rolling_max(values: &[Option<f64>], window: usize) -> Column {
    rolling_apply(values, window, |w| w.iter().copied().reduce(f64::max))
}

pub fn rolling_min(values: &[Option<f64>], window: usize) -> Column {
    rolling_apply(values, window, |w| w.iter().copied().reduce(f64::min))
}
