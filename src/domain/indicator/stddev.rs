//! Rolling standard deviation.
//!
//! Sample standard deviation (divides by n-1) over a trailing window.
//! STDDEV(n)[i] = sqrt(sum((C[i-j] - SMA(n)[i])^2 for j in 0..n) / (n-1))
//! Warmup: first (n-1) bars are undefined. A window of 1 has no sample
//! deviation and stays undefined throughout.

use crate::domain::indicator::Column;
use crate::domain::indicator::rolling::rolling_apply;

pub fn rolling_std(values: &[Option<f64>], window: usize) -> Column {
    rolling_apply(values, window, |w| {
        let n = w.len();
        if n < 2 {
            return None;
        }
        let mean = w.iter().sum::<f64>() / n as f64;
        let variance = w
            .iter()
            .map(|x| {
                let diff = x - mean;
                diff * diff
            })
            .sum::<f64>()
            / (n - 1) as f64;
        Some(variance.sqrt())
    })
}
