//! Bollinger Bands.
//!
//! Bollinger Bands consist of:
//! - Middle: Simple Moving Average (SMA) over n periods
//! - Upper: Middle + (multiplier × StdDev)
//! - Lower: Middle - (multiplier × StdDev)
//!
//! Where StdDev is the sample standard deviation (divides by N-1).
//!
//! Default parameters: period=20, multiplier=2.0
//! Warmup: first (period-1) bars are undefined.

use crate::domain::indicator::rolling::rolling_mean;
use crate::domain::indicator::stddev::rolling_std;
use crate::domain::indicator::{Column, defined};

pub const DEFAULT_PERIOD: usize = 20;
pub const DEFAULT_STDDEV_MULT: f64 = 2.0;

#[derive(Debug, Clone, PartialEq)]
pub struct BollingerBands {
    pub middle: Column,
    pub stddev: Column,
    pub upper: Column,
    pub lower: Column,
}

pub fn bollinger_bands(closes: &[f64], period: usize, mult: f64) -> BollingerBands {
    let input = defined(closes);
    let middle = rolling_mean(&input, period);
    let stddev = rolling_std(&input, period);

    let band = |sign: f64| -> Column {
        middle
            .iter()
            .zip(&stddev)
            .map(|(m, s)| Some(m.as_ref()? + sign * mult * s.as_ref()?))
            .collect()
    };
    let upper = band(1.0);
    let lower = band(-1.0);

    BollingerBands {
        middle,
        stddev,
        upper,
        lower,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn bollinger_warmup() {
        let bands = bollinger_bands(&[10.0, 20.0, 30.0, 40.0, 50.0], 3, 2.0);

        for col in [&bands.middle, &bands.upper, &bands.lower] {
            assert!(col[0].is_none());
            assert!(col[1].is_none());
            assert!(col[2].is_some());
        }
    }

    #[test]
    fn bollinger_constant_prices_collapse() {
        let bands = bollinger_bands(&[100.0; 5], 3, 2.0);
        assert_relative_eq!(bands.upper[4].unwrap(), 100.0);
        assert_relative_eq!(bands.middle[4].unwrap(), 100.0);
        assert_relative_eq!(bands.lower[4].unwrap(), 100.0);
    }

    #[test]
    fn bollinger_band_width() {
        let bands = bollinger_bands(&[10.0, 20.0, 30.0], 3, 2.0);
        // middle 20, sample stddev 10
        assert_relative_eq!(bands.middle[2].unwrap(), 20.0);
        assert_relative_eq!(bands.upper[2].unwrap(), 40.0, epsilon = 1e-12);
        assert_relative_eq!(bands.lower[2].unwrap(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn bollinger_upper_above_lower() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0).collect();
        let bands = bollinger_bands(&closes, DEFAULT_PERIOD, DEFAULT_STDDEV_MULT);
        for i in DEFAULT_PERIOD - 1..closes.len() {
            assert!(bands.upper[i].unwrap() >= bands.middle[i].unwrap());
            assert!(bands.middle[i].unwrap() >= bands.lower[i].unwrap());
        }
    }
}
