//! Exponentially weighted moving average.
//!
//! alpha = 2/(span+1), y[0] = x[0], y[i] = alpha*x[i] + (1-alpha)*y[i-1].
//! Seeded with the first observation, so no bar is undefined.
//!
//! Evaluated as y[i-1] + alpha*(x[i] - y[i-1]) so a flat input stays exactly flat.

pub fn smoothing_factor(span: usize) -> f64 {
    2.0 / (span.max(1) as f64 + 1.0)
}

pub fn ewm_mean(values: &[f64], span: usize) -> Vec<f64> {
    let alpha = smoothing_factor(span);
    let mut out = Vec::with_capacity(values.len());

    for (i, &x) in values.iter().enumerate() {
        let y = if i == 0 {
            x
        } else {
            let prev = out[i - 1];
            prev + alpha * (x - prev)
        };
        out.push(y);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn ema_seeded_with_first_value() {
        let out = ewm_mean(&[10.0, 20.0, 30.0], 3);
        assert_relative_eq!(out[0], 10.0);
    }

    #[test]
    fn ema_recursive_calculation() {
        let out = ewm_mean(&[10.0, 20.0, 30.0, 40.0], 3);
        let k = 2.0 / 4.0;

        let e1 = 20.0 * k + 10.0 * (1.0 - k);
        let e2 = 30.0 * k + e1 * (1.0 - k);
        let e3 = 40.0 * k + e2 * (1.0 - k);
        assert_relative_eq!(out[1], e1);
        assert_relative_eq!(out[2], e2);
        assert_relative_eq!(out[3], e3);
    }

    #[test]
    fn ema_span_1_tracks_input() {
        let out = ewm_mean(&[10.0, 20.0, 30.0], 1);
        assert_eq!(out, vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn ema_equal_prices() {
        let out = ewm_mean(&[100.0; 5], 3);
        for v in out {
            assert_relative_eq!(v, 100.0);
        }
    }

    #[test]
    fn ema_empty() {
        assert!(ewm_mean(&[], 3).is_empty());
    }

    #[test]
    fn ema_smoothing_factor() {
        assert_relative_eq!(smoothing_factor(10), 2.0 / 11.0);
    }
}
