//! True range and Average True Range.
//!
//! TR[i] = max(H[i]-L[i], |H[i]-C[i-1]|, |L[i]-C[i-1]|), undefined at bar 0.
//! ATR(n) is the simple rolling mean of TR, so its first n bars are undefined.

use crate::domain::indicator::Column;
use crate::domain::indicator::rolling::rolling_mean;
use crate::domain::ohlcv::PriceSeries;

pub fn true_range(prices: &PriceSeries) -> Column {
    let bars = prices.bars();
    (0..bars.len())
        .map(|i| (i > 0).then(|| bars[i].true_range(bars[i - 1].close)))
        .collect()
}

pub fn atr(prices: &PriceSeries, period: usize) -> Column {
    rolling_mean(&true_range(prices), period)
}
