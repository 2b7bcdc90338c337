//! Price history port.

use crate::domain::error::SignalbenchError;
use crate::domain::ohlcv::PriceBar;
use chrono::NaiveDate;

/// Supplies daily bars for a ticker. Implementations drop rows with missing
/// fields and return bars sorted by date.
pub trait DataPort {
    /// Bars with `start_date <= date <= end_date`.
    fn fetch_bars(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceBar>, SignalbenchError>;

    fn list_symbols(&self) -> Result<Vec<String>, SignalbenchError>;

    /// First date, last date and bar count, or `None` when the ticker has no bars.
    fn get_data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, SignalbenchError>;
}
