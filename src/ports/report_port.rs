//! Report output port.

use crate::domain::backtest::{BacktestRequest, BacktestResult};
use crate::domain::error::SignalbenchError;

/// Port for writing a finished backtest.
pub trait ReportPort {
    fn write(
        &self,
        result: &BacktestResult,
        request: &BacktestRequest,
        output_path: &str,
    ) -> Result<(), SignalbenchError>;
}
