//! CSV report adapter implementing ReportPort.
//!
//! Writes the metrics frame (one row per clean bar) to `output_path` and the
//! summary table to a sibling `<stem>_summary.csv`.

use crate::domain::backtest::{BacktestRequest, BacktestResult};
use crate::domain::error::SignalbenchError;
use crate::domain::metrics::MetricsFrame;
use crate::ports::report_port::ReportPort;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Default)]
pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn new() -> Self {
        Self
    }

    pub fn summary_path(output_path: &Path) -> PathBuf {
        let stem = output_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "report".to_string());
        output_path.with_file_name(format!("{}_summary.csv", stem))
    }
}

fn csv_error(e: csv::Error) -> SignalbenchError {
    SignalbenchError::Io(std::io::Error::other(e))
}

fn cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn frame_header(metrics: &MetricsFrame) -> Vec<String> {
    let mut header: Vec<String> = ["Date", "High", "Low", "Close"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    header.extend(
        metrics
            .frame
            .indicators()
            .iter()
            .map(|s| s.indicator_type.to_string()),
    );
    header.extend(
        [
            "Signal",
            "Position",
            "Market_Returns",
            "Strategy_Returns",
            "Cumulative_Market",
            "Cumulative_Strategy",
            "Cumulative_Market_Percent",
            "Cumulative_Strategy_Percent",
            "Outperformance",
            "Daily_Outperformance",
            "Drawdown",
        ]
        .iter()
        .map(|s| s.to_string()),
    );
    header
}

fn write_frame(metrics: &MetricsFrame, path: &Path) -> Result<(), SignalbenchError> {
    let mut writer = csv::Writer::from_path(path).map_err(csv_error)?;
    writer.write_record(frame_header(metrics)).map_err(csv_error)?;

    let frame = &metrics.frame;
    let market_pct = metrics.cumulative_market_pct();
    let strategy_pct = metrics.cumulative_strategy_pct();
    let outperformance = metrics.outperformance();
    let daily_outperformance = metrics.daily_outperformance();

    for (i, bar) in frame.prices().bars().iter().enumerate() {
        let mut row = vec![
            bar.date.format("%Y-%m-%d").to_string(),
            bar.high.to_string(),
            bar.low.to_string(),
            bar.close.to_string(),
        ];
        row.extend(frame.indicators().iter().map(|s| cell(s.get(i))));
        row.extend([
            frame.signals()[i].value().to_string(),
            frame.positions()[i].value().to_string(),
            metrics.market_returns[i].to_string(),
            metrics.strategy_returns[i].to_string(),
            metrics.cumulative_market[i].to_string(),
            metrics.cumulative_strategy[i].to_string(),
            market_pct[i].to_string(),
            strategy_pct[i].to_string(),
            outperformance[i].to_string(),
            daily_outperformance[i].to_string(),
            metrics.drawdown[i].to_string(),
        ]);
        writer.write_record(&row).map_err(csv_error)?;
    }

    writer.flush()?;
    Ok(())
}

fn write_summary(
    result: &BacktestResult,
    request: &BacktestRequest,
    path: &Path,
) -> Result<(), SignalbenchError> {
    let mut writer = csv::Writer::from_path(path).map_err(csv_error)?;
    writer.write_record(["Metric", "Value"]).map_err(csv_error)?;

    let context = [
        ("Ticker", request.ticker.clone()),
        ("Strategy", request.strategy.to_string()),
        ("Start Date", request.start_date.to_string()),
        ("End Date", request.end_date.to_string()),
    ];
    for (name, value) in &context {
        writer.write_record([*name, value.as_str()]).map_err(csv_error)?;
    }
    for (name, value) in result.summary.entries() {
        writer
            .write_record([name, value.to_string().as_str()])
            .map_err(csv_error)?;
    }

    writer.flush()?;
    Ok(())
}

impl ReportPort for CsvReportAdapter {
    fn write(
        &self,
        result: &BacktestResult,
        request: &BacktestRequest,
        output_path: &str,
    ) -> Result<(), SignalbenchError> {
        let path = Path::new(output_path);
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        write_frame(&result.metrics, path)?;
        write_summary(result, request, &Self::summary_path(path))?;
        Ok(())
    }
}
