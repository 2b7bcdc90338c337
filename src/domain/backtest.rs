//! Backtest orchestration: fetch with look-back, generate, trim, measure.

use crate::domain::error::SignalbenchError;
use crate::domain::metrics::{MetricsFrame, MetricsSummary, calculate_metrics};
use crate::domain::ohlcv::PriceSeries;
use crate::domain::signal::SignalFrame;
use crate::domain::strategy::Strategy;
use crate::ports::data_port::DataPort;
use chrono::{Days, NaiveDate};
use rayon::prelude::*;
use tracing::{debug, info, warn};

/// One strategy, one parameter set, one ticker, one date range.
#[derive(Debug, Clone, PartialEq)]
pub struct BacktestRequest {
    pub ticker: String,
    pub strategy: Strategy,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl BacktestRequest {
    pub fn new(
        ticker: impl Into<String>,
        strategy: Strategy,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            ticker: ticker.into(),
            strategy,
            start_date,
            end_date,
        }
    }

    pub fn validate(&self) -> Result<(), SignalbenchError> {
        if self.ticker.trim().is_empty() {
            return Err(SignalbenchError::invalid_parameter("ticker", "must not be empty"));
        }
        if self.start_date > self.end_date {
            return Err(SignalbenchError::InvalidDateRange {
                start: self.start_date,
                end: self.end_date,
            });
        }
        self.strategy.validate()
    }

    /// First date to fetch so the warm-up has settled by `start_date`.
    pub fn lookback_start(&self) -> NaiveDate {
        lookback_start(self.start_date, self.strategy.warmup_length())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub ticker: String,
    pub strategy: Strategy,
    /// Bars returned by the data source, look-back included.
    pub bars_fetched: usize,
    /// Signal frame trimmed to the requested start.
    pub signals: SignalFrame,
    pub metrics: MetricsFrame,
    pub summary: MetricsSummary,
}

/// `start - 2 * warmup` calendar days; the factor absorbs non-trading days.
pub fn lookback_start(start: NaiveDate, warmup: usize) -> NaiveDate {
    start
        .checked_sub_days(Days::new(2 * warmup as u64))
        .unwrap_or(NaiveDate::MIN)
}

/// Drops every bar dated before `start`.
pub fn trim_warmup(frame: &SignalFrame, start: NaiveDate) -> Result<SignalFrame, SignalbenchError> {
    let index = frame
        .prices()
        .first_index_on_or_after(start)
        .ok_or(SignalbenchError::StartOutOfRange {
            start,
            last: frame.prices().last_date(),
        })?;
    Ok(frame.slice_from(index))
}

pub fn run_backtest(
    data_port: &dyn DataPort,
    request: &BacktestRequest,
) -> Result<BacktestResult, SignalbenchError> {
    request.validate()?;

    let strategy = &request.strategy;
    let warmup = strategy.warmup_length();
    let fetch_from = request.lookback_start();
    info!(
        ticker = %request.ticker,
        strategy = %strategy,
        %fetch_from,
        end = %request.end_date,
        "fetching price history"
    );

    let bars = data_port.fetch_bars(&request.ticker, fetch_from, request.end_date)?;
    if bars.is_empty() {
        return Err(SignalbenchError::NoData {
            ticker: request.ticker.clone(),
        });
    }
    let prices = PriceSeries::new(bars)?;
    if prices.len() < warmup {
        return Err(SignalbenchError::InsufficientData {
            ticker: request.ticker.clone(),
            bars: prices.len(),
            minimum: warmup,
        });
    }

    let frame = strategy.generate_signals(&prices)?;
    let trimmed = trim_warmup(&frame, request.start_date)?;
    debug!(
        bars = prices.len(),
        trimmed = trimmed.offset(),
        buys = trimmed.buy_count(),
        sells = trimmed.sell_count(),
        "signals generated"
    );

    let (metrics, summary) = calculate_metrics(&trimmed)?;
    info!(
        ticker = %request.ticker,
        strategy = %strategy,
        rows = metrics.len(),
        final_return_pct = summary.final_strategy_return_pct,
        "backtest complete"
    );

    Ok(BacktestResult {
        ticker: request.ticker.clone(),
        strategy: strategy.clone(),
        bars_fetched: prices.len(),
        signals: trimmed,
        metrics,
        summary,
    })
}

/// Runs each strategy over the same ticker and range in parallel.
///
/// Results come back in the order of `strategies`; one run failing leaves the
/// others untouched.
pub fn run_comparison<P>(
    data_port: &P,
    ticker: &str,
    strategies: &[Strategy],
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Vec<(Strategy, Result<BacktestResult, SignalbenchError>)>
where
    P: DataPort + Sync,
{
    strategies
        .par_iter()
        .map(|strategy| {
            let request = BacktestRequest::new(ticker, strategy.clone(), start_date, end_date);
            let result = run_backtest(data_port, &request);
            if let Err(e) = &result {
                warn!(strategy = %strategy, error = %e, "backtest failed");
            }
            (request.strategy, result)
        })
        .collect()
}
