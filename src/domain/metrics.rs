//! Performance metrics over a signal frame.
//!
//! Returns are close-to-close; the strategy earns the market return scaled by
//! the position held at the end of the *previous* bar. Cumulative values
//! compound from the first bar with a return. Only the clean window (rows past
//! every indicator's undefined prefix, and past the first bar, which has no
//! return) is kept; statistics and drawdown cover that window alone.
//!
//! All annualised figures use 252 trading days and a zero risk-free rate.
//! Standard deviations here are population (n) deviations.

use crate::domain::error::SignalbenchError;
use crate::domain::signal::SignalFrame;
use std::fmt;

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Denominators at or below this magnitude are treated as zero.
const ZERO_TOLERANCE: f64 = 1e-12;

/// A summary statistic whose denominator may vanish.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Statistic {
    Finite(f64),
    Infinite,
    NegInfinite,
    /// 0 / 0.
    Undefined,
}

impl Statistic {
    pub fn ratio(numerator: f64, denominator: f64) -> Statistic {
        if denominator.abs() > ZERO_TOLERANCE {
            return Statistic::Finite(numerator / denominator);
        }
        if numerator.abs() <= ZERO_TOLERANCE {
            Statistic::Undefined
        } else if (numerator > 0.0) == (denominator >= 0.0) {
            Statistic::Infinite
        } else {
            Statistic::NegInfinite
        }
    }

    pub fn finite(self) -> Option<f64> {
        match self {
            Statistic::Finite(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_undefined(self) -> bool {
        self == Statistic::Undefined
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statistic::Finite(v) => {
                let rounded = (v * 100.0).round() / 100.0;
                // avoid "-0.00"
                let rounded = if rounded == 0.0 { 0.0 } else { rounded };
                write!(f, "{:.2}", rounded)
            }
            Statistic::Infinite => f.write_str("inf"),
            Statistic::NegInfinite => f.write_str("-inf"),
            Statistic::Undefined => f.write_str("n/a"),
        }
    }
}

/// The clean window of a signal frame with per-row return columns.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsFrame {
    pub frame: SignalFrame,
    pub market_returns: Vec<f64>,
    pub strategy_returns: Vec<f64>,
    pub cumulative_market: Vec<f64>,
    pub cumulative_strategy: Vec<f64>,
    pub drawdown: Vec<f64>,
}

impl MetricsFrame {
    pub fn len(&self) -> usize {
        self.market_returns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.market_returns.is_empty()
    }

    pub fn cumulative_market_pct(&self) -> Vec<f64> {
        to_pct(&self.cumulative_market)
    }

    pub fn cumulative_strategy_pct(&self) -> Vec<f64> {
        to_pct(&self.cumulative_strategy)
    }

    /// Cumulative strategy minus cumulative market, as a fraction.
    pub fn outperformance(&self) -> Vec<f64> {
        self.cumulative_strategy
            .iter()
            .zip(&self.cumulative_market)
            .map(|(s, m)| s - m)
            .collect()
    }

    /// Strategy return minus market return on each bar.
    pub fn daily_outperformance(&self) -> Vec<f64> {
        self.strategy_returns
            .iter()
            .zip(&self.market_returns)
            .map(|(s, m)| s - m)
            .collect()
    }
}

fn to_pct(cumulative: &[f64]) -> Vec<f64> {
    cumulative.iter().map(|c| (c - 1.0) * 100.0).collect()
}

/// Summary statistics in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsSummary {
    pub final_strategy_return_pct: f64,
    pub final_market_return_pct: f64,
    pub strategy_volatility_pct: f64,
    pub market_volatility_pct: f64,
    pub max_drawdown_pct: f64,
    pub strategy_sharpe: Statistic,
    pub market_sharpe: Statistic,
    pub sortino: Statistic,
    pub profit_factor: Statistic,
}

impl MetricsSummary {
    pub fn entries(&self) -> Vec<(&'static str, Statistic)> {
        vec![
            (
                "Final Strategy Return (%)",
                Statistic::Finite(self.final_strategy_return_pct),
            ),
            (
                "Final Market Return (%)",
                Statistic::Finite(self.final_market_return_pct),
            ),
            (
                "Strategy Volatility (%)",
                Statistic::Finite(self.strategy_volatility_pct),
            ),
            (
                "Market Volatility (%)",
                Statistic::Finite(self.market_volatility_pct),
            ),
            ("Max Drawdown (%)", Statistic::Finite(self.max_drawdown_pct)),
            ("Strategy Sharpe Ratio", self.strategy_sharpe),
            ("Market Sharpe Ratio", self.market_sharpe),
            ("Sortino Ratio", self.sortino),
            ("Profit Factor", self.profit_factor),
        ]
    }
}

/// Computes the metrics frame and summary over the clean window of `frame`.
pub fn calculate_metrics(
    frame: &SignalFrame,
) -> Result<(MetricsFrame, MetricsSummary), SignalbenchError> {
    let closes = frame.prices().closes();
    let positions = frame.positions();

    let clean_start = frame.undefined_prefix().max(1);
    if clean_start >= frame.len() {
        return Err(SignalbenchError::EmptyWindow);
    }

    let mut market_returns: Vec<f64> = (1..closes.len())
        .map(|t| closes[t] / closes[t - 1] - 1.0)
        .collect();
    let mut strategy_returns: Vec<f64> = (1..closes.len())
        .zip(&market_returns)
        .map(|(t, r)| r * positions[t - 1].exposure())
        .collect();

    // row t of the return columns is bar t + 1
    let skip = clean_start - 1;
    let cumulative_market = cumulative_product(&market_returns).split_off(skip);
    let cumulative_strategy = cumulative_product(&strategy_returns).split_off(skip);
    let market_returns = market_returns.split_off(skip);
    let strategy_returns = strategy_returns.split_off(skip);
    let drawdown = drawdown(&cumulative_strategy);

    let summary = summarize(
        &market_returns,
        &strategy_returns,
        &cumulative_market,
        &cumulative_strategy,
        &drawdown,
    );

    let metrics = MetricsFrame {
        frame: frame.slice_from(clean_start),
        market_returns,
        strategy_returns,
        cumulative_market,
        cumulative_strategy,
        drawdown,
    };
    Ok((metrics, summary))
}

fn cumulative_product(returns: &[f64]) -> Vec<f64> {
    returns
        .iter()
        .scan(1.0, |acc, r| {
            *acc *= 1.0 + r;
            Some(*acc)
        })
        .collect()
}

fn drawdown(cumulative: &[f64]) -> Vec<f64> {
    cumulative
        .iter()
        .scan(f64::NEG_INFINITY, |peak, &c| {
            *peak = peak.max(c);
            Some(c / *peak - 1.0)
        })
        .collect()
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

fn sharpe(returns: &[f64]) -> Statistic {
    Statistic::ratio(
        mean(returns) * TRADING_DAYS_PER_YEAR.sqrt(),
        population_std(returns),
    )
}

fn sortino(returns: &[f64]) -> Statistic {
    let downside: Vec<f64> = returns.iter().copied().filter(|r| *r < 0.0).collect();
    Statistic::ratio(
        mean(returns) * TRADING_DAYS_PER_YEAR.sqrt(),
        population_std(&downside),
    )
}

fn profit_factor(returns: &[f64]) -> Statistic {
    let gains: f64 = returns.iter().filter(|r| **r > 0.0).sum();
    let losses: f64 = returns.iter().filter(|r| **r < 0.0).sum();
    if returns.iter().all(|r| *r >= 0.0) {
        return Statistic::Infinite;
    }
    Statistic::ratio(gains, losses.abs())
}

fn summarize(
    market_returns: &[f64],
    strategy_returns: &[f64],
    cumulative_market: &[f64],
    cumulative_strategy: &[f64],
    drawdown: &[f64],
) -> MetricsSummary {
    let annualise = TRADING_DAYS_PER_YEAR.sqrt() * 100.0;
    let final_pct = |cumulative: &[f64]| (cumulative.last().copied().unwrap_or(1.0) - 1.0) * 100.0;
    let max_drawdown = drawdown.iter().copied().fold(0.0_f64, f64::min);

    MetricsSummary {
        final_strategy_return_pct: final_pct(cumulative_strategy),
        final_market_return_pct: final_pct(cumulative_market),
        strategy_volatility_pct: population_std(strategy_returns) * annualise,
        market_volatility_pct: population_std(market_returns) * annualise,
        max_drawdown_pct: max_drawdown.abs() * 100.0,
        strategy_sharpe: sharpe(strategy_returns),
        market_sharpe: sharpe(market_returns),
        sortino: sortino(strategy_returns),
        profit_factor: profit_factor(strategy_returns),
    }
}
