//! Configuration validation.
//!
//! Checks the `[backtest]` section and the selected strategy's section before
//! a backtest runs, and builds the typed values the orchestrator needs.

use crate::domain::error::SignalbenchError;
use crate::domain::strategy::{
    AtrBreakout, EwmaCrossover, MacdCrossover, RsiBollinger, SmaCrossover, Strategy, StrategyKind,
};
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub const DEFAULT_STRATEGY: StrategyKind = StrategyKind::Sma;

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), SignalbenchError> {
    validate_ticker(config)?;
    read_dates(config)?;
    let kind = read_strategy_kind(config)?;
    strategy_from_config(config, kind)?;
    Ok(())
}

fn validate_ticker(config: &dyn ConfigPort) -> Result<(), SignalbenchError> {
    read_ticker(config).map(|_| ())
}

pub fn read_ticker(config: &dyn ConfigPort) -> Result<String, SignalbenchError> {
    match config.get_string("backtest", "ticker") {
        Some(s) if !s.trim().is_empty() => Ok(s.trim().to_uppercase()),
        _ => Err(SignalbenchError::ConfigMissing {
            section: "backtest".to_string(),
            key: "ticker".to_string(),
        }),
    }
}

/// `[backtest] start_date` and `end_date`, with `start_date <= end_date`.
pub fn read_dates(config: &dyn ConfigPort) -> Result<(NaiveDate, NaiveDate), SignalbenchError> {
    let start_str = config.get_string("backtest", "start_date");
    let end_str = config.get_string("backtest", "end_date");

    let start_date = parse_date(start_str.as_deref(), "backtest", "start_date")?;
    let end_date = parse_date(end_str.as_deref(), "backtest", "end_date")?;

    if start_date > end_date {
        return Err(SignalbenchError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "start_date".to_string(),
            reason: "start_date must not be after end_date".to_string(),
        });
    }
    Ok((start_date, end_date))
}

pub fn parse_date(
    value: Option<&str>,
    section: &str,
    field: &str,
) -> Result<NaiveDate, SignalbenchError> {
    match value {
        None => Err(SignalbenchError::ConfigMissing {
            section: section.to_string(),
            key: field.to_string(),
        }),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
            SignalbenchError::ConfigInvalid {
                section: section.to_string(),
                key: field.to_string(),
                reason: format!("invalid {} format, expected YYYY-MM-DD", field),
            }
        }),
    }
}

/// `[backtest] strategy`, defaulting to SMA when absent.
pub fn read_strategy_kind(config: &dyn ConfigPort) -> Result<StrategyKind, SignalbenchError> {
    match config.get_string("backtest", "strategy") {
        None => Ok(DEFAULT_STRATEGY),
        Some(name) => name.parse().map_err(|e: SignalbenchError| SignalbenchError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "strategy".to_string(),
            reason: e.to_string(),
        }),
    }
}

/// Builds the strategy's parameters from its section. Absent keys take the
/// strategy's defaults; present keys must parse and be positive.
pub fn strategy_from_config(
    config: &dyn ConfigPort,
    kind: StrategyKind,
) -> Result<Strategy, SignalbenchError> {
    let section = kind.section();
    let strategy = match kind {
        StrategyKind::Sma => {
            let d = SmaCrossover::default();
            Strategy::Sma(SmaCrossover {
                short_window: read_window(config, section, "short_window", d.short_window)?,
                long_window: read_window(config, section, "long_window", d.long_window)?,
            })
        }
        StrategyKind::Ewma => {
            let d = EwmaCrossover::default();
            Strategy::Ewma(EwmaCrossover {
                short_window: read_window(config, section, "short_window", d.short_window)?,
                long_window: read_window(config, section, "long_window", d.long_window)?,
            })
        }
        StrategyKind::Macd => {
            let d = MacdCrossover::default();
            Strategy::Macd(MacdCrossover {
                short_window: read_window(config, section, "short_window", d.short_window)?,
                long_window: read_window(config, section, "long_window", d.long_window)?,
                signal_window: read_window(config, section, "signal_window", d.signal_window)?,
            })
        }
        StrategyKind::Rsi => Strategy::RsiBollinger(RsiBollinger::with_rsi_period(read_window(
            config,
            section,
            "rsi_period",
            RsiBollinger::default().rsi_period,
        )?)),
        StrategyKind::Atr => {
            let d = AtrBreakout::default();
            Strategy::AtrBreakout(AtrBreakout {
                atr_window: read_window(config, section, "atr_window", d.atr_window)?,
                breakout_window: read_window(config, section, "breakout_window", d.breakout_window)?,
                scale_factor: read_scale(config, section, "scale_factor", d.scale_factor)?,
            })
        }
    };

    strategy.validate().map_err(|e| match e {
        SignalbenchError::InvalidParameter { name, reason } => SignalbenchError::ConfigInvalid {
            section: section.to_string(),
            key: name,
            reason,
        },
        other => other,
    })?;
    Ok(strategy)
}

fn invalid(section: &str, key: &str, reason: &str) -> SignalbenchError {
    SignalbenchError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn read_window(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: usize,
) -> Result<usize, SignalbenchError> {
    let Some(raw) = config.get_string(section, key) else {
        return Ok(default);
    };
    if raw.trim().parse::<i64>().is_err() {
        return Err(invalid(section, key, &format!("{} must be an integer", key)));
    }
    let value = config.get_int(section, key, default as i64);
    if value < 1 {
        return Err(invalid(section, key, &format!("{} must be positive", key)));
    }
    Ok(value as usize)
}

fn read_scale(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: f64,
) -> Result<f64, SignalbenchError> {
    let Some(raw) = config.get_string(section, key) else {
        return Ok(default);
    };
    if raw.trim().parse::<f64>().is_err() {
        return Err(invalid(section, key, &format!("{} must be a number", key)));
    }
    let value = config.get_double(section, key, default);
    if !value.is_finite() || value < 0.0 {
        return Err(invalid(section, key, &format!("{} must be non-negative", key)));
    }
    Ok(value)
}
