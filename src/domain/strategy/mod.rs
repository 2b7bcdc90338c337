//! Strategy selection, parameters and validation.
//!
//! Each strategy module turns a [`PriceSeries`] into a [`SignalFrame`] and
//! reports the warm-up (largest window in use) the orchestrator must fetch
//! ahead of the requested start date.

pub mod atr_breakout;
pub mod ewma_crossover;
pub mod macd_crossover;
pub mod rsi_bollinger;
pub mod sma_crossover;

pub use atr_breakout::AtrBreakout;
pub use ewma_crossover::EwmaCrossover;
pub use macd_crossover::MacdCrossover;
pub use rsi_bollinger::RsiBollinger;
pub use sma_crossover::SmaCrossover;

use crate::domain::error::SignalbenchError;
use crate::domain::ohlcv::PriceSeries;
use crate::domain::signal::SignalFrame;
use std::fmt;
use std::str::FromStr;

/// A parameterised signal generator.
pub trait SignalGenerator {
    /// Largest window parameter in use.
    fn warmup_length(&self) -> usize;

    fn validate(&self) -> Result<(), SignalbenchError>;

    /// Assumes `validate` has passed.
    fn generate(&self, prices: &PriceSeries) -> SignalFrame;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    Sma,
    Ewma,
    Macd,
    Rsi,
    Atr,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 5] = [
        StrategyKind::Sma,
        StrategyKind::Ewma,
        StrategyKind::Macd,
        StrategyKind::Rsi,
        StrategyKind::Atr,
    ];

    /// Config section holding this strategy's parameters.
    pub fn section(self) -> &'static str {
        match self {
            StrategyKind::Sma => "sma",
            StrategyKind::Ewma => "ewma",
            StrategyKind::Macd => "macd",
            StrategyKind::Rsi => "rsi",
            StrategyKind::Atr => "atr",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.section())
    }
}

impl FromStr for StrategyKind {
    type Err = SignalbenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sma" | "sma_crossover" => Ok(StrategyKind::Sma),
            "ewma" | "ema" | "ewma_crossover" => Ok(StrategyKind::Ewma),
            "macd" => Ok(StrategyKind::Macd),
            "rsi" | "rsi_bollinger" => Ok(StrategyKind::Rsi),
            "atr" | "atr_breakout" => Ok(StrategyKind::Atr),
            other => Err(SignalbenchError::invalid_parameter(
                "strategy",
                format!("unknown strategy '{}' (expected sma, ewma, macd, rsi or atr)", other),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Strategy {
    Sma(SmaCrossover),
    Ewma(EwmaCrossover),
    Macd(MacdCrossover),
    RsiBollinger(RsiBollinger),
    AtrBreakout(AtrBreakout),
}

impl Strategy {
    pub fn default_for(kind: StrategyKind) -> Strategy {
        match kind {
            StrategyKind::Sma => Strategy::Sma(SmaCrossover::default()),
            StrategyKind::Ewma => Strategy::Ewma(EwmaCrossover::default()),
            StrategyKind::Macd => Strategy::Macd(MacdCrossover::default()),
            StrategyKind::Rsi => Strategy::RsiBollinger(RsiBollinger::default()),
            StrategyKind::Atr => Strategy::AtrBreakout(AtrBreakout::default()),
        }
    }

    pub fn kind(&self) -> StrategyKind {
        match self {
            Strategy::Sma(_) => StrategyKind::Sma,
            Strategy::Ewma(_) => StrategyKind::Ewma,
            Strategy::Macd(_) => StrategyKind::Macd,
            Strategy::RsiBollinger(_) => StrategyKind::Rsi,
            Strategy::AtrBreakout(_) => StrategyKind::Atr,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Sma(_) => "SMA Crossover",
            Strategy::Ewma(_) => "EWMA Crossover",
            Strategy::Macd(_) => "MACD",
            Strategy::RsiBollinger(_) => "RSI + Bollinger",
            Strategy::AtrBreakout(_) => "ATR Breakout",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Strategy::Sma(_) => {
                "Simple Moving Average crossover: buy when the short SMA crosses above the long SMA; sell when it crosses below."
            }
            Strategy::Ewma(_) => {
                "Exponentially Weighted MA crossover: like SMA, but recent prices are weighted more heavily."
            }
            Strategy::Macd(_) => {
                "Moving Average Convergence Divergence: momentum strategy trading MACD crossings of its signal line."
            }
            Strategy::RsiBollinger(_) => {
                "RSI + Bollinger Bands: buy when RSI < 30 and price touches the lower band; sell when RSI > 70 and price touches the upper band."
            }
            Strategy::AtrBreakout(_) => {
                "Average True Range breakout: trade closes beyond the recent high/low widened by a multiple of ATR."
            }
        }
    }

    fn generator(&self) -> &dyn SignalGenerator {
        match self {
            Strategy::Sma(s) => s,
            Strategy::Ewma(s) => s,
            Strategy::Macd(s) => s,
            Strategy::RsiBollinger(s) => s,
            Strategy::AtrBreakout(s) => s,
        }
    }

    pub fn warmup_length(&self) -> usize {
        self.generator().warmup_length()
    }

    pub fn validate(&self) -> Result<(), SignalbenchError> {
        self.generator().validate()
    }

    /// Validates parameters, then computes indicators, signals and positions.
    pub fn generate_signals(&self, prices: &PriceSeries) -> Result<SignalFrame, SignalbenchError> {
        self.validate()?;
        Ok(self.generator().generate(prices))
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Sma(s) => write!(f, "SMA({}/{})", s.short_window, s.long_window),
            Strategy::Ewma(s) => write!(f, "EWMA({}/{})", s.short_window, s.long_window),
            Strategy::Macd(s) => write!(
                f,
                "MACD({}/{}/{})",
                s.short_window, s.long_window, s.signal_window
            ),
            Strategy::RsiBollinger(s) => write!(
                f,
                "RSI({}) + BOLLINGER({},{})",
                s.rsi_period, s.bollinger_window, s.num_std_dev
            ),
            Strategy::AtrBreakout(s) => write!(
                f,
                "ATR({}) BREAKOUT({}) x{}",
                s.atr_window, s.breakout_window, s.scale_factor
            ),
        }
    }
}

pub(crate) fn require_positive(name: &str, value: usize) -> Result<(), SignalbenchError> {
    if value == 0 {
        return Err(SignalbenchError::invalid_parameter(name, "must be positive"));
    }
    Ok(())
}

pub(crate) fn require_ordered(
    short_name: &str,
    short: usize,
    long_name: &str,
    long: usize,
) -> Result<(), SignalbenchError> {
    if short >= long {
        return Err(SignalbenchError::invalid_parameter(
            short_name,
            format!("must be less than {} ({} >= {})", long_name, short, long),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!("SMA".parse::<StrategyKind>().unwrap(), StrategyKind::Sma);
        assert_eq!(" ewma ".parse::<StrategyKind>().unwrap(), StrategyKind::Ewma);
        assert_eq!("Macd".parse::<StrategyKind>().unwrap(), StrategyKind::Macd);
        assert_eq!(
            "rsi_bollinger".parse::<StrategyKind>().unwrap(),
            StrategyKind::Rsi
        );
        assert_eq!(
            "atr_breakout".parse::<StrategyKind>().unwrap(),
            StrategyKind::Atr
        );
    }

    #[test]
    fn kind_rejects_unknown() {
        let err = "bogus".parse::<StrategyKind>().unwrap_err();
        assert!(err.is_malformed_input());
        assert!(err.to_string().contains("bogus"));
    }

    #[test]
    fn kind_round_trips_through_display() {
        for kind in StrategyKind::ALL {
            assert_eq!(kind.to_string().parse::<StrategyKind>().unwrap(), kind);
        }
    }

    #[test]
    fn defaults_match_kind() {
        for kind in StrategyKind::ALL {
            let strategy = Strategy::default_for(kind);
            assert_eq!(strategy.kind(), kind);
            assert!(strategy.validate().is_ok());
            assert!(!strategy.description().is_empty());
        }
    }

    #[test]
    fn default_warmups() {
        assert_eq!(Strategy::default_for(StrategyKind::Sma).warmup_length(), 50);
        assert_eq!(Strategy::default_for(StrategyKind::Ewma).warmup_length(), 50);
        assert_eq!(Strategy::default_for(StrategyKind::Macd).warmup_length(), 26);
        assert_eq!(Strategy::default_for(StrategyKind::Rsi).warmup_length(), 20);
        assert_eq!(Strategy::default_for(StrategyKind::Atr).warmup_length(), 20);
    }

    #[test]
    fn display_shows_parameters() {
        let strategy = Strategy::Sma(SmaCrossover {
            short_window: 5,
            long_window: 10,
        });
        assert_eq!(strategy.to_string(), "SMA(5/10)");
        assert_eq!(strategy.name(), "SMA Crossover");
    }

    #[test]
    fn generate_signals_validates_first() {
        let strategy = Strategy::Sma(SmaCrossover {
            short_window: 10,
            long_window: 5,
        });
        let prices = PriceSeries::new(vec![]).unwrap();
        let err = strategy.generate_signals(&prices).unwrap_err();
        assert!(err.is_malformed_input());
    }

    #[test]
    fn require_helpers() {
        assert!(require_positive("w", 1).is_ok());
        assert!(require_positive("w", 0).is_err());
        assert!(require_ordered("short", 2, "long", 3).is_ok());
        assert!(require_ordered("short", 3, "long", 3).is_err());
    }
}
