//! Property tests over random price paths and strategy parameters.

mod common;

use approx::relative_eq;
use common::*;
use proptest::prelude::*;
use proptest::strategy::Strategy as _;
use signalbench::domain::metrics::calculate_metrics;
use signalbench::domain::position::Position;
use signalbench::domain::signal::Signal;
use signalbench::domain::strategy::{
    AtrBreakout, EwmaCrossover, MacdCrossover, RsiBollinger, SmaCrossover, Strategy,
};

/// Closes from bounded daily returns, so no bar moves more than 10%.
fn price_path() -> impl proptest::strategy::Strategy<Value = Vec<f64>> {
    prop::collection::vec(-0.1f64..0.1, 40..150).prop_map(|returns| {
        returns
            .iter()
            .scan(100.0, |price, r| {
                *price *= 1.0 + r;
                Some(*price)
            })
            .collect()
    })
}

fn any_strategy() -> impl proptest::strategy::Strategy<Value = Strategy> {
    prop_oneof![
        (1usize..6, 6usize..20).prop_map(|(short_window, long_window)| {
            Strategy::Sma(SmaCrossover {
                short_window,
                long_window,
            })
        }),
        (1usize..6, 6usize..20).prop_map(|(short_window, long_window)| {
            Strategy::Ewma(EwmaCrossover {
                short_window,
                long_window,
            })
        }),
        (1usize..6, 6usize..20, 1usize..10).prop_map(|(short_window, long_window, signal_window)| {
            Strategy::Macd(MacdCrossover {
                short_window,
                long_window,
                signal_window,
            })
        }),
        (2usize..20).prop_map(|p| Strategy::RsiBollinger(RsiBollinger::with_rsi_period(p))),
        (1usize..15, 1usize..20, 0.0f64..2.0).prop_map(|(atr_window, breakout_window, scale_factor)| {
            Strategy::AtrBreakout(AtrBreakout {
                atr_window,
                breakout_window,
                scale_factor,
            })
        }),
    ]
}

proptest! {
    #[test]
    fn position_is_last_event(closes in price_path(), strategy in any_strategy()) {
        let frame = strategy.generate_signals(&series_from_closes(&closes)).unwrap();

        let mut held = Position::Flat;
        for (signal, position) in frame.signals().iter().zip(frame.positions()) {
            held = match signal {
                Signal::Buy => Position::Long,
                Signal::Sell => Position::Short,
                Signal::Hold => held,
            };
            prop_assert_eq!(held, *position);
        }
    }

    #[test]
    fn no_lookahead(closes in price_path(), strategy in any_strategy(), cut in 0.3f64..0.9) {
        let full = strategy.generate_signals(&series_from_closes(&closes)).unwrap();
        let k = ((closes.len() as f64) * cut) as usize;
        let prefix = strategy.generate_signals(&series_from_closes(&closes[..k])).unwrap();

        prop_assert_eq!(prefix.signals(), &full.signals()[..k]);
        prop_assert_eq!(prefix.positions(), &full.positions()[..k]);
        for (short, long) in prefix.indicators().iter().zip(full.indicators()) {
            prop_assert_eq!(&short.indicator_type, &long.indicator_type);
            prop_assert_eq!(&short.values[..], &long.values[..k]);
        }
    }

    #[test]
    fn generation_is_deterministic(closes in price_path(), strategy in any_strategy()) {
        let prices = series_from_closes(&closes);
        prop_assert_eq!(
            strategy.generate_signals(&prices).unwrap(),
            strategy.generate_signals(&prices).unwrap()
        );
    }

    #[test]
    fn metrics_are_deterministic(closes in price_path(), strategy in any_strategy()) {
        let prices = series_from_closes(&closes);
        let run = || calculate_metrics(&strategy.generate_signals(&prices).unwrap()).unwrap();
        let (first_metrics, first_summary) = run();
        let (second_metrics, second_summary) = run();

        prop_assert_eq!(first_metrics, second_metrics);
        prop_assert_eq!(first_summary, second_summary);
    }

    #[test]
    fn columns_undefined_through_warmup(closes in price_path(), strategy in any_strategy()) {
        let frame = strategy.generate_signals(&series_from_closes(&closes)).unwrap();

        prop_assert!(frame.undefined_prefix() <= strategy.warmup_length());
        for series in frame.indicators() {
            let warmup = series.indicator_type.warmup().min(frame.len());
            prop_assert!(series.values[..warmup].iter().all(Option::is_none));
        }
    }

    #[test]
    fn cumulative_returns_compound(closes in price_path(), strategy in any_strategy()) {
        let frame = strategy.generate_signals(&series_from_closes(&closes)).unwrap();
        let (metrics, summary) = calculate_metrics(&frame).unwrap();

        let clean_start = frame.undefined_prefix().max(1);
        prop_assert_eq!(metrics.len(), frame.len() - clean_start);

        // compounding starts at the first bar with a return, warm-up included
        let positions = frame.positions();
        let strategy_growth: f64 = (1..closes.len())
            .map(|t| 1.0 + (closes[t] / closes[t - 1] - 1.0) * positions[t - 1].exposure())
            .product();
        let last = metrics.len() - 1;
        prop_assert!(relative_eq!(metrics.cumulative_strategy[last], strategy_growth, max_relative = 1e-9));

        for i in 1..metrics.len() {
            prop_assert!(relative_eq!(
                metrics.cumulative_strategy[i],
                metrics.cumulative_strategy[i - 1] * (1.0 + metrics.strategy_returns[i]),
                max_relative = 1e-9
            ));
            prop_assert!(relative_eq!(
                metrics.cumulative_market[i],
                metrics.cumulative_market[i - 1] * (1.0 + metrics.market_returns[i]),
                max_relative = 1e-9
            ));
        }

        // buy and hold from the first bar
        let price_ratio = closes[closes.len() - 1] / closes[0];
        prop_assert!(relative_eq!(metrics.cumulative_market[last], price_ratio, max_relative = 1e-9));
        prop_assert!(relative_eq!(
            summary.final_market_return_pct,
            (price_ratio - 1.0) * 100.0,
            epsilon = 1e-6,
            max_relative = 1e-9
        ));
    }

    #[test]
    fn strategy_return_uses_prior_position(closes in price_path(), strategy in any_strategy()) {
        let frame = strategy.generate_signals(&series_from_closes(&closes)).unwrap();
        let (metrics, _) = calculate_metrics(&frame).unwrap();

        let clean_start = frame.undefined_prefix().max(1);
        for (i, (s, m)) in metrics.strategy_returns.iter().zip(&metrics.market_returns).enumerate() {
            let held = frame.positions()[clean_start + i - 1];
            prop_assert_eq!(*s, m * held.exposure());
        }
    }

    #[test]
    fn drawdown_is_bounded(closes in price_path(), strategy in any_strategy()) {
        let frame = strategy.generate_signals(&series_from_closes(&closes)).unwrap();
        let (metrics, summary) = calculate_metrics(&frame).unwrap();

        prop_assert!(metrics.drawdown.iter().all(|d| *d <= 0.0 && *d > -1.0));

        let mut peak = f64::NEG_INFINITY;
        for (c, d) in metrics.cumulative_strategy.iter().zip(&metrics.drawdown) {
            if *c >= peak {
                peak = *c;
                prop_assert_eq!(*d, 0.0);
            }
        }
        prop_assert!(summary.max_drawdown_pct >= 0.0 && summary.max_drawdown_pct < 100.0);
        prop_assert!(summary.strategy_volatility_pct >= 0.0);
    }
}
