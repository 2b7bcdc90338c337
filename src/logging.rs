//! Logging setup using tracing.

use std::str::FromStr;
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const DEFAULT_LEVEL: Level = Level::INFO;

/// Parses a `[log] level` value (`trace`, `debug`, `info`, `warn`, `error`).
pub fn parse_level(value: &str) -> Option<Level> {
    Level::from_str(value.trim()).ok()
}

/// Installs a stderr subscriber. `RUST_LOG` takes precedence over
/// `default_level`. A second call is a no-op.
pub fn init_logging(default_level: Level) {
    let env_filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init();
}
