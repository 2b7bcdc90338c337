//! signalbench: technical strategy backtester.
//!
//! Hexagonal architecture: signal generation and metrics in [`domain`], port
//! traits in [`ports`], concrete implementations in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
pub mod logging;
