//! CLI definition and dispatch.

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::backtest::{self as backtest_engine, BacktestRequest, BacktestResult};
use crate::domain::config_validation::{
    parse_date, read_strategy_kind, read_ticker, strategy_from_config, validate_backtest_config,
};
use crate::domain::error::SignalbenchError;
use crate::domain::metrics::MetricsSummary;
use crate::domain::strategy::{Strategy, StrategyKind};
use crate::logging;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_OUTPUT: &str = "report.csv";

#[derive(Parser, Debug)]
#[command(name = "signalbench", about = "Technical strategy backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Command-line values that take precedence over the config file.
#[derive(Args, Debug, Default, Clone)]
pub struct Overrides {
    #[arg(long)]
    pub ticker: Option<String>,
    /// sma, ewma, macd, rsi or atr
    #[arg(long)]
    pub strategy: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    pub start: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    pub end: Option<String>,
    /// Directory holding <TICKER>.csv files
    #[arg(long)]
    pub data: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one backtest and write a CSV report
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[command(flatten)]
        overrides: Overrides,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Run every strategy over the same ticker and range
    Compare {
        #[arg(short, long)]
        config: PathBuf,
        #[command(flatten)]
        overrides: Overrides,
    },
    /// Validate a configuration without fetching data
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List tickers available in a data directory
    ListSymbols {
        #[arg(long)]
        data: PathBuf,
    },
    /// Show bar count and date range for a ticker
    Info {
        #[arg(long)]
        ticker: String,
        #[arg(long)]
        data: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            overrides,
            output,
        } => run_backtest(&config, &overrides, output.as_deref()),
        Command::Compare { config, overrides } => run_compare(&config, &overrides),
        Command::Validate { config } => run_validate(&config),
        Command::ListSymbols { data } => run_list_symbols(&data),
        Command::Info { ticker, data } => run_info(&ticker, &data),
    }
}

fn fail(err: &SignalbenchError) -> ExitCode {
    eprintln!("error: {err}");
    err.into()
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| fail(&e))
}

/// Initialises logging from `[log] level`, falling back to info.
fn init_logging_from(config: &dyn ConfigPort) {
    let level = config
        .get_string("log", "level")
        .and_then(|l| logging::parse_level(&l))
        .unwrap_or(logging::DEFAULT_LEVEL);
    logging::init_logging(level);
}

/// Resolves ticker, strategy and dates from overrides, then config.
pub fn build_request(
    config: &dyn ConfigPort,
    overrides: &Overrides,
) -> Result<BacktestRequest, SignalbenchError> {
    let ticker = match overrides.ticker.as_deref().map(str::trim) {
        Some(t) if !t.is_empty() => t.to_uppercase(),
        _ => read_ticker(config)?,
    };

    let kind = match &overrides.strategy {
        Some(name) => name.parse::<StrategyKind>()?,
        None => read_strategy_kind(config)?,
    };
    let strategy = strategy_from_config(config, kind)?;

    let start_date = match &overrides.start {
        Some(s) => parse_date(Some(s.as_str()), "backtest", "start_date")?,
        None => parse_date(
            config.get_string("backtest", "start_date").as_deref(),
            "backtest",
            "start_date",
        )?,
    };
    let end_date = match &overrides.end {
        Some(s) => parse_date(Some(s.as_str()), "backtest", "end_date")?,
        None => parse_date(
            config.get_string("backtest", "end_date").as_deref(),
            "backtest",
            "end_date",
        )?,
    };

    let request = BacktestRequest::new(ticker, strategy, start_date, end_date);
    request.validate()?;
    Ok(request)
}

pub fn resolve_data_dir(config: &dyn ConfigPort, overrides: &Overrides) -> PathBuf {
    overrides
        .data
        .clone()
        .or_else(|| config.get_string("data", "path").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

pub fn resolve_output(config: &dyn ConfigPort, output: Option<&Path>) -> PathBuf {
    output
        .map(Path::to_path_buf)
        .or_else(|| config.get_string("report", "output").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT))
}

/// Two-column `metric  value` table.
pub fn format_summary(result: &BacktestResult) -> String {
    let mut out = format!("=== {} | {} ===\n", result.ticker, result.strategy);
    out.push_str(&format!("{:<28}{}\n", "Period", describe_period(result)));
    out.push_str(&format!(
        "{:<28}{} buys, {} sells\n",
        "Signals",
        result.signals.buy_count(),
        result.signals.sell_count()
    ));
    for (name, value) in result.summary.entries() {
        out.push_str(&format!("{:<28}{}\n", name, value));
    }
    out
}

fn describe_period(result: &BacktestResult) -> String {
    let prices = result.metrics.frame.prices();
    match (prices.first_date(), prices.last_date()) {
        (Some(first), Some(last)) => format!("{} to {} ({} bars)", first, last, prices.len()),
        _ => "empty".to_string(),
    }
}

/// One column per strategy; failed runs show `error`.
pub fn format_comparison(results: &[(Strategy, Result<BacktestResult, SignalbenchError>)]) -> String {
    const WIDTH: usize = 18;
    let mut out = format!("{:<28}", "Metric");
    for (strategy, _) in results {
        out.push_str(&format!(
            "{:>width$}",
            strategy.kind().to_string().to_uppercase(),
            width = WIDTH
        ));
    }
    out.push('\n');

    let summaries: Vec<Option<&MetricsSummary>> = results
        .iter()
        .map(|(_, r)| r.as_ref().ok().map(|r| &r.summary))
        .collect();
    let Some(names) = summaries
        .iter()
        .flatten()
        .next()
        .map(|s| s.entries().into_iter().map(|(n, _)| n).collect::<Vec<_>>())
    else {
        return out;
    };

    for (row, name) in names.iter().enumerate() {
        out.push_str(&format!("{:<28}", name));
        for summary in &summaries {
            let cell = summary
                .map(|s| s.entries()[row].1.to_string())
                .unwrap_or_else(|| "error".to_string());
            out.push_str(&format!("{:>width$}", cell, width = WIDTH));
        }
        out.push('\n');
    }
    out
}

/// Runs one request against the given ports and writes the report.
pub fn run_backtest_pipeline(
    data_port: &dyn DataPort,
    report_port: &dyn ReportPort,
    request: &BacktestRequest,
    output: &Path,
) -> ExitCode {
    let result = match backtest_engine::run_backtest(data_port, request) {
        Ok(r) => r,
        Err(e) => return fail(&e),
    };

    print!("{}", format_summary(&result));

    let output_str = output.to_string_lossy();
    if let Err(e) = report_port.write(&result, request, &output_str) {
        return fail(&e);
    }
    info!(path = %output.display(), "report written");
    ExitCode::SUCCESS
}

fn run_backtest(config_path: &Path, overrides: &Overrides, output: Option<&Path>) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    init_logging_from(&config);
    info!(config = %config_path.display(), "config loaded");

    let request = match build_request(&config, overrides) {
        Ok(r) => r,
        Err(e) => return fail(&e),
    };

    let data_port = CsvAdapter::new(resolve_data_dir(&config, overrides));
    let output = resolve_output(&config, output);
    run_backtest_pipeline(&data_port, &CsvReportAdapter::new(), &request, &output)
}

fn run_compare(config_path: &Path, overrides: &Overrides) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    init_logging_from(&config);

    let request = match build_request(&config, overrides) {
        Ok(r) => r,
        Err(e) => return fail(&e),
    };
    let strategies: Vec<Strategy> = match StrategyKind::ALL
        .iter()
        .map(|kind| strategy_from_config(&config, *kind))
        .collect()
    {
        Ok(s) => s,
        Err(e) => return fail(&e),
    };

    let data_port = CsvAdapter::new(resolve_data_dir(&config, overrides));
    info!(
        ticker = %request.ticker,
        strategies = strategies.len(),
        "running comparison"
    );
    let results = backtest_engine::run_comparison(
        &data_port,
        &request.ticker,
        &strategies,
        request.start_date,
        request.end_date,
    );

    print!("{}", format_comparison(&results));

    for (strategy, result) in &results {
        if let Err(e) = result {
            eprintln!("{}: {}", strategy.name(), e);
        }
    }
    match results.iter().find_map(|(_, r)| r.as_ref().err()) {
        Some(e) if results.iter().all(|(_, r)| r.is_err()) => e.into(),
        _ => ExitCode::SUCCESS,
    }
}

fn run_validate(config_path: &Path) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    if let Err(e) = validate_backtest_config(&config) {
        return fail(&e);
    }
    let request = match build_request(&config, &Overrides::default()) {
        Ok(r) => r,
        Err(e) => return fail(&e),
    };

    let strategy = &request.strategy;
    println!("Ticker:         {}", request.ticker);
    println!("Strategy:       {} {}", strategy.name(), strategy);
    println!("                {}", strategy.description());
    println!("Range:          {} to {}", request.start_date, request.end_date);
    println!("Warm-up:        {} bars", strategy.warmup_length());
    println!("Fetch from:     {}", request.lookback_start());
    println!("Data directory: {}", resolve_data_dir(&config, &Overrides::default()).display());
    println!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}

fn run_list_symbols(data_dir: &Path) -> ExitCode {
    logging::init_logging(logging::DEFAULT_LEVEL);
    let adapter = CsvAdapter::new(data_dir.to_path_buf());

    let symbols = match adapter.list_symbols() {
        Ok(s) => s,
        Err(e) => return fail(&e),
    };

    if symbols.is_empty() {
        eprintln!("No symbols found in {}", data_dir.display());
    } else {
        for symbol in &symbols {
            println!("{}", symbol);
        }
        eprintln!("{} symbols found", symbols.len());
    }
    ExitCode::SUCCESS
}

fn run_info(ticker: &str, data_dir: &Path) -> ExitCode {
    logging::init_logging(logging::DEFAULT_LEVEL);
    let adapter = CsvAdapter::new(data_dir.to_path_buf());
    let ticker = ticker.trim().to_uppercase();

    match adapter.get_data_range(&ticker) {
        Ok(Some((first, last, count))) => {
            println!("{}: {} bars, {} to {}", ticker, count, first, last);
            ExitCode::SUCCESS
        }
        Ok(None) => fail(&SignalbenchError::NoData { ticker }),
        Err(e) => fail(&e),
    }
}
