//! Domain error types.
//!
//! Variants are grouped by kind: data insufficiency, malformed input,
//! configuration, and collaborator failures. A zero denominator in a summary
//! statistic is not an error; see [`crate::domain::metrics::Statistic`].

use chrono::NaiveDate;

/// Top-level error type for signalbench.
#[derive(Debug, thiserror::Error)]
pub enum SignalbenchError {
    #[error("no price data for {ticker}")]
    NoData { ticker: String },

    #[error("insufficient data for {ticker}: have {bars} bars, need {minimum}")]
    InsufficientData {
        ticker: String,
        bars: usize,
        minimum: usize,
    },

    #[error("no bar on or after {start} (last bar: {})", describe_last(.last))]
    StartOutOfRange {
        start: NaiveDate,
        last: Option<NaiveDate>,
    },

    #[error("no clean rows left to compute metrics over")]
    EmptyWindow,

    #[error("dates not strictly increasing at row {index}: {date} follows {previous}")]
    NonMonotonicDates {
        index: usize,
        date: NaiveDate,
        previous: NaiveDate,
    },

    #[error("invalid {field} price on {date}: {value}")]
    InvalidPrice {
        date: NaiveDate,
        field: &'static str,
        value: f64,
    },

    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("invalid date range: start {start} is after end {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data source error: {reason}")]
    DataSource { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn describe_last(last: &Option<NaiveDate>) -> String {
    last.map(|d| d.to_string()).unwrap_or_else(|| "none".into())
}

impl SignalbenchError {
    pub fn invalid_parameter(name: &str, reason: impl Into<String>) -> Self {
        SignalbenchError::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    /// True for the "not enough history" family of failures.
    pub fn is_data_insufficiency(&self) -> bool {
        matches!(
            self,
            SignalbenchError::NoData { .. }
                | SignalbenchError::InsufficientData { .. }
                | SignalbenchError::StartOutOfRange { .. }
                | SignalbenchError::EmptyWindow
        )
    }

    /// True for input rejected before any computation starts.
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            SignalbenchError::NonMonotonicDates { .. }
                | SignalbenchError::InvalidPrice { .. }
                | SignalbenchError::InvalidParameter { .. }
                | SignalbenchError::InvalidDateRange { .. }
        )
    }
}

impl From<&SignalbenchError> for std::process::ExitCode {
    fn from(err: &SignalbenchError) -> Self {
        let code: u8 = match err {
            SignalbenchError::Io(_) => 1,
            SignalbenchError::ConfigParse { .. }
            | SignalbenchError::ConfigMissing { .. }
            | SignalbenchError::ConfigInvalid { .. } => 2,
            SignalbenchError::DataSource { .. } => 3,
            SignalbenchError::NonMonotonicDates { .. }
            | SignalbenchError::InvalidPrice { .. }
            | SignalbenchError::InvalidParameter { .. }
            | SignalbenchError::InvalidDateRange { .. } => 4,
            SignalbenchError::NoData { .. }
            | SignalbenchError::InsufficientData { .. }
            | SignalbenchError::StartOutOfRange { .. }
            | SignalbenchError::EmptyWindow => 5,
        };
        std::process::ExitCode::from(code)
    }
}
