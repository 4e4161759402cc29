//! Error handling for the indicator pipeline
//!
//! Library operations return [`IndicatorError`] so callers can tell an
//! upstream failure (fetch/parse) apart from an empty selection. The CLI
//! layer wraps these in `anyhow` for context chaining.

use thiserror::Error;

/// Errors raised while fetching, merging, reporting or exporting indicators
#[derive(Error, Debug)]
pub enum IndicatorError {
    /// Transport failure, timeout or non-success status from the remote source
    #[error("fetch error for series {series_id}: {message}")]
    Fetch { series_id: u32, message: String },

    /// Response body or one of its fields could not be converted
    #[error("parse error for series {series_id}: {message}")]
    Parse { series_id: u32, message: String },

    /// The merged table has no rows for the requested selection
    #[error("no data for this selection: {0}")]
    EmptyResult(String),

    #[error("unknown indicator: {0}")]
    UnknownIndicator(String),

    /// Known indicators combined in a way the operation rejects
    #[error("invalid selection: {0}")]
    InvalidSelection(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("export error: {0}")]
    Export(String),

    #[error("io error")]
    Io(#[from] std::io::Error),
}

impl IndicatorError {
    pub fn fetch(series_id: u32, message: impl Into<String>) -> Self {
        IndicatorError::Fetch {
            series_id,
            message: message.into(),
        }
    }

    pub fn parse(series_id: u32, message: impl Into<String>) -> Self {
        IndicatorError::Parse {
            series_id,
            message: message.into(),
        }
    }

    /// True for the "nothing to show" state, which is not a failure
    pub fn is_empty_result(&self) -> bool {
        matches!(self, IndicatorError::EmptyResult(_))
    }
}

impl From<rust_xlsxwriter::XlsxError> for IndicatorError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        IndicatorError::Export(err.to_string())
    }
}

impl From<csv::Error> for IndicatorError {
    fn from(err: csv::Error) -> Self {
        IndicatorError::Export(err.to_string())
    }
}

/// Result type alias for indicator operations
pub type Result<T> = std::result::Result<T, IndicatorError>;
