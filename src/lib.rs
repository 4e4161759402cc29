//! Indicadores - Brazilian macroeconomic indicators for MEI
//!
//! This library fetches the SELIC, IPCA and inadimplência series from the
//! Banco Central do Brasil SGS API, merges them by date and computes the
//! reports behind the MEI economic dashboard.

pub mod calendar;
pub mod cli;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod export;
pub mod reports;
pub mod series;
pub mod sources;
pub mod table;
pub mod utils;

pub use config::{Config, IndicatorSpec};
pub use error::{IndicatorError, Result};
pub use series::NormalizedSeries;
pub use table::{build_indicator_table, IndicatorRow, IndicatorTable, TableRequest};
