use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub mod formatters;

#[derive(Parser)]
#[command(name = "indicadores")]
#[command(
    version,
    about = "SELIC, IPCA and inadimplência indicators for MEI, straight from the BCB"
)]
#[command(
    long_about = "Fetch the SELIC, IPCA and inadimplência series from the Banco Central do Brasil SGS API, merge them by date and inspect annual averages, seasonality, correlation and threshold alerts. Export the merged table as a spreadsheet snapshot."
)]
pub struct Cli {
    /// Disable colorized/ANSI output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Output results in JSON format
    #[arg(long = "json", global = true)]
    pub json: bool,

    /// Path to a TOML config file (defaults to <config dir>/indicadores/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose logging (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Inclusive year selection shared by the table-based commands
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct PeriodArgs {
    /// First year to include (e.g., 2020)
    #[arg(long)]
    pub from: Option<i32>,

    /// Last year to include (e.g., 2025)
    #[arg(long)]
    pub to: Option<i32>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the merged indicator table
    Table {
        #[command(flatten)]
        period: PeriodArgs,
    },

    /// Show one normalized series
    Series {
        /// Indicator name (e.g., SELIC)
        name: String,

        #[command(flatten)]
        period: PeriodArgs,
    },

    /// Write the merged table to a spreadsheet snapshot (.xlsx or .csv)
    Export {
        /// Output path (defaults to relatorio_mei.xlsx or the configured path)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        period: PeriodArgs,
    },

    /// Yearly averages of one indicator
    Annual {
        /// Indicator name (e.g., IPCA)
        name: String,

        #[command(flatten)]
        period: PeriodArgs,
    },

    /// Average per calendar month of one indicator
    Seasonality {
        /// Indicator name (e.g., IPCA)
        name: String,

        #[command(flatten)]
        period: PeriodArgs,
    },

    /// Correlation between two indicators
    Correlation {
        /// X axis indicator
        x: String,

        /// Y axis indicator
        y: String,

        #[command(flatten)]
        period: PeriodArgs,
    },

    /// All indicators month by month, one line per indicator
    Combined {
        #[command(flatten)]
        period: PeriodArgs,
    },

    /// Compare the latest values against the configured thresholds
    Alerts {
        #[command(flatten)]
        period: PeriodArgs,
    },

    /// List the configured indicators and their series ids
    Indicators,
}
