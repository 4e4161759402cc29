//! Command dispatcher: routes parsed CLI commands to the pipeline and reports.
//!
//! Every command receives its selection (period, indicator names) explicitly;
//! nothing is kept between invocations.

use anyhow::{Context, Result};
use tracing::info;

use crate::calendar::YearRange;
use crate::cli::formatters;
use crate::cli::{Cli, Commands, PeriodArgs};
use crate::config::Config;
use crate::error::IndicatorError;
use crate::export;
use crate::reports;
use crate::sources::{self, Source};
use crate::table::{self, IndicatorTable, TableRequest};

struct Session {
    config: Config,
    json_output: bool,
}

/// Route a parsed command to its handler
pub async fn dispatch(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let session = Session {
        config,
        json_output: cli.json,
    };

    match cli.command {
        Commands::Table { period } => dispatch_table(&session, period).await,
        Commands::Series { name, period } => dispatch_series(&session, &name, period).await,
        Commands::Export { output, period } => {
            let path = output.unwrap_or_else(|| session.config.export_path.clone());
            dispatch_export(&session, &path, period).await
        }
        Commands::Annual { name, period } => dispatch_annual(&session, &name, period).await,
        Commands::Seasonality { name, period } => {
            dispatch_seasonality(&session, &name, period).await
        }
        Commands::Correlation { x, y, period } => {
            dispatch_correlation(&session, &x, &y, period).await
        }
        Commands::Combined { period } => dispatch_combined(&session, period).await,
        Commands::Alerts { period } => dispatch_alerts(&session, period).await,
        Commands::Indicators => dispatch_indicators(&session),
    }
}

fn selection_label(range: Option<YearRange>) -> String {
    range
        .map(|r| r.to_string())
        .unwrap_or_else(|| "all years".to_string())
}

fn print_empty(session: &Session, selection: &str) {
    if session.json_output {
        println!(
            "{}",
            serde_json::json!({ "empty": true, "selection": selection })
        );
    } else {
        print!("{}", formatters::format_empty_selection(selection));
    }
}

/// Build the merged table for `period`.
///
/// Returns `Ok(None)` after printing the "no data" state when the selection
/// has no rows; fetch and parse failures propagate.
async fn load_table(session: &Session, period: PeriodArgs) -> Result<Option<IndicatorTable>> {
    let range = YearRange::from_bounds(period.from, period.to)?;
    let selection = selection_label(range);

    let source = Source::from_config(&session.config)?;
    let request = TableRequest {
        indicators: session.config.indicators.clone(),
        period: range,
    };

    let built = table::build_indicator_table(&source, &request)
        .await
        .and_then(|t| t.ensure_rows(&selection));

    match built {
        Ok(t) => Ok(Some(t)),
        Err(e) if e.is_empty_result() => {
            info!("Empty selection: {}", selection);
            print_empty(session, &selection);
            Ok(None)
        }
        Err(e) => Err(e).context("Failed to build indicator table"),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn dispatch_table(session: &Session, period: PeriodArgs) -> Result<()> {
    let Some(table) = load_table(session, period).await? else {
        return Ok(());
    };

    if session.json_output {
        return print_json(&formatters::table_json(&table));
    }
    print!("{}", formatters::format_indicator_table(&table));
    Ok(())
}

async fn dispatch_series(session: &Session, name: &str, period: PeriodArgs) -> Result<()> {
    let spec = session.config.indicator(name)?;
    let range = YearRange::from_bounds(period.from, period.to)?;
    let source = Source::from_config(&session.config)?;

    let mut series = sources::fetch_series(&source, spec, range)
        .await
        .with_context(|| format!("Failed to fetch {}", spec.name))?;
    if let Some(r) = range {
        use chrono::Datelike;
        series.points.retain(|p| r.contains(p.date.year()));
    }

    if series.is_empty() {
        print_empty(session, &format!("{}, {}", spec.name, selection_label(range)));
        return Ok(());
    }

    if session.json_output {
        return print_json(&series);
    }
    print!("{}", formatters::format_series(&series));
    Ok(())
}

async fn dispatch_export(
    session: &Session,
    path: &std::path::Path,
    period: PeriodArgs,
) -> Result<()> {
    let Some(table) = load_table(session, period).await? else {
        return Ok(());
    };

    export::export_snapshot(&table, path)
        .with_context(|| format!("Failed to export snapshot to {}", path.display()))?;

    if session.json_output {
        return print_json(&serde_json::json!({
            "exported": true,
            "path": path,
            "rows": table.len(),
        }));
    }
    print!("{}", formatters::format_export_done(path, table.len()));
    Ok(())
}

async fn dispatch_annual(session: &Session, name: &str, period: PeriodArgs) -> Result<()> {
    let Some(table) = load_table(session, period).await? else {
        return Ok(());
    };
    let means = reports::annual_means(&table, name)?;

    if session.json_output {
        return print_json(&means);
    }
    let label = &table.columns[table.column_index(name)?];
    print!("{}", formatters::format_annual(label, &means));
    Ok(())
}

async fn dispatch_seasonality(session: &Session, name: &str, period: PeriodArgs) -> Result<()> {
    let Some(table) = load_table(session, period).await? else {
        return Ok(());
    };
    let months = reports::seasonality(&table, name)?;

    if session.json_output {
        return print_json(&months);
    }
    let label = &table.columns[table.column_index(name)?];
    print!("{}", formatters::format_seasonality(label, &months));
    Ok(())
}

async fn dispatch_correlation(
    session: &Session,
    x: &str,
    y: &str,
    period: PeriodArgs,
) -> Result<()> {
    // Reject bad names before going to the network
    session.config.indicator(x)?;
    session.config.indicator(y)?;
    if x.eq_ignore_ascii_case(y) {
        return Err(IndicatorError::InvalidSelection(format!(
            "correlation needs two different indicators, got {} twice",
            x
        ))
        .into());
    }

    let Some(table) = load_table(session, period).await? else {
        return Ok(());
    };
    let report = reports::correlation(&table, x, y)?;

    if session.json_output {
        return print_json(&report);
    }
    print!("{}", formatters::format_correlation(&report));
    Ok(())
}

async fn dispatch_combined(session: &Session, period: PeriodArgs) -> Result<()> {
    let Some(table) = load_table(session, period).await? else {
        return Ok(());
    };
    let entries = reports::combined_monthly(&table);

    if session.json_output {
        return print_json(&entries);
    }
    print!("{}", formatters::format_combined(&entries));
    Ok(())
}

async fn dispatch_alerts(session: &Session, period: PeriodArgs) -> Result<()> {
    let Some(table) = load_table(session, period).await? else {
        return Ok(());
    };
    let report = reports::alerts(&table, &session.config.indicators);

    if session.json_output {
        return print_json(&report);
    }
    print!("{}", formatters::format_alerts(&report));
    Ok(())
}

fn dispatch_indicators(session: &Session) -> Result<()> {
    if session.json_output {
        return print_json(&session.config.indicators);
    }
    print!("{}", formatters::format_indicators(&session.config.indicators));
    Ok(())
}
