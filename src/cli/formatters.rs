//! Output formatting module for CLI display
//!
//! This module handles all terminal output formatting, separating
//! the concerns of data calculation from presentation.

use colored::Colorize;
use serde_json::{json, Map, Value};
use std::path::Path;
use tabled::{
    builder::Builder,
    settings::{object::Columns, Alignment, Style},
    Table,
};

use crate::config::IndicatorSpec;
use crate::reports::{
    AlertLevel, AlertsReport, CombinedEntry, CorrelationReport, MonthlyMean, Strength, YearlyMean,
};
use crate::series::NormalizedSeries;
use crate::table::IndicatorTable;
use crate::utils::format_number_br;

fn render(builder: Builder, numeric_from: usize) -> String {
    let mut table: Table = builder.build();
    table.with(Style::modern());
    table.modify(Columns::new(numeric_from..), Alignment::right());
    table.to_string()
}

/// Merged table as JSON: one object per row keyed by column name
pub fn table_json(table: &IndicatorTable) -> Value {
    let rows: Vec<Value> = table
        .rows
        .iter()
        .map(|row| {
            let mut obj = Map::new();
            obj.insert("date".to_string(), json!(row.date));
            for (name, value) in table.columns.iter().zip(&row.values) {
                obj.insert(name.clone(), json!(value));
            }
            obj.insert("ano".to_string(), json!(row.year));
            obj.insert("mes".to_string(), json!(row.month));
            Value::Object(obj)
        })
        .collect();

    json!({
        "columns": table.columns,
        "rows": rows,
    })
}

/// Format the merged table for terminal output
pub fn format_indicator_table(table: &IndicatorTable) -> String {
    let mut output = format!("\n{} Indicadores\n\n", "📊".cyan().bold());

    let mut builder = Builder::default();
    let mut header = vec!["Data".to_string()];
    header.extend(table.columns.iter().cloned());
    header.push("Ano".to_string());
    header.push("Mês".to_string());
    builder.push_record(header);

    for row in &table.rows {
        let mut record = vec![row.date.format("%d/%m/%Y").to_string()];
        record.extend(row.values.iter().map(|v| format_number_br(*v)));
        record.push(row.year.to_string());
        record.push(row.month.to_string());
        builder.push_record(record);
    }

    output.push_str(&render(builder, 1));
    output.push_str(&format!(
        "\n{} rows\n",
        table.len().to_string().bold()
    ));
    output
}

pub fn format_series(series: &NormalizedSeries) -> String {
    let mut output = format!("\n{} {}\n\n", "📈".cyan().bold(), series.name);

    let mut builder = Builder::default();
    builder.push_record(["Data".to_string(), series.name.clone()]);
    for point in &series.points {
        builder.push_record([
            point.date.format("%d/%m/%Y").to_string(),
            format_number_br(point.value),
        ]);
    }

    output.push_str(&render(builder, 1));
    output.push_str(&format!("\n{} points\n", series.len().to_string().bold()));
    output
}

pub fn format_annual(indicator: &str, means: &[YearlyMean]) -> String {
    let mut output = format!("\n{} Média anual de {}\n\n", "📉".cyan().bold(), indicator);

    let mut builder = Builder::default();
    builder.push_record(["Ano", "Média", "Amostras"].map(String::from));
    for m in means {
        builder.push_record([
            m.year.to_string(),
            format_number_br(m.mean),
            m.samples.to_string(),
        ]);
    }

    output.push_str(&render(builder, 1));
    output.push('\n');
    output
}

pub fn format_seasonality(indicator: &str, months: &[MonthlyMean]) -> String {
    let mut output = format!("\n{} Sazonalidade de {}\n\n", "📆".cyan().bold(), indicator);

    let mut builder = Builder::default();
    builder.push_record(["Mês", "Média", "Amostras"].map(String::from));
    for m in months {
        builder.push_record([
            m.month.to_string(),
            m.mean
                .map(format_number_br)
                .unwrap_or_else(|| "N/A".to_string()),
            m.samples.to_string(),
        ]);
    }

    output.push_str(&render(builder, 1));
    output.push('\n');
    output
}

pub fn format_correlation(report: &CorrelationReport) -> String {
    let mut output = format!(
        "\n{} Correlação entre {} e {}\n\n",
        "📌".cyan().bold(),
        report.x,
        report.y
    );

    match report.coefficient {
        Some(c) => {
            output.push_str(&format!(
                "{:<28} {}\n",
                "Coeficiente de correlação:".bold(),
                format!("{:.2}", c).bold()
            ));
            let summary = report.to_string();
            let colored = match report.strength {
                Some(Strength::Forte) => summary.green(),
                Some(Strength::Moderada) => summary.yellow(),
                _ => summary.normal(),
            };
            output.push_str(&format!("{} {}\n", "ℹ".blue().bold(), colored));
        }
        None => {
            output.push_str(&format!("{} {}\n", "ℹ".blue().bold(), report));
        }
    }
    output.push_str(&format!("Amostras: {}\n", report.samples));
    output
}

pub fn format_combined(entries: &[CombinedEntry]) -> String {
    let mut output = format!("\n{} Indicadores combinados por mês\n\n", "📊".cyan().bold());

    let mut builder = Builder::default();
    builder.push_record(["AnoMes", "Indicador", "Valor"].map(String::from));
    for e in entries {
        builder.push_record([
            e.year_month.clone(),
            e.indicator.clone(),
            format_number_br(e.value),
        ]);
    }

    output.push_str(&render(builder, 2));
    output.push('\n');
    output
}

pub fn format_alerts(report: &AlertsReport) -> String {
    let mut output = format!("\n{} Alertas\n\n", "🔔".cyan().bold());

    let mut builder = Builder::default();
    builder.push_record(
        ["Indicador", "Data", "Último", "Limite", "Situação", "Dica"].map(String::from),
    );
    for alert in &report.alerts {
        let level = match alert.level {
            AlertLevel::Alert => alert.level.as_str().red().bold().to_string(),
            AlertLevel::Normal => alert.level.as_str().green().to_string(),
            AlertLevel::Untracked => alert.level.as_str().to_string(),
        };
        builder.push_record([
            alert.indicator.clone(),
            alert.date.format("%d/%m/%Y").to_string(),
            format_number_br(alert.latest),
            alert
                .threshold
                .map(format_number_br)
                .unwrap_or_else(|| "-".to_string()),
            level,
            alert.advice.clone().unwrap_or_default(),
        ]);
    }
    output.push_str(&render(builder, 2));
    output.push('\n');

    if let Some((a, b)) = &report.watched_pair {
        if report.joint_rises.is_empty() {
            output.push_str(&format!("\n{} e {} não subiram juntos no período\n", a, b));
        } else {
            output.push_str(&format!(
                "\n{} Meses críticos ({} e {} subindo juntos): {}\n",
                "⚠".yellow().bold(),
                a,
                b,
                report.joint_rises.join(", ")
            ));
        }
    }
    output
}

pub fn format_indicators(indicators: &[IndicatorSpec]) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Indicador", "Série SGS", "Limite", "Dica"].map(String::from));
    for spec in indicators {
        builder.push_record([
            spec.name.clone(),
            spec.series_id.to_string(),
            spec.threshold
                .map(format_number_br)
                .unwrap_or_else(|| "-".to_string()),
            spec.advice.clone().unwrap_or_default(),
        ]);
    }
    format!("\n{}\n", render(builder, 1))
}

/// "No data for this selection" state
pub fn format_empty_selection(selection: &str) -> String {
    format!(
        "{} No data for this selection ({})\nTry a wider period with --from/--to\n",
        "ℹ".blue().bold(),
        selection
    )
}

pub fn format_export_done(path: &Path, rows: usize) -> String {
    format!(
        "{} Exported {} rows to {}\n",
        "✓".green().bold(),
        rows,
        path.display()
    )
}
