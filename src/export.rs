//! Spreadsheet snapshot of the merged table
//!
//! The snapshot is an output artifact only: it is overwritten on every export
//! and never read back.

use chrono::Datelike;
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{IndicatorError, Result};
use crate::table::IndicatorTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Xlsx,
    Csv,
}

impl ExportFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("xlsx") => Ok(ExportFormat::Xlsx),
            Some("csv") => Ok(ExportFormat::Csv),
            _ => Err(IndicatorError::Export(format!(
                "unsupported snapshot extension: {} (use .xlsx or .csv)",
                path.display()
            ))),
        }
    }
}

/// Header row: Date, one column per indicator, Ano, Mês
pub fn header(table: &IndicatorTable) -> Vec<String> {
    let mut header = vec!["Date".to_string()];
    header.extend(table.columns.iter().cloned());
    header.push("Ano".to_string());
    header.push("Mês".to_string());
    header
}

/// Overwrite `path` with the full contents of `table`
pub fn export_snapshot(table: &IndicatorTable, path: &Path) -> Result<()> {
    let format = ExportFormat::from_path(path)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    // Write next to the target, then rename over it
    let tmp_path = temp_path_for(path);
    let written = match format {
        ExportFormat::Xlsx => write_xlsx(table, &tmp_path),
        ExportFormat::Csv => write_csv(table, &tmp_path),
    };
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }
    fs::rename(&tmp_path, path)?;

    info!(
        "Exported {} rows to {} ({:?})",
        table.len(),
        path.display(),
        format
    );
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    // Keep the extension last so the xlsx writer accepts the name
    path.with_file_name(format!(".tmp-{}", file_name))
}

fn write_xlsx(table: &IndicatorTable, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let date_format = Format::new().set_num_format("dd/mm/yyyy");

    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Indicadores")?;

    for (col, title) in header(table).iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, title, &bold)?;
    }

    let year_col = (table.columns.len() + 1) as u16;
    for (i, row) in table.rows.iter().enumerate() {
        let r = (i + 1) as u32;
        let date = ExcelDateTime::from_ymd(
            row.date.year() as u16,
            row.date.month() as u8,
            row.date.day() as u8,
        )?;
        worksheet.write_datetime_with_format(r, 0, &date, &date_format)?;

        for (j, value) in row.values.iter().enumerate() {
            worksheet.write_number(r, (j + 1) as u16, *value)?;
        }
        worksheet.write_number(r, year_col, row.year as f64)?;
        worksheet.write_string(r, year_col + 1, row.month)?;
    }

    workbook.save(path)?;
    Ok(())
}

fn write_csv(table: &IndicatorTable, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(header(table))?;

    for row in &table.rows {
        let mut record = vec![row.date.format("%Y-%m-%d").to_string()];
        record.extend(row.values.iter().map(|v| v.to_string()));
        record.push(row.year.to_string());
        record.push(row.month.to_string());
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}
