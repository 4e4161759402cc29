use serde::Serialize;

use crate::table::IndicatorTable;

/// One (month, indicator, value) entry of the long-format combined view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombinedEntry {
    pub year_month: String,
    pub indicator: String,
    pub value: f64,
}

/// Melt the table into long format, one entry per row and indicator
pub fn combined_monthly(table: &IndicatorTable) -> Vec<CombinedEntry> {
    table
        .rows
        .iter()
        .flat_map(move |row| {
            let label = row.year_month();
            table
                .columns
                .iter()
                .zip(&row.values)
                .map(move |(indicator, value)| CombinedEntry {
                    year_month: label.clone(),
                    indicator: indicator.clone(),
                    value: *value,
                })
        })
        .collect()
}
