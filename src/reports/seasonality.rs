use chrono::Datelike;
use serde::Serialize;

use crate::calendar::MONTH_NAMES_PT;
use crate::error::Result;
use crate::table::IndicatorTable;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyMean {
    pub month: &'static str,
    /// `None` when no row falls in this month
    pub mean: Option<f64>,
    pub samples: usize,
}

/// Mean of one indicator per calendar month across all years.
///
/// Always twelve entries, Janeiro first.
pub fn seasonality(table: &IndicatorTable, indicator: &str) -> Result<Vec<MonthlyMean>> {
    let idx = table.column_index(indicator)?;

    let mut sums = [(0.0f64, 0usize); 12];
    for row in &table.rows {
        let slot = &mut sums[row.date.month0() as usize];
        slot.0 += row.values[idx];
        slot.1 += 1;
    }

    Ok(MONTH_NAMES_PT
        .into_iter()
        .zip(sums)
        .map(|(month, (sum, samples))| MonthlyMean {
            month,
            mean: (samples > 0).then(|| sum / samples as f64),
            samples,
        })
        .collect())
}
