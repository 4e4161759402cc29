use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::Result;
use crate::table::IndicatorTable;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlyMean {
    pub year: i32,
    pub mean: f64,
    pub samples: usize,
}

/// Mean of one indicator per calendar year, ascending
pub fn annual_means(table: &IndicatorTable, indicator: &str) -> Result<Vec<YearlyMean>> {
    let idx = table.column_index(indicator)?;

    let mut by_year: BTreeMap<i32, (f64, usize)> = BTreeMap::new();
    for row in &table.rows {
        let bucket = by_year.entry(row.year).or_insert((0.0, 0));
        bucket.0 += row.values[idx];
        bucket.1 += 1;
    }

    Ok(by_year
        .into_iter()
        .map(|(year, (sum, samples))| YearlyMean {
            year,
            mean: sum / samples as f64,
            samples,
        })
        .collect())
}
