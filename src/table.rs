//! Merged indicator table
//!
//! Inner-joins normalized series on exact date equality and derives the
//! calendar fields (year, Portuguese month name) shown in reports and exports.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::info;

use crate::calendar::{month_name_pt, YearRange};
use crate::config::IndicatorSpec;
use crate::error::{IndicatorError, Result};
use crate::series::NormalizedSeries;
use crate::sources::{self, SeriesSource};

/// One date present in every merged series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorRow {
    pub date: NaiveDate,
    /// One value per table column, same order as [`IndicatorTable::columns`]
    pub values: Vec<f64>,
    pub year: i32,
    pub month: &'static str,
}

impl IndicatorRow {
    fn new(date: NaiveDate, values: Vec<f64>) -> Self {
        Self {
            date,
            values,
            year: date.year(),
            month: month_name_pt(date.month()).unwrap_or_default(),
        }
    }

    /// "YYYY-MM" label used by the month-by-month views
    pub fn year_month(&self) -> String {
        self.date.format("%Y-%m").to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IndicatorTable {
    pub columns: Vec<String>,
    pub rows: Vec<IndicatorRow>,
}

/// Request-scoped selection for one table build
#[derive(Debug, Clone)]
pub struct TableRequest {
    pub indicators: Vec<IndicatorSpec>,
    pub period: Option<YearRange>,
}

impl IndicatorTable {
    /// Inner join on date. Rows are ordered by date.
    pub fn merge(series: &[NormalizedSeries]) -> Self {
        let columns: Vec<String> = series.iter().map(|s| s.name.clone()).collect();

        let Some((first, rest)) = series.split_first() else {
            return Self::default();
        };

        let mut joined: BTreeMap<NaiveDate, Vec<f64>> = first
            .points
            .iter()
            .map(|p| (p.date, vec![p.value]))
            .collect();

        for s in rest {
            let lookup: HashMap<NaiveDate, f64> =
                s.points.iter().map(|p| (p.date, p.value)).collect();
            joined.retain(|date, values| match lookup.get(date) {
                Some(v) => {
                    values.push(*v);
                    true
                }
                None => false,
            });
        }

        let width = columns.len();
        let rows = joined
            .into_iter()
            .filter(|(_, values)| values.len() == width && values.iter().all(|v| v.is_finite()))
            .map(|(date, values)| IndicatorRow::new(date, values))
            .collect();

        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(name))
            .ok_or_else(|| IndicatorError::UnknownIndicator(name.to_string()))
    }

    /// Rows whose calendar year falls inside `range`
    pub fn filter_period(&self, range: YearRange) -> Self {
        Self {
            columns: self.columns.clone(),
            rows: self
                .rows
                .iter()
                .filter(|r| range.contains(r.year))
                .cloned()
                .collect(),
        }
    }

    /// Turn an empty table into the "no data for this selection" state
    pub fn ensure_rows(self, selection: &str) -> Result<Self> {
        if self.rows.is_empty() {
            return Err(IndicatorError::EmptyResult(selection.to_string()));
        }
        Ok(self)
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.rows.first().map(|r| r.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.rows.last().map(|r| r.date)
    }
}

/// Fetch every requested indicator and merge them into one table.
///
/// Any fetch or parse failure aborts the build. A series without points
/// yields an empty table, not an error.
pub async fn build_indicator_table<S: SeriesSource>(
    source: &S,
    request: &TableRequest,
) -> Result<IndicatorTable> {
    let mut series = Vec::with_capacity(request.indicators.len());
    for spec in &request.indicators {
        series.push(sources::fetch_series(source, spec, request.period).await?);
    }

    let mut table = IndicatorTable::merge(&series);
    if let Some(range) = request.period {
        table = table.filter_period(range);
    }

    info!(
        "Merged {} series into {} rows ({} .. {})",
        series.len(),
        table.len(),
        table.first_date().map(|d| d.to_string()).unwrap_or_default(),
        table.last_date().map(|d| d.to_string()).unwrap_or_default()
    );

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_indicators;
    use crate::series::SeriesPoint;
    use crate::sources::testing::{body, StaticSource};
    use std::collections::BTreeSet;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn series(name: &str, points: &[(NaiveDate, f64)]) -> NormalizedSeries {
        NormalizedSeries {
            name: name.to_string(),
            points: points
                .iter()
                .map(|(date, value)| SeriesPoint {
                    date: *date,
                    value: *value,
                })
                .collect(),
        }
    }

    fn fixture_source() -> StaticSource {
        StaticSource::default()
            .with(
                4390,
                &body(&[
                    ("01/01/2024", "11,75"),
                    ("01/02/2024", "11,25"),
                    ("01/03/2024", "10,75"),
                ]),
            )
            .with(
                433,
                &body(&[
                    ("01/01/2024", "0,42"),
                    ("01/02/2024", "0,83"),
                    ("01/03/2024", "abc"),
                ]),
            )
            .with(
                15885,
                &body(&[("01/01/2024", "5,4"), ("01/02/2024", "5,6"), ("01/03/2024", "5,5")]),
            )
    }

    fn request() -> TableRequest {
        TableRequest {
            indicators: default_indicators(),
            period: None,
        }
    }

    #[test]
    fn test_merge_keeps_only_common_dates() {
        let a = series("A", &[(date(2024, 1, 1), 1.0), (date(2024, 2, 1), 2.0)]);
        let b = series(
            "B",
            &[
                (date(2024, 1, 1), 10.0),
                (date(2024, 2, 1), 20.0),
                (date(2024, 3, 1), 30.0),
            ],
        );
        let c = series("C", &[(date(2024, 2, 1), 200.0), (date(2024, 3, 1), 300.0)]);

        let table = IndicatorTable::merge(&[a, b, c]);
        assert_eq!(table.columns, vec!["A", "B", "C"]);
        assert_eq!(table.len(), 1);

        let row = &table.rows[0];
        assert_eq!(row.date, date(2024, 2, 1));
        assert_eq!(row.values, vec![2.0, 20.0, 200.0]);
        assert_eq!(row.year, 2024);
        assert_eq!(row.month, "Fevereiro");
    }

    #[test]
    fn test_merge_date_set_is_intersection() {
        let a = series(
            "A",
            &[(date(2020, 1, 1), 1.0), (date(2020, 5, 1), 1.0), (date(2021, 1, 1), 1.0)],
        );
        let b = series("B", &[(date(2020, 5, 1), 1.0), (date(2021, 1, 1), 1.0)]);
        let c = series(
            "C",
            &[(date(2019, 1, 1), 1.0), (date(2020, 5, 1), 1.0), (date(2021, 1, 1), 1.0)],
        );

        let expected: BTreeSet<NaiveDate> = [&a, &b, &c]
            .iter()
            .map(|s| s.points.iter().map(|p| p.date).collect::<BTreeSet<_>>())
            .reduce(|acc, set| acc.intersection(&set).copied().collect())
            .unwrap();

        let table = IndicatorTable::merge(&[a, b, c]);
        let got: BTreeSet<NaiveDate> = table.rows.iter().map(|r| r.date).collect();
        assert_eq!(got, expected);
    }

    #[test]
    fn test_merge_with_empty_series_is_empty_table() {
        let a = series("A", &[(date(2024, 1, 1), 1.0)]);
        let b = series("B", &[]);

        let table = IndicatorTable::merge(&[a, b]);
        assert!(table.is_empty());
        assert_eq!(table.columns.len(), 2);
    }

    #[test]
    fn test_merge_no_series() {
        assert_eq!(IndicatorTable::merge(&[]), IndicatorTable::default());
    }

    #[test]
    fn test_column_lookup() {
        let a = series("SELIC", &[(date(2024, 1, 1), 11.75)]);
        let table = IndicatorTable::merge(&[a]);
        assert_eq!(table.column_index("selic").unwrap(), 0);
        assert!(matches!(
            table.column_index("IPCA"),
            Err(IndicatorError::UnknownIndicator(_))
        ));
    }

    #[test]
    fn test_filter_period_and_empty_selection() {
        let a = series(
            "A",
            &[(date(2019, 12, 1), 1.0), (date(2020, 1, 1), 2.0), (date(2025, 12, 1), 3.0)],
        );
        let table = IndicatorTable::merge(&[a]);

        let range = YearRange::new(2020, 2025).unwrap();
        let filtered = table.filter_period(range);
        assert_eq!(filtered.len(), 2);

        let none = table.filter_period(YearRange::new(2030, 2031).unwrap());
        let err = none.ensure_rows("2030-2031").unwrap_err();
        assert!(err.is_empty_result());
    }

    #[test]
    fn test_year_month_label() {
        let table = IndicatorTable::merge(&[series("A", &[(date(2024, 3, 15), 1.0)])]);
        assert_eq!(table.rows[0].year_month(), "2024-03");
        assert_eq!(table.rows[0].month, "Março");
    }

    #[tokio::test]
    async fn test_build_indicator_table() {
        let table = build_indicator_table(&fixture_source(), &request())
            .await
            .unwrap();

        assert_eq!(table.columns, vec!["SELIC", "IPCA", "Inadimplencia"]);
        // March is dropped: its IPCA value did not parse
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0].values, vec![11.75, 0.42, 5.4]);
        assert_eq!(table.rows[1].month, "Fevereiro");
    }

    #[tokio::test]
    async fn test_build_is_deterministic() {
        let source = fixture_source();
        let first = build_indicator_table(&source, &request()).await.unwrap();
        let second = build_indicator_table(&source, &request()).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[tokio::test]
    async fn test_build_with_empty_series_is_not_error() {
        let source = fixture_source().with(15885, "[]");
        let table = build_indicator_table(&source, &request()).await.unwrap();
        assert!(table.is_empty());
    }

    #[tokio::test]
    async fn test_build_aborts_on_fetch_error() {
        let mut source = fixture_source();
        source.bodies.remove(&433);

        let err = build_indicator_table(&source, &request()).await.unwrap_err();
        assert!(matches!(err, IndicatorError::Fetch { series_id: 433, .. }));
    }

    #[tokio::test]
    async fn test_build_aborts_on_parse_error() {
        let source = fixture_source().with(15885, r#"{"error": "bad"}"#);
        let err = build_indicator_table(&source, &request()).await.unwrap_err();
        assert!(matches!(err, IndicatorError::Parse { series_id: 15885, .. }));
    }

    #[tokio::test]
    async fn test_build_applies_period() {
        let req = TableRequest {
            indicators: default_indicators(),
            period: YearRange::new(2025, 2025).ok(),
        };
        let table = build_indicator_table(&fixture_source(), &req).await.unwrap();
        assert!(table.is_empty());
        assert!(table.ensure_rows("2025").unwrap_err().is_empty_result());
    }
}
