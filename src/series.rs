//! Normalized time series for one indicator
//!
//! The SGS API answers with a JSON array of `{"data": "dd/mm/yyyy", "valor": "..."}`
//! records. This module turns such a body into a date-sorted [`NormalizedSeries`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::error::{IndicatorError, Result};

/// One record as returned by the remote source
#[derive(Debug, Clone, Deserialize)]
pub struct RawPoint {
    pub data: String,
    /// Usually a string ("12,5" or "12.5"), occasionally a JSON number or null
    #[serde(default)]
    pub valor: serde_json::Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Date-ordered points for one named indicator
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedSeries {
    pub name: String,
    pub points: Vec<SeriesPoint>,
}

impl NormalizedSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Parse an SGS response body into a normalized series.
///
/// Unparsable dates abort with a parse error; unparsable or non-finite values
/// only drop their record.
pub fn parse_series_body(series_id: u32, name: &str, body: &str) -> Result<NormalizedSeries> {
    let records: Vec<RawPoint> = serde_json::from_str(body).map_err(|e| {
        IndicatorError::parse(series_id, format!("unexpected response body: {}", e))
    })?;
    normalize(series_id, name, records)
}

/// Convert raw records into a sorted series.
pub fn normalize(series_id: u32, name: &str, records: Vec<RawPoint>) -> Result<NormalizedSeries> {
    let total = records.len();
    let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    let mut dropped = 0usize;

    for record in records {
        let date = parse_date_br(&record.data).ok_or_else(|| {
            IndicatorError::parse(series_id, format!("invalid date '{}'", record.data))
        })?;

        let Some(value) = value_from_json(&record.valor) else {
            debug!(
                "Dropping {} record on {}: unparsable value {}",
                name, record.data, record.valor
            );
            dropped += 1;
            continue;
        };

        if by_date.contains_key(&date) {
            warn!("Duplicate date {} in series {} ({}), keeping first", date, name, series_id);
            continue;
        }
        by_date.insert(date, value);
    }

    debug!(
        "Series {} ({}): {} records, {} kept, {} dropped",
        name,
        series_id,
        total,
        by_date.len(),
        dropped
    );

    Ok(NormalizedSeries {
        name: name.to_string(),
        points: by_date
            .into_iter()
            .map(|(date, value)| SeriesPoint { date, value })
            .collect(),
    })
}

/// Parse SGS date format (dd/mm/yyyy)
pub fn parse_date_br(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%d/%m/%Y").ok()
}

/// Parse a decimal that may use the Brazilian comma separator.
///
/// With a comma present, dots are thousands separators ("1.234,5" -> 1234.5).
/// Without one, the string is read as a plain dot-decimal number.
/// Returns `None` for anything that is not a finite number.
pub fn parse_value_br(input: &str) -> Option<f64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    let cleaned = if trimmed.contains(',') {
        trimmed.replace('.', "").replace(',', ".")
    } else {
        trimmed.to_string()
    };

    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn value_from_json(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::String(s) => parse_value_br(s),
        serde_json::Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_value_comma_decimal() {
        assert_eq!(parse_value_br("12,5"), Some(12.5));
        assert_eq!(parse_value_br("0,35"), Some(0.35));
    }

    #[test]
    fn test_parse_value_dot_decimal() {
        assert_eq!(parse_value_br("12.5"), Some(12.5));
        assert_eq!(parse_value_br(" 4 "), Some(4.0));
    }

    #[test]
    fn test_parse_value_thousands_separator() {
        assert_eq!(parse_value_br("1.234,56"), Some(1234.56));
    }

    #[test]
    fn test_parse_value_rejects_garbage() {
        assert_eq!(parse_value_br("abc"), None);
        assert_eq!(parse_value_br(""), None);
        assert_eq!(parse_value_br("NaN"), None);
        assert_eq!(parse_value_br("inf"), None);
    }

    #[test]
    fn test_parse_date_br() {
        assert_eq!(parse_date_br("01/02/2024"), Some(date(2024, 2, 1)));
        assert_eq!(parse_date_br("2024-02-01"), None);
        assert_eq!(parse_date_br("31/02/2024"), None);
    }

    #[test]
    fn test_parse_body_sorts_and_drops_bad_values() {
        let body = r#"[
            {"data": "01/03/2024", "valor": "10,75"},
            {"data": "01/01/2024", "valor": "11,75"},
            {"data": "01/02/2024", "valor": "abc"}
        ]"#;

        let series = parse_series_body(4390, "SELIC", body).unwrap();
        assert_eq!(series.name, "SELIC");
        assert_eq!(
            series.points,
            vec![
                SeriesPoint { date: date(2024, 1, 1), value: 11.75 },
                SeriesPoint { date: date(2024, 3, 1), value: 10.75 },
            ]
        );
        assert!(series.points.iter().all(|p| p.value.is_finite()));
    }

    #[test]
    fn test_parse_body_accepts_numbers_and_nulls() {
        let body = r#"[
            {"data": "01/01/2024", "valor": 0.42},
            {"data": "01/02/2024", "valor": null},
            {"data": "01/03/2024"}
        ]"#;

        let series = parse_series_body(433, "IPCA", body).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series.points[0].value, 0.42);
    }

    #[test]
    fn test_parse_body_duplicate_date_keeps_first() {
        let body = r#"[
            {"data": "01/01/2024", "valor": "1,0"},
            {"data": "01/01/2024", "valor": "2,0"}
        ]"#;

        let series = parse_series_body(1, "X", body).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series.points[0].value, 1.0);
    }

    #[test]
    fn test_parse_body_empty_array_is_empty_series() {
        let series = parse_series_body(1, "X", "[]").unwrap();
        assert!(series.is_empty());
        assert_eq!(series.name, "X");
    }

    #[test]
    fn test_parse_body_wrong_shape_is_parse_error() {
        let err = parse_series_body(1, "X", r#"{"erro": "serie inexistente"}"#).unwrap_err();
        assert!(matches!(err, IndicatorError::Parse { series_id: 1, .. }));

        let err = parse_series_body(1, "X", "<html>").unwrap_err();
        assert!(matches!(err, IndicatorError::Parse { .. }));
    }

    #[test]
    fn test_parse_body_bad_date_is_parse_error() {
        let body = r#"[{"data": "2024/13/01", "valor": "1,0"}]"#;
        let err = parse_series_body(7, "X", body).unwrap_err();
        match err {
            IndicatorError::Parse { series_id, message } => {
                assert_eq!(series_id, 7);
                assert!(message.contains("2024/13/01"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
