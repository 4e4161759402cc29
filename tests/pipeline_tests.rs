use chrono::NaiveDate;
use indicadores::calendar::YearRange;
use indicadores::sources::FixtureDir;
use indicadores::{build_indicator_table, IndicatorError, IndicatorSpec, TableRequest};
use std::path::Path;
use tempfile::TempDir;

fn write_series(dir: &Path, series_id: u32, points: &[(&str, &str)]) {
    let records: Vec<serde_json::Value> = points
        .iter()
        .map(|(data, valor)| serde_json::json!({ "data": data, "valor": valor }))
        .collect();
    std::fs::write(
        dir.join(format!("{}.json", series_id)),
        serde_json::to_string(&records).unwrap(),
    )
    .unwrap();
}

fn specs() -> Vec<IndicatorSpec> {
    vec![
        IndicatorSpec::new("A", 1, 10.0, "a"),
        IndicatorSpec::new("B", 2, 5.0, "b"),
        IndicatorSpec::new("C", 3, 5.0, "c"),
    ]
}

fn request(period: Option<YearRange>) -> TableRequest {
    TableRequest {
        indicators: specs(),
        period,
    }
}

#[tokio::test]
async fn inner_join_keeps_only_shared_month() {
    let dir = TempDir::new().unwrap();
    write_series(dir.path(), 1, &[("01/01/2024", "1,0"), ("01/02/2024", "2,0")]);
    write_series(
        dir.path(),
        2,
        &[("01/01/2024", "1,0"), ("01/02/2024", "12,5"), ("01/03/2024", "3,0")],
    );
    write_series(dir.path(), 3, &[("01/02/2024", "0.5"), ("01/03/2024", "0.7")]);

    let source = FixtureDir::new(dir.path());
    let table = build_indicator_table(&source, &request(None)).await.unwrap();

    assert_eq!(table.len(), 1);
    let row = &table.rows[0];
    assert_eq!(row.date, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
    assert_eq!(row.values, vec![2.0, 12.5, 0.5]);
    assert_eq!(row.year, 2024);
    assert_eq!(row.month, "Fevereiro");
}

#[tokio::test]
async fn unparsable_value_drops_record_only() {
    let dir = TempDir::new().unwrap();
    write_series(dir.path(), 1, &[("01/01/2024", "abc"), ("01/02/2024", "2,0")]);
    write_series(dir.path(), 2, &[("01/01/2024", "1,0"), ("01/02/2024", "2,0")]);
    write_series(dir.path(), 3, &[("01/01/2024", "1,0"), ("01/02/2024", "2,0")]);

    let source = FixtureDir::new(dir.path());
    let table = build_indicator_table(&source, &request(None)).await.unwrap();

    assert_eq!(table.len(), 1);
    assert!(table
        .rows
        .iter()
        .all(|r| r.values.iter().all(|v| v.is_finite())));
}

#[tokio::test]
async fn series_without_points_gives_empty_table() {
    let dir = TempDir::new().unwrap();
    write_series(dir.path(), 1, &[("01/01/2024", "1,0")]);
    write_series(dir.path(), 2, &[]);
    write_series(dir.path(), 3, &[("01/01/2024", "1,0")]);

    let source = FixtureDir::new(dir.path());
    let table = build_indicator_table(&source, &request(None)).await.unwrap();
    assert!(table.is_empty());

    let err = table.ensure_rows("all years").unwrap_err();
    assert!(matches!(err, IndicatorError::EmptyResult(_)));
}

#[tokio::test]
async fn period_narrows_rows() {
    let dir = TempDir::new().unwrap();
    let points = [("01/12/2019", "1,0"), ("01/01/2020", "2,0"), ("01/01/2026", "3,0")];
    for id in 1..=3 {
        write_series(dir.path(), id, &points);
    }

    let source = FixtureDir::new(dir.path());
    let range = YearRange::new(2020, 2025).ok();
    let table = build_indicator_table(&source, &request(range)).await.unwrap();

    assert_eq!(table.len(), 1);
    assert_eq!(table.rows[0].year, 2020);
}

#[tokio::test]
async fn invalid_date_aborts_build() {
    let dir = TempDir::new().unwrap();
    write_series(dir.path(), 1, &[("2024-01-01", "1,0")]);
    write_series(dir.path(), 2, &[("01/01/2024", "1,0")]);
    write_series(dir.path(), 3, &[("01/01/2024", "1,0")]);

    let source = FixtureDir::new(dir.path());
    let err = build_indicator_table(&source, &request(None))
        .await
        .unwrap_err();
    assert!(matches!(err, IndicatorError::Parse { series_id: 1, .. }));
}
