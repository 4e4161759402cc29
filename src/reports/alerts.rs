use chrono::NaiveDate;
use serde::Serialize;

use crate::config::IndicatorSpec;
use crate::table::IndicatorTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AlertLevel {
    /// Latest value is above the configured threshold
    Alert,
    Normal,
    /// No threshold configured for this indicator
    Untracked,
}

impl AlertLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertLevel::Alert => "ALERTA",
            AlertLevel::Normal => "normal",
            AlertLevel::Untracked => "-",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorAlert {
    pub indicator: String,
    pub date: NaiveDate,
    pub latest: f64,
    pub threshold: Option<f64>,
    pub level: AlertLevel,
    pub advice: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertsReport {
    pub alerts: Vec<IndicatorAlert>,
    /// Months where both watched indicators rose against the previous row
    pub joint_rises: Vec<String>,
    pub watched_pair: Option<(String, String)>,
}

/// Compare the latest row of `table` against each indicator's threshold.
///
/// Indicators absent from the table are skipped. An empty table gives an
/// empty report.
pub fn alerts(table: &IndicatorTable, indicators: &[IndicatorSpec]) -> AlertsReport {
    let mut report = AlertsReport {
        alerts: Vec::new(),
        joint_rises: Vec::new(),
        watched_pair: None,
    };

    let Some(last) = table.rows.last() else {
        return report;
    };

    for spec in indicators {
        let Ok(idx) = table.column_index(&spec.name) else {
            continue;
        };
        let latest = last.values[idx];
        let level = match spec.threshold {
            Some(limit) if latest > limit => AlertLevel::Alert,
            Some(_) => AlertLevel::Normal,
            None => AlertLevel::Untracked,
        };

        report.alerts.push(IndicatorAlert {
            indicator: table.columns[idx].clone(),
            date: last.date,
            latest,
            threshold: spec.threshold,
            level,
            advice: match level {
                AlertLevel::Alert => spec.advice.clone(),
                _ => None,
            },
        });
    }

    if let (Ok(a), Ok(b)) = (table.column_index("SELIC"), table.column_index("IPCA")) {
        report.joint_rises = joint_rises(table, a, b);
        report.watched_pair = Some((table.columns[a].clone(), table.columns[b].clone()));
    }

    report
}

/// "YYYY-MM" labels of rows where columns `a` and `b` both increased
pub fn joint_rises(table: &IndicatorTable, a: usize, b: usize) -> Vec<String> {
    table
        .rows
        .windows(2)
        .filter(|pair| {
            pair[1].values[a] > pair[0].values[a] && pair[1].values[b] > pair[0].values[b]
        })
        .map(|pair| pair[1].year_month())
        .collect()
}
