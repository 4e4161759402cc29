// Reports module - aggregates computed over the merged indicator table

pub mod alerts;
pub mod annual;
pub mod combined;
pub mod correlation;
pub mod seasonality;

pub use alerts::{alerts, AlertLevel, AlertsReport, IndicatorAlert};
pub use annual::{annual_means, YearlyMean};
pub use combined::{combined_monthly, CombinedEntry};
pub use correlation::{correlation, CorrelationReport, Direction, Strength};
pub use seasonality::{seasonality, MonthlyMean};
