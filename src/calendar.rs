//! Calendar helpers: Portuguese month names and inclusive year ranges

use anyhow::{anyhow, Result};
use serde::Serialize;
use std::fmt;

/// Month names as shown to the user, January first
pub const MONTH_NAMES_PT: [&str; 12] = [
    "Janeiro",
    "Fevereiro",
    "Março",
    "Abril",
    "Maio",
    "Junho",
    "Julho",
    "Agosto",
    "Setembro",
    "Outubro",
    "Novembro",
    "Dezembro",
];

/// Portuguese name for a 1-based month number
pub fn month_name_pt(month: u32) -> Option<&'static str> {
    MONTH_NAMES_PT.get(month.checked_sub(1)? as usize).copied()
}

/// Inclusive range of calendar years used to narrow a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearRange {
    pub from: i32,
    pub to: i32,
}

impl YearRange {
    pub fn new(from: i32, to: i32) -> Result<Self> {
        if from > to {
            return Err(anyhow!("Invalid year range: {} is after {}", from, to));
        }
        Ok(Self { from, to })
    }

    /// Build a range from optional CLI bounds; `None` when both are absent
    pub fn from_bounds(from: Option<i32>, to: Option<i32>) -> Result<Option<Self>> {
        match (from, to) {
            (None, None) => Ok(None),
            (Some(f), None) => Self::new(f, i32::MAX).map(Some),
            (None, Some(t)) => Self::new(i32::MIN, t).map(Some),
            (Some(f), Some(t)) => Self::new(f, t).map(Some),
        }
    }

    pub fn contains(&self, year: i32) -> bool {
        year >= self.from && year <= self.to
    }
}

impl fmt::Display for YearRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.from, self.to) {
            (i32::MIN, i32::MAX) => write!(f, "all years"),
            (from, i32::MAX) => write!(f, "{} onwards", from),
            (i32::MIN, to) => write!(f, "up to {}", to),
            (from, to) if from == to => write!(f, "{}", from),
            (from, to) => write!(f, "{}-{}", from, to),
        }
    }
}
