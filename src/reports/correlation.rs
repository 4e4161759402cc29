use serde::Serialize;
use std::fmt;

use crate::error::{IndicatorError, Result};
use crate::table::IndicatorTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Strength {
    Forte,
    Moderada,
    Fraca,
    MuitoFraca,
}

impl Strength {
    /// Thresholds apply to the signed coefficient, so every inverse
    /// relationship lands in `MuitoFraca`.
    pub fn classify(coefficient: f64) -> Self {
        if coefficient > 0.7 {
            Strength::Forte
        } else if coefficient > 0.4 {
            Strength::Moderada
        } else if coefficient > 0.2 {
            Strength::Fraca
        } else {
            Strength::MuitoFraca
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Strength::Forte => "forte",
            Strength::Moderada => "moderada",
            Strength::Fraca => "fraca",
            Strength::MuitoFraca => "muito fraca",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Direction {
    Direta,
    Inversa,
}

impl Direction {
    pub fn classify(coefficient: f64) -> Self {
        if coefficient > 0.0 {
            Direction::Direta
        } else {
            Direction::Inversa
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Direta => "direta",
            Direction::Inversa => "inversa",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationReport {
    pub x: String,
    pub y: String,
    pub samples: usize,
    /// `None` with fewer than two rows or a constant column
    pub coefficient: Option<f64>,
    pub strength: Option<Strength>,
    pub direction: Option<Direction>,
}

impl fmt::Display for CorrelationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.coefficient, self.strength, self.direction) {
            (Some(c), Some(s), Some(d)) => write!(
                f,
                "A correlação entre {} e {} é {} e {} ({:.2})",
                self.x,
                self.y,
                s.as_str(),
                d.as_str(),
                c
            ),
            _ => write!(
                f,
                "Correlação entre {} e {} indisponível ({} amostras)",
                self.x, self.y, self.samples
            ),
        }
    }
}

/// Pearson correlation between two table columns
pub fn correlation(table: &IndicatorTable, x: &str, y: &str) -> Result<CorrelationReport> {
    let xi = table.column_index(x)?;
    let yi = table.column_index(y)?;
    if xi == yi {
        return Err(IndicatorError::InvalidSelection(format!(
            "correlation needs two different indicators, got {} twice",
            table.columns[xi]
        )));
    }

    let xs: Vec<f64> = table.rows.iter().map(|r| r.values[xi]).collect();
    let ys: Vec<f64> = table.rows.iter().map(|r| r.values[yi]).collect();
    let coefficient = pearson(&xs, &ys);

    Ok(CorrelationReport {
        x: table.columns[xi].clone(),
        y: table.columns[yi].clone(),
        samples: xs.len(),
        coefficient,
        strength: coefficient.map(Strength::classify),
        direction: coefficient.map(Direction::classify),
    })
}

pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    let n = xs.len();
    if n < 2 || n != ys.len() {
        return None;
    }

    let mean_x = xs.iter().sum::<f64>() / n as f64;
    let mean_y = ys.iter().sum::<f64>() / n as f64;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some((cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0))
}
