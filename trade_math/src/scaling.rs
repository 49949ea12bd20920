//! Feature scalers
//!
//! Contains:
//! - Min-max scaling into `[0, 1]`
//! - Standard (z-score) scaling per feature column

use crate::statistics;
use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

/// Min-max scaler mapping the fitted range onto `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScaler {
    min: f64,
    max: f64,
}

impl MinMaxScaler {
    /// Fit the scaler on a series
    pub fn fit(values: &[f64]) -> Result<Self> {
        Ok(Self {
            min: statistics::min(values)?,
            max: statistics::max(values)?,
        })
    }

    /// Width of the fitted range, `1.0` for a flat series so transforms stay finite
    pub fn range(&self) -> f64 {
        let range = self.max - self.min;
        if range.abs() < f64::EPSILON {
            1.0
        } else {
            range
        }
    }

    pub fn transform(&self, value: f64) -> f64 {
        (value - self.min) / self.range()
    }

    pub fn inverse_transform(&self, scaled: f64) -> f64 {
        scaled * self.range() + self.min
    }

    pub fn transform_all(&self, values: &[f64]) -> Vec<f64> {
        values.iter().map(|&v| self.transform(v)).collect()
    }
}

/// Per-column z-score scaler for feature matrices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    means: Vec<f64>,
    scales: Vec<f64>,
}

impl StandardScaler {
    /// Fit the scaler on row-major feature vectors of equal width
    pub fn fit(rows: &[Vec<f64>]) -> Result<Self> {
        let width = match rows.first() {
            Some(row) => row.len(),
            None => {
                return Err(MathError::InsufficientData(
                    "Cannot fit a scaler on zero rows".to_string(),
                ))
            }
        };

        if rows.iter().any(|row| row.len() != width) {
            return Err(MathError::InvalidInput(
                "All feature rows must have the same width".to_string(),
            ));
        }

        let mut means = Vec::with_capacity(width);
        let mut scales = Vec::with_capacity(width);
        for column in 0..width {
            let values: Vec<f64> = rows.iter().map(|row| row[column]).collect();
            means.push(statistics::mean(&values)?);
            let std = statistics::std_dev(&values)?;
            // Constant columns pass through centred but unscaled
            scales.push(if std < f64::EPSILON { 1.0 } else { std });
        }

        Ok(Self { means, scales })
    }

    pub fn width(&self) -> usize {
        self.means.len()
    }

    /// Scale one feature row
    pub fn transform(&self, row: &[f64]) -> Result<Vec<f64>> {
        if row.len() != self.width() {
            return Err(MathError::InvalidInput(format!(
                "Expected {} features, got {}",
                self.width(),
                row.len()
            )));
        }

        Ok(row
            .iter()
            .zip(self.means.iter().zip(&self.scales))
            .map(|(&v, (&m, &s))| (v - m) / s)
            .collect())
    }

    pub fn transform_all(&self, rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        rows.iter().map(|row| self.transform(row)).collect()
    }
}
