//! Descriptive statistics over price and residual series
//!
//! All dispersion measures are population measures (divide by `n`), which is
//! what the forecasting strategies use for residual spreads.

use crate::{MathError, Result};

fn ensure_non_empty(values: &[f64], what: &str) -> Result<()> {
    if values.is_empty() {
        return Err(MathError::InsufficientData(format!(
            "Cannot calculate {} of an empty series",
            what
        )));
    }
    Ok(())
}

/// Arithmetic mean
pub fn mean(values: &[f64]) -> Result<f64> {
    ensure_non_empty(values, "mean")?;
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population variance
pub fn variance(values: &[f64]) -> Result<f64> {
    let m = mean(values)?;
    Ok(values.iter().map(|&v| (v - m).powi(2)).sum::<f64>() / values.len() as f64)
}

/// Population standard deviation
pub fn std_dev(values: &[f64]) -> Result<f64> {
    Ok(variance(values)?.sqrt())
}

/// Smallest value
pub fn min(values: &[f64]) -> Result<f64> {
    ensure_non_empty(values, "minimum")?;
    Ok(values.iter().copied().fold(f64::INFINITY, f64::min))
}

/// Largest value
pub fn max(values: &[f64]) -> Result<f64> {
    ensure_non_empty(values, "maximum")?;
    Ok(values.iter().copied().fold(f64::NEG_INFINITY, f64::max))
}

/// Mean of absolute values
pub fn mean_abs(values: &[f64]) -> Result<f64> {
    ensure_non_empty(values, "mean absolute value")?;
    Ok(values.iter().map(|v| v.abs()).sum::<f64>() / values.len() as f64)
}

/// Summary of a window of prices, used as regression features
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowSummary {
    pub first: f64,
    pub last: f64,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl WindowSummary {
    /// Summarize a non-empty window
    pub fn of(window: &[f64]) -> Result<Self> {
        ensure_non_empty(window, "window summary")?;
        Ok(Self {
            first: window[0],
            last: window[window.len() - 1],
            mean: mean(window)?,
            std_dev: std_dev(window)?,
            min: min(window)?,
            max: max(window)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mean_and_std() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(mean(&values).unwrap(), 5.0);
        assert_relative_eq!(variance(&values).unwrap(), 4.0);
        assert_relative_eq!(std_dev(&values).unwrap(), 2.0);
    }

    #[test]
    fn test_empty_series() {
        assert!(matches!(mean(&[]), Err(MathError::InsufficientData(_))));
        assert!(std_dev(&[]).is_err());
        assert!(WindowSummary::of(&[]).is_err());
    }

    #[test]
    fn test_window_summary() {
        let summary = WindowSummary::of(&[3.0, 1.0, 2.0]).unwrap();
        assert_eq!(summary.first, 3.0);
        assert_eq!(summary.last, 2.0);
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.max, 3.0);
        assert_relative_eq!(summary.mean, 2.0);
        assert_relative_eq!(mean_abs(&[-1.0, 1.0, -4.0]).unwrap(), 2.0);
    }
}
