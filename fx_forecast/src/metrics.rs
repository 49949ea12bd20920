//! Metrics for evaluating how well a model reproduces history

use crate::error::{ForecastError, Result};

/// Mean absolute error between paired predictions and actual values
pub fn mean_absolute_error(predicted: &[f64], actual: &[f64]) -> Result<f64> {
    if predicted.len() != actual.len() || predicted.is_empty() {
        return Err(ForecastError::ComputationError(
            "Predicted and actual values must have the same non-zero length".to_string(),
        ));
    }

    let sum: f64 = predicted
        .iter()
        .zip(actual)
        .map(|(p, a)| (p - a).abs())
        .sum();

    Ok(sum / predicted.len() as f64)
}

/// Residuals `actual - predicted`
pub fn residuals(predicted: &[f64], actual: &[f64]) -> Result<Vec<f64>> {
    if predicted.len() != actual.len() || predicted.is_empty() {
        return Err(ForecastError::ComputationError(
            "Predicted and actual values must have the same non-zero length".to_string(),
        ));
    }

    Ok(actual.iter().zip(predicted).map(|(a, p)| a - p).collect())
}

/// Accuracy as `1 - error / scale`.
///
/// A non-positive scale only arises from a flat series; a zero error on such a
/// series is a perfect fit.
pub fn accuracy_score(error: f64, scale: f64) -> Result<f64> {
    if !error.is_finite() || error < 0.0 {
        return Err(ForecastError::ComputationError(format!(
            "Error must be finite and non-negative, got {}",
            error
        )));
    }

    if scale <= f64::EPSILON {
        if error <= f64::EPSILON {
            return Ok(1.0);
        }
        return Err(ForecastError::ComputationError(format!(
            "Cannot scale an error of {} by a non-positive scale",
            error
        )));
    }

    Ok(1.0 - error / scale)
}
