//! Forecasting models for price series
//!
//! Every strategy follows the same two-step shape: an untrained
//! [`ForecastModel`] carries hyperparameters and is trained on a
//! [`TimeSeriesData`], producing a [`TrainedForecastModel`] that emits point
//! forecasts with `(lower, upper)` bounds and reports how well it fit history.

use crate::data::TimeSeriesData;
use crate::error::{ForecastError, Result};
use std::fmt::Debug;

/// Raw model output: point forecasts with their bounds
#[derive(Debug, Clone, PartialEq)]
pub struct ModelForecast {
    /// Forecasted values
    values: Vec<f64>,
    /// `(lower, upper)` bound per period
    intervals: Vec<(f64, f64)>,
}

impl ModelForecast {
    /// Create a forecast with explicit bounds
    pub fn new_with_intervals(values: Vec<f64>, intervals: Vec<(f64, f64)>) -> Result<Self> {
        if values.len() != intervals.len() {
            return Err(ForecastError::ComputationError(format!(
                "Values length ({}) doesn't match intervals length ({})",
                values.len(),
                intervals.len()
            )));
        }

        Ok(Self { values, intervals })
    }

    /// Create a forecast with symmetric bounds `value +/- half_width`
    pub fn from_half_widths(values: Vec<f64>, half_widths: &[f64]) -> Result<Self> {
        if half_widths.iter().any(|w| *w < 0.0) {
            return Err(ForecastError::ComputationError(
                "Interval half-widths must be non-negative".to_string(),
            ));
        }

        let intervals = values
            .iter()
            .zip(half_widths)
            .map(|(&v, &w)| (v - w, v + w))
            .collect();

        Self::new_with_intervals(values, intervals)
    }

    /// Get the forecasted values
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Get the number of periods forecasted
    pub fn horizons(&self) -> usize {
        self.values.len()
    }

    /// Get the `(lower, upper)` bounds
    pub fn intervals(&self) -> &[(f64, f64)] {
        &self.intervals
    }
}

/// How closely a trained model reproduces history
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitQuality {
    /// Mean absolute error, in price units unless the strategy says otherwise
    pub mae: f64,
    /// `1 - error / scale`
    pub accuracy: f64,
}

/// Trained forecast model
pub trait TrainedForecastModel: Debug {
    /// Generate forecast for future periods
    fn forecast(&self, horizon: usize) -> Result<ModelForecast>;

    /// Historical fit metrics computed during training
    fn fit_quality(&self) -> FitQuality;

    /// Name of the model
    fn name(&self) -> &str;
}

/// Forecast model that can be trained on time series data
pub trait ForecastModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedForecastModel;

    /// Train the model on time series data
    fn train(&self, data: &TimeSeriesData) -> Result<Self::Trained>;

    /// Get the name of the model
    fn name(&self) -> &str;
}

#[cfg(feature = "boosted-regression")]
pub mod boosted;
#[cfg(feature = "volatility-model")]
pub mod garch;
#[cfg(feature = "seasonal-decomposition")]
pub mod seasonal;
#[cfg(feature = "sequence-model")]
pub mod sequence;
#[cfg(feature = "boosted-regression")]
pub mod tree;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_horizon_follows_values() {
        let forecast = ModelForecast::from_half_widths(vec![1.0, 2.0, 3.0], &[0.5, 1.0, 1.5]).unwrap();
        assert_eq!(forecast.horizons(), 3);
        assert_eq!(forecast.intervals()[2], (1.5, 4.5));
    }

    #[test]
    fn test_mismatched_intervals_rejected() {
        let result = ModelForecast::new_with_intervals(vec![1.0, 2.0], vec![(0.9, 1.1)]);
        assert!(matches!(result, Err(ForecastError::ComputationError(_))));
        assert!(ModelForecast::from_half_widths(vec![1.0], &[-0.1]).is_err());
    }
}
