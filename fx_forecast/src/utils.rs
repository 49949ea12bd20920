//! Utility functions for the fx_forecast crate

use crate::error::{ForecastError, Result};
use chrono::{Days, NaiveDate};
use statrs::distribution::{ContinuousCDF, Normal};

/// Consecutive calendar days starting the day after `last_date`
pub fn future_dates(last_date: NaiveDate, horizon: usize) -> Result<Vec<NaiveDate>> {
    (1..=horizon as u64)
        .map(|offset| {
            last_date.checked_add_days(Days::new(offset)).ok_or_else(|| {
                ForecastError::InvalidParameter(format!(
                    "Forecast date {} days after {} is out of range",
                    offset, last_date
                ))
            })
        })
        .collect()
}

/// Two-sided standard normal critical value for a central interval,
/// e.g. `0.95 -> 1.96`
pub fn z_score(interval_width: f64) -> Result<f64> {
    if interval_width <= 0.0 || interval_width >= 1.0 {
        return Err(ForecastError::InvalidParameter(
            "Interval width must be between 0 and 1".to_string(),
        ));
    }

    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| ForecastError::ComputationError(e.to_string()))?;
    Ok(normal.inverse_cdf(0.5 + interval_width / 2.0))
}

/// Half-widths growing with the square root of the step: `z * sigma * sqrt(i)`
pub fn sqrt_horizon_half_widths(z: f64, sigma: f64, horizon: usize) -> Vec<f64> {
    (1..=horizon)
        .map(|step| z * sigma * (step as f64).sqrt())
        .collect()
}
