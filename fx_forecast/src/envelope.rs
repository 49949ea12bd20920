//! The uniform forecast envelope returned for every strategy

use crate::error::{ForecastError, Result};
use crate::models::{FitQuality, ModelForecast};
use crate::utils::future_dates;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Kind of a point in the envelope; only forecasts are emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointType {
    Forecast,
}

/// One forecast day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    /// Point estimate
    pub rate: f64,
    pub upper: f64,
    pub lower: f64,
    #[serde(rename = "type")]
    pub point_type: PointType,
}

/// Forecast plus strategy confidence and historical fit scores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub forecast: Vec<ForecastPoint>,
    /// Fixed per strategy
    pub confidence: f64,
    /// `1 - error / scale`, at most 1
    pub accuracy: f64,
    /// Mean absolute error, non-negative
    pub mae: f64,
}

impl ForecastResult {
    /// Date the model output starting the day after `last_date` and check the
    /// envelope invariants
    pub fn assemble(
        last_date: NaiveDate,
        output: &ModelForecast,
        confidence: f64,
        fit: FitQuality,
    ) -> Result<Self> {
        let dates = future_dates(last_date, output.horizons())?;

        let mut forecast = Vec::with_capacity(output.horizons());
        for ((date, &rate), &(lower, upper)) in dates
            .into_iter()
            .zip(output.values())
            .zip(output.intervals())
        {
            if !(rate.is_finite() && lower.is_finite() && upper.is_finite()) {
                return Err(ForecastError::ComputationError(format!(
                    "Model produced a non-finite forecast for {}",
                    date
                )));
            }
            if !(upper >= rate && rate >= lower) {
                return Err(ForecastError::ComputationError(format!(
                    "Bounds [{}, {}] do not contain the estimate {} on {}",
                    lower, upper, rate, date
                )));
            }

            forecast.push(ForecastPoint {
                date,
                rate,
                upper,
                lower,
                point_type: PointType::Forecast,
            });
        }

        if !fit.mae.is_finite() || fit.mae < 0.0 {
            return Err(ForecastError::ComputationError(format!(
                "Mean absolute error must be finite and non-negative, got {}",
                fit.mae
            )));
        }
        if !fit.accuracy.is_finite() || fit.accuracy > 1.0 {
            return Err(ForecastError::ComputationError(format!(
                "Accuracy must be finite and at most 1, got {}",
                fit.accuracy
            )));
        }

        Ok(Self {
            forecast,
            confidence,
            accuracy: fit.accuracy,
            mae: fit.mae,
        })
    }

    pub fn horizon(&self) -> usize {
        self.forecast.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fit() -> FitQuality {
        FitQuality {
            mae: 0.5,
            accuracy: 0.9,
        }
    }

    #[test]
    fn test_assemble_dates_follow_last_observation() {
        let last = NaiveDate::from_ymd_opt(2024, 2, 28).unwrap();
        let output = ModelForecast::from_half_widths(vec![1.0, 2.0], &[0.1, 0.2]).unwrap();
        let result = ForecastResult::assemble(last, &output, 0.8, fit()).unwrap();

        assert_eq!(result.horizon(), 2);
        assert_eq!(
            result.forecast[0].date,
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert_eq!(
            result.forecast[1].date,
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
    }

    #[test]
    fn test_assemble_rejects_non_finite_output() {
        let last = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let output = ModelForecast::from_half_widths(vec![f64::NAN], &[0.1]).unwrap();
        let err = ForecastResult::assemble(last, &output, 0.8, fit()).unwrap_err();
        assert!(matches!(err, ForecastError::ComputationError(_)));
    }

    #[test]
    fn test_serialized_shape() {
        let last = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let output = ModelForecast::from_half_widths(vec![1.5], &[0.25]).unwrap();
        let result = ForecastResult::assemble(last, &output, 0.88, fit()).unwrap();

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["forecast"][0]["date"], "2024-01-02");
        assert_eq!(json["forecast"][0]["type"], "forecast");
        assert_eq!(json["forecast"][0]["upper"], 1.75);
        assert_eq!(json["confidence"], 0.88);
    }
}
