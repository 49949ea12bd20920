//! Seasonal decomposition model
//!
//! Decomposes the log price into a linear trend, a day-of-week effect and,
//! once the history covers a full year, a yearly Fourier series. Working in
//! log space makes the components multiplicative in price space and keeps
//! every forecast positive.
//!
//! Bounds combine the residual spread with the uncertainty of the trend slope,
//! which grows linearly with the distance from the last observation.

use crate::data::TimeSeriesData;
use crate::error::{ForecastError, Result};
use crate::metrics::{accuracy_score, mean_absolute_error};
use crate::models::{FitQuality, ForecastModel, ModelForecast, TrainedForecastModel};
use crate::utils::{future_dates, z_score};
use chrono::{Datelike, NaiveDate};
use std::f64::consts::PI;
use trade_math::regression::{least_squares, LinearTrend};
use trade_math::statistics;

const DAYS_PER_YEAR: f64 = 365.25;

/// Trend plus weekly and yearly seasonality
#[derive(Debug, Clone)]
pub struct SeasonalDecomposition {
    /// Name of the model
    name: String,
    /// Central interval width for the bounds
    interval_width: f64,
    /// Number of sine/cosine pairs for the yearly component
    yearly_order: usize,
    weekly: bool,
    yearly: bool,
}

/// Fitted seasonal decomposition
#[derive(Debug, Clone)]
pub struct TrainedSeasonalDecomposition {
    name: String,
    first_date: NaiveDate,
    last_date: NaiveDate,
    intercept: f64,
    /// Log-price slope per year
    slope: f64,
    slope_std_error: f64,
    /// Log multiplier by weekday, Monday first; zero for weekdays never observed
    weekday_effects: [f64; 7],
    /// Yearly Fourier coefficients as `(sin, cos)` pairs; empty when disabled
    yearly_coefficients: Vec<(f64, f64)>,
    /// Residual standard deviation of the log fit
    sigma: f64,
    z: f64,
    fit: FitQuality,
}

impl SeasonalDecomposition {
    /// Create a new model with the given bound width and yearly Fourier order
    pub fn new(interval_width: f64, yearly_order: usize) -> Result<Self> {
        if interval_width <= 0.0 || interval_width >= 1.0 {
            return Err(ForecastError::InvalidParameter(
                "Interval width must be between 0 and 1".to_string(),
            ));
        }
        if yearly_order == 0 {
            return Err(ForecastError::InvalidParameter(
                "Yearly Fourier order must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            name: format!("Seasonal decomposition (yearly order={})", yearly_order),
            interval_width,
            yearly_order,
            weekly: true,
            yearly: true,
        })
    }

    /// Enable or disable the day-of-week component
    pub fn with_weekly(mut self, weekly: bool) -> Self {
        self.weekly = weekly;
        self
    }

    /// Enable or disable the yearly component
    pub fn with_yearly(mut self, yearly: bool) -> Self {
        self.yearly = yearly;
        self
    }
}

impl Default for SeasonalDecomposition {
    fn default() -> Self {
        Self {
            name: "Seasonal decomposition (yearly order=3)".to_string(),
            interval_width: 0.8,
            yearly_order: 3,
            weekly: true,
            yearly: true,
        }
    }
}

fn weekday_index(date: NaiveDate) -> usize {
    date.weekday().num_days_from_monday() as usize
}

fn fourier_terms(day_offset: f64, order: usize) -> Vec<f64> {
    (1..=order)
        .flat_map(|k| {
            let angle = 2.0 * PI * k as f64 * day_offset / DAYS_PER_YEAR;
            [angle.sin(), angle.cos()]
        })
        .collect()
}

/// Highest yearly harmonic, up to `max_order`, that the typical spacing
/// between observations can resolve: harmonic `k` needs a median gap below
/// `365.25 / (2k)` days, otherwise its columns alias onto the trend.
fn resolvable_yearly_order(day_offsets: &[f64], max_order: usize) -> usize {
    let mut gaps: Vec<f64> = day_offsets.windows(2).map(|w| w[1] - w[0]).collect();
    if gaps.is_empty() {
        return 0;
    }
    gaps.sort_by(f64::total_cmp);
    let median_gap = gaps[gaps.len() / 2];

    (1..=max_order)
        .take_while(|&k| median_gap < DAYS_PER_YEAR / (2.0 * k as f64))
        .count()
}

impl ForecastModel for SeasonalDecomposition {
    type Trained = TrainedSeasonalDecomposition;

    fn train(&self, data: &TimeSeriesData) -> Result<Self::Trained> {
        let prices = data.close_prices();
        let dates = data.dates();
        let offsets = data.day_offsets();
        let log_prices: Vec<f64> = prices.iter().map(|p| p.ln()).collect();

        // Weekday dummies against the first observed weekday as reference
        let mut seen = [false; 7];
        for &date in &dates {
            seen[weekday_index(date)] = true;
        }
        let dummy_days: Vec<usize> = if self.weekly {
            (0..7).filter(|&d| seen[d]).skip(1).collect()
        } else {
            Vec::new()
        };
        let yearly_order = if self.yearly && data.span_days() as f64 >= DAYS_PER_YEAR {
            resolvable_yearly_order(&offsets, self.yearly_order)
        } else {
            0
        };

        let design: Vec<Vec<f64>> = dates
            .iter()
            .zip(&offsets)
            .map(|(&date, &offset)| {
                let mut row = vec![1.0, offset / DAYS_PER_YEAR];
                let day = weekday_index(date);
                row.extend(dummy_days.iter().map(|&d| if d == day { 1.0 } else { 0.0 }));
                row.extend(fourier_terms(offset, yearly_order));
                row
            })
            .collect();

        let beta = least_squares(&design, &log_prices, 1e-8)?;

        let mut intercept = beta[0];
        let slope = beta[1];

        let mut weekday_effects = [0.0; 7];
        for (i, &day) in dummy_days.iter().enumerate() {
            weekday_effects[day] = beta[2 + i];
        }
        // Centre observed weekdays so their multipliers have geometric mean 1
        let observed: Vec<usize> = (0..7).filter(|&d| seen[d]).collect();
        if self.weekly {
            let centre = observed.iter().map(|&d| weekday_effects[d]).sum::<f64>()
                / observed.len() as f64;
            for &d in &observed {
                weekday_effects[d] -= centre;
            }
            intercept += centre;
        }

        let yearly_start = 2 + dummy_days.len();
        let yearly_coefficients: Vec<(f64, f64)> = (0..yearly_order)
            .map(|k| (beta[yearly_start + 2 * k], beta[yearly_start + 2 * k + 1]))
            .collect();

        let seasonal: Vec<f64> = dates
            .iter()
            .zip(&offsets)
            .map(|(&date, &offset)| {
                weekday_effects[weekday_index(date)]
                    + yearly_component(&yearly_coefficients, offset)
            })
            .collect();

        let fitted_log: Vec<f64> = offsets
            .iter()
            .zip(&seasonal)
            .map(|(&offset, &s)| intercept + slope * offset / DAYS_PER_YEAR + s)
            .collect();
        let log_residuals: Vec<f64> = log_prices
            .iter()
            .zip(&fitted_log)
            .map(|(y, f)| y - f)
            .collect();
        let sigma = statistics::std_dev(&log_residuals)?;

        let deseasonalized: Vec<f64> = log_prices
            .iter()
            .zip(&seasonal)
            .map(|(y, s)| y - s)
            .collect();
        let years: Vec<f64> = offsets.iter().map(|o| o / DAYS_PER_YEAR).collect();
        let trend = LinearTrend::fit(&years, &deseasonalized)?;
        let slope_std_error = trend.slope_std_error();

        let fitted: Vec<f64> = fitted_log.iter().map(|f| f.exp()).collect();
        let mae = mean_absolute_error(&fitted, &prices)?;
        let accuracy = accuracy_score(mae, statistics::mean(&prices)?)?;

        tracing::debug!(
            slope,
            slope_std_error,
            deseasonalized_slope = trend.slope(),
            trend_r_squared = ?trend.r_squared(),
            sigma,
            weekly_terms = dummy_days.len(),
            yearly_order,
            "fitted seasonal decomposition"
        );

        Ok(TrainedSeasonalDecomposition {
            name: self.name.clone(),
            first_date: data.first_date(),
            last_date: data.last_date(),
            intercept,
            slope,
            slope_std_error,
            weekday_effects,
            yearly_coefficients,
            sigma,
            z: z_score(self.interval_width)?,
            fit: FitQuality { mae, accuracy },
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn yearly_component(coefficients: &[(f64, f64)], day_offset: f64) -> f64 {
    coefficients
        .iter()
        .enumerate()
        .map(|(i, (a, b))| {
            let angle = 2.0 * PI * (i + 1) as f64 * day_offset / DAYS_PER_YEAR;
            a * angle.sin() + b * angle.cos()
        })
        .sum()
}

impl TrainedSeasonalDecomposition {
    /// Multiplicative weekday factors, Monday first
    pub fn weekday_factors(&self) -> [f64; 7] {
        self.weekday_effects.map(f64::exp)
    }

    /// Annual growth rate of the trend
    pub fn annual_trend(&self) -> f64 {
        self.slope.exp() - 1.0
    }

    pub fn has_yearly_component(&self) -> bool {
        !self.yearly_coefficients.is_empty()
    }
}

impl TrainedForecastModel for TrainedSeasonalDecomposition {
    fn forecast(&self, horizon: usize) -> Result<ModelForecast> {
        let dates = future_dates(self.last_date, horizon)?;

        let mut values = Vec::with_capacity(horizon);
        let mut intervals = Vec::with_capacity(horizon);
        for (step, date) in dates.into_iter().enumerate() {
            let offset = (date - self.first_date).num_days() as f64;
            let log_value = self.intercept
                + self.slope * offset / DAYS_PER_YEAR
                + self.weekday_effects[weekday_index(date)]
                + yearly_component(&self.yearly_coefficients, offset);

            let years_ahead = (step + 1) as f64 / DAYS_PER_YEAR;
            let spread = (self.sigma.powi(2) + (years_ahead * self.slope_std_error).powi(2)).sqrt();
            let half_width = self.z * spread;

            values.push(log_value.exp());
            intervals.push(((log_value - half_width).exp(), (log_value + half_width).exp()));
        }

        ModelForecast::new_with_intervals(values, intervals)
    }

    fn fit_quality(&self) -> FitQuality {
        self.fit
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yearly_order_follows_spacing() {
        let daily: Vec<f64> = (0..800).map(f64::from).collect();
        assert_eq!(resolvable_yearly_order(&daily, 3), 3);

        let monthly: Vec<f64> = (0..40).map(|i| f64::from(i) * 30.0).collect();
        assert_eq!(resolvable_yearly_order(&monthly, 3), 3);

        let quarterly: Vec<f64> = (0..20).map(|i| f64::from(i) * 91.0).collect();
        assert_eq!(resolvable_yearly_order(&quarterly, 3), 2);

        let annual: Vec<f64> = (0..30).map(|i| f64::from(i) * 365.0).collect();
        assert_eq!(resolvable_yearly_order(&annual, 3), 0);

        assert_eq!(resolvable_yearly_order(&[0.0], 3), 0);
    }
}
