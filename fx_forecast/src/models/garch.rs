//! GARCH(1,1) volatility model
//!
//! Works on percentage log returns with a constant mean. The unconditional
//! variance is pinned to the sample variance (variance targeting), so only
//! `alpha` and `beta` are searched, first on a coarse grid and then on a fine
//! grid around the best coarse point, maximising the Gaussian log-likelihood.
//!
//! The price path compounds the mean return; bounds use the cumulative
//! forecast variance of the log price, so they widen with every step.

use crate::data::TimeSeriesData;
use crate::error::{ForecastError, Result};
use crate::metrics::accuracy_score;
use crate::models::{FitQuality, ForecastModel, ModelForecast, TrainedForecastModel};
use crate::utils::z_score;
use std::f64::consts::PI;
use trade_math::returns::log_returns_pct;
use trade_math::statistics;

const MIN_VARIANCE: f64 = 1e-12;
const MAX_PERSISTENCE: f64 = 0.999;

/// GARCH(1,1) model configuration
#[derive(Debug, Clone)]
pub struct GarchModel {
    /// Model name
    name: String,
    /// Central interval width for the bounds
    interval_width: f64,
}

/// Fitted GARCH(1,1) model
#[derive(Debug, Clone)]
pub struct TrainedGarchModel {
    name: String,
    /// Mean percentage log return
    mu: f64,
    omega: f64,
    /// ARCH parameter
    alpha: f64,
    /// GARCH parameter
    beta: f64,
    /// Last demeaned return
    last_shock: f64,
    /// Last conditional variance
    last_variance: f64,
    last_price: f64,
    z: f64,
    fit: FitQuality,
}

impl GarchModel {
    /// Create a new GARCH(1,1) model producing `interval_width` central bounds
    pub fn new(interval_width: f64) -> Result<Self> {
        if interval_width <= 0.0 || interval_width >= 1.0 {
            return Err(ForecastError::InvalidParameter(
                "Interval width must be between 0 and 1".to_string(),
            ));
        }

        Ok(Self {
            name: "GARCH(1,1)".to_string(),
            interval_width,
        })
    }
}

impl Default for GarchModel {
    fn default() -> Self {
        Self {
            name: "GARCH(1,1)".to_string(),
            interval_width: 0.95,
        }
    }
}

/// Conditional variances for the given shocks, seeded with the sample variance
fn conditional_variances(shocks: &[f64], omega: f64, alpha: f64, beta: f64, seed: f64) -> Vec<f64> {
    let mut variances = Vec::with_capacity(shocks.len());
    let mut variance = seed;
    for t in 0..shocks.len() {
        if t > 0 {
            variance = omega + alpha * shocks[t - 1].powi(2) + beta * variance;
        }
        variances.push(variance.max(MIN_VARIANCE));
    }
    variances
}

fn log_likelihood(shocks: &[f64], variances: &[f64]) -> f64 {
    -0.5 * shocks
        .iter()
        .zip(variances)
        .map(|(e, s2)| (2.0 * PI).ln() + s2.ln() + e.powi(2) / s2)
        .sum::<f64>()
}

/// Best `(alpha, beta)` on a grid, skipping non-stationary pairs
fn grid_search(
    shocks: &[f64],
    sample_variance: f64,
    alphas: impl Iterator<Item = f64> + Clone,
    betas: impl Iterator<Item = f64> + Clone,
) -> Option<(f64, f64, f64)> {
    let mut best: Option<(f64, f64, f64)> = None;
    for alpha in alphas {
        for beta in betas.clone() {
            if alpha < 0.0 || beta < 0.0 || alpha + beta >= MAX_PERSISTENCE {
                continue;
            }
            let omega = sample_variance * (1.0 - alpha - beta);
            let variances = conditional_variances(shocks, omega, alpha, beta, sample_variance);
            let ll = log_likelihood(shocks, &variances);
            if ll.is_finite() && best.map_or(true, |(_, _, best_ll)| ll > best_ll) {
                best = Some((alpha, beta, ll));
            }
        }
    }
    best
}

fn steps(start: f64, end: f64, step: f64) -> impl Iterator<Item = f64> + Clone {
    let count = ((end - start) / step).round() as usize;
    (0..=count).map(move |i| start + i as f64 * step)
}

impl ForecastModel for GarchModel {
    type Trained = TrainedGarchModel;

    fn train(&self, data: &TimeSeriesData) -> Result<Self::Trained> {
        let prices = data.close_prices();
        let returns = log_returns_pct(&prices)?;
        if returns.len() < 3 {
            return Err(ForecastError::InsufficientData {
                required: 4,
                actual: prices.len(),
            });
        }

        let mu = statistics::mean(&returns)?;
        let shocks: Vec<f64> = returns.iter().map(|r| r - mu).collect();
        let sample_variance = statistics::variance(&returns)?.max(MIN_VARIANCE);

        let (coarse_alpha, coarse_beta, _) = grid_search(
            &shocks,
            sample_variance,
            steps(0.0, 0.30, 0.02),
            steps(0.0, 0.98, 0.02),
        )
        .ok_or_else(|| {
            ForecastError::ComputationError("GARCH likelihood search failed".to_string())
        })?;

        let (alpha, beta, ll) = grid_search(
            &shocks,
            sample_variance,
            steps(coarse_alpha - 0.02, coarse_alpha + 0.02, 0.002),
            steps(coarse_beta - 0.02, coarse_beta + 0.02, 0.002),
        )
        .ok_or_else(|| {
            ForecastError::ComputationError("GARCH likelihood search failed".to_string())
        })?;

        let omega = sample_variance * (1.0 - alpha - beta);
        let variances = conditional_variances(&shocks, omega, alpha, beta, sample_variance);
        tracing::debug!(mu, omega, alpha, beta, log_likelihood = ll, "fitted GARCH(1,1)");

        // Fit is judged by how well conditional volatility tracks the size of each shock
        let vol_errors: Vec<f64> = shocks
            .iter()
            .zip(&variances)
            .map(|(e, s2)| e.abs() - s2.sqrt())
            .collect();
        let mae = statistics::mean_abs(&vol_errors)?;
        let scale = statistics::std_dev(&returns)?.max(MIN_VARIANCE.sqrt());
        let accuracy = accuracy_score(mae, scale)?;

        Ok(TrainedGarchModel {
            name: self.name.clone(),
            mu,
            omega,
            alpha,
            beta,
            last_shock: shocks[shocks.len() - 1],
            last_variance: variances[variances.len() - 1],
            last_price: data.last_close(),
            z: z_score(self.interval_width)?,
            fit: FitQuality { mae, accuracy },
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedGarchModel {
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    pub fn omega(&self) -> f64 {
        self.omega
    }

    /// Expected conditional variance for each of the next `horizon` periods
    pub fn forecast_variance(&self, horizon: usize) -> Vec<f64> {
        let persistence = self.alpha + self.beta;
        let long_run = self.omega / (1.0 - persistence);
        let next = self.omega + self.alpha * self.last_shock.powi(2) + self.beta * self.last_variance;

        (0..horizon)
            .map(|h| long_run + persistence.powi(h as i32) * (next - long_run))
            .collect()
    }
}

impl TrainedForecastModel for TrainedGarchModel {
    fn forecast(&self, horizon: usize) -> Result<ModelForecast> {
        let variances = self.forecast_variance(horizon);

        let mut values = Vec::with_capacity(horizon);
        let mut half_widths = Vec::with_capacity(horizon);
        let mut price = self.last_price;
        let mut cumulative_variance = 0.0;
        for variance in variances {
            price *= (self.mu / 100.0).exp();
            cumulative_variance += variance;
            values.push(price);
            half_widths.push(self.z * cumulative_variance.sqrt() / 100.0 * price);
        }

        ModelForecast::from_half_widths(values, &half_widths)
    }

    fn fit_quality(&self) -> FitQuality {
        self.fit
    }

    fn name(&self) -> &str {
        &self.name
    }
}
