//! Forecast strategy dispatcher
//!
//! Validates a request, runs the selected strategy and maps its raw output
//! into a [`ForecastResult`]. Nothing is cached between calls.

use crate::catalog::Strategy;
use crate::data::{Observation, TimeSeriesData};
use crate::envelope::ForecastResult;
use crate::error::{ForecastError, Result};
use crate::models::{FitQuality, ForecastModel, ModelForecast, TrainedForecastModel};
use std::time::Instant;

/// Fewest observations any strategy accepts
pub const MIN_OBSERVATIONS: usize = 30;
/// Horizon used when a request does not name one
pub const DEFAULT_HORIZON: usize = 30;
/// Largest horizon accepted unless configured otherwise
pub const DEFAULT_MAX_HORIZON: usize = 365;

/// Runs forecasting strategies behind a single contract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForecastDispatcher {
    max_horizon: usize,
}

impl Default for ForecastDispatcher {
    fn default() -> Self {
        Self {
            max_horizon: DEFAULT_MAX_HORIZON,
        }
    }
}

impl ForecastDispatcher {
    pub fn new(max_horizon: usize) -> Result<Self> {
        if max_horizon == 0 {
            return Err(ForecastError::InvalidParameter(
                "Maximum horizon must be positive".to_string(),
            ));
        }
        Ok(Self { max_horizon })
    }

    pub fn max_horizon(&self) -> usize {
        self.max_horizon
    }

    /// Forecast `horizon` days past the last observation with the named strategy
    pub fn forecast(
        &self,
        observations: Vec<Observation>,
        strategy: &str,
        horizon: usize,
    ) -> Result<ForecastResult> {
        if observations.len() < MIN_OBSERVATIONS {
            return Err(ForecastError::InsufficientData {
                required: MIN_OBSERVATIONS,
                actual: observations.len(),
            });
        }
        let strategy: Strategy = strategy.parse()?;
        let data = TimeSeriesData::new(observations)?;

        self.forecast_series(&data, strategy, horizon)
    }

    /// Forecast from an already validated series
    pub fn forecast_series(
        &self,
        data: &TimeSeriesData,
        strategy: Strategy,
        horizon: usize,
    ) -> Result<ForecastResult> {
        if data.len() < MIN_OBSERVATIONS {
            return Err(ForecastError::InsufficientData {
                required: MIN_OBSERVATIONS,
                actual: data.len(),
            });
        }
        if horizon == 0 || horizon > self.max_horizon {
            return Err(ForecastError::InvalidParameter(format!(
                "forecast_days must be between 1 and {}, got {}",
                self.max_horizon, horizon
            )));
        }
        if !strategy.is_available() {
            return Err(unavailable(strategy));
        }

        let started = Instant::now();
        let (output, fit) = match strategy {
            Strategy::SequenceModel => run_sequence_model(data, horizon)?,
            Strategy::SeasonalDecomposition => run_seasonal_decomposition(data, horizon)?,
            Strategy::VolatilityModel => run_volatility_model(data, horizon)?,
            Strategy::BoostedRegression => run_boosted_regression(data, horizon)?,
        };

        let result =
            ForecastResult::assemble(data.last_date(), &output, strategy.confidence(), fit)?;

        tracing::info!(
            strategy = strategy.name(),
            observations = data.len(),
            horizon,
            accuracy = result.accuracy,
            mae = result.mae,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "forecast complete"
        );

        Ok(result)
    }
}

/// Forecast with default settings; see [`ForecastDispatcher::forecast`]
pub fn forecast(
    observations: Vec<Observation>,
    strategy: &str,
    horizon: usize,
) -> Result<ForecastResult> {
    ForecastDispatcher::default().forecast(observations, strategy, horizon)
}

/// Train a model and produce its forecast and fit scores
fn run<M: ForecastModel>(
    model: M,
    data: &TimeSeriesData,
    horizon: usize,
) -> Result<(ModelForecast, FitQuality)> {
    let trained = model.train(data)?;
    tracing::debug!(model = trained.name(), "trained model");
    let output = trained.forecast(horizon)?;
    Ok((output, trained.fit_quality()))
}

fn unavailable(strategy: Strategy) -> ForecastError {
    ForecastError::DependencyUnavailable(strategy.name().to_string())
}

#[cfg(feature = "sequence-model")]
fn run_sequence_model(data: &TimeSeriesData, horizon: usize) -> Result<(ModelForecast, FitQuality)> {
    run(crate::models::sequence::SequenceModel::default(), data, horizon)
}

#[cfg(not(feature = "sequence-model"))]
fn run_sequence_model(_: &TimeSeriesData, _: usize) -> Result<(ModelForecast, FitQuality)> {
    Err(unavailable(Strategy::SequenceModel))
}

#[cfg(feature = "seasonal-decomposition")]
fn run_seasonal_decomposition(
    data: &TimeSeriesData,
    horizon: usize,
) -> Result<(ModelForecast, FitQuality)> {
    run(crate::models::seasonal::SeasonalDecomposition::default(), data, horizon)
}

#[cfg(not(feature = "seasonal-decomposition"))]
fn run_seasonal_decomposition(_: &TimeSeriesData, _: usize) -> Result<(ModelForecast, FitQuality)> {
    Err(unavailable(Strategy::SeasonalDecomposition))
}

#[cfg(feature = "volatility-model")]
fn run_volatility_model(data: &TimeSeriesData, horizon: usize) -> Result<(ModelForecast, FitQuality)> {
    run(crate::models::garch::GarchModel::default(), data, horizon)
}

#[cfg(not(feature = "volatility-model"))]
fn run_volatility_model(_: &TimeSeriesData, _: usize) -> Result<(ModelForecast, FitQuality)> {
    Err(unavailable(Strategy::VolatilityModel))
}

#[cfg(feature = "boosted-regression")]
fn run_boosted_regression(
    data: &TimeSeriesData,
    horizon: usize,
) -> Result<(ModelForecast, FitQuality)> {
    run(crate::models::boosted::BoostedRegression::default(), data, horizon)
}

#[cfg(not(feature = "boosted-regression"))]
fn run_boosted_regression(_: &TimeSeriesData, _: usize) -> Result<(ModelForecast, FitQuality)> {
    Err(unavailable(Strategy::BoostedRegression))
}
