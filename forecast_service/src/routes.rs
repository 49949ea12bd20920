//! API route handlers

use crate::error::ApiError;
use crate::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use fx_forecast::{
    available_strategies, catalog, ForecastResult, Observation, Strategy, StrategyInfo,
    DEFAULT_HORIZON,
};
use serde::{Deserialize, Serialize};

/// Service name reported by the health check
pub const SERVICE_NAME: &str = "fx-forecast";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ForecastRequest {
    /// Daily closes, oldest first
    #[serde(default)]
    pub historical_data: Vec<Observation>,
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
    #[serde(default = "default_forecast_days")]
    pub forecast_days: usize,
}

fn default_algorithm() -> String {
    Strategy::default().name().to_string()
}

fn default_forecast_days() -> usize {
    DEFAULT_HORIZON
}

#[derive(Debug, Serialize)]
pub struct AlgorithmsResponse {
    pub algorithms: Vec<StrategyInfo>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub algorithms: Vec<&'static str>,
}

/// Fit the requested strategy and return its forecast envelope
pub async fn forecast(
    State(state): State<AppState>,
    payload: Result<Json<ForecastRequest>, JsonRejection>,
) -> Result<Json<ForecastResult>, ApiError> {
    let Json(request) = payload?;
    tracing::debug!(
        algorithm = %request.algorithm,
        observations = request.historical_data.len(),
        forecast_days = request.forecast_days,
        "forecast requested"
    );

    let dispatcher = state.dispatcher;
    let result = tokio::task::spawn_blocking(move || {
        dispatcher.forecast(
            request.historical_data,
            &request.algorithm,
            request.forecast_days,
        )
    })
    .await??;

    Ok(Json(result))
}

/// Static metadata for every strategy
pub async fn algorithms() -> Json<AlgorithmsResponse> {
    Json(AlgorithmsResponse {
        algorithms: catalog(),
    })
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        algorithms: available_strategies(),
    })
}
