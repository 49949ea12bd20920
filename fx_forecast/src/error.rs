//! Error types for the fx_forecast crate

use thiserror::Error;
use trade_math::MathError;

/// Custom error types for the fx_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Fewer observations than a forecast needs
    #[error("Insufficient historical data. Need at least {required} data points, got {actual}.")]
    InsufficientData { required: usize, actual: usize },

    /// Strategy name not recognised
    #[error("Unknown algorithm: {0}")]
    UnknownStrategy(String),

    /// Strategy known but not compiled into this build
    #[error("Algorithm '{0}' is not available in this build")]
    DependencyUnavailable(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error related to data validation or processing
    #[error("Data error: {0}")]
    DataError(String),

    /// Model fitting or forecasting produced unusable output
    #[error("Computation error: {0}")]
    ComputationError(String),

    /// Error from numeric helpers
    #[error("Math error: {0}")]
    MathError(#[from] MathError),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from CSV parsing
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

impl ForecastError {
    /// Whether the error was caused by the caller's input rather than the service
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ForecastError::InsufficientData { .. }
                | ForecastError::UnknownStrategy(_)
                | ForecastError::InvalidParameter(_)
                | ForecastError::DataError(_)
        )
    }
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;
