//! # FX Forecast
//!
//! Multi-day price forecasting behind one uniform contract.
//!
//! ## Features
//!
//! - Validated daily price history (`date`, `close`) loaded from JSON or CSV
//! - Four interchangeable strategies, each behind its own Cargo feature:
//!   - `sequence-model`: LSTM network over scaled closes
//!   - `seasonal-decomposition`: trend with weekly and yearly seasonality
//!   - `volatility-model`: GARCH(1,1) on log returns
//!   - `boosted-regression`: gradient-boosted trees over window features
//! - A single envelope for every strategy: per-day estimate with bounds that
//!   widen with the horizon, a fixed confidence and a historical accuracy score
//!
//! A strategy left out of the build is reported as unavailable instead of
//! failing to compile callers.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fx_forecast::{DataLoader, ForecastDispatcher, Strategy};
//!
//! let data = DataLoader::from_csv("eurusd.csv")?;
//! let result = ForecastDispatcher::default().forecast_series(
//!     &data,
//!     Strategy::VolatilityModel,
//!     30,
//! )?;
//!
//! for point in &result.forecast {
//!     println!("{} {:.4} [{:.4}, {:.4}]", point.date, point.rate, point.lower, point.upper);
//! }
//! # Ok::<(), fx_forecast::ForecastError>(())
//! ```

pub mod catalog;
pub mod data;
pub mod dispatcher;
pub mod envelope;
pub mod error;
pub mod metrics;
pub mod models;
pub mod utils;

// Re-export commonly used types
pub use crate::catalog::{available_strategies, catalog, Strategy, StrategyInfo};
pub use crate::data::{DataLoader, Observation, TimeSeriesData};
pub use crate::dispatcher::{
    forecast, ForecastDispatcher, DEFAULT_HORIZON, DEFAULT_MAX_HORIZON, MIN_OBSERVATIONS,
};
pub use crate::envelope::{ForecastPoint, ForecastResult, PointType};
pub use crate::error::{ForecastError, Result};
pub use crate::models::{FitQuality, ForecastModel, ModelForecast, TrainedForecastModel};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
