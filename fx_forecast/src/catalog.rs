//! Forecasting strategies and their static metadata

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The four interchangeable forecasting techniques
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Recurrent neural network over scaled closes
    SequenceModel,
    /// Trend with weekly and yearly seasonality
    #[default]
    SeasonalDecomposition,
    /// GARCH(1,1) on log returns
    VolatilityModel,
    /// Gradient-boosted trees over engineered window features
    BoostedRegression,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::SequenceModel,
        Strategy::SeasonalDecomposition,
        Strategy::VolatilityModel,
        Strategy::BoostedRegression,
    ];

    /// Canonical name used on the wire
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::SequenceModel => "sequence-model",
            Strategy::SeasonalDecomposition => "seasonal-decomposition",
            Strategy::VolatilityModel => "volatility-model",
            Strategy::BoostedRegression => "boosted-regression",
        }
    }

    /// Short name accepted for compatibility with older clients
    pub fn alias(&self) -> &'static str {
        match self {
            Strategy::SequenceModel => "lstm",
            Strategy::SeasonalDecomposition => "prophet",
            Strategy::VolatilityModel => "garch",
            Strategy::BoostedRegression => "xgboost",
        }
    }

    /// Fixed confidence reported with every forecast of this strategy
    pub fn confidence(&self) -> f64 {
        match self {
            Strategy::SequenceModel => 0.85,
            Strategy::SeasonalDecomposition => 0.88,
            Strategy::VolatilityModel => 0.82,
            Strategy::BoostedRegression => 0.83,
        }
    }

    /// Whether the strategy was compiled into this build
    pub fn is_available(&self) -> bool {
        match self {
            Strategy::SequenceModel => cfg!(feature = "sequence-model"),
            Strategy::SeasonalDecomposition => cfg!(feature = "seasonal-decomposition"),
            Strategy::VolatilityModel => cfg!(feature = "volatility-model"),
            Strategy::BoostedRegression => cfg!(feature = "boosted-regression"),
        }
    }

    pub fn info(&self) -> StrategyInfo {
        let (description, best_for, accuracy, speed) = match self {
            Strategy::SequenceModel => (
                "Long Short-Term Memory neural network",
                "Complex patterns, non-linear relationships",
                "High",
                "Slow",
            ),
            Strategy::SeasonalDecomposition => (
                "Trend with weekly and yearly seasonality",
                "Data with strong seasonal patterns",
                "Very High",
                "Medium",
            ),
            Strategy::VolatilityModel => (
                "GARCH volatility modeling",
                "Volatility forecasting, risk management",
                "High",
                "Fast",
            ),
            Strategy::BoostedRegression => (
                "Gradient boosting with feature engineering",
                "Short to medium term predictions",
                "High",
                "Medium",
            ),
        };

        StrategyInfo {
            name: self.name(),
            alias: self.alias(),
            description,
            best_for,
            accuracy,
            speed,
            available: self.is_available(),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = ForecastError;

    /// Accepts canonical names and aliases, case-insensitively, with `_` for `-`
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.name() == normalized || strategy.alias() == normalized)
            .ok_or_else(|| ForecastError::UnknownStrategy(s.to_string()))
    }
}

/// Static description of a strategy
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrategyInfo {
    pub name: &'static str,
    pub alias: &'static str,
    pub description: &'static str,
    pub best_for: &'static str,
    pub accuracy: &'static str,
    pub speed: &'static str,
    pub available: bool,
}

/// Metadata for every strategy, available or not
pub fn catalog() -> Vec<StrategyInfo> {
    Strategy::ALL.iter().map(Strategy::info).collect()
}

/// Canonical names of the strategies compiled into this build
pub fn available_strategies() -> Vec<&'static str> {
    Strategy::ALL
        .iter()
        .filter(|s| s.is_available())
        .map(|s| s.name())
        .collect()
}
