//! Gradient-boosted regression on engineered price features
//!
//! Each sample summarises a lookback window of closes into eight features
//! and targets the next close. The model trains on the first 80% of samples,
//! scores itself on the held-out tail and forecasts recursively by appending
//! each prediction to the window.

use crate::data::TimeSeriesData;
use crate::error::{ForecastError, Result};
use crate::metrics::{accuracy_score, mean_absolute_error};
use crate::models::tree::{RegressionTree, TreeParams};
use crate::models::{FitQuality, ForecastModel, ModelForecast, TrainedForecastModel};
use crate::utils::{sqrt_horizon_half_widths, z_score};
use trade_math::scaling::StandardScaler;
use trade_math::statistics::{self, WindowSummary};

/// Gradient-boosted trees over lookback-window features
#[derive(Debug, Clone)]
pub struct BoostedRegression {
    name: String,
    lookback: usize,
    n_estimators: usize,
    learning_rate: f64,
    tree: TreeParams,
    /// Share of samples used for training; the rest scores the model
    train_fraction: f64,
}

/// Fitted boosted ensemble
#[derive(Debug, Clone)]
pub struct TrainedBoostedRegression {
    name: String,
    lookback: usize,
    base_score: f64,
    learning_rate: f64,
    trees: Vec<RegressionTree>,
    scaler: StandardScaler,
    /// Most recent `lookback` closes
    history: Vec<f64>,
    z: f64,
    fit: FitQuality,
}

impl BoostedRegression {
    /// Create a new model
    pub fn new(
        lookback: usize,
        n_estimators: usize,
        learning_rate: f64,
        max_depth: usize,
    ) -> Result<Self> {
        if lookback < 2 {
            return Err(ForecastError::InvalidParameter(
                "Lookback must be at least 2".to_string(),
            ));
        }
        if n_estimators == 0 {
            return Err(ForecastError::InvalidParameter(
                "Number of estimators must be positive".to_string(),
            ));
        }
        if learning_rate <= 0.0 || learning_rate > 1.0 {
            return Err(ForecastError::InvalidParameter(
                "Learning rate must be in (0, 1]".to_string(),
            ));
        }
        if max_depth == 0 {
            return Err(ForecastError::InvalidParameter(
                "Max depth must be positive".to_string(),
            ));
        }

        Ok(Self {
            name: format!(
                "Boosted regression (trees={}, depth={}, lr={})",
                n_estimators, max_depth, learning_rate
            ),
            lookback,
            n_estimators,
            learning_rate,
            tree: TreeParams {
                max_depth,
                ..TreeParams::default()
            },
            train_fraction: 0.8,
        })
    }
}

impl Default for BoostedRegression {
    fn default() -> Self {
        Self {
            name: "Boosted regression (trees=100, depth=5, lr=0.1)".to_string(),
            lookback: 10,
            n_estimators: 100,
            learning_rate: 0.1,
            tree: TreeParams::default(),
            train_fraction: 0.8,
        }
    }
}

/// Eight features describing a window of closes
pub fn window_features(window: &[f64]) -> Result<Vec<f64>> {
    let s = WindowSummary::of(window)?;
    let change = s.last - s.first;
    let pct_change = if s.first.abs() > f64::EPSILON {
        change / s.first
    } else {
        0.0
    };

    Ok(vec![
        s.last,
        s.mean,
        s.std_dev,
        change,
        pct_change,
        s.max,
        s.min,
        s.last - s.mean,
    ])
}

fn ensemble_predict(
    base_score: f64,
    learning_rate: f64,
    trees: &[RegressionTree],
    row: &[f64],
) -> f64 {
    base_score + learning_rate * trees.iter().map(|t| t.predict(row)).sum::<f64>()
}

impl ForecastModel for BoostedRegression {
    type Trained = TrainedBoostedRegression;

    fn train(&self, data: &TimeSeriesData) -> Result<Self::Trained> {
        let prices = data.close_prices();
        // Need at least one training and one scoring sample
        if prices.len() < self.lookback + 2 {
            return Err(ForecastError::InsufficientData {
                required: self.lookback + 2,
                actual: prices.len(),
            });
        }

        let mut features = Vec::with_capacity(prices.len() - self.lookback);
        let mut targets = Vec::with_capacity(prices.len() - self.lookback);
        for i in self.lookback..prices.len() {
            features.push(window_features(&prices[i - self.lookback..i])?);
            targets.push(prices[i]);
        }

        let split = ((features.len() as f64 * self.train_fraction) as usize)
            .clamp(1, features.len() - 1);
        let (train_x, test_x) = features.split_at(split);
        let (train_y, test_y) = targets.split_at(split);

        let scaler = StandardScaler::fit(train_x)?;
        let train_x = scaler.transform_all(train_x)?;
        let test_x = scaler.transform_all(test_x)?;

        let base_score = statistics::mean(train_y)?;
        let mut predictions = vec![base_score; train_y.len()];
        let mut trees = Vec::with_capacity(self.n_estimators);
        for _ in 0..self.n_estimators {
            let gradients: Vec<f64> = predictions
                .iter()
                .zip(train_y)
                .map(|(p, y)| p - y)
                .collect();
            let tree = RegressionTree::fit(&train_x, &gradients, &self.tree);
            for (prediction, row) in predictions.iter_mut().zip(&train_x) {
                *prediction += self.learning_rate * tree.predict(row);
            }
            trees.push(tree);
        }

        let test_predictions: Vec<f64> = test_x
            .iter()
            .map(|row| ensemble_predict(base_score, self.learning_rate, &trees, row))
            .collect();
        let mae = mean_absolute_error(&test_predictions, test_y)?;
        let accuracy = accuracy_score(mae, statistics::mean(test_y)?)?;

        tracing::debug!(
            train_samples = train_y.len(),
            test_samples = test_y.len(),
            leaves = trees.iter().map(RegressionTree::leaf_count).sum::<usize>(),
            mae,
            "fitted boosted regression"
        );

        Ok(TrainedBoostedRegression {
            name: self.name.clone(),
            lookback: self.lookback,
            base_score,
            learning_rate: self.learning_rate,
            trees,
            scaler,
            history: prices[prices.len() - self.lookback..].to_vec(),
            z: z_score(0.95)?,
            fit: FitQuality { mae, accuracy },
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedBoostedRegression {
    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }
}

impl TrainedForecastModel for TrainedBoostedRegression {
    fn forecast(&self, horizon: usize) -> Result<ModelForecast> {
        let mut window = self.history.clone();
        let mut values = Vec::with_capacity(horizon);

        for _ in 0..horizon {
            let row = self
                .scaler
                .transform(&window_features(&window[window.len() - self.lookback..])?)?;
            let prediction = ensemble_predict(self.base_score, self.learning_rate, &self.trees, &row);
            values.push(prediction);
            window.push(prediction);
        }

        let half_widths = sqrt_horizon_half_widths(self.z, self.fit.mae, horizon);
        ModelForecast::from_half_widths(values, &half_widths)
    }

    fn fit_quality(&self) -> FitQuality {
        self.fit
    }

    fn name(&self) -> &str {
        &self.name
    }
}
