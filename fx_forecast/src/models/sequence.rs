//! Recurrent sequence model
//!
//! A single-layer LSTM reads a window of min-max scaled closes and a dense
//! head predicts the next scaled close. Training is plain backpropagation
//! through time with Adam, one sequence per update. Weights are initialised
//! from a seeded generator so the same history always yields the same
//! forecast.

use crate::data::TimeSeriesData;
use crate::error::{ForecastError, Result};
use crate::metrics::{accuracy_score, mean_absolute_error, residuals};
use crate::models::{FitQuality, ForecastModel, ModelForecast, TrainedForecastModel};
use crate::utils::{sqrt_horizon_half_widths, z_score};
use ndarray::{s, Array, Array1, Array2, Axis, Dimension, Zip};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use trade_math::scaling::MinMaxScaler;
use trade_math::statistics;

const GRADIENT_CLIP: f64 = 5.0;

/// LSTM forecaster configuration
#[derive(Debug, Clone)]
pub struct SequenceModel {
    /// Name of the model
    name: String,
    sequence_length: usize,
    hidden_size: usize,
    epochs: usize,
    learning_rate: f64,
    seed: u64,
}

/// Trained LSTM forecaster
#[derive(Debug, Clone)]
pub struct TrainedSequenceModel {
    name: String,
    network: LstmNetwork,
    scaler: MinMaxScaler,
    /// Last `sequence_length` scaled closes
    window: Vec<f64>,
    /// Residual standard deviation in price units
    sigma: f64,
    z: f64,
    fit: FitQuality,
}

impl SequenceModel {
    /// Create a new model
    pub fn new(
        sequence_length: usize,
        hidden_size: usize,
        epochs: usize,
        learning_rate: f64,
    ) -> Result<Self> {
        if sequence_length == 0 || hidden_size == 0 || epochs == 0 {
            return Err(ForecastError::InvalidParameter(
                "Sequence length, hidden size and epochs must be positive".to_string(),
            ));
        }
        if learning_rate <= 0.0 {
            return Err(ForecastError::InvalidParameter(
                "Learning rate must be positive".to_string(),
            ));
        }

        Ok(Self {
            name: format!("LSTM (window={}, hidden={})", sequence_length, hidden_size),
            sequence_length,
            hidden_size,
            epochs,
            learning_rate,
            seed: 42,
        })
    }

    /// Use a different initialisation and shuffling seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

impl Default for SequenceModel {
    fn default() -> Self {
        Self {
            name: "LSTM (window=20, hidden=32)".to_string(),
            sequence_length: 20,
            hidden_size: 32,
            epochs: 10,
            learning_rate: 0.01,
            seed: 42,
        }
    }
}

impl ForecastModel for SequenceModel {
    type Trained = TrainedSequenceModel;

    fn train(&self, data: &TimeSeriesData) -> Result<Self::Trained> {
        let prices = data.close_prices();
        if prices.len() < self.sequence_length + 2 {
            return Err(ForecastError::InsufficientData {
                required: self.sequence_length + 2,
                actual: prices.len(),
            });
        }

        let scaler = MinMaxScaler::fit(&prices)?;
        let scaled = scaler.transform_all(&prices);

        let samples: Vec<(&[f64], f64)> = (self.sequence_length..scaled.len())
            .map(|i| (&scaled[i - self.sequence_length..i], scaled[i]))
            .collect();

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut network = LstmNetwork::new(self.hidden_size, &mut rng);
        let mut optimizer = Adam::new(&network, self.learning_rate);
        let mut order: Vec<usize> = (0..samples.len()).collect();

        for epoch in 0..self.epochs {
            order.shuffle(&mut rng);
            let mut loss = 0.0;
            for &i in &order {
                let (sequence, target) = samples[i];
                let pass = network.forward(sequence);
                let error = pass.output - target;
                loss += 0.5 * error * error;
                let gradients = network.backward(&pass, error);
                optimizer.step(&mut network, gradients);
            }
            tracing::trace!(epoch, loss = loss / samples.len() as f64, "sequence model epoch");
        }

        let predicted: Vec<f64> = samples
            .iter()
            .map(|(sequence, _)| scaler.inverse_transform(network.predict(sequence)))
            .collect();
        let actual: Vec<f64> = prices[self.sequence_length..].to_vec();

        let sigma = statistics::std_dev(&residuals(&predicted, &actual)?)?;
        let mae = mean_absolute_error(&predicted, &actual)?;
        let accuracy = accuracy_score(sigma, statistics::mean(&prices)?)?;

        tracing::debug!(sigma, mae, samples = samples.len(), "fitted sequence model");

        Ok(TrainedSequenceModel {
            name: self.name.clone(),
            network,
            scaler,
            window: scaled[scaled.len() - self.sequence_length..].to_vec(),
            sigma,
            z: z_score(0.95)?,
            fit: FitQuality { mae, accuracy },
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedForecastModel for TrainedSequenceModel {
    fn forecast(&self, horizon: usize) -> Result<ModelForecast> {
        let mut window = self.window.clone();
        let mut values = Vec::with_capacity(horizon);

        for _ in 0..horizon {
            let next = self.network.predict(&window);
            values.push(self.scaler.inverse_transform(next));
            window.remove(0);
            window.push(next);
        }

        let half_widths = sqrt_horizon_half_widths(self.z, self.sigma, horizon);
        ModelForecast::from_half_widths(values, &half_widths)
    }

    fn fit_quality(&self) -> FitQuality {
        self.fit
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// LSTM cell with a scalar input and a linear read-out of the last hidden state.
///
/// Gate rows in `weights` and `bias` are ordered input, forget, candidate, output.
#[derive(Debug, Clone)]
struct LstmNetwork {
    hidden: usize,
    /// `4H x (1 + H)`: input column first, then recurrent columns
    weights: Array2<f64>,
    bias: Array1<f64>,
    output_weights: Array1<f64>,
    output_bias: f64,
}

struct StepCache {
    /// `[x_t, h_{t-1}]`
    input: Array1<f64>,
    input_gate: Array1<f64>,
    forget_gate: Array1<f64>,
    candidate: Array1<f64>,
    output_gate: Array1<f64>,
    cell_prev: Array1<f64>,
    cell_tanh: Array1<f64>,
}

struct ForwardPass {
    steps: Vec<StepCache>,
    hidden: Array1<f64>,
    output: f64,
}

struct Gradients {
    weights: Array2<f64>,
    bias: Array1<f64>,
    output_weights: Array1<f64>,
    output_bias: f64,
}

impl LstmNetwork {
    fn new(hidden: usize, rng: &mut StdRng) -> Self {
        let limit = 1.0 / (hidden as f64).sqrt();
        let weights = Array2::from_shape_fn((4 * hidden, 1 + hidden), |_| {
            rng.gen_range(-limit..limit)
        });
        let output_weights = Array1::from_shape_fn(hidden, |_| rng.gen_range(-limit..limit));

        // Forget gate starts open so early gradients reach the whole window
        let mut bias = Array1::zeros(4 * hidden);
        bias.slice_mut(s![hidden..2 * hidden]).fill(1.0);

        Self {
            hidden,
            weights,
            bias,
            output_weights,
            output_bias: 0.0,
        }
    }

    fn forward(&self, sequence: &[f64]) -> ForwardPass {
        let h = self.hidden;
        let mut hidden = Array1::<f64>::zeros(h);
        let mut cell = Array1::<f64>::zeros(h);
        let mut steps = Vec::with_capacity(sequence.len());

        for &x in sequence {
            let mut input = Array1::<f64>::zeros(1 + h);
            input[0] = x;
            input.slice_mut(s![1..]).assign(&hidden);

            let z = self.weights.dot(&input) + &self.bias;
            let input_gate = z.slice(s![0..h]).mapv(sigmoid);
            let forget_gate = z.slice(s![h..2 * h]).mapv(sigmoid);
            let candidate = z.slice(s![2 * h..3 * h]).mapv(f64::tanh);
            let output_gate = z.slice(s![3 * h..4 * h]).mapv(sigmoid);

            let next_cell = &forget_gate * &cell + &input_gate * &candidate;
            let cell_tanh = next_cell.mapv(f64::tanh);
            hidden = &output_gate * &cell_tanh;

            steps.push(StepCache {
                input,
                input_gate,
                forget_gate,
                candidate,
                output_gate,
                cell_prev: cell,
                cell_tanh,
            });
            cell = next_cell;
        }

        let output = self.output_weights.dot(&hidden) + self.output_bias;
        ForwardPass {
            steps,
            hidden,
            output,
        }
    }

    fn predict(&self, sequence: &[f64]) -> f64 {
        self.forward(sequence).output
    }

    /// Gradients of `0.5 * error^2` where `error = output - target`
    fn backward(&self, pass: &ForwardPass, error: f64) -> Gradients {
        let h = self.hidden;
        let mut weights = Array2::<f64>::zeros(self.weights.raw_dim());
        let mut bias = Array1::<f64>::zeros(4 * h);
        let output_weights = &pass.hidden * error;

        let mut d_hidden = &self.output_weights * error;
        let mut d_cell = Array1::<f64>::zeros(h);

        for step in pass.steps.iter().rev() {
            let d_output_gate = &d_hidden * &step.cell_tanh;
            d_cell = d_cell
                + &d_hidden * &step.output_gate * &step.cell_tanh.mapv(|t| 1.0 - t * t);

            let d_input_gate = &d_cell * &step.candidate;
            let d_candidate = &d_cell * &step.input_gate;
            let d_forget_gate = &d_cell * &step.cell_prev;

            let mut dz = Array1::<f64>::zeros(4 * h);
            dz.slice_mut(s![0..h])
                .assign(&(d_input_gate * &step.input_gate.mapv(|g| g * (1.0 - g))));
            dz.slice_mut(s![h..2 * h])
                .assign(&(d_forget_gate * &step.forget_gate.mapv(|g| g * (1.0 - g))));
            dz.slice_mut(s![2 * h..3 * h])
                .assign(&(d_candidate * &step.candidate.mapv(|g| 1.0 - g * g)));
            dz.slice_mut(s![3 * h..4 * h])
                .assign(&(d_output_gate * &step.output_gate.mapv(|g| g * (1.0 - g))));

            weights = weights
                + dz.view()
                    .insert_axis(Axis(1))
                    .dot(&step.input.view().insert_axis(Axis(0)));
            bias = bias + &dz;

            let d_input = self.weights.t().dot(&dz);
            d_hidden = d_input.slice(s![1..]).to_owned();
            d_cell = d_cell * &step.forget_gate;
        }

        Gradients {
            weights,
            bias,
            output_weights,
            output_bias: error,
        }
    }
}

/// Adam moment estimates for every parameter of an [`LstmNetwork`]
#[derive(Debug)]
struct Adam {
    learning_rate: f64,
    beta1: f64,
    beta2: f64,
    epsilon: f64,
    t: i32,
    m_weights: Array2<f64>,
    v_weights: Array2<f64>,
    m_bias: Array1<f64>,
    v_bias: Array1<f64>,
    m_output: Array1<f64>,
    v_output: Array1<f64>,
    m_output_bias: f64,
    v_output_bias: f64,
}

impl Adam {
    fn new(network: &LstmNetwork, learning_rate: f64) -> Self {
        Self {
            learning_rate,
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-8,
            t: 0,
            m_weights: Array2::zeros(network.weights.raw_dim()),
            v_weights: Array2::zeros(network.weights.raw_dim()),
            m_bias: Array1::zeros(network.bias.len()),
            v_bias: Array1::zeros(network.bias.len()),
            m_output: Array1::zeros(network.output_weights.len()),
            v_output: Array1::zeros(network.output_weights.len()),
            m_output_bias: 0.0,
            v_output_bias: 0.0,
        }
    }

    fn step(&mut self, network: &mut LstmNetwork, gradients: Gradients) {
        self.t += 1;
        let correction1 = 1.0 - self.beta1.powi(self.t);
        let correction2 = 1.0 - self.beta2.powi(self.t);
        let rate = self.learning_rate * correction2.sqrt() / correction1;

        let (beta1, beta2, epsilon) = (self.beta1, self.beta2, self.epsilon);
        update(
            &mut network.weights,
            &gradients.weights,
            &mut self.m_weights,
            &mut self.v_weights,
            rate,
            beta1,
            beta2,
            epsilon,
        );
        update(
            &mut network.bias,
            &gradients.bias,
            &mut self.m_bias,
            &mut self.v_bias,
            rate,
            beta1,
            beta2,
            epsilon,
        );
        update(
            &mut network.output_weights,
            &gradients.output_weights,
            &mut self.m_output,
            &mut self.v_output,
            rate,
            beta1,
            beta2,
            epsilon,
        );

        let g = gradients.output_bias.clamp(-GRADIENT_CLIP, GRADIENT_CLIP);
        self.m_output_bias = beta1 * self.m_output_bias + (1.0 - beta1) * g;
        self.v_output_bias = beta2 * self.v_output_bias + (1.0 - beta2) * g * g;
        network.output_bias -= rate * self.m_output_bias / (self.v_output_bias.sqrt() + epsilon);
    }
}

#[allow(clippy::too_many_arguments)]
fn update<D: Dimension>(
    param: &mut Array<f64, D>,
    grad: &Array<f64, D>,
    m: &mut Array<f64, D>,
    v: &mut Array<f64, D>,
    rate: f64,
    beta1: f64,
    beta2: f64,
    epsilon: f64,
) {
    Zip::from(param)
        .and(grad)
        .and(m)
        .and(v)
        .for_each(|p, &g, m, v| {
            let g = g.clamp(-GRADIENT_CLIP, GRADIENT_CLIP);
            *m = beta1 * *m + (1.0 - beta1) * g;
            *v = beta2 * *v + (1.0 - beta2) * g * g;
            *p -= rate * *m / (v.sqrt() + epsilon);
        });
}
