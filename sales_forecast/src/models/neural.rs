//! Feed-forward network regressor
//!
//! A single hidden layer of ReLU units with a linear output, trained by
//! full-batch gradient descent on squared error. Weight initialization
//! uses a seeded normal distribution, so training is deterministic for a
//! given seed.

use crate::error::{ForecastError, Result};
use crate::models::{Regressor, TrainedRegressor};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

/// Feed-forward network configuration
#[derive(Debug, Clone)]
pub struct NeuralNet {
    name: String,
    hidden_units: usize,
    epochs: usize,
    learning_rate: f64,
    seed: u64,
}

/// Trained feed-forward network
#[derive(Debug)]
pub struct TrainedNeuralNet {
    name: String,
    /// Hidden weights, one row of input weights per hidden unit
    w_hidden: Vec<Vec<f64>>,
    b_hidden: Vec<f64>,
    w_output: Vec<f64>,
    b_output: f64,
}

impl NeuralNet {
    /// Create a new network model
    pub fn new(hidden_units: usize, epochs: usize, learning_rate: f64, seed: u64) -> Result<Self> {
        if hidden_units == 0 {
            return Err(ForecastError::InvalidInput(
                "Network needs at least one hidden unit".to_string(),
            ));
        }
        if epochs == 0 {
            return Err(ForecastError::InvalidInput(
                "Network needs at least one training epoch".to_string(),
            ));
        }
        if learning_rate <= 0.0 {
            return Err(ForecastError::InvalidInput(
                "Learning rate must be positive".to_string(),
            ));
        }

        Ok(Self {
            name: "neural_network".to_string(),
            hidden_units,
            epochs,
            learning_rate,
            seed,
        })
    }
}

impl Regressor for NeuralNet {
    type Trained = TrainedNeuralNet;

    fn train(&self, rows: &[Vec<f64>], targets: &[f64]) -> Result<TrainedNeuralNet> {
        if rows.len() != targets.len() || rows.len() < 2 {
            return Err(ForecastError::InsufficientData(format!(
                "Network training needs at least 2 rows with matching targets, got {} rows and {} targets",
                rows.len(),
                targets.len()
            )));
        }

        let n_inputs = rows[0].len();
        let n = rows.len() as f64;
        let mut rng = StdRng::seed_from_u64(self.seed);

        // He initialization for the ReLU layer.
        let hidden_init = Normal::new(0.0, (2.0 / n_inputs as f64).sqrt())
            .map_err(|e| ForecastError::ModelFit(e.to_string()))?;
        let output_init = Normal::new(0.0, (2.0 / self.hidden_units as f64).sqrt())
            .map_err(|e| ForecastError::ModelFit(e.to_string()))?;

        let mut w_hidden: Vec<Vec<f64>> = (0..self.hidden_units)
            .map(|_| (0..n_inputs).map(|_| hidden_init.sample(&mut rng)).collect())
            .collect();
        let mut b_hidden = vec![0.0; self.hidden_units];
        let mut w_output: Vec<f64> = (0..self.hidden_units)
            .map(|_| output_init.sample(&mut rng))
            .collect();
        let mut b_output = 0.0;

        let mut activations = vec![vec![0.0; self.hidden_units]; rows.len()];
        let mut errors = vec![0.0; rows.len()];

        for _ in 0..self.epochs {
            // Forward pass
            for (i, row) in rows.iter().enumerate() {
                let mut output = b_output;
                for h in 0..self.hidden_units {
                    let mut z = b_hidden[h];
                    for (j, &x) in row.iter().enumerate() {
                        z += w_hidden[h][j] * x;
                    }
                    let a = z.max(0.0);
                    activations[i][h] = a;
                    output += w_output[h] * a;
                }
                errors[i] = output - targets[i];
            }

            // Backward pass, averaged over the batch
            let mut grad_w_output = vec![0.0; self.hidden_units];
            let mut grad_b_output = 0.0;
            let mut grad_w_hidden = vec![vec![0.0; n_inputs]; self.hidden_units];
            let mut grad_b_hidden = vec![0.0; self.hidden_units];

            for (i, row) in rows.iter().enumerate() {
                let e = errors[i];
                grad_b_output += e;
                for h in 0..self.hidden_units {
                    grad_w_output[h] += e * activations[i][h];
                    if activations[i][h] > 0.0 {
                        let back = e * w_output[h];
                        grad_b_hidden[h] += back;
                        for (j, &x) in row.iter().enumerate() {
                            grad_w_hidden[h][j] += back * x;
                        }
                    }
                }
            }

            b_output -= self.learning_rate * grad_b_output / n;
            for h in 0..self.hidden_units {
                w_output[h] -= self.learning_rate * grad_w_output[h] / n;
                b_hidden[h] -= self.learning_rate * grad_b_hidden[h] / n;
                for j in 0..n_inputs {
                    w_hidden[h][j] -= self.learning_rate * grad_w_hidden[h][j] / n;
                }
            }
        }

        let trained = TrainedNeuralNet {
            name: self.name.clone(),
            w_hidden,
            b_hidden,
            w_output,
            b_output,
        };

        if trained.forward(&rows[0]).is_nan() {
            return Err(ForecastError::ModelFit(
                "Network training diverged to NaN".to_string(),
            ));
        }

        Ok(trained)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedNeuralNet {
    fn forward(&self, row: &[f64]) -> f64 {
        let mut output = self.b_output;
        for h in 0..self.w_hidden.len() {
            let mut z = self.b_hidden[h];
            for (j, &x) in row.iter().enumerate() {
                z += self.w_hidden[h][j] * x;
            }
            output += self.w_output[h] * z.max(0.0);
        }
        output
    }
}

impl TrainedRegressor for TrainedNeuralNet {
    fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>> {
        for row in rows {
            if row.len() != self.w_hidden.first().map_or(0, |w| w.len()) {
                return Err(ForecastError::InvalidInput(format!(
                    "Expected {} features, got {}",
                    self.w_hidden.first().map_or(0, |w| w.len()),
                    row.len()
                )));
            }
        }
        Ok(rows.iter().map(|row| self.forward(row)).collect())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
