//! Training loop for linear regression candidates.
//!
//! Mini-batch stochastic gradient descent on mean-squared-error loss, with an
//! optional L1 or L2 weight penalty. The same loop trains every roster
//! candidate; candidates differ only in their [`Penalty`] and
//! hyperparameters.

use crate::error::{PipelineError, Result};
use crate::frame::Matrix;
use crate::model::{Fitted, LinearModel, LinearParams, LinearRegression};

/// Weight penalty added to the loss gradient.
///
/// The bias term is never penalized.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Penalty {
    /// Plain least squares.
    None,
    /// Lasso: `λ · Σ|w|`.
    L1(f64),
    /// Ridge: `λ · Σw²`.
    L2(f64),
}

impl Penalty {
    /// Gradient contribution of the penalty for the current weights.
    fn grad(&self, params: &LinearParams) -> Vec<f64> {
        match self {
            Penalty::None => vec![0.0; params.weights.len()],
            Penalty::L1(lambda) => params
                .weights
                .iter()
                // Subgradient: zero weights contribute nothing.
                .map(|w| if *w == 0.0 { 0.0 } else { lambda * w.signum() })
                .collect(),
            Penalty::L2(lambda) => params.weights.iter().map(|w| 2.0 * lambda * w).collect(),
        }
    }
}

/// Orchestrates the SGD training loop for a [`LinearRegression`].
///
/// Built via [`Trainer::builder`]; immutable afterwards and reusable across
/// models.
#[derive(Clone, Debug)]
pub struct Trainer {
    learning_rate: f64,
    batch_size: usize,
    max_epochs: usize,
    penalty: Penalty,
}

/// Fluent builder for [`Trainer`].
///
/// Defaults: learning rate 0.01, batch size 32, 1000 epochs, no penalty.
#[derive(Clone, Debug)]
pub struct TrainerBuilder {
    learning_rate: f64,
    batch_size: usize,
    max_epochs: usize,
    penalty: Penalty,
}

impl Default for TrainerBuilder {
    fn default() -> Self {
        Self {
            learning_rate: 0.01,
            batch_size: 32,
            max_epochs: 1000,
            penalty: Penalty::None,
        }
    }
}

impl TrainerBuilder {
    pub fn learning_rate(mut self, lr: f64) -> Self {
        self.learning_rate = lr;
        self
    }

    pub fn batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    pub fn max_epochs(mut self, epochs: usize) -> Self {
        self.max_epochs = epochs;
        self
    }

    pub fn penalty(mut self, penalty: Penalty) -> Self {
        self.penalty = penalty;
        self
    }

    pub fn build(self) -> Trainer {
        Trainer {
            learning_rate: self.learning_rate,
            batch_size: self.batch_size,
            max_epochs: self.max_epochs,
            penalty: self.penalty,
        }
    }
}

impl Trainer {
    /// Start the builder pattern.
    pub fn builder() -> TrainerBuilder {
        TrainerBuilder::default()
    }

    /// Train the model for up to `max_epochs` over `(x, y)`.
    ///
    /// # Errors
    /// Fails on empty data, mismatched target length, or a zero batch size.
    pub fn fit(&self, mut model: LinearRegression, x: &Matrix, y: &[f64]) -> Result<LinearModel<Fitted>> {
        let (rows, _) = x.shape();
        if rows == 0 {
            return Err(PipelineError::EmptyData(
                "cannot train on an empty matrix".to_string(),
            ));
        }
        if y.len() != rows {
            return Err(PipelineError::SchemaMismatch {
                expected: format!("{} targets", rows),
                got: format!("{} targets", y.len()),
            });
        }
        if self.batch_size == 0 {
            return Err(PipelineError::InvalidParameter(
                "batch size must be positive".to_string(),
            ));
        }

        for epoch in 0..self.max_epochs {
            let mut total_loss = 0.0;
            let mut start = 0;
            while start < rows {
                let end = (start + self.batch_size).min(rows);
                let batch_x = x.slice_rows(start, end);
                let batch_y = &y[start..end];
                let n = (end - start) as f64;

                let preds = model.forward(&batch_x);
                // MSE and its gradient w.r.t. the predictions.
                let mut grad_preds = Vec::with_capacity(preds.len());
                for (pred, target) in preds.iter().zip(batch_y) {
                    let diff = pred - target;
                    total_loss += diff * diff;
                    grad_preds.push(2.0 * diff / n);
                }

                let mut grads = model.backward(&batch_x, &grad_preds);
                let penalty_grad = self.penalty.grad(model.params());
                for (g, p) in grads.weights.iter_mut().zip(&penalty_grad) {
                    *g += p;
                }

                let params = model.params();
                let new_params = LinearParams {
                    weights: params
                        .weights
                        .iter()
                        .zip(&grads.weights)
                        .map(|(w, g)| w - self.learning_rate * g)
                        .collect(),
                    bias: params.bias - self.learning_rate * grads.bias,
                };
                model.update_params(new_params);

                start = end;
            }

            log::debug!("epoch {}: loss = {}", epoch, total_loss / rows as f64);
        }

        Ok(model.into_fitted())
    }
}
